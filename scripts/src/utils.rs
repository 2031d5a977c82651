//! Utilities for the deploy scripts.

use std::{
    fmt::Display,
    fs, io,
    io::Write,
    path::Path,
    str::FromStr,
};

use alloy::{
    primitives::Address,
    providers::{DynProvider, ProviderBuilder},
};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Value};
use tracing_subscriber::EnvFilter;

use crate::{
    config::NetworkProfile,
    constants::{
        DEFAULT_LOG_FILTER, DEPLOYMENTS_INDENT, DEPLOYMENTS_KEY, EXIT_FAILURE, EXIT_SUCCESS,
    },
    errors::ScriptError,
};

/// Sets up a client for the given network that signs with the profile's key
pub fn setup_client(profile: &NetworkProfile) -> DynProvider {
    let provider = ProviderBuilder::new()
        .wallet(profile.signer.clone())
        .connect_http(profile.rpc_url.clone());
    DynProvider::new(provider)
}

/// Install the global log subscriber.
///
/// Logs go to stderr so that stdout carries nothing but the script's result.
pub fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Report a script's outcome and return the process exit code.
///
/// On success the output is written as a single line to `stdout`; on failure
/// the error goes to `stderr` and nothing is written to `stdout`.
pub fn report<T: Display>(
    outcome: Result<T, ScriptError>,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> u8 {
    match outcome {
        Ok(output) => match writeln!(stdout, "{}", output) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                let _ = writeln!(stderr, "Error: writing output: {}", e);
                EXIT_FAILURE
            }
        },
        Err(e) => {
            let _ = writeln!(stderr, "Error: {}", e);
            EXIT_FAILURE
        }
    }
}

// ---------------
// | Deployments |
// ---------------

/// Read a JSON file
pub fn get_json_from_file(file_path: &Path) -> Result<Value, ScriptError> {
    let contents = fs::read_to_string(file_path)
        .map_err(|e| ScriptError::ReadDeployments(format!("{}: {}", file_path.display(), e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ReadDeployments(format!("{}: {}", file_path.display(), e)))
}

/// Read a deployed contract's address from the deployments file
pub fn parse_addr_from_deployments_file(
    file_path: &Path,
    network: &str,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    let parsed_json = get_json_from_file(file_path)?;

    let addr = parsed_json[DEPLOYMENTS_KEY][network][contract_key]
        .as_str()
        .ok_or_else(|| {
            ScriptError::ReadDeployments(format!(
                "no `{}` deployment recorded for `{}`",
                contract_key, network
            ))
        })?;

    Address::from_str(addr).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Record a deployed contract's address in the deployments file.
///
/// The file is created if missing; other entries are left untouched.
pub fn write_deployed_address(
    file_path: &Path,
    network: &str,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    let mut parsed_json = if file_path.exists() {
        get_json_from_file(file_path)?
    } else {
        Value::Object(Map::new())
    };

    let deployments = object_entry(&mut parsed_json, DEPLOYMENTS_KEY)?;
    let network_deployments = object_entry_in(deployments, network)?;
    network_deployments.insert(
        contract_key.to_string(),
        Value::String(address.to_checksum(None)),
    );

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(DEPLOYMENTS_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    parsed_json
        .serialize(&mut ser)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    buf.push(b'\n');

    fs::write(file_path, buf)
        .map_err(|e| ScriptError::WriteDeployments(format!("{}: {}", file_path.display(), e)))
}

/// Get the object under `key` in a JSON object, creating it if missing
fn object_entry<'a>(
    value: &'a mut Value,
    key: &str,
) -> Result<&'a mut Map<String, Value>, ScriptError> {
    let map = value.as_object_mut().ok_or_else(|| {
        ScriptError::WriteDeployments("deployments file is not a JSON object".to_string())
    })?;
    object_entry_in(map, key)
}

/// Get the object under `key` in a JSON map, creating it if missing
fn object_entry_in<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Map<String, Value>, ScriptError> {
    map.entry(key)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| ScriptError::WriteDeployments(format!("`{}` is not a JSON object", key)))
}
