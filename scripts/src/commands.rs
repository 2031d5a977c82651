//! Implementations of the various deploy scripts

use std::{
    env, io,
    path::{Path, PathBuf},
    process::ExitCode,
    str::FromStr,
};

use alloy::primitives::Address;
use tracing::info;

use crate::{
    artifacts::{ArtifactResolver, HardhatArtifacts},
    cli::VerifyArgs,
    config::{NetworkProfile, ProjectConfig},
    constants::{CONFIG_ENV_VAR, NETWORK_ENV_VAR},
    deployer::AlloyDeployer,
    errors::ScriptError,
    runner::{DeploymentRequest, DeploymentResult, DeploymentRunner},
    types::FixedScript,
    utils::{parse_addr_from_deployments_file, report, setup_logging, write_deployed_address},
    verify::{verify_contract, ExplorerClient},
};

/// The artifact resolver for the project's build output
pub fn artifact_resolver(config: &ProjectConfig) -> HardhatArtifacts {
    HardhatArtifacts::new(config.paths.artifacts.clone()).with_solidity(config.solidity.clone())
}

/// Deploy a contract to the profile's network
pub async fn deploy(
    request: DeploymentRequest,
    profile: &NetworkProfile,
    config: &ProjectConfig,
) -> DeploymentResult {
    let deployer = AlloyDeployer::new(profile, &config.deploy);
    let runner = DeploymentRunner::new(artifact_resolver(config), deployer);
    runner.deploy(request).await
}

/// Deploy a contract, recording its address in the deployments file if one
/// is given
pub async fn deploy_and_record(
    request: DeploymentRequest,
    config: &ProjectConfig,
    network: Option<&str>,
    deployments_path: Option<&Path>,
) -> Result<Address, ScriptError> {
    let profile = NetworkProfile::resolve(config, network)?;
    info!(
        network = %profile.name,
        deployer = %profile.deployer_address(),
        contract = %request.contract,
        "deploying contract"
    );

    let deployed = deploy(request, &profile, config).await?;

    if let Some(path) = deployments_path {
        write_deployed_address(path, &profile.name, &deployed.contract_name, deployed.address)?;
        info!(path = %path.display(), "recorded deployment");
    }

    Ok(deployed.address)
}

/// Verify a deployed contract's source with the network's block explorer
pub async fn verify(
    args: VerifyArgs,
    config: &ProjectConfig,
    network: Option<&str>,
    deployments_path: Option<&Path>,
) -> Result<String, ScriptError> {
    let network_name = config.network_name(network);
    let network_config = config.network(network_name)?;

    let api_url = network_config.explorer_api_url.as_deref().ok_or_else(|| {
        ScriptError::Configuration(format!("no explorer API configured for `{}`", network_name))
    })?;
    let api_key_env = network_config.explorer_api_key_env.as_deref().ok_or_else(|| {
        ScriptError::Configuration(format!("no explorer API key configured for `{}`", network_name))
    })?;
    let api_key = env::var(api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            ScriptError::Configuration(format!(
                "no explorer API key: set the `{}` environment variable",
                api_key_env
            ))
        })?;

    let artifact = artifact_resolver(config).resolve(&args.contract)?;

    let address = match args.address {
        Some(addr) => Address::from_str(&addr)
            .map_err(|e| ScriptError::Configuration(format!("invalid address `{}`: {}", addr, e)))?,
        None => {
            let path = deployments_path.ok_or_else(|| {
                ScriptError::Configuration(
                    "no address given and no deployments file to read it from".to_string(),
                )
            })?;
            parse_addr_from_deployments_file(path, network_name, &artifact.contract_name)?
        }
    };

    let client = ExplorerClient::new(api_url, api_key)?;
    verify_contract(&client, &artifact, address, &args.args).await?;

    Ok(address.to_checksum(None))
}

/// Entry point shared by the fixed deploy binaries.
///
/// These take no flags; the network and config file come from the
/// environment, optionally populated from a `.env` file.
pub async fn run_fixed_script(script: FixedScript) -> ExitCode {
    dotenvy::dotenv().ok();
    setup_logging();

    let outcome = fixed_script(script).await;
    ExitCode::from(report(outcome, &mut io::stdout(), &mut io::stderr()))
}

/// Run a fixed deploy script, returning the deployed address
async fn fixed_script(script: FixedScript) -> Result<String, ScriptError> {
    let config_path = env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    let network = env::var(NETWORK_ENV_VAR).ok().filter(|n| !n.is_empty());

    let config = ProjectConfig::load(config_path.as_deref())?;
    info!(%script, "running deploy script");

    let address = deploy_and_record(script.request(), &config, network.as_deref(), None).await?;
    Ok(address.to_checksum(None))
}
