//! Project configuration for the deploy scripts.
//!
//! The configuration is read once at process start and passed down explicitly;
//! nothing below the entry points reads ambient state. Built-in defaults cover
//! the BSC networks the contracts are deployed to, and an optional TOML file
//! can override or extend them. Secrets never live in the file: each network
//! names the environment variable that holds its deployer key.

use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use alloy::{
    primitives::Address, signers::local::PrivateKeySigner, transports::http::reqwest::Url,
};
use itertools::Itertools;
use serde::Deserialize;
use tracing::debug;

use crate::{
    constants::{
        BSCSCAN_API_KEY_ENV_VAR, BSC_MAINNET, BSC_MAINNET_CHAIN_ID, BSC_MAINNET_EXPLORER_API_URL,
        BSC_MAINNET_KEY_ENV_VAR, BSC_MAINNET_RPC_URL, BSC_TESTNET, BSC_TESTNET_CHAIN_ID,
        BSC_TESTNET_EXPLORER_API_URL, BSC_TESTNET_KEY_ENV_VAR, BSC_TESTNET_RPC_URL,
        DEFAULT_ARTIFACTS_PATH, DEFAULT_CONFIG_FILE, DEFAULT_NETWORK, DEFAULT_OPTIMIZER_RUNS,
        DEFAULT_SOLC_VERSION, NUM_DEPLOY_CONFIRMATIONS,
    },
    errors::ScriptError,
};

/// The full project configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// The network used when none is requested explicitly
    pub default_network: String,
    /// The known networks, keyed by name
    pub networks: BTreeMap<String, NetworkConfig>,
    /// The compiler settings the artifacts are expected to be built with
    pub solidity: SolidityConfig,
    /// Filesystem locations of build outputs
    pub paths: PathsConfig,
    /// Settings for the deployment transaction itself
    pub deploy: DeploySettings,
}

/// A single network entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkConfig {
    /// The RPC endpoint
    pub url: String,
    /// The environment variable holding the deployer's private key
    pub accounts_env: String,
    /// The chain ID the endpoint is expected to report
    #[serde(default)]
    pub chain_id: Option<u64>,
    /// The Etherscan-compatible explorer API used for verification
    #[serde(default)]
    pub explorer_api_url: Option<String>,
    /// The environment variable holding the explorer API key
    #[serde(default)]
    pub explorer_api_key_env: Option<String>,
}

/// Solidity compiler settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolidityConfig {
    /// The compilers used to build the contracts
    pub compilers: Vec<CompilerConfig>,
    /// The optimizer settings used to build the contracts
    pub optimizer: OptimizerConfig,
}

/// A single compiler entry
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerConfig {
    /// The short compiler version, e.g. `0.8.1`
    pub version: String,
}

/// Optimizer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Whether the optimizer is enabled
    pub enabled: bool,
    /// The number of optimizer runs
    pub runs: u64,
}

/// Build output locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// The root of the compiled artifacts tree
    pub artifacts: PathBuf,
}

/// Deployment transaction settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeploySettings {
    /// The number of confirmations to wait for
    pub confirmations: u64,
    /// How long to wait for confirmation; unset waits on the transport default
    pub confirmation_timeout_secs: Option<u64>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_network: DEFAULT_NETWORK.to_string(),
            networks: default_networks(),
            solidity: SolidityConfig::default(),
            paths: PathsConfig::default(),
            deploy: DeploySettings::default(),
        }
    }
}

impl Default for SolidityConfig {
    fn default() -> Self {
        Self {
            compilers: vec![CompilerConfig {
                version: DEFAULT_SOLC_VERSION.to_string(),
            }],
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            runs: DEFAULT_OPTIMIZER_RUNS,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            artifacts: PathBuf::from(DEFAULT_ARTIFACTS_PATH),
        }
    }
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            confirmations: NUM_DEPLOY_CONFIRMATIONS,
            confirmation_timeout_secs: None,
        }
    }
}

/// The networks known without any config file
fn default_networks() -> BTreeMap<String, NetworkConfig> {
    BTreeMap::from([
        (
            BSC_MAINNET.to_string(),
            NetworkConfig {
                url: BSC_MAINNET_RPC_URL.to_string(),
                accounts_env: BSC_MAINNET_KEY_ENV_VAR.to_string(),
                chain_id: Some(BSC_MAINNET_CHAIN_ID),
                explorer_api_url: Some(BSC_MAINNET_EXPLORER_API_URL.to_string()),
                explorer_api_key_env: Some(BSCSCAN_API_KEY_ENV_VAR.to_string()),
            },
        ),
        (
            BSC_TESTNET.to_string(),
            NetworkConfig {
                url: BSC_TESTNET_RPC_URL.to_string(),
                accounts_env: BSC_TESTNET_KEY_ENV_VAR.to_string(),
                chain_id: Some(BSC_TESTNET_CHAIN_ID),
                explorer_api_url: Some(BSC_TESTNET_EXPLORER_API_URL.to_string()),
                explorer_api_key_env: Some(BSCSCAN_API_KEY_ENV_VAR.to_string()),
            },
        ),
    ])
}

impl ProjectConfig {
    /// Load the project configuration.
    ///
    /// An explicit path must exist. Without one, `deploy.toml` in the working
    /// directory is used if present, and the built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ScriptError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default_path.exists() {
                    debug!("no config file found, using built-in defaults");
                    return Ok(Self::default());
                }
                default_path
            }
        };

        debug!(path = %path.display(), "loading project config");
        let contents = fs::read_to_string(&path).map_err(|e| {
            ScriptError::Configuration(format!("reading {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse a TOML config, layering its networks over the built-in ones
    pub fn from_toml_str(contents: &str) -> Result<Self, ScriptError> {
        let mut config: ProjectConfig =
            toml::from_str(contents).map_err(|e| ScriptError::Configuration(e.to_string()))?;

        let mut networks = default_networks();
        networks.append(&mut config.networks);
        config.networks = networks;

        if config.solidity.compilers.is_empty() {
            return Err(ScriptError::Configuration(
                "at least one compiler must be configured".to_string(),
            ));
        }

        Ok(config)
    }

    /// The name of the network to use, given an optional explicit request
    pub fn network_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.default_network)
    }

    /// Look up a network by name
    pub fn network(&self, name: &str) -> Result<&NetworkConfig, ScriptError> {
        self.networks.get(name).ok_or_else(|| {
            ScriptError::Configuration(format!(
                "unknown network `{}`, expected one of: {}",
                name,
                self.networks.keys().join(", ")
            ))
        })
    }
}

impl SolidityConfig {
    /// Whether the given short compiler version is one the project builds with
    pub fn uses_compiler(&self, version: &str) -> bool {
        self.compilers.iter().any(|c| c.version == version)
    }
}

impl DeploySettings {
    /// The confirmation timeout, if one is configured
    pub fn confirmation_timeout(&self) -> Option<Duration> {
        self.confirmation_timeout_secs.map(Duration::from_secs)
    }
}

/// The network a process deploys to, with its signing account.
///
/// Exactly one profile is active per process. It is resolved once from the
/// project config and the environment, then only ever read.
#[derive(Clone)]
pub struct NetworkProfile {
    /// The network name
    pub name: String,
    /// The RPC endpoint
    pub rpc_url: Url,
    /// The deployer's signer
    pub signer: PrivateKeySigner,
    /// The chain ID the endpoint is expected to report
    pub chain_id: Option<u64>,
}

impl NetworkProfile {
    /// Resolve the profile for the requested network, reading the deployer
    /// key from the process environment
    pub fn resolve(config: &ProjectConfig, network: Option<&str>) -> Result<Self, ScriptError> {
        Self::resolve_with(config, network, |var| env::var(var).ok())
    }

    /// Resolve the profile for the requested network, reading secrets through
    /// the given lookup
    pub fn resolve_with(
        config: &ProjectConfig,
        network: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ScriptError> {
        let name = config.network_name(network);
        let network = config.network(name)?;

        let rpc_url = Url::parse(&network.url).map_err(|e| {
            ScriptError::Configuration(format!("invalid RPC URL for `{}`: {}", name, e))
        })?;

        let priv_key = lookup(&network.accounts_env)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ScriptError::Configuration(format!(
                    "no deployer key for `{}`: set the `{}` environment variable",
                    name, network.accounts_env
                ))
            })?;
        let signer = PrivateKeySigner::from_str(priv_key.trim()).map_err(|e| {
            ScriptError::Configuration(format!(
                "invalid deployer key in `{}`: {}",
                network.accounts_env, e
            ))
        })?;

        Ok(Self {
            name: name.to_string(),
            rpc_url,
            signer,
            chain_id: network.chain_id,
        })
    }

    /// The address transactions are sent from
    pub fn deployer_address(&self) -> Address {
        self.signer.address()
    }
}
