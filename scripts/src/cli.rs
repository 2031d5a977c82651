//! Definitions of CLI arguments and commands for deploy scripts

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy_and_record, verify},
    config::ProjectConfig,
    constants::{CONFIG_ENV_VAR, NETWORK_ENV_VAR},
    errors::ScriptError,
    runner::DeploymentRequest,
    types::FixedScript,
};

/// Deploy compiled contracts and record or verify them
#[derive(Parser)]
pub struct Cli {
    /// Path to the project config file
    #[arg(long, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// The network to deploy to, defaults to the config's default network
    #[arg(short, long, env = NETWORK_ENV_VAR)]
    pub network: Option<String>,

    /// Path to a JSON file recording deployed addresses
    #[arg(short, long)]
    pub deployments_path: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Load the project config and run the command, returning the line to
    /// print on success
    pub async fn run(self) -> Result<String, ScriptError> {
        let config = ProjectConfig::load(self.config.as_deref())?;
        self.command.run(&config, self.network.as_deref(), self.deployments_path.as_deref()).await
    }
}

/// The deploy script commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy any compiled contract
    Deploy(DeployArgs),
    /// Deploy the AMM query contract
    AmmQuery,
    /// Deploy the arbitrage contract
    Arbitrage,
    /// Deploy the treasury contract with its fixed parameters
    Treasury,
    /// Verify a deployed contract's source
    Verify(VerifyArgs),
}

impl Command {
    /// Run the command against the given config and network
    pub async fn run(
        self,
        config: &ProjectConfig,
        network: Option<&str>,
        deployments_path: Option<&Path>,
    ) -> Result<String, ScriptError> {
        let request = match self {
            Command::Deploy(args) => DeploymentRequest::new(args.contract, args.args),
            Command::AmmQuery => FixedScript::AmmQuery.request(),
            Command::Arbitrage => FixedScript::Arbitrage.request(),
            Command::Treasury => FixedScript::Treasury.request(),
            Command::Verify(args) => {
                return verify(args, config, network, deployments_path).await;
            }
        };

        let address = deploy_and_record(request, config, network, deployments_path).await?;
        Ok(address.to_checksum(None))
    }
}

/// Deploy any compiled contract with the given constructor arguments
#[derive(Args)]
pub struct DeployArgs {
    /// The contract to deploy, as a bare name or `path/To.sol:Name`
    #[arg(short, long)]
    pub contract: String,

    /// Constructor arguments, in declaration order
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Verify a deployed contract's source with the network's block explorer
#[derive(Args)]
pub struct VerifyArgs {
    /// The deployed contract, as a bare name or `path/To.sol:Name`
    #[arg(short, long)]
    pub contract: String,

    /// The contract's address in hex, read from the deployments file if omitted
    #[arg(short, long)]
    pub address: Option<String>,

    /// The constructor arguments the contract was deployed with
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}
