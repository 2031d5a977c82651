//! The deployment runner: resolve an artifact, submit its creation
//! transaction, and wait for the contract to land on chain.
//!
//! A deployment moves through `not-started -> submitted -> confirmed | failed`
//! exactly once. Nothing is retried; a failed deployment is recovered by
//! running the script again, which creates a new contract.

use alloy::primitives::{Address, Bytes, TxHash};
use tracing::{info, warn};

use crate::{artifacts::ArtifactResolver, errors::ScriptError};

/// One contract deployment intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    /// The contract to deploy, as a bare name or `source:name`
    pub contract: String,
    /// The constructor arguments, in declaration order
    pub constructor_args: Vec<String>,
}

impl DeploymentRequest {
    /// Create a deployment request
    pub fn new<I, S>(contract: impl Into<String>, constructor_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            contract: contract.into(),
            constructor_args: constructor_args.into_iter().map(Into::into).collect(),
        }
    }
}

/// A contract that was created and confirmed on chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    /// The name of the deployed contract
    pub contract_name: String,
    /// The address the contract was created at
    pub address: Address,
    /// The creation transaction
    pub tx_hash: TxHash,
    /// The block the creation transaction was included in
    pub block_number: Option<u64>,
}

/// The outcome of a deployment: a confirmed contract or the reason it failed
pub type DeploymentResult = Result<DeployedContract, ScriptError>;

/// The parts of a creation transaction receipt the runner inspects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationReceipt {
    /// The transaction hash
    pub tx_hash: TxHash,
    /// Whether the transaction executed successfully
    pub success: bool,
    /// The created contract, if any
    pub contract_address: Option<Address>,
    /// The including block
    pub block_number: Option<u64>,
}

/// Submits signed contract creation transactions to a network
#[allow(async_fn_in_trait)]
pub trait ContractDeployer {
    /// The account transactions are signed by
    fn deployer_address(&self) -> Address;

    /// Sign and broadcast a creation transaction carrying the given init code
    async fn submit(&self, init_code: Bytes) -> Result<TxHash, ScriptError>;

    /// Wait until the given transaction is included and return its receipt
    async fn confirm(&self, tx_hash: TxHash) -> Result<CreationReceipt, ScriptError>;
}

/// Deploys contracts from a build output to a network
pub struct DeploymentRunner<R, D> {
    /// Where compiled artifacts come from
    resolver: R,
    /// Where creation transactions go
    deployer: D,
}

impl<R: ArtifactResolver, D: ContractDeployer> DeploymentRunner<R, D> {
    /// Create a runner
    pub fn new(resolver: R, deployer: D) -> Self {
        Self { resolver, deployer }
    }

    /// The deployer this runner submits through
    pub fn deployer(&self) -> &D {
        &self.deployer
    }

    /// Deploy the requested contract.
    ///
    /// The request is consumed, so it is submitted at most once. Deploying the
    /// same contract twice creates two distinct contracts.
    pub async fn deploy(&self, request: DeploymentRequest) -> DeploymentResult {
        let artifact = self.resolver.resolve(&request.contract)?;
        let contract_name = artifact.contract_name.clone();

        // Arguments that do not fit the constructor never reach the network
        let init_code = artifact
            .creation_code(&request.constructor_args)
            .map_err(|e| ScriptError::Submission(e.to_string()))?;

        info!(
            contract = %artifact.fully_qualified_name(),
            deployer = %self.deployer.deployer_address(),
            init_code_len = init_code.len(),
            "submitting contract creation"
        );
        let tx_hash = self.deployer.submit(init_code).await?;
        info!(contract = %contract_name, %tx_hash, "submitted, waiting for confirmation");

        let receipt = self.deployer.confirm(tx_hash).await?;
        if !receipt.success {
            warn!(contract = %contract_name, %tx_hash, "creation transaction reverted");
            return Err(ScriptError::Confirmation(format!(
                "creation of `{}` reverted in tx {}",
                contract_name, tx_hash
            )));
        }
        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::Confirmation(format!(
                "receipt for tx {} carries no contract address",
                tx_hash
            ))
        })?;

        info!(
            contract = %contract_name,
            %address,
            block = ?receipt.block_number,
            "contract deployed"
        );
        Ok(DeployedContract {
            contract_name,
            address,
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }
}
