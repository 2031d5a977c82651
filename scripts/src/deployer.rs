//! A [`ContractDeployer`] backed by an alloy provider with a local signer

use std::time::Duration;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, TxHash},
    providers::{DynProvider, PendingTransactionBuilder, Provider},
    rpc::types::TransactionRequest,
};
use tracing::debug;

use crate::{
    config::{DeploySettings, NetworkProfile},
    errors::ScriptError,
    runner::{ContractDeployer, CreationReceipt},
    utils::setup_client,
};

/// Deploys contracts over JSON-RPC, signing with the profile's account.
///
/// Nonces come from the node's pending transaction count at submission time.
/// Two processes deploying from the same account at once can race for the
/// same nonce; one of the two transactions is then dropped or replaced.
pub struct AlloyDeployer {
    /// The signing provider
    client: DynProvider,
    /// The signer's address
    deployer: Address,
    /// The chain ID the endpoint must report, if pinned
    expected_chain_id: Option<u64>,
    /// The number of confirmations to wait for
    confirmations: u64,
    /// How long to wait for confirmation
    timeout: Option<Duration>,
}

impl AlloyDeployer {
    /// Create a deployer for the given network.
    ///
    /// No request is made here, an unreachable endpoint surfaces on submission.
    pub fn new(profile: &NetworkProfile, settings: &DeploySettings) -> Self {
        Self {
            client: setup_client(profile),
            deployer: profile.deployer_address(),
            expected_chain_id: profile.chain_id,
            confirmations: settings.confirmations,
            timeout: settings.confirmation_timeout(),
        }
    }

    /// Refuse to sign for a chain other than the one the network is pinned to
    async fn check_chain_id(&self) -> Result<(), ScriptError> {
        let Some(expected) = self.expected_chain_id else {
            return Ok(());
        };

        let chain_id = self
            .client
            .get_chain_id()
            .await
            .map_err(|e| ScriptError::Submission(e.to_string()))?;
        if chain_id != expected {
            return Err(ScriptError::Submission(format!(
                "endpoint reports chain ID {}, expected {}",
                chain_id, expected
            )));
        }

        Ok(())
    }
}

impl ContractDeployer for AlloyDeployer {
    fn deployer_address(&self) -> Address {
        self.deployer
    }

    async fn submit(&self, init_code: Bytes) -> Result<TxHash, ScriptError> {
        self.check_chain_id().await?;

        let tx = TransactionRequest::default()
            .with_from(self.deployer)
            .with_deploy_code(init_code);

        let pending_tx = self
            .client
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::Submission(e.to_string()))?;

        Ok(*pending_tx.tx_hash())
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<CreationReceipt, ScriptError> {
        debug!(
            %tx_hash,
            confirmations = self.confirmations,
            timeout = ?self.timeout,
            "watching transaction"
        );

        let receipt = PendingTransactionBuilder::new(self.client.root().clone(), tx_hash)
            .with_required_confirmations(self.confirmations)
            .with_timeout(self.timeout)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::Confirmation(e.to_string()))?;

        Ok(CreationReceipt {
            tx_hash: receipt.transaction_hash,
            success: receipt.status(),
            contract_address: receipt.contract_address,
            block_number: receipt.block_number,
        })
    }
}
