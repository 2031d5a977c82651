//! Tests of the JSON-RPC deployer against a stub node

mod common;

use alloy::{
    primitives::Bytes, signers::local::PrivateKeySigner, transports::http::reqwest::Url,
};
use common::{
    init_tracing, project_artifacts,
    rpc::{raw_transactions, StubNode, STUB_CHAIN_ID},
    BYTECODE, DEPLOYER,
};
use deploy_scripts::{
    artifacts::HardhatArtifacts,
    config::{DeploySettings, NetworkProfile},
    deployer::AlloyDeployer,
    errors::ScriptError,
    runner::{ContractDeployer, DeploymentRunner},
    types::FixedScript,
};
use eyre::Result;
use wiremock::MockServer;

/// Key of the first default Anvil account
const TEST_PKEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// A deployer signing for `DEPLOYER` against the given node
fn deployer_for(node: &MockServer, chain_id: Option<u64>) -> Result<AlloyDeployer> {
    let profile = NetworkProfile {
        name: "stub".to_string(),
        rpc_url: Url::parse(&node.uri())?,
        signer: TEST_PKEY.parse::<PrivateKeySigner>()?,
        chain_id,
    };
    let settings = DeploySettings { confirmations: 1, confirmation_timeout_secs: Some(10) };

    Ok(AlloyDeployer::new(&profile, &settings))
}

#[tokio::test]
async fn test_deploy_through_rpc() -> Result<()> {
    init_tracing();
    let node = StubNode::start(false /* reverts */).await;
    let artifacts = project_artifacts();
    let runner = DeploymentRunner::new(
        HardhatArtifacts::new(artifacts.path()),
        deployer_for(&node, Some(STUB_CHAIN_ID))?,
    );
    assert_eq!(runner.deployer().deployer_address(), DEPLOYER);

    let deployed = runner.deploy(FixedScript::AmmQuery.request()).await?;

    assert_eq!(deployed.address, DEPLOYER.create(0));
    assert_eq!(deployed.block_number, Some(1));

    // One signed creation transaction carrying the artifact's bytecode
    let raw_txs = raw_transactions(&node).await;
    assert_eq!(raw_txs.len(), 1);
    let bytecode: Bytes = BYTECODE.parse()?;
    assert!(raw_txs[0].windows(bytecode.len()).any(|w| w == bytecode.as_ref()));
    Ok(())
}

#[tokio::test]
async fn test_reverted_receipt_fails_confirmation() -> Result<()> {
    init_tracing();
    let node = StubNode::start(true /* reverts */).await;
    let artifacts = project_artifacts();
    let runner = DeploymentRunner::new(
        HardhatArtifacts::new(artifacts.path()),
        deployer_for(&node, Some(STUB_CHAIN_ID))?,
    );

    let res = runner.deploy(FixedScript::Treasury.request()).await;

    assert!(matches!(res, Err(ScriptError::Confirmation(_))), "got {res:?}");
    assert_eq!(raw_transactions(&node).await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_confirm_maps_receipt() -> Result<()> {
    init_tracing();
    let node = StubNode::start(false /* reverts */).await;
    let deployer = deployer_for(&node, None)?;

    let tx_hash = deployer.submit(BYTECODE.parse()?).await?;
    let receipt = deployer.confirm(tx_hash).await?;

    assert_eq!(receipt.tx_hash, tx_hash);
    assert!(receipt.success);
    assert_eq!(receipt.contract_address, Some(DEPLOYER.create(0)));
    assert_eq!(receipt.block_number, Some(1));
    Ok(())
}

#[tokio::test]
async fn test_chain_id_mismatch_fails_submission() -> Result<()> {
    init_tracing();
    let node = StubNode::start(false /* reverts */).await;
    let artifacts = project_artifacts();
    let runner = DeploymentRunner::new(
        HardhatArtifacts::new(artifacts.path()),
        deployer_for(&node, Some(56))?,
    );

    let res = runner.deploy(FixedScript::Arbitrage.request()).await;

    assert!(matches!(res, Err(ScriptError::Submission(_))), "got {res:?}");
    assert!(raw_transactions(&node).await.is_empty());
    Ok(())
}
