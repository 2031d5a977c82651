//! Helpers shared by the deploy integration tests

#![allow(dead_code)]

pub mod rpc;

use std::{
    collections::HashMap,
    fs,
    path::Path,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Mutex, Once,
    },
};

use alloy::primitives::{address, keccak256, Address, Bytes, TxHash};
use deploy_scripts::{
    errors::ScriptError,
    runner::{ContractDeployer, CreationReceipt},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tracing_subscriber::{fmt, EnvFilter};

// ---------------------
// | META TEST HELPERS |
// ---------------------

static TRACING_INIT: Once = Once::new();

/// Route logs through the test harness, honoring `RUST_LOG`
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

// -------------
// | ARTIFACTS |
// -------------

/// A small but well-formed creation bytecode
pub const BYTECODE: &str = "0x6080604052348015600f57600080fd5b50603f80601d6000396000f3fe";

/// The treasury's deployment arguments
pub const TREASURY_ARGS: [&str; 4] =
    ["0xae13d989dac2f0debff460ac112a837c89baa7cd", "10000000000000000", "2592000", "300"];

/// Write a Hardhat artifact for `name`, defined in `contracts/<name>.sol`
pub fn write_artifact(root: &Path, name: &str, abi: Value) {
    let source = format!("contracts/{name}.sol");
    let dir = root.join(&source);
    fs::create_dir_all(&dir).unwrap();

    let artifact = json!({
        "_format": "hh-sol-artifact-1",
        "contractName": name,
        "sourceName": source,
        "abi": abi,
        "bytecode": BYTECODE,
        "deployedBytecode": "0x",
        "linkReferences": {},
        "deployedLinkReferences": {}
    });
    fs::write(dir.join(format!("{name}.json")), artifact.to_string()).unwrap();
}

/// An artifacts tree holding the AMM query, arbitrage and treasury contracts
pub fn project_artifacts() -> TempDir {
    let dir = TempDir::new().unwrap();
    let view = json!([{
        "type": "function",
        "name": "getReserves",
        "stateMutability": "view",
        "inputs": [{ "name": "pair", "type": "address", "internalType": "address" }],
        "outputs": [
            { "name": "", "type": "uint112", "internalType": "uint112" },
            { "name": "", "type": "uint112", "internalType": "uint112" }
        ]
    }]);

    write_artifact(dir.path(), "AMMQuery", view);
    write_artifact(dir.path(), "Arbitrage", json!([]));
    write_artifact(
        dir.path(),
        "Treasury",
        json!([{
            "type": "constructor",
            "stateMutability": "nonpayable",
            "inputs": [
                { "name": "token", "type": "address", "internalType": "address" },
                { "name": "amount", "type": "uint256", "internalType": "uint256" },
                { "name": "period", "type": "uint256", "internalType": "uint256" },
                { "name": "delay", "type": "uint256", "internalType": "uint256" }
            ]
        }]),
    );
    dir
}

// ------------
// | DEPLOYER |
// ------------

/// The first default Anvil account
pub const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// An in-process deployer that derives contract addresses the way the chain
/// does, from the deployer and its nonce
pub struct MockDeployer {
    /// Whether the account can pay for gas
    funded: bool,
    /// Whether creation transactions revert
    reverts: bool,
    /// Calls to `submit`, successful or not
    attempts: AtomicUsize,
    /// The next nonce
    nonce: AtomicU64,
    /// Init code of every accepted transaction
    submitted: Mutex<Vec<Bytes>>,
    /// Accepted transactions and the nonce they were sent with
    pending: Mutex<HashMap<TxHash, u64>>,
}

impl MockDeployer {
    /// A deployer whose account has funds
    pub fn funded() -> Self {
        Self::new(true, false)
    }

    /// A deployer whose account has a zero balance
    pub fn unfunded() -> Self {
        Self::new(false, false)
    }

    /// A deployer whose creation transactions are mined but revert
    pub fn reverting() -> Self {
        Self::new(true, true)
    }

    fn new(funded: bool, reverts: bool) -> Self {
        Self {
            funded,
            reverts,
            attempts: AtomicUsize::new(0),
            nonce: AtomicU64::new(0),
            submitted: Mutex::new(Vec::new()),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// How many times a submission was attempted
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// The init code of every accepted transaction, in order
    pub fn submitted(&self) -> Vec<Bytes> {
        self.submitted.lock().unwrap().clone()
    }
}

impl ContractDeployer for MockDeployer {
    fn deployer_address(&self) -> Address {
        DEPLOYER
    }

    async fn submit(&self, init_code: Bytes) -> Result<TxHash, ScriptError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.funded {
            return Err(ScriptError::Submission(
                "insufficient funds for gas * price + value".to_string(),
            ));
        }

        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let tx_hash = keccak256([init_code.as_ref(), &nonce.to_be_bytes()].concat());
        self.submitted.lock().unwrap().push(init_code);
        self.pending.lock().unwrap().insert(tx_hash, nonce);

        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<CreationReceipt, ScriptError> {
        let nonce = self
            .pending
            .lock()
            .unwrap()
            .remove(&tx_hash)
            .ok_or_else(|| ScriptError::Confirmation(format!("unknown transaction {tx_hash}")))?;

        Ok(CreationReceipt {
            tx_hash,
            success: !self.reverts,
            contract_address: (!self.reverts).then(|| DEPLOYER.create(nonce)),
            block_number: Some(nonce + 1),
        })
    }
}
