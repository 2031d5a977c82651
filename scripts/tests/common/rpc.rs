//! A stub JSON-RPC node, just capable enough to take a signed contract
//! creation and hand back its receipt

use alloy::primitives::{keccak256, Bytes, B256};
use serde_json::{json, Value};
use wiremock::{matchers::method, Mock, MockServer, Request, Respond, ResponseTemplate};

use super::DEPLOYER;

/// The chain ID the stub reports (BSC testnet)
pub const STUB_CHAIN_ID: u64 = 97;

/// One gwei, used for every fee the stub quotes
const ONE_GWEI: &str = "0x3b9aca00";

/// The gas the stub estimates and reports as used
const GAS: &str = "0x186a0";

/// Answers JSON-RPC calls the way a node with one funded account would
pub struct StubNode {
    /// Whether mined creation transactions revert
    reverts: bool,
}

impl StubNode {
    /// Start a mock server answering as a stub node
    pub async fn start(reverts: bool) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(StubNode { reverts }).mount(&server).await;
        server
    }

    /// The result for a single call, or `None` for an unsupported method
    fn result(&self, method: &str, params: &Value) -> Option<Value> {
        let result = match method {
            "eth_chainId" => json!(format!("{:#x}", STUB_CHAIN_ID)),
            "eth_getTransactionCount" => json!("0x0"),
            "eth_estimateGas" => json!(GAS),
            "eth_gasPrice" | "eth_maxPriorityFeePerGas" => json!(ONE_GWEI),
            "eth_feeHistory" => json!({
                "oldestBlock": "0x1",
                "baseFeePerGas": [ONE_GWEI, ONE_GWEI],
                "gasUsedRatio": [0.5],
                "reward": [[ONE_GWEI]],
            }),
            "eth_blockNumber" => json!("0x1"),
            "eth_getBlockByNumber" => Value::Null,
            "eth_sendRawTransaction" => {
                let raw: Bytes = params[0].as_str().and_then(|s| s.parse().ok())?;
                json!(keccak256(&raw))
            }
            "eth_getTransactionReceipt" => {
                let tx_hash: B256 = params[0].as_str().and_then(|s| s.parse().ok())?;
                self.receipt(tx_hash)
            }
            _ => return None,
        };
        Some(result)
    }

    /// The receipt of the first creation transaction from `DEPLOYER`
    fn receipt(&self, tx_hash: B256) -> Value {
        let contract_address = (!self.reverts).then(|| DEPLOYER.create(0));
        json!({
            "type": "0x2",
            "status": if self.reverts { "0x0" } else { "0x1" },
            "cumulativeGasUsed": GAS,
            "logs": [],
            "logsBloom": format!("0x{}", "0".repeat(512)),
            "transactionHash": tx_hash,
            "transactionIndex": "0x0",
            "blockHash": B256::repeat_byte(0x11),
            "blockNumber": "0x1",
            "gasUsed": GAS,
            "effectiveGasPrice": ONE_GWEI,
            "from": DEPLOYER,
            "to": null,
            "contractAddress": contract_address,
        })
    }

    /// The response envelope for a single call
    fn answer(&self, call: &Value) -> Value {
        let id = call["id"].clone();
        let method = call["method"].as_str().unwrap_or_default();

        match self.result(method, &call["params"]) {
            Some(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            None => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("unsupported method {method}") },
            }),
        }
    }
}

impl Respond for StubNode {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(body) = request.body_json::<Value>() else {
            return ResponseTemplate::new(400);
        };

        let reply = match &body {
            Value::Array(calls) => Value::Array(calls.iter().map(|c| self.answer(c)).collect()),
            call => self.answer(call),
        };
        ResponseTemplate::new(200).set_body_json(reply)
    }
}

/// The raw transactions the stub node was sent
pub async fn raw_transactions(server: &MockServer) -> Vec<Bytes> {
    let requests = server.received_requests().await.unwrap_or_default();
    requests
        .iter()
        .filter_map(|request| request.body_json::<Value>().ok())
        .filter(|call| call["method"] == "eth_sendRawTransaction")
        .filter_map(|call| call["params"][0].as_str().and_then(|s| s.parse().ok()))
        .collect()
}
