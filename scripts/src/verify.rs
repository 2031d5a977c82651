//! Source verification against an Etherscan-compatible block explorer.
//!
//! Verification submits the standard JSON compiler input recorded in the
//! artifact's build info, then polls the explorer until it reports a result.

use std::time::Duration;

use alloy::{hex, primitives::Address};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    artifacts::Artifact,
    constants::{
        EXPLORER_STATUS_OK, STANDARD_JSON_CODE_FORMAT, VERIFY_POLL_ATTEMPTS, VERIFY_POLL_INTERVAL,
    },
    errors::ScriptError,
};

/// The envelope every explorer API response comes in
#[derive(Debug, Deserialize)]
pub struct ExplorerResponse {
    /// `1` on success, `0` on failure
    pub status: String,
    /// A short human-readable status
    pub message: String,
    /// The payload: a GUID on submission, a status string when polling
    pub result: String,
}

/// Where a verification request stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    /// The explorer has not processed the request yet
    Pending,
    /// The source was verified by this request
    Verified,
    /// The source had been verified before
    AlreadyVerified,
    /// The explorer rejected the source
    Failed(String),
}

impl VerificationStatus {
    /// Classify the result string of a status poll
    pub fn from_result(result: &str) -> Self {
        let lower = result.to_lowercase();
        if lower.contains("pending") {
            VerificationStatus::Pending
        } else if lower.contains("already verified") {
            VerificationStatus::AlreadyVerified
        } else if lower.starts_with("pass") {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Failed(result.to_string())
        }
    }

    /// Whether the contract's source is now public
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationStatus::Verified | VerificationStatus::AlreadyVerified)
    }
}

/// A client for an Etherscan-compatible contract verification API
pub struct ExplorerClient {
    /// The HTTP client
    http: Client,
    /// The API endpoint
    api_url: Url,
    /// The API key
    api_key: String,
    /// How many times to poll for a verification result
    poll_attempts: usize,
    /// The delay before each poll
    poll_interval: Duration,
}

impl ExplorerClient {
    /// Create a client for the given API endpoint
    pub fn new(api_url: &str, api_key: String) -> Result<Self, ScriptError> {
        let api_url = Url::parse(api_url).map_err(|e| {
            ScriptError::Configuration(format!("invalid explorer API URL: {}", e))
        })?;

        Ok(Self {
            http: Client::new(),
            api_url,
            api_key,
            poll_attempts: VERIFY_POLL_ATTEMPTS,
            poll_interval: VERIFY_POLL_INTERVAL,
        })
    }

    /// Override how often and how many times verification results are polled
    pub fn with_polling(mut self, attempts: usize, interval: Duration) -> Self {
        self.poll_attempts = attempts;
        self.poll_interval = interval;
        self
    }

    /// Submit a contract's source for verification.
    ///
    /// Returns the GUID to poll with, or `None` if the explorer reports the
    /// contract as verified already.
    pub async fn submit(
        &self,
        artifact: &Artifact,
        address: Address,
        constructor_args: &[String],
    ) -> Result<Option<String>, ScriptError> {
        let mut form = verification_form(artifact, address, constructor_args)?;
        form.push(("apikey", self.api_key.clone()));

        let response: ExplorerResponse = self
            .http
            .post(self.api_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?
            .json()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?;
        debug!(?response, "verification submitted");

        if response.status == EXPLORER_STATUS_OK {
            return Ok(Some(response.result));
        }
        match VerificationStatus::from_result(&response.result) {
            VerificationStatus::AlreadyVerified => Ok(None),
            _ => Err(ScriptError::Verification(format!(
                "{}: {}",
                response.message, response.result
            ))),
        }
    }

    /// Query the status of a verification request
    pub async fn check_status(&self, guid: &str) -> Result<VerificationStatus, ScriptError> {
        let response: ExplorerResponse = self
            .http
            .get(self.api_url.clone())
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("module", "contract"),
                ("action", "checkverifystatus"),
                ("guid", guid),
            ])
            .send()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?
            .json()
            .await
            .map_err(|e| ScriptError::Verification(e.to_string()))?;
        debug!(?response, "verification status");

        Ok(VerificationStatus::from_result(&response.result))
    }
}

/// Build the form fields of a `verifysourcecode` request, minus the API key
pub fn verification_form(
    artifact: &Artifact,
    address: Address,
    constructor_args: &[String],
) -> Result<Vec<(&'static str, String)>, ScriptError> {
    let build_info = artifact.build_info()?;
    let encoded_args = artifact.encode_constructor_args(constructor_args)?;
    let source_code = serde_json::to_string(&build_info.input)
        .map_err(|e| ScriptError::Verification(e.to_string()))?;

    Ok(vec![
        ("module", "contract".to_string()),
        ("action", "verifysourcecode".to_string()),
        ("contractaddress", address.to_checksum(None)),
        ("sourceCode", source_code),
        ("codeformat", STANDARD_JSON_CODE_FORMAT.to_string()),
        ("contractname", artifact.fully_qualified_name()),
        ("compilerversion", format!("v{}", build_info.solc_long_version)),
        // The explorer API spells this field this way
        ("constructorArguements", hex::encode(encoded_args)),
    ])
}

/// Verify a deployed contract's source, waiting for the explorer's verdict
pub async fn verify_contract(
    client: &ExplorerClient,
    artifact: &Artifact,
    address: Address,
    constructor_args: &[String],
) -> Result<VerificationStatus, ScriptError> {
    info!(
        contract = %artifact.fully_qualified_name(),
        %address,
        "submitting source for verification"
    );
    let Some(guid) = client.submit(artifact, address, constructor_args).await? else {
        info!(%address, "contract already verified");
        return Ok(VerificationStatus::AlreadyVerified);
    };

    for attempt in 1..=client.poll_attempts {
        tokio::time::sleep(client.poll_interval).await;

        let status = client.check_status(&guid).await?;
        if status.is_verified() {
            info!(%address, "contract verified");
            return Ok(status);
        }
        if let VerificationStatus::Failed(reason) = status {
            return Err(ScriptError::Verification(reason));
        }
        debug!(attempt, %guid, "verification pending");
    }

    Err(ScriptError::Verification(format!(
        "still pending after {} polls, check request {}",
        client.poll_attempts, guid
    )))
}
