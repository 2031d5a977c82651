//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error loading or validating the project configuration
    Configuration(String),
    /// No compiled artifact exists for the requested contract
    ArtifactNotFound(String),
    /// A bare contract name matched more than one compiled artifact
    AmbiguousArtifact(String),
    /// Error parsing a Solidity compilation artifact
    ArtifactParsing(String),
    /// Error encoding constructor arguments against a contract ABI
    CalldataConstruction(String),
    /// The contract creation transaction could not be submitted
    Submission(String),
    /// The contract creation transaction was not confirmed
    Confirmation(String),
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
    /// Error verifying a contract with the block explorer
    Verification(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Configuration(s) => write!(f, "configuration error: {}", s),
            ScriptError::ArtifactNotFound(s) => write!(f, "artifact not found: {}", s),
            ScriptError::AmbiguousArtifact(s) => write!(f, "ambiguous artifact: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::Submission(s) => write!(f, "error submitting transaction: {}", s),
            ScriptError::Confirmation(s) => write!(f, "error confirming transaction: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::Verification(s) => write!(f, "error verifying contract: {}", s),
        }
    }
}

impl Error for ScriptError {}
