//! Definitions of errors that can occur during the execution of the deployment scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deployment scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Unknown network, missing secret or endpoint, or a chain id mismatch
    Configuration(String),
    /// Error when creating the client or deriving the accounts
    ClientInitialization(String),
    /// Error when fetching the nonce to deploy a contract
    NonceFetching(String),
    /// Error reading a compiled contract artifact
    ArtifactLoading(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error reading or writing a deployment record
    JsonOutputError(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Configuration(s) => write!(f, "configuration error: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error during client init: {}", s),
            ScriptError::NonceFetching(s) => {
                write!(f, "error during nonce fetching for client signing: {}", s)
            }
            ScriptError::ArtifactLoading(s) => write!(f, "error loading contract artifact: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::JsonOutputError(s) => write!(f, "error writing json output: {}", s),
        }
    }
}

impl Error for ScriptError {}
