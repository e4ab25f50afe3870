//! Unified error contract for the registration path.

use thiserror::Error;

use crate::activity::LoggingError;
use crate::blockchain::BlockchainError;

/// Every way a registration can fail, as seen by the HTTP boundary.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Missing or blank input fields.
    #[error("Validation error: {0}")]
    Validation(String),

    /// `authenticityHash` is not valid hex.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// `bottleOwner` is not a chain address.
    #[error("Address format error: {0}")]
    AddressFormat(String),

    /// Chain node unreachable or timed out.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Chain node refused the transaction.
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// Bad or absent key material.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Registration log could not be written.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}

impl RegistrationError {
    /// Short label for metrics and log entries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Encoding(_) => "encoding",
            Self::AddressFormat(_) => "address_format",
            Self::Rpc(_) => "rpc",
            Self::Rejected(_) => "rejected",
            Self::Signing(_) => "signing",
            Self::Logging(_) => "logging",
        }
    }
}

impl From<BlockchainError> for RegistrationError {
    fn from(err: BlockchainError) -> Self {
        match err {
            BlockchainError::Rejected(message) => Self::Rejected(message),
            BlockchainError::Signing(message) => Self::Signing(message),
            BlockchainError::Rpc(message) => Self::Rpc(message),
            other => Self::Rpc(other.to_string()),
        }
    }
}
