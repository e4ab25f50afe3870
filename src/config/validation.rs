//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, gas limit > 0)
//! - Check that addresses and URLs parse before any subsystem starts
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - The signing key is checked when the wallet is built, not here

use std::fmt;
use std::net::SocketAddr;

use alloy::primitives::Address;

use crate::config::schema::RelayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a loaded configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    let chain = &config.blockchain;
    if let Err(e) = chain.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("'{}': {}", chain.rpc_url, e),
        ));
    }
    for failover in &chain.failover_urls {
        if let Err(e) = failover.parse::<url::Url>() {
            errors.push(ValidationError::new(
                "blockchain.failover_urls",
                format!("'{}': {}", failover, e),
            ));
        }
    }
    if chain.registry_address.trim().is_empty() {
        errors.push(ValidationError::new("blockchain.registry_address", "is required"));
    } else if chain.registry_address.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "blockchain.registry_address",
            format!("'{}' is not an address", chain.registry_address),
        ));
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }
    if chain.gas_limit == 0 {
        errors.push(ValidationError::new("blockchain.gas_limit", "must be > 0"));
    }
    if chain.abi_path.trim().is_empty() {
        errors.push(ValidationError::new("blockchain.abi_path", "is required"));
    }

    if config.activity_log.activity_path.trim().is_empty() {
        errors.push(ValidationError::new("activity_log.activity_path", "is required"));
    }
    if config.activity_log.registration_path.trim().is_empty() {
        errors.push(ValidationError::new(
            "activity_log.registration_path",
            "is required",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.blockchain.registry_address = "0x1f043010CDD89Fc2d003A997B8385d05A1ef9D0f".into();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_registry_address() {
        let errors = validate_config(&RelayConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "blockchain.registry_address");
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = valid_config();
        config.listener.bind_address = "nowhere".into();
        config.blockchain.rpc_url = "not a url".into();
        config.blockchain.gas_limit = 0;
        config.activity_log.activity_path = String::new();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "blockchain.rpc_url",
                "blockchain.gas_limit",
                "activity_log.activity_path",
            ]
        );
    }
}
