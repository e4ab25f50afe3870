//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{RelayConfig, SigningKey};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the hex-encoded signing key.
pub const PRIVATE_KEY_ENV_VAR: &str = "ADMIN_PRIVATE_KEY";
pub const RPC_URL_ENV_VAR: &str = "RPC_URL";
pub const REGISTRY_ADDRESS_ENV_VAR: &str = "REGISTRY_PROXY_ADDRESS";
pub const ABI_PATH_ENV_VAR: &str = "CONTRACT_ABI_PATH";
pub const CHAIN_ID_ENV_VAR: &str = "CHAIN_ID";
pub const BIND_ADDRESS_ENV_VAR: &str = "RELAY_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {message}")]
    Env { var: &'static str, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, overlay the process
/// environment, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// [`load_config`] with an explicit variable lookup in place of the process
/// environment.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<RelayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => RelayConfig::default(),
    };

    let config = apply_env_overrides(config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment-provided values onto `config`.
///
/// `lookup` resolves a variable name to its value; empty values are ignored.
pub fn apply_env_overrides<F>(mut config: RelayConfig, lookup: F) -> Result<RelayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(RPC_URL_ENV_VAR) {
        config.blockchain.rpc_url = url;
    }
    if let Some(address) = get(REGISTRY_ADDRESS_ENV_VAR) {
        config.blockchain.registry_address = address;
    }
    if let Some(path) = get(ABI_PATH_ENV_VAR) {
        config.blockchain.abi_path = path;
    }
    if let Some(raw) = get(CHAIN_ID_ENV_VAR) {
        config.blockchain.chain_id = raw.trim().parse().map_err(|e| ConfigError::Env {
            var: CHAIN_ID_ENV_VAR,
            message: format!("{}", e),
        })?;
    }
    if let Some(bind) = get(BIND_ADDRESS_ENV_VAR) {
        config.listener.bind_address = bind;
    }
    if let Some(key) = get(PRIVATE_KEY_ENV_VAR) {
        config.signing_key = Some(SigningKey::new(key));
    }

    Ok(config)
}
