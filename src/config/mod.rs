//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overlay: RPC_URL, REGISTRY_PROXY_ADDRESS,
//!                  CONTRACT_ABI_PATH, CHAIN_ID, ADMIN_PRIVATE_KEY)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → passed by reference into the chain client, wallet and server
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at startup; there is no ambient global state
//! - All fields have defaults to allow minimal configs
//! - The signing key only ever comes from the environment

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, ConfigError};
pub use schema::{
    ActivityLogConfig, BlockchainConfig, ListenerConfig, ObservabilityConfig, RelayConfig,
    SecurityConfig, SigningKey, TimeoutConfig,
};
