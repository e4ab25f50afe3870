//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! RelayConfig (RPC URL, registry address, chain id) + signing key from env
//!     → abi.rs (registry interface, startup compatibility check)
//!     → transaction.rs (validated request → UnsignedTransaction)
//!     → nonce.rs (per-sender serialization of nonce → broadcast)
//!     → wallet.rs (UnsignedTransaction → SignedTransaction)
//!     → client.rs (nonce, gas price, raw broadcast with timeouts)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod abi;
pub mod client;
pub mod nonce;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use abi::RegistryAbi;
pub use client::{BlockchainClient, ChainClient};
pub use nonce::{NonceGuard, NonceManager};
pub use transaction::TxBuilder;
pub use types::{
    BlockchainConfig, BlockchainError, BlockchainResult, ChainId, SignedTransaction,
    UnsignedTransaction,
};
pub use wallet::Wallet;
