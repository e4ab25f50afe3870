//! Chain-specific types and error definitions.

use alloy::consensus::TxLegacy;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};
use alloy::signers::Signature;
use thiserror::Error;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node answered but refused the transaction (stale nonce,
    /// insufficient funds, malformed payload).
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// Invalid or missing key material, or the signer failed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Registry ABI missing, unreadable or incompatible.
    #[error("ABI error: {0}")]
    Abi(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// A registry call ready to be signed.
///
/// `nonce` must equal the sender's next expected nonce at broadcast time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub from: Address,
    pub to: Address,
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub call_data: Bytes,
}

impl UnsignedTransaction {
    /// Legacy (EIP-155) form, matching the `gasPrice` fee model.
    pub fn to_legacy(&self) -> TxLegacy {
        TxLegacy {
            chain_id: Some(self.chain_id),
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(self.to),
            value: U256::ZERO,
            input: self.call_data.clone(),
        }
    }
}

/// A signed transaction and its network encoding.
///
/// Carries no key material; only the signature and the raw payload.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub tx: UnsignedTransaction,
    pub signature: Signature,
    /// EIP-2718 encoded bytes for `eth_sendRawTransaction`.
    pub raw: Bytes,
    /// Hash the node will report for this transaction.
    pub hash: TxHash,
}
