//! Wallet management and transaction signing.
//!
//! # Security
//! - The private key comes from configuration, which reads it from the
//!   environment only
//! - Keys are never logged or serialized
//! - Signing is deterministic (RFC 6979): same transaction, same signature

use alloy::consensus::{SignableTransaction, TxEnvelope};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes};
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{
    BlockchainError, BlockchainResult, SignedTransaction, UnsignedTransaction,
};
use crate::config::{loader::PRIVATE_KEY_ENV_VAR, SigningKey};

/// The relay's single signing identity.
#[derive(Debug, Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Chain ID for EIP-155 replay protection.
    chain_id: u64,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `chain_id` - Chain ID for transaction signing
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Signing(format!("Invalid private key format: {}", e)))?;

        tracing::info!(
            address = %signer.address(),
            chain_id = chain_id,
            "Wallet initialized"
        );

        Ok(Self { signer, chain_id })
    }

    /// Build the wallet from the configured key.
    pub fn from_signing_key(key: Option<&SigningKey>, chain_id: u64) -> BlockchainResult<Self> {
        match key {
            Some(key) if !key.is_empty() => Self::from_private_key(key.expose_secret(), chain_id),
            _ => Err(BlockchainError::Signing(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))),
        }
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the chain ID this wallet is configured for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Sign `tx` and produce its raw network encoding.
    pub fn sign_transaction(&self, tx: &UnsignedTransaction) -> BlockchainResult<SignedTransaction> {
        if tx.from != self.address() {
            return Err(BlockchainError::Signing(format!(
                "Transaction sender {} does not match wallet {}",
                tx.from,
                self.address()
            )));
        }
        if tx.chain_id != self.chain_id {
            return Err(BlockchainError::Signing(format!(
                "Transaction chain {} does not match wallet chain {}",
                tx.chain_id, self.chain_id
            )));
        }

        let mut legacy = tx.to_legacy();
        let signature = self
            .signer
            .sign_transaction_sync(&mut legacy)
            .map_err(|e| BlockchainError::Signing(format!("Signing failed: {}", e)))?;

        let signed = legacy.into_signed(signature);
        let hash = *signed.hash();
        let raw = Bytes::from(TxEnvelope::from(signed).encoded_2718());

        tracing::debug!(tx_hash = %hash, nonce = tx.nonce, "Transaction signed");

        Ok(SignedTransaction {
            tx: tx.clone(),
            signature,
            raw,
            hash,
        })
    }
}
