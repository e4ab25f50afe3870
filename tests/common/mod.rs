//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{keccak256, Address, TxHash};
use async_trait::async_trait;

use collectible_relay::activity::ActivityLog;
use collectible_relay::blockchain::{
    BlockchainError, BlockchainResult, ChainClient, SignedTransaction, TxBuilder, Wallet,
};
use collectible_relay::{Registrar, RegistrationRequest};

/// Anvil account #0. Publicly known; never use for real funds.
pub const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const REGISTRY: &str = "0x1f043010CDD89Fc2d003A997B8385d05A1ef9D0f";
pub const OWNER: &str = "0xF8f8269488f73fab3935555FCDdD6035699deE25";
pub const CHAIN_ID: u64 = 1313161555;

/// How the mock answers `broadcast`.
#[derive(Debug, Clone)]
pub enum BroadcastMode {
    Accept,
    Reject(String),
    Unreachable,
}

/// In-memory chain client that counts calls and records broadcasts.
pub struct MockChainClient {
    pub nonce: u64,
    pub gas_price: u128,
    pub mode: BroadcastMode,
    /// Delay inside `get_nonce`, to widen race windows.
    pub nonce_delay: Duration,
    /// Delay inside `broadcast`, after the transaction is recorded.
    pub broadcast_delay: Duration,
    pub healthy: bool,
    pub nonce_calls: AtomicU32,
    pub gas_price_calls: AtomicU32,
    pub broadcasts: Mutex<Vec<SignedTransaction>>,
}

impl MockChainClient {
    pub fn new(nonce: u64, gas_price: u128) -> Self {
        Self {
            nonce,
            gas_price,
            mode: BroadcastMode::Accept,
            nonce_delay: Duration::ZERO,
            broadcast_delay: Duration::ZERO,
            healthy: true,
            nonce_calls: AtomicU32::new(0),
            gas_price_calls: AtomicU32::new(0),
            broadcasts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_mode(mut self, mode: BroadcastMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_nonce_delay(mut self, delay: Duration) -> Self {
        self.nonce_delay = delay;
        self
    }

    pub fn with_broadcast_delay(mut self, delay: Duration) -> Self {
        self.broadcast_delay = delay;
        self
    }

    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    /// Total chain calls of any kind.
    pub fn total_calls(&self) -> u32 {
        self.nonce_calls.load(Ordering::SeqCst)
            + self.gas_price_calls.load(Ordering::SeqCst)
            + self.broadcast_count() as u32
    }

    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.lock().unwrap().len()
    }

    pub fn broadcast_nonces(&self) -> Vec<u64> {
        self.broadcasts.lock().unwrap().iter().map(|tx| tx.tx.nonce).collect()
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn get_nonce(&self, _address: Address) -> BlockchainResult<u64> {
        self.nonce_calls.fetch_add(1, Ordering::SeqCst);
        if !self.nonce_delay.is_zero() {
            tokio::time::sleep(self.nonce_delay).await;
        }
        Ok(self.nonce)
    }

    async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.gas_price_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.gas_price)
    }

    async fn broadcast(&self, tx: &SignedTransaction) -> BlockchainResult<TxHash> {
        self.broadcasts.lock().unwrap().push(tx.clone());
        if !self.broadcast_delay.is_zero() {
            tokio::time::sleep(self.broadcast_delay).await;
        }
        match &self.mode {
            BroadcastMode::Accept => Ok(keccak256(&tx.raw)),
            BroadcastMode::Reject(reason) => Err(BlockchainError::Rejected(reason.clone())),
            BroadcastMode::Unreachable => Err(BlockchainError::Rpc("connection refused".into())),
        }
    }

    async fn is_healthy(&self) -> bool {
        self.healthy
    }
}

pub fn test_wallet() -> Wallet {
    Wallet::from_private_key(TEST_KEY, CHAIN_ID).unwrap()
}

pub fn test_builder() -> TxBuilder {
    TxBuilder::new(REGISTRY.parse().unwrap(), CHAIN_ID, 300_000)
}

/// Registrar wired to `chain`, logging to `log_path`.
pub fn registrar(chain: Arc<MockChainClient>, log_path: &Path) -> Registrar {
    Registrar::new(
        chain,
        test_wallet(),
        test_builder(),
        ActivityLog::open("registration", log_path),
    )
}

pub fn sample_request(rfid: &str) -> RegistrationRequest {
    RegistrationRequest::new(
        rfid,
        "0xabc123",
        OWNER,
        "ipfs://QmVUtkyKPHZa6qSvTGNYotUMfPU56VRg1hzqFuUn9ZuLFH",
    )
}

pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
