//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint (primary + failovers)
//! - Query sender nonce (pending) and gas price, fresh on every call
//! - Broadcast raw signed transactions to the primary node only
//! - Distinguish node rejections from transport failures
//! - Provide health check for blockchain connectivity
//!
//! Reads fail over across providers. A broadcast never does: after a timeout
//! the primary may already hold the transaction, and a second node would
//! answer `already known`, turning a pending registration into a failure.

use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::{RpcError, TransportError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::types::{
    BlockchainConfig, BlockchainError, BlockchainResult, ChainId, SignedTransaction,
};
use crate::observability::metrics;
use crate::resilience::with_deadline;

/// Chain operations the submission pipeline depends on.
///
/// Implementations must not cache: every call reflects the node's current
/// view. Nothing is retried at this layer.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Number of transactions sent from `address`, pending ones included.
    async fn get_nonce(&self, address: Address) -> BlockchainResult<u64>;

    /// Current gas price in wei.
    async fn get_gas_price(&self) -> BlockchainResult<u128>;

    /// Submit a signed transaction to the pending pool. Sent once; errors are
    /// surfaced, never retried.
    async fn broadcast(&self, tx: &SignedTransaction) -> BlockchainResult<TxHash>;

    /// Whether the node currently answers requests.
    async fn is_healthy(&self) -> bool;
}

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Configuration.
    config: BlockchainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// A chain ID mismatch or an unreachable node is logged but does not fail
    /// construction; submissions will surface the error instead.
    pub async fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let client = Self::connect(config)?;

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %client.config.rpc_url,
                    chain_id = client.config.chain_id,
                    "Blockchain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Build providers without touching the network.
    pub fn connect(config: BlockchainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as Arc<dyn Provider + Send + Sync>);

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        Ok(Self {
            providers,
            config,
            timeout_duration,
        })
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        for (i, provider) in self.providers.iter().enumerate() {
            match with_deadline(self.timeout_duration, provider.get_chain_id()).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        metrics::record_rpc_error("eth_chainId");
        Err(BlockchainError::Rpc("All RPC providers failed".to_string()))
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            match with_deadline(self.timeout_duration, provider.get_block_number()).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        metrics::record_rpc_error("eth_blockNumber");
        Err(BlockchainError::Rpc("All providers failed to get block number".to_string()))
    }

    /// A node-side error response means the request reached a node and was
    /// refused; everything else is a transport problem.
    fn classify_broadcast_error(err: TransportError) -> BlockchainError {
        match err {
            RpcError::ErrorResp(payload) => BlockchainError::Rejected(payload.message.to_string()),
            other => BlockchainError::Rpc(format!("Broadcast failed: {}", other)),
        }
    }
}

#[async_trait]
impl ChainClient for BlockchainClient {
    async fn get_nonce(&self, address: Address) -> BlockchainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_count(address).pending();
            match with_deadline(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        metrics::record_rpc_error("eth_getTransactionCount");
        Err(BlockchainError::Rpc("All providers failed to get transaction count".to_string()))
    }

    async fn get_gas_price(&self) -> BlockchainResult<u128> {
        for (i, provider) in self.providers.iter().enumerate() {
            match with_deadline(self.timeout_duration, provider.get_gas_price()).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        metrics::record_rpc_error("eth_gasPrice");
        Err(BlockchainError::Rpc("All providers failed to get gas price".to_string()))
    }

    async fn broadcast(&self, tx: &SignedTransaction) -> BlockchainResult<TxHash> {
        let provider = self
            .providers
            .first()
            .ok_or_else(|| BlockchainError::Rpc("No RPC providers configured".to_string()))?;

        let result = match with_deadline(self.timeout_duration, provider.send_raw_transaction(&tx.raw)).await {
            Ok(Ok(pending)) => {
                let tx_hash = *pending.tx_hash();
                tracing::info!(tx_hash = %tx_hash, nonce = tx.tx.nonce, "Transaction broadcast");
                return Ok(tx_hash);
            }
            Ok(Err(e)) => Self::classify_broadcast_error(e),
            Err(timeout) => timeout,
        };

        tracing::warn!(tx_hash = %tx.hash, nonce = tx.tx.nonce, error = %result, "Broadcast failed");
        metrics::record_rpc_error("eth_sendRawTransaction");
        Err(result)
    }

    async fn is_healthy(&self) -> bool {
        let healthy = self.get_block_number().await.is_ok();
        metrics::record_backend_health("blockchain_rpc", healthy);
        healthy
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
