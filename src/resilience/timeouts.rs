//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap every chain RPC call with a deadline
//! - Fail fast on expiry instead of blocking the request
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other RPC errors
//! - Nothing is retried here; retry policy belongs to the caller

use std::future::IntoFuture;
use std::time::Duration;

use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Run `fut` under `limit`, mapping expiry to [`BlockchainError::Timeout`].
///
/// The inner output is returned untouched so callers keep their own error
/// classification.
pub async fn with_deadline<F>(limit: Duration, fut: F) -> BlockchainResult<F::Output>
where
    F: IntoFuture,
{
    timeout(limit, fut)
        .await
        .map_err(|_| BlockchainError::Timeout(limit.as_secs()))
}
