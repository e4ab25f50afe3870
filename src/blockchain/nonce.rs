//! Per-sender nonce serialization.
//!
//! Two submissions from one address that both read the pending count before
//! either broadcasts would collide on the same nonce. A [`NonceGuard`] holds
//! the sender's lock from nonce acquisition until the broadcast result is
//! known, and remembers the last nonce it handed out so a node that has not
//! yet indexed the previous broadcast cannot push us backwards.

use std::sync::Arc;

use alloy::primitives::Address;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serialization point keyed by sending address.
#[derive(Debug, Default, Clone)]
pub struct NonceManager {
    slots: Arc<DashMap<Address, Arc<Mutex<Option<u64>>>>>,
}

/// Exclusive access to one sender's nonce sequence.
///
/// Dropping the guard releases the sender.
#[derive(Debug)]
pub struct NonceGuard {
    sender: Address,
    next: OwnedMutexGuard<Option<u64>>,
}

impl NonceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `sender`'s nonce sequence.
    pub async fn lock(&self, sender: Address) -> NonceGuard {
        // Clone the slot out so the map shard is not held across the await.
        let slot = Arc::clone(
            self.slots
                .entry(sender)
                .or_insert_with(|| Arc::new(Mutex::new(None)))
                .value(),
        );

        NonceGuard {
            sender,
            next: slot.lock_owned().await,
        }
    }
}

impl NonceGuard {
    /// Pick the nonce for this submission given the chain's pending count.
    pub fn resolve(&self, chain_nonce: u64) -> u64 {
        match *self.next {
            Some(local) if local > chain_nonce => {
                tracing::debug!(
                    sender = %self.sender,
                    chain_nonce,
                    local_nonce = local,
                    "Chain nonce behind local sequence"
                );
                local
            }
            _ => chain_nonce,
        }
    }

    /// Record that `used` was accepted into the pending pool.
    pub fn commit(&mut self, used: u64) {
        *self.next = Some(used.saturating_add(1));
    }

    /// Forget the local sequence; the next submission trusts the chain.
    pub fn invalidate(&mut self) {
        *self.next = None;
    }
}
