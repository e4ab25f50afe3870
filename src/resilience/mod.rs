//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Chain RPC call:
//!     → timeouts.rs (enforce per-call deadline)
//!     → on expiry: BlockchainError::Timeout, surfaced to the caller
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No automatic retries: a rebroadcast with a reused nonce is unsafe

pub mod timeouts;

pub use timeouts::with_deadline;
