//! Submission orchestration: validate → nonce → build → sign → broadcast → log.
//!
//! # Lifecycle
//! ```text
//! Received → Validated → NonceAcquired → Built → Signed → Broadcast → Logged → Completed
//!     any step may end in Failed(reason); later steps are skipped
//! ```
//!
//! The sender's nonce lock is held from `NonceAcquired` through `Broadcast`.
//! A broadcast whose log write fails is still reported as a success, with a
//! warning: the transaction is already in the pending pool and cannot be
//! recalled, so reporting failure would invite a duplicate registration.

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, TxHash};

use crate::activity::{utc_timestamp, ActivityLog, LogEntry, ACTION_REGISTER, ACTION_REGISTER_FAILED};
use crate::blockchain::{ChainClient, NonceManager, TxBuilder, Wallet};
use crate::observability::metrics;
use crate::registration::error::RegistrationError;
use crate::registration::request::{RegistrationRequest, ValidatedRegistration};

/// Progress of a single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Received,
    Validated,
    NonceAcquired,
    Built,
    Signed,
    Broadcast,
    Logged,
    Completed,
    Failed(String),
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Received => f.write_str("received"),
            Self::Validated => f.write_str("validated"),
            Self::NonceAcquired => f.write_str("nonce_acquired"),
            Self::Built => f.write_str("built"),
            Self::Signed => f.write_str("signed"),
            Self::Broadcast => f.write_str("broadcast"),
            Self::Logged => f.write_str("logged"),
            Self::Completed => f.write_str("completed"),
            Self::Failed(reason) => write!(f, "failed({})", reason),
        }
    }
}

/// Result of a successful broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub tx_hash: TxHash,
    pub nonce: u64,
    /// Set when the broadcast succeeded but the log write did not.
    pub warning: Option<String>,
}

/// Tracks the state machine for one submission and traces each transition.
struct Progress<'a> {
    rfid: &'a str,
    state: SubmissionState,
}

impl<'a> Progress<'a> {
    fn new(rfid: &'a str) -> Self {
        Self {
            rfid,
            state: SubmissionState::Received,
        }
    }

    fn advance(&mut self, next: SubmissionState) {
        tracing::debug!(rfid = %self.rfid, from = %self.state, to = %next, "Submission state change");
        self.state = next;
    }

    fn fail(&mut self, err: &RegistrationError) {
        tracing::warn!(rfid = %self.rfid, at = %self.state, error = %err, "Submission failed");
        self.state = SubmissionState::Failed(err.kind().to_string());
    }
}

/// Single entry point for registering collectibles on chain.
pub struct Registrar {
    chain: Arc<dyn ChainClient>,
    wallet: Wallet,
    builder: TxBuilder,
    nonces: NonceManager,
    log: ActivityLog,
}

impl Registrar {
    pub fn new(chain: Arc<dyn ChainClient>, wallet: Wallet, builder: TxBuilder, log: ActivityLog) -> Self {
        Self {
            chain,
            wallet,
            builder,
            nonces: NonceManager::new(),
            log,
        }
    }

    /// Address every registration is sent from.
    pub fn sender(&self) -> Address {
        self.wallet.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.wallet.chain_id()
    }

    /// Whether the chain node answers; recorded as a backend health gauge.
    pub async fn chain_healthy(&self) -> bool {
        self.chain.is_healthy().await
    }

    /// Register one collectible and return the broadcast transaction hash.
    ///
    /// Validation failures return before any chain call. Failures after
    /// validation are recorded in the registration log on a best-effort basis.
    pub async fn submit(&self, request: RegistrationRequest) -> Result<RegistrationOutcome, RegistrationError> {
        let rfid = request.rfid.clone().unwrap_or_default();
        let mut progress = Progress::new(&rfid);

        let registration = match request.validate() {
            Ok(registration) => registration,
            Err(e) => {
                progress.fail(&e);
                metrics::record_registration(e.kind());
                return Err(e);
            }
        };
        progress.advance(SubmissionState::Validated);

        let (tx_hash, nonce) = match self.broadcast(&registration, &mut progress).await {
            Ok(sent) => sent,
            Err(e) => {
                progress.fail(&e);
                metrics::record_registration(e.kind());
                self.record_failure(&registration, &e).await;
                return Err(e);
            }
        };

        let entry = log_entry(&registration, ACTION_REGISTER, Some(tx_hash.to_string()), None);
        let warning = match self.log.append_entry(&entry).await {
            Ok(()) => {
                progress.advance(SubmissionState::Logged);
                None
            }
            Err(e) => {
                tracing::error!(
                    rfid = %registration.rfid,
                    tx_hash = %tx_hash,
                    entry = ?entry,
                    error = %e,
                    "Registration broadcast but not logged; reconcile manually"
                );
                Some(format!("Transaction broadcast but not logged: {}", e))
            }
        };

        progress.advance(SubmissionState::Completed);
        metrics::record_registration("success");
        tracing::info!(rfid = %registration.rfid, tx_hash = %tx_hash, nonce, "Collectible registered");

        Ok(RegistrationOutcome {
            tx_hash,
            nonce,
            warning,
        })
    }

    /// Nonce → build → sign → broadcast under the sender's lock.
    async fn broadcast(
        &self,
        registration: &ValidatedRegistration,
        progress: &mut Progress<'_>,
    ) -> Result<(TxHash, u64), RegistrationError> {
        let sender = self.wallet.address();
        let mut guard = self.nonces.lock(sender).await;

        let chain_nonce = self.chain.get_nonce(sender).await?;
        let nonce = guard.resolve(chain_nonce);
        let gas_price = self.chain.get_gas_price().await?;
        progress.advance(SubmissionState::NonceAcquired);

        let unsigned = self.builder.build_validated(registration, sender, nonce, gas_price);
        progress.advance(SubmissionState::Built);

        let signed = self.wallet.sign_transaction(&unsigned)?;
        progress.advance(SubmissionState::Signed);

        match self.chain.broadcast(&signed).await {
            Ok(tx_hash) => {
                guard.commit(nonce);
                progress.advance(SubmissionState::Broadcast);
                Ok((tx_hash, nonce))
            }
            Err(e) => {
                guard.invalidate();
                Err(e.into())
            }
        }
    }

    async fn record_failure(&self, registration: &ValidatedRegistration, err: &RegistrationError) {
        let entry = log_entry(registration, ACTION_REGISTER_FAILED, None, Some(err.to_string()));
        if let Err(e) = self.log.append_entry(&entry).await {
            tracing::warn!(rfid = %registration.rfid, error = %e, "Failed registration not logged");
        }
    }
}

impl fmt::Debug for Registrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registrar")
            .field("sender", &self.wallet.address())
            .field("registry", &self.builder.registry())
            .field("log", &self.log.path())
            .finish()
    }
}

fn log_entry(
    registration: &ValidatedRegistration,
    action: &str,
    tx_hash: Option<String>,
    error: Option<String>,
) -> LogEntry {
    LogEntry {
        action: action.to_string(),
        rfid: registration.rfid.clone(),
        bottle_owner: registration.raw_bottle_owner.clone(),
        authenticity_hash: registration.raw_authenticity_hash.clone(),
        token_uri: registration.token_uri.clone(),
        tx_hash,
        error,
        timestamp: utc_timestamp(),
    }
}
