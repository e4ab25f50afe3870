//! Collectible registration pipeline.
//!
//! # Data Flow
//! ```text
//! POST /register-collectible
//!     → request.rs (RegistrationRequest → ValidatedRegistration)
//!     → orchestrator.rs (Registrar::submit drives the blockchain subsystem)
//!     → activity log (one LogEntry per attempt past validation)
//!     → RegistrationOutcome | RegistrationError
//! ```

pub mod error;
pub mod orchestrator;
pub mod request;

pub use error::RegistrationError;
pub use orchestrator::{Registrar, RegistrationOutcome, SubmissionState};
pub use request::{RegistrationRequest, ValidatedRegistration};
