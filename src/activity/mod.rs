//! Append-only activity logging.
//!
//! # Data Flow
//! ```text
//! POST /log body          → ActivityLog("activity").append_value
//! Registrar outcome       → ActivityLog("registration").append_entry
//!     → writer task (sole owner of the file handle)
//!     → one JSON object + '\n' per record, flushed before the ack
//! ```

pub mod entry;
pub mod writer;

pub use entry::{utc_timestamp, LogEntry, ACTION_REGISTER, ACTION_REGISTER_FAILED};
pub use writer::{ActivityLog, LoggingError};
