//! Persisted record types.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Action recorded for a successful registration broadcast.
pub const ACTION_REGISTER: &str = "register";
/// Action recorded when a validated registration could not be broadcast.
pub const ACTION_REGISTER_FAILED: &str = "register_failed";

/// One line of the registration log.
///
/// Identity is `(rfid, timestamp)`; duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub action: String,
    pub rfid: String,
    pub bottle_owner: String,
    pub authenticity_hash: String,
    #[serde(rename = "tokenURI")]
    pub token_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

/// Current UTC time in ISO-8601 with an explicit `+00:00` offset.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}
