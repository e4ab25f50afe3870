//! Inbound registration payload and its validated form.

use alloy::primitives::{hex, Address, Bytes};
use serde::{Deserialize, Serialize};

use crate::registration::error::RegistrationError;

/// Registration payload as received over HTTP.
///
/// Fields are optional at the serde level so that a missing field surfaces as
/// a validation failure rather than a JSON error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub rfid: Option<String>,
    pub authenticity_hash: Option<String>,
    pub bottle_owner: Option<String>,
    #[serde(rename = "tokenURI")]
    pub token_uri: Option<String>,
}

/// A request whose fields are present and decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    pub rfid: String,
    pub authenticity_hash: Bytes,
    /// Checksummed form is available through `Display`.
    pub bottle_owner: Address,
    pub token_uri: String,
    /// Hash exactly as submitted, for the activity log.
    pub raw_authenticity_hash: String,
    /// Owner exactly as submitted, for the activity log.
    pub raw_bottle_owner: String,
}

impl RegistrationRequest {
    pub fn new(
        rfid: impl Into<String>,
        authenticity_hash: impl Into<String>,
        bottle_owner: impl Into<String>,
        token_uri: impl Into<String>,
    ) -> Self {
        Self {
            rfid: Some(rfid.into()),
            authenticity_hash: Some(authenticity_hash.into()),
            bottle_owner: Some(bottle_owner.into()),
            token_uri: Some(token_uri.into()),
        }
    }

    /// Names of required fields that are absent or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("rfid", &self.rfid),
            ("authenticityHash", &self.authenticity_hash),
            ("bottleOwner", &self.bottle_owner),
            ("tokenURI", &self.token_uri),
        ];
        fields
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect()
    }

    /// Check presence, decode the hash, and normalize the owner address.
    ///
    /// Checks run in that order; the first failing class is reported.
    pub fn validate(&self) -> Result<ValidatedRegistration, RegistrationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(RegistrationError::Validation(format!(
                "Missing fields: {}",
                missing.join(", ")
            )));
        }

        // Presence was checked above.
        let rfid = self.rfid.clone().unwrap_or_default();
        let raw_hash = self.authenticity_hash.clone().unwrap_or_default();
        let raw_owner = self.bottle_owner.clone().unwrap_or_default();
        let token_uri = self.token_uri.clone().unwrap_or_default();

        let authenticity_hash = decode_hash(&raw_hash)?;
        let bottle_owner = parse_address(&raw_owner)?;

        Ok(ValidatedRegistration {
            rfid,
            authenticity_hash,
            bottle_owner,
            token_uri,
            raw_authenticity_hash: raw_hash,
            raw_bottle_owner: raw_owner,
        })
    }
}

fn decode_hash(value: &str) -> Result<Bytes, RegistrationError> {
    let bytes = hex::decode(value.trim())
        .map_err(|e| RegistrationError::Encoding(format!("authenticityHash '{}': {}", value, e)))?;
    if bytes.is_empty() {
        return Err(RegistrationError::Encoding(
            "authenticityHash decodes to zero bytes".to_string(),
        ));
    }
    Ok(Bytes::from(bytes))
}

fn parse_address(value: &str) -> Result<Address, RegistrationError> {
    let trimmed = value.trim();
    if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
        return Err(RegistrationError::AddressFormat(format!(
            "bottleOwner '{}' must be 0x-prefixed",
            value
        )));
    }
    trimmed
        .parse::<Address>()
        .map_err(|e| RegistrationError::AddressFormat(format!("bottleOwner '{}': {}", value, e)))
}
