//! Registry contract interface.
//!
//! The call encoding is generated at compile time with `sol!`; the ABI file
//! shipped with the deployment is checked at startup so a relay pointed at an
//! incompatible registry refuses to start instead of broadcasting garbage.

use std::fs;
use std::path::Path;

use alloy::json_abi::JsonAbi;
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

sol! {
    /// Registers a physical collectible against its RFID tag.
    #[derive(Debug, PartialEq, Eq)]
    function registerCollectible(
        string rfid,
        bytes authenticityHash,
        address bottleOwner,
        string tokenURI
    );
}

/// Canonical signature of the registry entry point.
pub const REGISTER_SIGNATURE: &str = registerCollectibleCall::SIGNATURE;

/// Parsed registry ABI.
#[derive(Debug, Clone)]
pub struct RegistryAbi {
    abi: JsonAbi,
}

impl RegistryAbi {
    /// Load an ABI from disk. Accepts a bare ABI array or a build artifact
    /// with an `abi` field.
    pub fn load(path: &Path) -> BlockchainResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BlockchainError::Abi(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> BlockchainResult<Self> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| BlockchainError::Abi(format!("Invalid JSON: {}", e)))?;

        let items = match value {
            serde_json::Value::Object(mut artifact) => artifact
                .remove("abi")
                .ok_or_else(|| BlockchainError::Abi("Artifact has no 'abi' field".to_string()))?,
            other => other,
        };

        let abi: JsonAbi = serde_json::from_value(items)
            .map_err(|e| BlockchainError::Abi(format!("Invalid ABI: {}", e)))?;
        Ok(Self { abi })
    }

    /// Ensure the registry exposes `registerCollectible` with the argument
    /// order this relay encodes.
    pub fn ensure_register_collectible(&self) -> BlockchainResult<()> {
        let overloads = self.abi.function("registerCollectible").ok_or_else(|| {
            BlockchainError::Abi("registerCollectible not found in ABI".to_string())
        })?;

        if overloads.iter().any(|f| f.signature() == REGISTER_SIGNATURE) {
            Ok(())
        } else {
            let found: Vec<String> = overloads.iter().map(|f| f.signature()).collect();
            Err(BlockchainError::Abi(format!(
                "Expected {}, found {}",
                REGISTER_SIGNATURE,
                found.join(", ")
            )))
        }
    }
}
