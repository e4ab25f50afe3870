//! Transaction building for registry calls.
//!
//! # Responsibilities
//! - Validate and decode registration fields
//! - ABI-encode `registerCollectible(rfid, authenticityHash, bottleOwner, tokenURI)`
//! - Apply the static gas limit policy
//!
//! Building is a pure transformation: nonce and gas price are supplied by the
//! caller, nothing here touches the network.
//!
//! # Known limitation
//! The gas limit is a fixed upper bound taken from configuration, not an
//! estimate. Chains with a different cost model may overpay or run out of gas.

use alloy::primitives::Address;
use alloy::sol_types::SolCall;

use crate::blockchain::abi::registerCollectibleCall;
use crate::blockchain::types::UnsignedTransaction;
use crate::registration::{RegistrationError, RegistrationRequest, ValidatedRegistration};

/// Default static gas limit for `registerCollectible`.
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

/// Builds registry calls for one contract on one chain.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    registry: Address,
    chain_id: u64,
    gas_limit: u64,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(registry: Address, chain_id: u64, gas_limit: u64) -> Self {
        Self {
            registry,
            chain_id,
            gas_limit,
        }
    }

    /// Validate `request` and assemble the unsigned call.
    pub fn build(
        &self,
        request: &RegistrationRequest,
        sender: Address,
        nonce: u64,
        gas_price: u128,
    ) -> Result<UnsignedTransaction, RegistrationError> {
        let validated = request.validate()?;
        Ok(self.build_validated(&validated, sender, nonce, gas_price))
    }

    /// Assemble the unsigned call from already validated fields.
    pub fn build_validated(
        &self,
        registration: &ValidatedRegistration,
        sender: Address,
        nonce: u64,
        gas_price: u128,
    ) -> UnsignedTransaction {
        let call = registerCollectibleCall {
            rfid: registration.rfid.clone(),
            authenticityHash: registration.authenticity_hash.clone(),
            bottleOwner: registration.bottle_owner,
            tokenURI: registration.token_uri.clone(),
        };

        UnsignedTransaction {
            from: sender,
            to: self.registry,
            chain_id: self.chain_id,
            nonce,
            gas_limit: self.gas_limit,
            gas_price,
            call_data: call.abi_encode().into(),
        }
    }

    pub fn registry(&self) -> Address {
        self.registry
    }
}

/// Decode registry call data back into its arguments.
pub fn decode_call_data(data: &[u8]) -> Result<registerCollectibleCall, RegistrationError> {
    registerCollectibleCall::abi_decode(data)
        .map_err(|e| RegistrationError::Encoding(format!("Invalid registry call data: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Bytes;

    const OWNER: &str = "0xF8f8269488f73fab3935555FCDdD6035699deE25";
    const REGISTRY: &str = "0x1f043010CDD89Fc2d003A997B8385d05A1ef9D0f";

    fn builder() -> TxBuilder {
        TxBuilder::new(REGISTRY.parse().unwrap(), 1313161555, DEFAULT_GAS_LIMIT)
    }

    fn request(rfid: &str, hash: &str, uri: &str) -> RegistrationRequest {
        RegistrationRequest::new(rfid, hash, OWNER, uri)
    }

    #[test]
    fn test_call_data_round_trips() {
        let cases = [
            ("000000000000020", "0xabc123", "ipfs://QmVUtkyKPHZa6qSvTGNYotUMfPU56VRg1hzqFuUn9ZuLFH"),
            (
                "E2801160600002",
                "0xabc123def4567890abc123def4567890abc123def4567890abc123def4567890",
                "https://example.org/token/7.json",
            ),
            ("ünïcødé-tag", "00", "ipfs://x"),
        ];

        for (rfid, hash, uri) in cases {
            let tx = builder()
                .build(&request(rfid, hash, uri), Address::ZERO, 0, 1_000_000_000)
                .unwrap();
            let decoded = decode_call_data(&tx.call_data).unwrap();

            assert_eq!(decoded.rfid, rfid);
            assert_eq!(decoded.authenticityHash, Bytes::from(alloy::primitives::hex::decode(hash).unwrap()));
            assert_eq!(decoded.bottleOwner.to_string(), OWNER);
            assert_eq!(decoded.tokenURI, uri);
        }
    }

    #[test]
    fn test_selector_prefix() {
        let tx = builder()
            .build(&request("1", "0x01", "ipfs://x"), Address::ZERO, 0, 1)
            .unwrap();
        assert_eq!(&tx.call_data[..4], registerCollectibleCall::SELECTOR.as_slice());
    }

    #[test]
    fn test_transaction_envelope_fields() {
        let sender = Address::repeat_byte(0x42);
        let tx = builder()
            .build(&request("1", "0x01", "ipfs://x"), sender, 5, 2_000_000_000)
            .unwrap();

        assert_eq!(tx.from, sender);
        assert_eq!(tx.to, REGISTRY.parse::<Address>().unwrap());
        assert_eq!(tx.nonce, 5);
        assert_eq!(tx.gas_price, 2_000_000_000);
        assert_eq!(tx.gas_limit, 300_000);
        assert_eq!(tx.chain_id, 1313161555);
    }

    #[test]
    fn test_build_is_pure() {
        let req = request("1", "0x01", "ipfs://x");
        let a = builder().build(&req, Address::ZERO, 3, 7).unwrap();
        let b = builder().build(&req, Address::ZERO, 3, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_rejects_bad_input() {
        let missing = RegistrationRequest {
            token_uri: None,
            ..request("1", "0x01", "ipfs://x")
        };
        assert!(matches!(
            builder().build(&missing, Address::ZERO, 0, 1),
            Err(RegistrationError::Validation(_))
        ));

        assert!(matches!(
            builder().build(&request("1", "0xabc", "ipfs://x"), Address::ZERO, 0, 1),
            Err(RegistrationError::Encoding(_))
        ));

        let bad_owner = RegistrationRequest::new("1", "0x01", "0xnotanaddress", "ipfs://x");
        assert!(matches!(
            builder().build(&bad_owner, Address::ZERO, 0, 1),
            Err(RegistrationError::AddressFormat(_))
        ));
    }

    #[test]
    fn test_garbage_call_data() {
        assert!(decode_call_data(&[0x00, 0x01]).is_err());
    }
}
