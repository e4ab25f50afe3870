//! End-to-end behaviour of the submission pipeline against a mock chain.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{keccak256, Address};

use collectible_relay::activity::{LogEntry, ACTION_REGISTER, ACTION_REGISTER_FAILED};
use collectible_relay::blockchain::transaction::decode_call_data;
use collectible_relay::{RegistrationError, RegistrationRequest};

mod common;
use common::{BroadcastMode, MockChainClient};

#[tokio::test]
async fn test_end_to_end_registration() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("collectible_log.jsonl");
    let chain = Arc::new(MockChainClient::new(0, 1_000_000_000));
    let registrar = common::registrar(chain.clone(), &log_path);

    let request = common::sample_request("000000000000020");
    let outcome = registrar.submit(request.clone()).await.unwrap();

    // The identifier is a pure function of the signed payload.
    let broadcasts = chain.broadcasts.lock().unwrap().clone();
    assert_eq!(broadcasts.len(), 1);
    assert_eq!(outcome.tx_hash, keccak256(&broadcasts[0].raw));
    assert_eq!(outcome.tx_hash, broadcasts[0].hash);
    assert_eq!(outcome.nonce, 0);
    assert!(outcome.warning.is_none());

    let sent = &broadcasts[0].tx;
    assert_eq!(sent.gas_price, 1_000_000_000);
    assert_eq!(sent.gas_limit, 300_000);
    assert_eq!(sent.from, common::test_wallet().address());
    assert_eq!(sent.to, common::REGISTRY.parse::<Address>().unwrap());

    let call = decode_call_data(&sent.call_data).unwrap();
    assert_eq!(call.rfid, "000000000000020");
    assert_eq!(call.authenticityHash.to_vec(), vec![0xab, 0xc1, 0x23]);
    assert_eq!(call.bottleOwner.to_string(), common::OWNER);
    assert_eq!(call.tokenURI, request.token_uri.clone().unwrap());

    let lines = common::read_lines(&log_path);
    assert_eq!(lines.len(), 1);
    let entry: LogEntry = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(entry.action, ACTION_REGISTER);
    assert_eq!(entry.rfid, "000000000000020");
    assert_eq!(entry.token_uri, request.token_uri.unwrap());
    assert_eq!(entry.tx_hash, Some(outcome.tx_hash.to_string()));
    assert!(entry.timestamp.ends_with("+00:00"));
}

#[tokio::test]
async fn test_identifier_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();

    let mut hashes = Vec::new();
    for run in 0..2 {
        let chain = Arc::new(MockChainClient::new(0, 1_000_000_000));
        let registrar = common::registrar(chain, &dir.path().join(format!("run{}.jsonl", run)));
        let outcome = registrar
            .submit(common::sample_request("000000000000020"))
            .await
            .unwrap();
        hashes.push(outcome.tx_hash);
    }

    assert_eq!(hashes[0], hashes[1]);
}

#[tokio::test]
async fn test_missing_field_makes_no_chain_calls() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("log.jsonl");
    let chain = Arc::new(MockChainClient::new(0, 1));
    let registrar = common::registrar(chain.clone(), &log_path);

    let incomplete = [
        RegistrationRequest { rfid: None, ..common::sample_request("1") },
        RegistrationRequest { authenticity_hash: None, ..common::sample_request("1") },
        RegistrationRequest { bottle_owner: Some(String::new()), ..common::sample_request("1") },
        RegistrationRequest { token_uri: None, ..common::sample_request("1") },
    ];

    for request in incomplete {
        let err = registrar.submit(request).await.unwrap_err();
        assert!(matches!(err, RegistrationError::Validation(_)), "{}", err);
    }

    assert_eq!(chain.total_calls(), 0);
    assert!(common::read_lines(&log_path).is_empty());
}

#[tokio::test]
async fn test_malformed_input_makes_no_chain_calls() {
    let dir = tempfile::tempdir().unwrap();
    let chain = Arc::new(MockChainClient::new(0, 1));
    let registrar = common::registrar(chain.clone(), &dir.path().join("log.jsonl"));

    let mut bad_hash = common::sample_request("1");
    bad_hash.authenticity_hash = Some("0xabc12".into());
    assert!(matches!(
        registrar.submit(bad_hash).await,
        Err(RegistrationError::Encoding(_))
    ));

    let mut bad_owner = common::sample_request("1");
    bad_owner.bottle_owner = Some("0xF8f8".into());
    assert!(matches!(
        registrar.submit(bad_owner).await,
        Err(RegistrationError::AddressFormat(_))
    ));

    assert_eq!(chain.total_calls(), 0);
}

#[tokio::test]
async fn test_single_broadcast_carries_chain_nonce() {
    let dir = tempfile::tempdir().unwrap();
    let chain = Arc::new(MockChainClient::new(5, 1_000_000_000));
    let registrar = common::registrar(chain.clone(), &dir.path().join("log.jsonl"));

    registrar.submit(common::sample_request("1")).await.unwrap();

    assert_eq!(chain.broadcast_nonces(), vec![5]);
}

#[tokio::test]
async fn test_concurrent_submissions_do_not_share_a_nonce() {
    let dir = tempfile::tempdir().unwrap();
    // Both reads see 5; the delay makes them overlap without serialization.
    let chain = Arc::new(
        MockChainClient::new(5, 1_000_000_000).with_nonce_delay(Duration::from_millis(50)),
    );
    let registrar = Arc::new(common::registrar(chain.clone(), &dir.path().join("log.jsonl")));

    let first = {
        let registrar = registrar.clone();
        tokio::spawn(async move { registrar.submit(common::sample_request("A")).await })
    };
    let second = {
        let registrar = registrar.clone();
        tokio::spawn(async move { registrar.submit(common::sample_request("B")).await })
    };

    let a = first.await.unwrap().unwrap();
    let b = second.await.unwrap().unwrap();

    let mut nonces = vec![a.nonce, b.nonce];
    nonces.sort_unstable();
    assert_eq!(nonces, vec![5, 6]);

    let mut broadcast = chain.broadcast_nonces();
    broadcast.sort_unstable();
    assert_eq!(broadcast, vec![5, 6]);
    assert_ne!(a.tx_hash, b.tx_hash);
}

#[tokio::test]
async fn test_rejection_is_surfaced_and_logged() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("log.jsonl");
    let chain = Arc::new(
        MockChainClient::new(3, 1).with_mode(BroadcastMode::Reject("nonce too low".into())),
    );
    let registrar = common::registrar(chain.clone(), &log_path);

    let err = registrar.submit(common::sample_request("7")).await.unwrap_err();
    assert!(matches!(err, RegistrationError::Rejected(ref m) if m == "nonce too low"));
    assert_eq!(chain.broadcast_count(), 1);

    let lines = common::read_lines(&log_path);
    assert_eq!(lines.len(), 1);
    let entry: LogEntry = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(entry.action, ACTION_REGISTER_FAILED);
    assert_eq!(entry.rfid, "7");
    assert!(entry.tx_hash.is_none());
    assert!(entry.error.unwrap().contains("nonce too low"));
}

#[tokio::test]
async fn test_failed_broadcast_does_not_advance_nonce() {
    let dir = tempfile::tempdir().unwrap();
    let chain = Arc::new(MockChainClient::new(4, 1).with_mode(BroadcastMode::Unreachable));
    let registrar = common::registrar(chain.clone(), &dir.path().join("log.jsonl"));

    for _ in 0..2 {
        let err = registrar.submit(common::sample_request("1")).await.unwrap_err();
        assert!(matches!(err, RegistrationError::Rpc(_)));
    }

    // Neither attempt reached the pool, so both reuse the chain's nonce.
    assert_eq!(chain.broadcast_nonces(), vec![4, 4]);
}

#[tokio::test]
async fn test_log_failure_after_broadcast_is_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the log file should be.
    let log_path = dir.path().join("taken");
    std::fs::create_dir(&log_path).unwrap();

    let chain = Arc::new(MockChainClient::new(0, 1));
    let registrar = common::registrar(chain.clone(), &log_path);

    let outcome = registrar.submit(common::sample_request("1")).await.unwrap();
    assert_eq!(chain.broadcast_count(), 1);
    assert!(outcome
        .warning
        .unwrap()
        .contains("Transaction broadcast but not logged"));
}
