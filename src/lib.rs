//! Collectible registration relay.
//!
//! Accepts HTTP requests to register RFID-tagged collectibles on an on-chain
//! registry, signs and broadcasts the contract call with the relay's key, and
//! records every attempt in an append-only log.

pub mod activity;
pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registration;
pub mod resilience;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use registration::{Registrar, RegistrationError, RegistrationRequest};
