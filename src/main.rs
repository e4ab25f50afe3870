//! Collectible relay (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!     POST /register-collectible          POST /log
//!              │                              │
//!              ▼                              ▼
//!     ┌──────────────────┐            ┌──────────────┐
//!     │    Registrar     │            │ ActivityLog  │──▶ activity_log.jsonl
//!     │ validate → nonce │            │  (activity)  │
//!     │ → build → sign   │            └──────────────┘
//!     │ → broadcast      │
//!     └───────┬──────────┘            ┌──────────────┐
//!             │ ─────────────────────▶│ ActivityLog  │──▶ collectible_log.jsonl
//!             ▼                       │(registration)│
//!     ┌──────────────────┐            └──────────────┘
//!     │ BlockchainClient │──▶ JSON-RPC (primary + failovers)
//!     └──────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use collectible_relay::activity::ActivityLog;
use collectible_relay::blockchain::{BlockchainClient, RegistryAbi, TxBuilder, Wallet};
use collectible_relay::config::load_config;
use collectible_relay::observability::{init_logging, metrics};
use collectible_relay::{HttpServer, Registrar};

#[derive(Parser)]
#[command(name = "collectible-relay")]
#[command(about = "Relay that registers RFID collectibles on chain", long_about = None)]
struct Args {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    init_logging(&config.observability);
    tracing::info!("collectible-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_url = %config.blockchain.rpc_url,
        chain_id = config.blockchain.chain_id,
        registry = %config.blockchain.registry_address,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    RegistryAbi::load(Path::new(&config.blockchain.abi_path))?.ensure_register_collectible()?;

    let wallet = Wallet::from_signing_key(config.signing_key.as_ref(), config.blockchain.chain_id)?;
    let client = BlockchainClient::new(config.blockchain.clone()).await?;
    let builder = TxBuilder::new(
        config.blockchain.registry_address.parse()?,
        config.blockchain.chain_id,
        config.blockchain.gas_limit,
    );

    let registration_log = ActivityLog::open("registration", &config.activity_log.registration_path);
    let activity_log = ActivityLog::open("activity", &config.activity_log.activity_path);

    let registrar = Arc::new(Registrar::new(Arc::new(client), wallet, builder, registration_log));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    HttpServer::new(&config, registrar, activity_log).run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
