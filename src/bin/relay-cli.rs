use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Operator CLI for the collectible relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000", env = "RELAY_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a collectible on chain
    Register {
        /// RFID tag identifier
        #[arg(long)]
        rfid: String,
        /// Hex-encoded authenticity hash
        #[arg(long)]
        hash: String,
        /// Owner address
        #[arg(long)]
        owner: String,
        /// Token metadata URI
        #[arg(long)]
        uri: String,
    },
    /// Append a JSON object to the activity log
    Log {
        /// Record to append, e.g. '{"event":"scan","rfid":"000000000000020"}'
        #[arg(long)]
        json: String,
    },
    /// Check relay status
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Register { rfid, hash, owner, uri } => {
            let body = json!({
                "rfid": rfid,
                "authenticityHash": hash,
                "bottleOwner": owner,
                "tokenURI": uri,
            });
            let res = client
                .post(format!("{}/register-collectible", cli.url))
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Log { json } => {
            let record: Value = serde_json::from_str(&json)?;
            let res = client
                .post(format!("{}/log", cli.url))
                .json(&record)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
    } else {
        eprintln!("Error: relay returned status {}", status);
        eprintln!("{}", rendered);
        std::process::exit(1);
    }
    Ok(())
}
