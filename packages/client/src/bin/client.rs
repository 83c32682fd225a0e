//! CLI chat client for the Idobata WebSocket chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-client -- --token T1
//! cargo run --bin idobata-client -- --url ws://127.0.0.1:3000/ws --token T1
//! ```

use clap::Parser;
use idobata_client::session::run_client_session;
use idobata_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "CLI chat client with token authentication", long_about = None)]
struct Args {
    /// WebSocket URL of the chat server
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Session token used for the auth handshake
    #[arg(short = 't', long)]
    token: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = run_client_session(&args.url, &args.token).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
