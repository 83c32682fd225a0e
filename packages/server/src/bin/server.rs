//! Token-authenticated WebSocket chat server with broadcast functionality.
//!
//! Clients authenticate with a session token as their first frame, then
//! exchange messages that are broadcast to every connected client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-server -- --session T1:alice --session T2:bob
//! cargo run --bin idobata-server -- --host 0.0.0.0 --port 3000 --session T1:alice
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use idobata_server::{
    domain::{BroadcastEngine, ClientRegistry, SessionToken, UserId, Username},
    infrastructure::{
        repository::InMemoryMessageRepository, session::InMemorySessionValidator,
    },
    ui::Server,
    usecase::{
        AuthenticateClientUseCase, ConnectClientUseCase, DisconnectClientUseCase,
        SendMessageUseCase,
    },
};
use idobata_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Token-authenticated WebSocket chat server with broadcast support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seed a session as `token:username` (repeatable). Stands in for the
    /// external session-issuing service.
    #[arg(short = 's', long = "session")]
    sessions: Vec<String>,

    /// Write timeout per recipient in seconds
    #[arg(long, default_value = "10")]
    send_timeout_secs: u64,
}

/// Parse a `token:username` seed into domain values
fn parse_session(seed: &str) -> Result<(SessionToken, Username), String> {
    let (token, username) = seed
        .split_once(':')
        .ok_or_else(|| format!("invalid session seed '{}': expected token:username", seed))?;
    let token = SessionToken::new(token.to_string()).map_err(|e| e.to_string())?;
    let username = Username::new(username.to_string()).map_err(|e| e.to_string())?;
    Ok((token, username))
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. SessionValidator (seeded in-memory sessions)
    // 2. Repository
    // 3. Registry + BroadcastEngine
    // 4. UseCases
    // 5. Server

    // 1. Create SessionValidator and seed sessions from the command line
    let validator = Arc::new(InMemorySessionValidator::new());
    for (index, seed) in args.sessions.iter().enumerate() {
        match parse_session(seed) {
            Ok((token, username)) => {
                validator
                    .register_session(token, UserId::new(index as i64 + 1), username.clone())
                    .await;
                tracing::info!("Seeded session for '{}'", username.as_str());
            }
            Err(e) => {
                tracing::error!("Failed to parse --session: {}", e);
                std::process::exit(1);
            }
        }
    }

    // 2. Create Repository (in-memory message store)
    let repository = Arc::new(InMemoryMessageRepository::new());

    // 3. Create Registry and BroadcastEngine
    let registry = Arc::new(ClientRegistry::new());
    let engine = Arc::new(BroadcastEngine::new(registry.clone()));

    // 4. Create UseCases
    let authenticate_client_usecase = Arc::new(AuthenticateClientUseCase::new(validator));
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
        registry.clone(),
        engine.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(repository, engine.clone()));
    let disconnect_client_usecase =
        Arc::new(DisconnectClientUseCase::new(registry.clone(), engine));

    // 5. Create and run the server
    let server = Server::new(
        authenticate_client_usecase,
        connect_client_usecase,
        send_message_usecase,
        disconnect_client_usecase,
        registry,
        Duration::from_secs(args.send_timeout_secs),
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
