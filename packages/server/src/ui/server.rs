//! Server execution logic.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::domain::ClientRegistry;
use crate::usecase::{
    AuthenticateClientUseCase, ConnectClientUseCase, DisconnectClientUseCase, SendMessageUseCase,
};

use super::{
    handler::{get_clients, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     authenticate_client_usecase,
///     connect_client_usecase,
///     send_message_usecase,
///     disconnect_client_usecase,
///     registry,
///     send_timeout,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// AuthenticateClientUseCase（認証ハンドシェイクのユースケース）
    authenticate_client_usecase: Arc<AuthenticateClientUseCase>,
    /// ConnectClientUseCase（クライアント接続のユースケース）
    connect_client_usecase: Arc<ConnectClientUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    send_message_usecase: Arc<SendMessageUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// ClientRegistry（接続レジストリ）
    registry: Arc<ClientRegistry>,
    /// 1 受信者への書き込みタイムアウト
    send_timeout: Duration,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        authenticate_client_usecase: Arc<AuthenticateClientUseCase>,
        connect_client_usecase: Arc<ConnectClientUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        registry: Arc<ClientRegistry>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            authenticate_client_usecase,
            connect_client_usecase,
            send_message_usecase,
            disconnect_client_usecase,
            registry,
            send_timeout,
        }
    }

    /// Run the WebSocket chat server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            authenticate_client_usecase: self.authenticate_client_usecase,
            connect_client_usecase: self.connect_client_usecase,
            send_message_usecase: self.send_message_usecase,
            disconnect_client_usecase: self.disconnect_client_usecase,
            registry: self.registry,
            send_timeout: self.send_timeout,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/clients", get(get_clients))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "WebSocket chat server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
