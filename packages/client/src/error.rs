//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the session token
    #[error("Authentication failed: the server rejected the session token")]
    AuthenticationFailed,

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
