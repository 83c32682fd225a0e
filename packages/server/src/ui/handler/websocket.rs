//! WebSocket connection handlers.
//!
//! Drives the per-connection lifecycle:
//! Connecting → Authenticating → Active → Closed.
//!
//! One task per live connection runs the read loop below; `receive` on the
//! stream is the only suspension point. Writes to the connection go through
//! its `ConnectionHandle`, which serializes them with a per-handle lock.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::stream::{SplitStream, StreamExt};

use crate::{
    domain::{ConnectionHandle, Event, MessageContent},
    infrastructure::{
        dto::websocket::{WireEvent, decode_event},
        transport::WebSocketTransport,
    },
};

use super::super::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Read frames until the next text frame.
///
/// Returns `None` when the stream ends, the peer sends a close frame, or the
/// transport errors; all of these end the connection's lifecycle.
async fn next_text_frame(receiver: &mut SplitStream<WebSocket>) -> Option<String> {
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => return Some(text.to_string()),
            Ok(Message::Close(_)) => return None,
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Ping/pong is handled automatically by the WebSocket protocol
                continue;
            }
            Ok(_) => {
                // Binary frames are not part of the event schema
                continue;
            }
            Err(e) => {
                tracing::warn!("WebSocket error: {}", e);
                return None;
            }
        }
    }
    None
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let transport = WebSocketTransport::new(sender);
    let handle = Arc::new(ConnectionHandle::new(Box::new(transport), state.send_timeout));

    // Connecting -> Authenticating: prompt the client for its token
    if handle.send(&Event::AuthRequest).await.is_err() {
        handle.close().await;
        return;
    }

    // The first frame received must be an auth event carrying a session token
    let first_event = match next_text_frame(&mut receiver).await {
        Some(text) => match decode_event(&text) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!("Failed to decode handshake frame: {}", e);
                None
            }
        },
        None => None,
    };

    let (user_id, identity) = match state
        .authenticate_client_usecase
        .execute(first_event)
        .await
    {
        Ok(authenticated) => authenticated,
        Err(e) => {
            tracing::warn!("Authentication failed: {}", e);
            // Best-effort: the peer may already be gone
            let _ = handle.send(&Event::AuthFailed).await;
            handle.close().await;
            return;
        }
    };

    // Authenticating -> Active: registry insertion, auth_success, user_join
    match state
        .connect_client_usecase
        .execute(handle.clone(), identity.clone())
        .await
    {
        Ok(_connected_at) => {
            tracing::info!(
                "Client '{}' connected and registered",
                identity.username.as_str()
            );
        }
        Err(e) => {
            tracing::warn!(
                "Failed to admit client '{}': {}",
                identity.username.as_str(),
                e
            );
            handle.close().await;
            return;
        }
    }

    // Active: decode events off the read loop until the connection ends.
    // A decode failure is a read error and ends the session, matching the
    // transport-closed case.
    while let Some(text) = next_text_frame(&mut receiver).await {
        let wire = match serde_json::from_str::<WireEvent>(&text) {
            Ok(wire) => wire,
            Err(e) => {
                tracing::warn!(
                    "Failed to decode frame from '{}': {}",
                    identity.username.as_str(),
                    e
                );
                break;
            }
        };

        match wire {
            WireEvent::Message { content, .. } if content.is_empty() => {
                tracing::debug!(
                    "Ignoring empty message from '{}'",
                    identity.username.as_str()
                );
            }
            WireEvent::Message { content, .. } => match MessageContent::new(content) {
                Ok(content) => {
                    state
                        .send_message_usecase
                        .execute(user_id, &identity, content)
                        .await;
                }
                Err(e) => {
                    tracing::warn!(
                        "Rejecting message from '{}': {}",
                        identity.username.as_str(),
                        e
                    );
                    break;
                }
            },
            _ => {
                tracing::debug!(
                    "Ignoring non-message event from '{}'",
                    identity.username.as_str()
                );
            }
        }
    }

    // Active -> Closed: idempotent removal, user_leave broadcast, close
    state
        .disconnect_client_usecase
        .execute(handle, identity.clone())
        .await;
    tracing::info!(
        "Client '{}' disconnected and removed from registry",
        identity.username.as_str()
    );
}
