//! HTTP API handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use idobata_shared::time::timestamp_to_jst_rfc3339;

use crate::infrastructure::dto::http::{ClientListDto, ConnectedClientDto};

use super::super::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of currently connected clients
pub async fn get_clients(State(state): State<Arc<AppState>>) -> Json<ClientListDto> {
    let clients: Vec<ConnectedClientDto> = state
        .registry
        .connected_clients()
        .await
        .into_iter()
        .map(|(identity, connected_at)| ConnectedClientDto {
            username: identity.username.into_string(),
            connected_at: timestamp_to_jst_rfc3339(connected_at.value()),
        })
        .collect();

    Json(ClientListDto {
        count: clients.len(),
        clients,
    })
}
