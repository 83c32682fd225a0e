//! HTTP / WebSocket handlers.

mod http;
mod websocket;

pub use http::{get_clients, health_check};
pub use websocket::websocket_handler;
