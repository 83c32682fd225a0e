//! WebSocket chat server UI layer (axum router and handlers).

mod handler;
mod server;
mod signal;
mod state;

pub use server::Server;
pub use state::AppState;
