//! Idobata chat server library.
//!
//! Token-authenticated WebSocket chat with broadcast fan-out: clients
//! authenticate over a persistent connection, exchange short text messages,
//! and see join/leave events broadcast to all connected peers.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
