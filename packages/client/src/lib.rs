//! Idobata CLI chat client library.
//!
//! Connects to the chat server over WebSocket, performs the token
//! handshake, and renders broadcast events in the terminal.

pub mod error;
pub mod formatter;
pub mod session;
pub mod ui;
