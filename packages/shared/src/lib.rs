//! Shared utilities for the Idobata chat application.
//!
//! Cross-cutting helpers used by both the server and the client:
//! logging setup and time handling.

pub mod logger;
pub mod time;
