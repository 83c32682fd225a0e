//! Message formatting utilities for client display.

use idobata_shared::time::timestamp_to_jst_rfc3339;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the authentication success banner
    pub fn format_auth_success(username: &str) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str(&format!("Authenticated as '{}'\n", username));
        output.push_str("============================================================\n");
        output
    }

    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `from` - The username of the sender
    /// * `content` - The message content
    /// * `is_self` - Whether the message was sent by this client
    pub fn format_chat_message(from: &str, content: &str, is_self: bool) -> String {
        let me_suffix = if is_self { " (me)" } else { "" };
        format!("\n@{}{}: {}\n", from, me_suffix, content)
    }

    /// Format a user-join notification
    pub fn format_user_join(username: &str, is_self: bool) -> String {
        let me_suffix = if is_self { " (me)" } else { "" };
        format!("\n+ {}{} entered the chat\n", username, me_suffix)
    }

    /// Format a user-leave notification
    pub fn format_user_leave(username: &str) -> String {
        format!("\n- {} left the chat\n", username)
    }

    /// Format a confirmation message after sending
    ///
    /// # Arguments
    ///
    /// * `sent_at` - Unix timestamp when the message was sent (milliseconds)
    pub fn format_sent_confirmation(sent_at: i64) -> String {
        let timestamp_str = timestamp_to_jst_rfc3339(sent_at);
        format!("sent at {}\n", timestamp_str)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n{}\n", text)
    }
}
