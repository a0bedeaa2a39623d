//! Message formatting utilities for client display.

use idobata_shared::time::timestamp_to_rfc3339;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a chat message (live or replayed)
    ///
    /// # Arguments
    ///
    /// * `from` - The display name of the sender
    /// * `content` - The message content
    /// * `sent_at` - Unix timestamp when the message was sent (milliseconds)
    ///
    /// # Returns
    ///
    /// A formatted string with the chat message
    pub fn format_chat_message(from: &str, content: &str, sent_at: i64) -> String {
        let timestamp_str = timestamp_to_rfc3339(sent_at);
        format!(
            "\n\n------------------------------------------------------------\n\
             @{}: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            from, content, timestamp_str
        )
    }

    /// Format a join/leave notice (wire messages without a timestamp)
    ///
    /// # Arguments
    ///
    /// * `name` - The display name of the member the notice is about
    /// * `phrase` - The notice phrase (e.g. "joined the chat")
    ///
    /// # Returns
    ///
    /// A formatted string with the notice
    pub fn format_notice(name: &str, phrase: &str) -> String {
        format!("\n* {} {}\n", name, phrase)
    }

    /// Format a confirmation message after sending
    ///
    /// # Arguments
    ///
    /// * `sent_at` - Local Unix timestamp when the message was sent (milliseconds)
    ///
    /// # Returns
    ///
    /// A formatted string with the sent confirmation
    pub fn format_sent_confirmation(sent_at: i64) -> String {
        let timestamp_str = timestamp_to_rfc3339(sent_at);
        format!("sent at {}\n", timestamp_str)
    }

    /// Format a binary message notification
    ///
    /// # Arguments
    ///
    /// * `byte_count` - The number of bytes received
    ///
    /// # Returns
    ///
    /// A formatted string with the binary data notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    ///
    /// # Arguments
    ///
    /// * `text` - The raw text received
    ///
    /// # Returns
    ///
    /// A formatted string with the raw message
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
