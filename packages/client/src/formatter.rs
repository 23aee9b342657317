//! Message formatting utilities for client display.

use fanout_server::domain::SERVER_SENDER;
use fanout_shared::time::timestamp_to_local_time;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a relayed message
    ///
    /// Messages from the reserved server identity are set apart from chat traffic.
    ///
    /// # Arguments
    ///
    /// * `sender` - Sender identity claimed by the message
    /// * `text` - The message text
    /// * `received_at` - Unix timestamp when the message arrived (milliseconds)
    pub fn format_message(sender: &str, text: &str, received_at: i64) -> String {
        let time = timestamp_to_local_time(received_at);
        if sender == SERVER_SENDER {
            format!("\n[{}] *** {} ***\n", time, text)
        } else {
            format!("\n[{}] {}: {}\n", time, sender, text)
        }
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }
}
