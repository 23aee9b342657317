//! Relay message value object.

/// Reserved sender identity used for messages originating from the server itself
pub const SERVER_SENDER: &str = "SERVER";

/// Text of the greeting every client receives right after connecting
pub const GREETING_TEXT: &str = "Hello THERE. You are logged in";

/// A relayed message: who sent it and what it says.
///
/// Neither field is validated; the relay forwards whatever the sender claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    sender: String,
    text: String,
}

impl Message {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }

    /// The one-time greeting sent from [`SERVER_SENDER`] to a new connection
    pub fn greeting() -> Self {
        Self::new(SERVER_SENDER, GREETING_TEXT)
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_parts(self) -> (String, String) {
        (self.sender, self.text)
    }
}
