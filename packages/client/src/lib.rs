//! Terminal client for the Fanout relay.
//!
//! Reads lines from the terminal, sends each as `{"sender":<name>,"text":<line>}`
//! and prints everything the relay broadcasts.

pub mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use formatter::MessageFormatter;
pub use runner::run_client;
pub use session::run_client_session;
