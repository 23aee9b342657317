//! Domain layer: pure types and the registry interface.
//!
//! Nothing in this module knows about axum, sockets or the wire format.

pub mod connection;
pub mod error;
pub mod message;
pub mod registry;

pub use connection::{ConnectionId, ConnectionState};
pub use error::RegistryError;
pub use message::{GREETING_TEXT, Message, SERVER_SENDER};
pub use registry::{BroadcastReport, ConnectionRegistry, OutboundChannel};

#[cfg(test)]
pub use registry::MockConnectionRegistry;
