//! Domain error types.

use thiserror::Error;

/// Errors returned by a [`ConnectionRegistry`](super::ConnectionRegistry)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry already holds the configured maximum number of connections
    #[error("Connection limit of {0} reached")]
    CapacityExceeded(usize),
}
