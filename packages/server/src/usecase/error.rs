//! UseCase error types.

use thiserror::Error;

use crate::domain::RegistryError;

/// Errors returned by [`ConnectClientUseCase`](super::ConnectClientUseCase)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Relay is full ({0} connections)")]
    CapacityExceeded(usize),
}

impl From<RegistryError> for ConnectError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::CapacityExceeded(max) => Self::CapacityExceeded(max),
        }
    }
}
