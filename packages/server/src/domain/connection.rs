//! Connection identity and lifecycle.

use std::fmt;

use uuid::Uuid;

/// Opaque identifier of one accepted connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh random (v4) identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for ConnectionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a connection handler.
///
/// ```text
/// Connecting ──activate──▶ Active ──close──▶ Closed
///      └──────────────close──────────────────▲
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Active,
    Closed,
}

impl ConnectionState {
    /// Move from `Connecting` to `Active` once the connection is registered.
    ///
    /// Any other state is left untouched; `Closed` is terminal.
    pub fn activate(&mut self) -> bool {
        if *self == Self::Connecting {
            *self = Self::Active;
            true
        } else {
            false
        }
    }

    /// Move to the terminal `Closed` state.
    ///
    /// Returns `false` if the connection was already closed.
    pub fn close(&mut self) -> bool {
        let was_open = !self.is_closed();
        *self = Self::Closed;
        was_open
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "CONNECTING",
            Self::Active => "ACTIVE",
            Self::Closed => "CLOSED",
        };
        f.write_str(name)
    }
}
