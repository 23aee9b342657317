//! Infrastructure layer: concrete registry and wire formats.

pub mod dto;
pub mod registry;
