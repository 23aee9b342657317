//! Fanout: a real-time WebSocket message relay.
//!
//! Every text message a client sends is broadcast verbatim to every connected
//! client, the sender included.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
