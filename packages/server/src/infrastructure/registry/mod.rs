//! ConnectionRegistry の実装
//!
//! - `inmemory`: a single-process registry guarded by one async mutex

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
