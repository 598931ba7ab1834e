//! Nullable infrastructure for deterministic testing.
//!
//! The registry's external dependencies (the block-height oracle and the
//! state store) sit behind traits. This crate provides implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem
//!
//! Usage: swap the LMDB store and the real height source for these in tests.

pub mod height;
pub mod store;

pub use height::NullHeight;
pub use store::NullStore;
