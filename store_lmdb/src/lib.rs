//! LMDB storage backend for gatepass.
//!
//! Implements [`gatepass_store::RegistryStore`] with the `heed` LMDB bindings.
//! The versioned registry record lives under a single key; LMDB's single
//! writer makes the compare-and-swap atomic.

pub mod environment;
pub mod error;
pub mod registry;

pub use environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
pub use error::LmdbError;
pub use registry::LmdbRegistryStore;
