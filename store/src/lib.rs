//! Abstract storage for the registry state.
//!
//! Every backend (LMDB, in-memory for testing) implements [`RegistryStore`].
//! The registry depends only on the trait.

pub mod error;
pub mod registry;

pub use error::StoreError;
pub use registry::RegistryStore;
