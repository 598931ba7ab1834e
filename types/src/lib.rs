//! Fundamental types for the gatepass access-pass registry.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! identities and signatures, tree hashes, block heights, protocol parameters, and the
//! registry state tuple itself.

pub mod error;
pub mod hash;
pub mod height;
pub mod keys;
pub mod params;
pub mod state;

pub use error::TypesError;
pub use hash::TreeHash;
pub use height::{BlockHeight, FixedHeight, HeightOracle};
pub use keys::{KeyPair, PassId, PrivateKey, PublicKey, Signature};
pub use params::{RegistryParams, CAPACITY, REPLAY_WINDOW, TREE_DEPTH};
pub use state::{RegistryState, Versioned};
