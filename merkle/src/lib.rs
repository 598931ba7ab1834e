//! Fixed-depth Merkle accumulator.
//!
//! Both registry trees are binary trees of depth [`TREE_DEPTH`] over
//! [`CAPACITY`] leaves. The registry itself only ever holds roots; clients keep
//! a [`MerkleTree`] and hand the registry a [`MerkleWitness`] for the one leaf an
//! operation reads or replaces.
//!
//! [`TREE_DEPTH`]: gatepass_types::TREE_DEPTH
//! [`CAPACITY`]: gatepass_types::CAPACITY

pub mod error;
pub mod tree;
pub mod witness;

pub use error::MerkleError;
pub use tree::{empty_root, MerkleTree};
pub use witness::MerkleWitness;
