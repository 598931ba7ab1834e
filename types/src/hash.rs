//! Hash values stored in the validity and ownership trees.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte tree hash: a leaf value, an interior node, or a root.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TreeHash([u8; 32]);

impl Default for TreeHash {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl TreeHash {
    /// The value held by every leaf that has never been written.
    pub const EMPTY: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for TreeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TreeHash({}\u{2026})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for TreeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
