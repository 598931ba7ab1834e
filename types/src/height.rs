//! Block height reported by the external chain-length oracle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monotonically non-decreasing block height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockHeight(u64);

impl BlockHeight {
    pub const GENESIS: Self = Self(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Whether a challenge signed at `self` is still fresh at `current`.
    ///
    /// Only staleness is bounded: a height arbitrarily far ahead of `current`
    /// is accepted.
    pub fn is_fresh_at(&self, current: BlockHeight, window: u64) -> bool {
        current.0 <= self.0.saturating_add(window)
    }

    /// Blocks elapsed between `self` and `current` (zero if `current` is behind).
    pub fn elapsed_since(&self, current: BlockHeight) -> u64 {
        current.0.saturating_sub(self.0)
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for BlockHeight {
    fn from(height: u64) -> Self {
        Self(height)
    }
}

/// Source of the current block height, sampled when a challenge is checked.
///
/// Implementations must never report a height lower than one already reported.
pub trait HeightOracle {
    fn current_height(&self) -> BlockHeight;
}

/// An oracle pinned to one height, for callers that read the chain length
/// themselves (e.g. passed on the command line).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedHeight(pub BlockHeight);

impl HeightOracle for FixedHeight {
    fn current_height(&self) -> BlockHeight {
        self.0
    }
}

impl<T: HeightOracle + ?Sized> HeightOracle for std::sync::Arc<T> {
    fn current_height(&self) -> BlockHeight {
        (**self).current_height()
    }
}
