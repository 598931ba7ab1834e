//! Registry parameters and the constants they default to.

use serde::{Deserialize, Serialize};

/// Depth of both the validity and the ownership tree.
pub const TREE_DEPTH: usize = 8;

/// Number of leaf slots per tree (`2^TREE_DEPTH`).
pub const CAPACITY: u32 = 1 << TREE_DEPTH;

/// Blocks a signed authentication challenge stays valid for.
pub const REPLAY_WINDOW: u64 = 10;

/// Parameters every registry instance is evaluated under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryParams {
    /// Maximum number of passes that can ever be issued.
    /// Cannot exceed [`CAPACITY`]; the tree depth is fixed.
    pub capacity: u32,

    /// Tolerance between a challenge's asserted height and the current height.
    pub replay_window: u64,
}

impl RegistryParams {
    pub fn with_replay_window(replay_window: u64) -> Self {
        Self {
            replay_window,
            ..Self::default()
        }
    }

    /// Capacity clamped to what the fixed-depth trees can hold.
    pub fn effective_capacity(&self) -> u32 {
        self.capacity.min(CAPACITY)
    }
}

impl Default for RegistryParams {
    fn default() -> Self {
        Self {
            capacity: CAPACITY,
            replay_window: REPLAY_WINDOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tree_shape() {
        let params = RegistryParams::default();
        assert_eq!(params.capacity, 256);
        assert_eq!(params.replay_window, 10);
    }

    #[test]
    fn capacity_is_clamped_to_tree() {
        let params = RegistryParams {
            capacity: 10_000,
            replay_window: 10,
        };
        assert_eq!(params.effective_capacity(), CAPACITY);
    }
}
