//! Nullable height oracle: deterministic chain length for testing.

use gatepass_types::{BlockHeight, HeightOracle};
use std::sync::atomic::{AtomicU64, Ordering};

/// A height oracle that only moves when told to.
///
/// Atomic so a registry sharing it across threads still sees one value.
pub struct NullHeight {
    current: AtomicU64,
}

impl NullHeight {
    pub fn new(initial: u64) -> Self {
        Self {
            current: AtomicU64::new(initial),
        }
    }

    /// Advance the chain by `blocks`.
    pub fn advance(&self, blocks: u64) {
        self.current.fetch_add(blocks, Ordering::SeqCst);
    }

    /// Jump to a specific height. Never moves backwards.
    pub fn set(&self, height: u64) {
        self.current.fetch_max(height, Ordering::SeqCst);
    }
}

impl Default for NullHeight {
    fn default() -> Self {
        Self::new(0)
    }
}

impl HeightOracle for NullHeight {
    fn current_height(&self) -> BlockHeight {
        BlockHeight::new(self.current.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_forward() {
        let oracle = NullHeight::new(5);
        oracle.advance(3);
        assert_eq!(oracle.current_height(), BlockHeight::new(8));
    }

    #[test]
    fn set_is_monotonic() {
        let oracle = NullHeight::new(20);
        oracle.set(10);
        assert_eq!(oracle.current_height(), BlockHeight::new(20));
        oracle.set(30);
        assert_eq!(oracle.current_height(), BlockHeight::new(30));
    }
}
