use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MerkleError {
    #[error("leaf index {index} out of range (capacity {capacity})")]
    IndexOutOfRange { index: u64, capacity: u32 },

    #[error("too many leaves: {count} exceeds capacity {capacity}")]
    TooManyLeaves { count: usize, capacity: u32 },
}
