//! Registry errors.

use gatepass_store::StoreError;
use gatepass_types::BlockHeight;
use std::fmt;
use thiserror::Error;

/// Which of the two registry trees a witness was checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeKind {
    Validity,
    Ownership,
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validity => write!(f, "validity"),
            Self::Ownership => write!(f, "ownership"),
        }
    }
}

/// Why an operation was refused.
///
/// Every variant except [`Store`](Self::Store) is a precondition failure
/// detected before anything is written.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("signer is not the registry authority")]
    Unauthorized,

    #[error("witness index mismatch: expected {expected}, got {actual}")]
    IndexMismatch { expected: u32, actual: u32 },

    #[error("access pass is not in the validity tree")]
    InvalidPass,

    #[error("claimant does not own this access pass")]
    NotOwner,

    #[error("challenge signature does not verify")]
    BadSignature,

    #[error("challenge signed at {asserted} is stale at {current} (window {window})")]
    StaleChallenge {
        asserted: BlockHeight,
        current: BlockHeight,
        window: u64,
    },

    #[error("registry is full: all {capacity} passes issued")]
    CapacityExceeded { capacity: u32 },

    #[error("{tree} witness does not authenticate against the current root")]
    StaleWitness { tree: TreeKind },

    #[error("registry has not been initialized")]
    NotInitialized,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl RegistryError {
    /// Whether the caller should refresh its mirror, rebuild witnesses and
    /// resubmit. The registry cannot rebuild witnesses for the caller.
    pub fn needs_fresh_witness(&self) -> bool {
        matches!(
            self,
            Self::IndexMismatch { .. } | Self::StaleWitness { .. }
        )
    }
}
