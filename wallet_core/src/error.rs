use gatepass_merkle::MerkleError;
use gatepass_registry::TreeKind;
use gatepass_types::PassId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("pass {0} is not in the mirror")]
    UnknownPass(PassId),

    #[error("pass {0} is already in the mirror")]
    DuplicatePass(PassId),

    #[error("event for index {actual} does not follow the mirror (next index {expected})")]
    OutOfOrder { expected: u32, actual: u32 },

    #[error("mirror {tree} root does not match the registry")]
    OutOfSync { tree: TreeKind },

    #[error("merkle error: {0}")]
    Merkle(#[from] MerkleError),

    #[error("mirror file error: {0}")]
    Io(String),

    #[error("invalid mirror file: {0}")]
    Format(String),
}
