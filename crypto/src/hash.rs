//! Blake2b hashing for tree leaves and interior nodes.
//!
//! Each use of the hash is prefixed with its own domain tag so a validity
//! leaf, an ownership leaf and an interior node can never share a preimage.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use gatepass_types::{PassId, PublicKey, TreeHash};

type Blake2b256 = Blake2b<U32>;

const TAG_VALIDITY_LEAF: u8 = 0x01;
const TAG_OWNERSHIP_LEAF: u8 = 0x02;
const TAG_NODE: u8 = 0x03;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Validity-tree leaf for a pass: `H(pass)`.
pub fn hash_pass(pass: &PassId) -> TreeHash {
    TreeHash::new(blake2b_256_multi(&[&[TAG_VALIDITY_LEAF], pass.as_bytes()]))
}

/// Ownership-tree leaf binding a pass to its owner: `H(pass, owner)`.
pub fn hash_ownership(pass: &PassId, owner: &PublicKey) -> TreeHash {
    TreeHash::new(blake2b_256_multi(&[
        &[TAG_OWNERSHIP_LEAF],
        pass.as_bytes(),
        owner.as_bytes(),
    ]))
}

/// Parent of two sibling nodes.
pub fn hash_node(left: &TreeHash, right: &TreeHash) -> TreeHash {
    TreeHash::new(blake2b_256_multi(&[
        &[TAG_NODE],
        left.as_bytes(),
        right.as_bytes(),
    ]))
}
