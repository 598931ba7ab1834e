//! Merkle authentication paths.

use crate::error::MerkleError;
use gatepass_crypto::hash_node;
use gatepass_types::{TreeHash, CAPACITY, TREE_DEPTH};
use serde::{Deserialize, Serialize};

/// Authentication path for one leaf: its index and one sibling per level.
///
/// The index fixes the side of every sibling (bit `i` set means the path node
/// at level `i` is a right child), so the same witness can both verify a leaf
/// against a root and compute the root after that leaf is replaced. The old
/// leaf value is never needed for the latter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WitnessParts")]
pub struct MerkleWitness {
    index: u32,
    siblings: [TreeHash; TREE_DEPTH],
}

#[derive(Deserialize)]
struct WitnessParts {
    index: u32,
    siblings: [TreeHash; TREE_DEPTH],
}

impl TryFrom<WitnessParts> for MerkleWitness {
    type Error = MerkleError;

    fn try_from(parts: WitnessParts) -> Result<Self, Self::Error> {
        Self::new(parts.index, parts.siblings)
    }
}

impl MerkleWitness {
    /// Assemble a witness from raw parts. Siblings are ordered leaf level first.
    pub fn new(index: u32, siblings: [TreeHash; TREE_DEPTH]) -> Result<Self, MerkleError> {
        if index >= CAPACITY {
            return Err(MerkleError::IndexOutOfRange {
                index: index as u64,
                capacity: CAPACITY,
            });
        }
        Ok(Self { index, siblings })
    }

    /// The leaf index this path authenticates.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn siblings(&self) -> &[TreeHash; TREE_DEPTH] {
        &self.siblings
    }

    /// Root of the tree that has `leaf` at this index and these siblings.
    pub fn calculate_root(&self, leaf: &TreeHash) -> TreeHash {
        let mut current = *leaf;
        for (level, sibling) in self.siblings.iter().enumerate() {
            current = if (self.index >> level) & 1 == 1 {
                hash_node(sibling, &current)
            } else {
                hash_node(&current, sibling)
            };
        }
        current
    }

    /// Whether `leaf` sits at this index in the tree committed to by `root`.
    ///
    /// Exact root equality: a path whose siblings have since changed fails even
    /// if the leaf itself did not.
    pub fn verify(&self, root: &TreeHash, leaf: &TreeHash) -> bool {
        self.calculate_root(leaf) == *root
    }

    /// Root after replacing this leaf with `new_leaf`.
    pub fn root_after_setting(&self, new_leaf: &TreeHash) -> TreeHash {
        self.calculate_root(new_leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{empty_root, MerkleTree};

    fn leaf(byte: u8) -> TreeHash {
        TreeHash::new([byte; 32])
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = MerkleWitness::new(CAPACITY, [TreeHash::EMPTY; TREE_DEPTH]).unwrap_err();
        assert_eq!(
            err,
            MerkleError::IndexOutOfRange {
                index: 256,
                capacity: 256
            }
        );
    }

    #[test]
    fn empty_leaf_verifies_against_empty_root() {
        let tree = MerkleTree::new();
        let witness = tree.witness(17).unwrap();
        assert!(witness.verify(&empty_root(), &TreeHash::EMPTY));
    }

    #[test]
    fn root_after_setting_matches_tree_update() {
        let mut tree = MerkleTree::new();
        let witness = tree.witness(5).unwrap();
        let predicted = witness.root_after_setting(&leaf(9));
        tree.set_leaf(5, leaf(9)).unwrap();
        assert_eq!(predicted, tree.root());
    }

    #[test]
    fn wrong_leaf_does_not_verify() {
        let mut tree = MerkleTree::new();
        tree.set_leaf(3, leaf(1)).unwrap();
        let witness = tree.witness(3).unwrap();
        assert!(witness.verify(&tree.root(), &leaf(1)));
        assert!(!witness.verify(&tree.root(), &leaf(2)));
    }

    #[test]
    fn witness_goes_stale_when_a_sibling_changes() {
        let mut tree = MerkleTree::new();
        tree.set_leaf(0, leaf(1)).unwrap();
        let witness = tree.witness(0).unwrap();
        tree.set_leaf(1, leaf(2)).unwrap();
        assert_eq!(tree.leaf(0).unwrap(), leaf(1));
        assert!(!witness.verify(&tree.root(), &leaf(1)));
    }

    #[test]
    fn rejects_out_of_range_index_on_deserialize() {
        let json = serde_json::json!({
            "index": 300,
            "siblings": vec![[0u8; 32]; TREE_DEPTH],
        });
        assert!(serde_json::from_value::<MerkleWitness>(json).is_err());
    }

    #[test]
    fn json_roundtrip_preserves_witness() {
        let mut tree = MerkleTree::new();
        tree.set_leaf(200, leaf(4)).unwrap();
        let witness = tree.witness(200).unwrap();
        let json = serde_json::to_string(&witness).unwrap();
        let back: MerkleWitness = serde_json::from_str(&json).unwrap();
        assert_eq!(back, witness);
    }
}
