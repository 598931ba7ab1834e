//! Full binary Merkle tree, held client-side.

use crate::error::MerkleError;
use crate::witness::MerkleWitness;
use gatepass_crypto::hash_node;
use gatepass_types::{TreeHash, CAPACITY, TREE_DEPTH};
use serde::{Deserialize, Serialize};

const LEAVES: usize = CAPACITY as usize;

/// A depth-[`TREE_DEPTH`] binary Merkle tree.
///
/// Nodes live in one flat array: index 1 is the root, the children of node
/// `n` are `2n` and `2n + 1`, and leaf `i` is node `CAPACITY + i`. Slot 0 is
/// unused. Unwritten leaves hold [`TreeHash::EMPTY`].
///
/// Serialized as its written leaves only; interior nodes are rebuilt on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TreeLeaves", into = "TreeLeaves")]
pub struct MerkleTree {
    nodes: Vec<TreeHash>,
}

#[derive(Serialize, Deserialize)]
struct TreeLeaves {
    leaves: Vec<TreeHash>,
}

impl From<MerkleTree> for TreeLeaves {
    fn from(tree: MerkleTree) -> Self {
        let leaves = tree.leaves();
        let used = leaves
            .iter()
            .rposition(|leaf| !leaf.is_empty())
            .map_or(0, |last| last + 1);
        Self {
            leaves: leaves[..used].to_vec(),
        }
    }
}

impl TryFrom<TreeLeaves> for MerkleTree {
    type Error = MerkleError;

    fn try_from(stored: TreeLeaves) -> Result<Self, Self::Error> {
        Self::from_leaves(&stored.leaves)
    }
}

impl MerkleTree {
    /// A tree with every leaf empty.
    pub fn new() -> Self {
        let mut nodes = vec![TreeHash::EMPTY; 2 * LEAVES];
        for n in (1..LEAVES).rev() {
            nodes[n] = hash_node(&nodes[2 * n], &nodes[2 * n + 1]);
        }
        Self { nodes }
    }

    /// Build a tree whose first leaves are `leaves`; the rest stay empty.
    pub fn from_leaves(leaves: &[TreeHash]) -> Result<Self, MerkleError> {
        if leaves.len() > LEAVES {
            return Err(MerkleError::TooManyLeaves {
                count: leaves.len(),
                capacity: CAPACITY,
            });
        }
        let mut nodes = vec![TreeHash::EMPTY; 2 * LEAVES];
        nodes[LEAVES..LEAVES + leaves.len()].copy_from_slice(leaves);
        for n in (1..LEAVES).rev() {
            nodes[n] = hash_node(&nodes[2 * n], &nodes[2 * n + 1]);
        }
        Ok(Self { nodes })
    }

    pub fn root(&self) -> TreeHash {
        self.nodes[1]
    }

    pub fn depth(&self) -> usize {
        TREE_DEPTH
    }

    pub fn capacity(&self) -> u32 {
        CAPACITY
    }

    pub fn leaf(&self, index: u32) -> Result<TreeHash, MerkleError> {
        Ok(self.nodes[Self::leaf_node(index)?])
    }

    /// Overwrite one leaf and rehash its path to the root.
    pub fn set_leaf(&mut self, index: u32, value: TreeHash) -> Result<(), MerkleError> {
        let mut n = Self::leaf_node(index)?;
        self.nodes[n] = value;
        while n > 1 {
            n /= 2;
            self.nodes[n] = hash_node(&self.nodes[2 * n], &self.nodes[2 * n + 1]);
        }
        Ok(())
    }

    /// Authentication path for the leaf at `index`.
    pub fn witness(&self, index: u32) -> Result<MerkleWitness, MerkleError> {
        let mut n = Self::leaf_node(index)?;
        let mut siblings = [TreeHash::EMPTY; TREE_DEPTH];
        for sibling in siblings.iter_mut() {
            *sibling = self.nodes[n ^ 1];
            n /= 2;
        }
        MerkleWitness::new(index, siblings)
    }

    /// Leaves in index order, trailing empties included.
    pub fn leaves(&self) -> &[TreeHash] {
        &self.nodes[LEAVES..]
    }

    fn leaf_node(index: u32) -> Result<usize, MerkleError> {
        if index >= CAPACITY {
            return Err(MerkleError::IndexOutOfRange {
                index: index as u64,
                capacity: CAPACITY,
            });
        }
        Ok(LEAVES + index as usize)
    }
}

impl Default for MerkleTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Root of a tree with every leaf empty.
pub fn empty_root() -> TreeHash {
    let mut node = TreeHash::EMPTY;
    for _ in 0..TREE_DEPTH {
        node = hash_node(&node, &node);
    }
    node
}
