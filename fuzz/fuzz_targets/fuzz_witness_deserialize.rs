#![no_main]

use gatepass_merkle::{MerkleTree, MerkleWitness};
use gatepass_types::{RegistryState, TreeHash, CAPACITY};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding untrusted witnesses and trees must reject, never panic.
    if let Ok(witness) = bincode::deserialize::<MerkleWitness>(data) {
        assert!(witness.index() < CAPACITY);
        let root = witness.calculate_root(&TreeHash::EMPTY);
        let _ = witness.verify(&root, &TreeHash::EMPTY);
    }
    if let Ok(witness) = serde_json::from_slice::<MerkleWitness>(data) {
        assert!(witness.index() < CAPACITY);
    }
    if let Ok(tree) = serde_json::from_slice::<MerkleTree>(data) {
        assert!(tree.leaves().len() == CAPACITY as usize);
    }
    let _ = bincode::deserialize::<RegistryState>(data);
});
