#![no_main]

use arbitrary::Arbitrary;
use gatepass_crypto::keypair_from_seed;
use gatepass_merkle::{empty_root, MerkleWitness};
use gatepass_registry::{transition, AuthChallenge};
use gatepass_types::{
    BlockHeight, PublicKey, RegistryParams, RegistryState, Signature, TreeHash, CAPACITY,
    TREE_DEPTH,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    pass: [u8; 32],
    claimant: [u8; 32],
    signature: [u8; 64],
    asserted_height: u64,
    current_height: u64,
    replay_window: u64,
    validity_index: u32,
    ownership_index: u32,
    validity_siblings: [[u8; 32]; TREE_DEPTH],
    ownership_siblings: [[u8; 32]; TREE_DEPTH],
    validity_root: [u8; 32],
    ownership_root: [u8; 32],
}

fn witness(index: u32, siblings: [[u8; 32]; TREE_DEPTH]) -> MerkleWitness {
    match MerkleWitness::new(index % CAPACITY, siblings.map(TreeHash::new)) {
        Ok(w) => w,
        Err(_) => unreachable!("index reduced into range"),
    }
}

fuzz_target!(|input: Input| {
    // Arbitrary challenges against arbitrary roots must be answered with an
    // error or a success, never a panic. Random bytes never forge a pass.
    let state = RegistryState {
        validity_root: TreeHash::new(input.validity_root),
        ownership_root: TreeHash::new(input.ownership_root),
        ..RegistryState::genesis(keypair_from_seed(&[1; 32]).public, empty_root())
    };
    let params = RegistryParams::with_replay_window(input.replay_window);
    let challenge = AuthChallenge {
        claimant: PublicKey(input.claimant),
        asserted_height: BlockHeight::new(input.asserted_height),
        pass: PublicKey(input.pass),
        signature: Signature(input.signature),
        validity_witness: witness(input.validity_index, input.validity_siblings),
        ownership_witness: witness(input.ownership_index, input.ownership_siblings),
    };
    let result = transition::authenticate(
        &state,
        &params,
        &challenge,
        BlockHeight::new(input.current_height),
    );
    assert!(result.is_err());
});
