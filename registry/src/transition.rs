//! Pure registry transitions.
//!
//! Each function takes the state snapshot in effect and either returns the
//! next state (plus the event describing it) or the first precondition that
//! failed. Nothing here performs I/O; [`crate::Registry`] does the commit.

use crate::error::{RegistryError, TreeKind};
use crate::event::RegistryEvent;
use crate::request::{AuthChallenge, IssueRequest, PossessionClaim, TransferRequest};
use gatepass_crypto::{hash_ownership, hash_pass, public_from_private, verify_challenge};
use gatepass_merkle::MerkleWitness;
use gatepass_types::{BlockHeight, PassId, PublicKey, RegistryParams, RegistryState, TreeHash};

/// A successful state-changing operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: RegistryState,
    pub event: RegistryEvent,
}

/// A successful authentication. Carries no state: authentication writes nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authenticated {
    pub claimant: PublicKey,
    pub pass: PassId,
    pub index: u32,
    pub asserted_height: BlockHeight,
    pub checked_at: BlockHeight,
}

fn check_index(expected: u32, witness: &MerkleWitness) -> Result<u32, RegistryError> {
    let actual = witness.index();
    if actual != expected {
        return Err(RegistryError::IndexMismatch { expected, actual });
    }
    Ok(actual)
}

fn check_valid_pass(state: &RegistryState, pass: &PassId, witness: &MerkleWitness) -> Result<(), RegistryError> {
    if !witness.verify(&state.validity_root, &hash_pass(pass)) {
        return Err(RegistryError::InvalidPass);
    }
    Ok(())
}

fn check_owner(
    state: &RegistryState,
    pass: &PassId,
    owner: &PublicKey,
    witness: &MerkleWitness,
) -> Result<(), RegistryError> {
    if !witness.verify(&state.ownership_root, &hash_ownership(pass, owner)) {
        return Err(RegistryError::NotOwner);
    }
    Ok(())
}

/// Append a pass at `next_index` and record its first owner.
///
/// Both witnesses must point at `next_index` and must authenticate the empty
/// slot against the current roots; the new roots are computed from them.
pub fn issue(
    state: &RegistryState,
    params: &RegistryParams,
    req: &IssueRequest<'_>,
) -> Result<Transition, RegistryError> {
    if public_from_private(req.authority_secret) != state.authority {
        return Err(RegistryError::Unauthorized);
    }

    // Checked before the index binding: no witness can point past the last
    // slot, so a full registry would otherwise only ever report a mismatch.
    let capacity = params.effective_capacity();
    if state.next_index >= capacity {
        return Err(RegistryError::CapacityExceeded { capacity });
    }

    let index = check_index(state.next_index, &req.validity_witness)?;
    check_index(index, &req.ownership_witness)?;

    if !req
        .validity_witness
        .verify(&state.validity_root, &TreeHash::EMPTY)
    {
        return Err(RegistryError::StaleWitness {
            tree: TreeKind::Validity,
        });
    }
    if !req
        .ownership_witness
        .verify(&state.ownership_root, &TreeHash::EMPTY)
    {
        return Err(RegistryError::StaleWitness {
            tree: TreeKind::Ownership,
        });
    }

    let next = RegistryState {
        authority: state.authority,
        validity_root: req.validity_witness.root_after_setting(&hash_pass(&req.pass)),
        ownership_root: req
            .ownership_witness
            .root_after_setting(&hash_ownership(&req.pass, &req.recipient)),
        next_index: index + 1,
    };
    Ok(Transition {
        state: next,
        event: RegistryEvent::PassIssued {
            index,
            pass: req.pass,
            owner: req.recipient,
        },
    })
}

/// Re-key the ownership leaf of a valid pass from its current owner.
///
/// An index that was never claimed has no matching ownership leaf, so a pass
/// that doesn't exist and a pass the signer doesn't own fail the same way.
pub fn transfer(state: &RegistryState, req: &TransferRequest<'_>) -> Result<Transition, RegistryError> {
    check_valid_pass(state, &req.pass, &req.validity_witness)?;
    let index = check_index(req.validity_witness.index(), &req.current_owner_witness)?;

    let current_owner = public_from_private(req.current_owner_secret);
    check_owner(state, &req.pass, &current_owner, &req.current_owner_witness)?;

    check_index(index, &req.new_owner_witness)?;
    // The write path must be the live path to this leaf, or a forged sibling
    // set would rewrite every other ownership leaf along with it.
    if !req
        .new_owner_witness
        .verify(&state.ownership_root, &hash_ownership(&req.pass, &current_owner))
    {
        return Err(RegistryError::StaleWitness {
            tree: TreeKind::Ownership,
        });
    }

    let next = RegistryState {
        ownership_root: req
            .new_owner_witness
            .root_after_setting(&hash_ownership(&req.pass, &req.new_owner)),
        ..state.clone()
    };
    Ok(Transition {
        state: next,
        event: RegistryEvent::OwnershipTransferred {
            index,
            pass: req.pass,
            previous_owner: current_owner,
            new_owner: req.new_owner,
        },
    })
}

/// Check a signed, height-stamped ownership claim. Writes nothing.
///
/// The freshness check is one-sided: a challenge asserting a height ahead of
/// `current` passes it.
pub fn authenticate(
    state: &RegistryState,
    params: &RegistryParams,
    challenge: &AuthChallenge,
    current: BlockHeight,
) -> Result<Authenticated, RegistryError> {
    check_valid_pass(state, &challenge.pass, &challenge.validity_witness)?;

    if !challenge
        .asserted_height
        .is_fresh_at(current, params.replay_window)
    {
        return Err(RegistryError::StaleChallenge {
            asserted: challenge.asserted_height,
            current,
            window: params.replay_window,
        });
    }

    if !verify_challenge(
        &challenge.pass,
        challenge.asserted_height,
        &challenge.signature,
        &challenge.claimant,
    ) {
        return Err(RegistryError::BadSignature);
    }

    check_owner(
        state,
        &challenge.pass,
        &challenge.claimant,
        &challenge.ownership_witness,
    )?;

    Ok(Authenticated {
        claimant: challenge.claimant,
        pass: challenge.pass,
        index: challenge.ownership_witness.index(),
        asserted_height: challenge.asserted_height,
        checked_at: current,
    })
}

/// Possession check with no signature and no height. Not replay-safe.
///
/// Returns the identity derived from the secret.
pub fn verify_possession_unprotected(
    state: &RegistryState,
    claim: &PossessionClaim<'_>,
) -> Result<PublicKey, RegistryError> {
    check_valid_pass(state, &claim.pass, &claim.validity_witness)?;
    let owner = public_from_private(claim.owner_secret);
    check_owner(state, &claim.pass, &owner, &claim.ownership_witness)?;
    Ok(owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatepass_crypto::{keypair_from_seed, sign_challenge};
    use gatepass_merkle::{empty_root, MerkleTree};
    use gatepass_types::{KeyPair, PrivateKey};

    struct Fixture {
        authority: KeyPair,
        state: RegistryState,
        validity: MerkleTree,
        ownership: MerkleTree,
    }

    impl Fixture {
        fn new() -> Self {
            let authority = keypair_from_seed(&[1u8; 32]);
            let state = RegistryState::genesis(authority.public, empty_root());
            Self {
                authority,
                state,
                validity: MerkleTree::new(),
                ownership: MerkleTree::new(),
            }
        }

        fn issue(&mut self, pass: PassId, owner: PublicKey) {
            let index = self.state.next_index;
            let req = IssueRequest {
                recipient: owner,
                pass,
                authority_secret: &self.authority.private,
                validity_witness: self.validity.witness(index).unwrap(),
                ownership_witness: self.ownership.witness(index).unwrap(),
            };
            let t = issue(&self.state, &RegistryParams::default(), &req).unwrap();
            self.validity.set_leaf(index, hash_pass(&pass)).unwrap();
            self.ownership
                .set_leaf(index, hash_ownership(&pass, &owner))
                .unwrap();
            self.state = t.state;
        }

        fn challenge(&self, index: u32, pass: PassId, owner: &KeyPair, height: u64) -> AuthChallenge {
            AuthChallenge {
                claimant: owner.public,
                asserted_height: BlockHeight::new(height),
                pass,
                signature: sign_challenge(&pass, BlockHeight::new(height), &owner.private),
                validity_witness: self.validity.witness(index).unwrap(),
                ownership_witness: self.ownership.witness(index).unwrap(),
            }
        }
    }

    fn key(seed: u8) -> KeyPair {
        keypair_from_seed(&[seed; 32])
    }

    #[test]
    fn issue_updates_roots_and_counter() {
        let mut fx = Fixture::new();
        let pass = key(10).public;
        let owner = key(20).public;
        fx.issue(pass, owner);

        assert_eq!(fx.state.next_index, 1);
        assert_eq!(fx.state.validity_root, fx.validity.root());
        assert_eq!(fx.state.ownership_root, fx.ownership.root());
    }

    #[test]
    fn issue_rejects_foreign_signer() {
        let fx = Fixture::new();
        let impostor = PrivateKey([9u8; 32]);
        let req = IssueRequest {
            recipient: key(20).public,
            pass: key(10).public,
            authority_secret: &impostor,
            validity_witness: fx.validity.witness(0).unwrap(),
            ownership_witness: fx.ownership.witness(0).unwrap(),
        };
        assert!(matches!(
            issue(&fx.state, &RegistryParams::default(), &req),
            Err(RegistryError::Unauthorized)
        ));
    }

    #[test]
    fn issue_rejects_disagreeing_witness_indices() {
        let fx = Fixture::new();
        let req = IssueRequest {
            recipient: key(20).public,
            pass: key(10).public,
            authority_secret: &fx.authority.private,
            validity_witness: fx.validity.witness(0).unwrap(),
            ownership_witness: fx.ownership.witness(1).unwrap(),
        };
        assert!(matches!(
            issue(&fx.state, &RegistryParams::default(), &req),
            Err(RegistryError::IndexMismatch {
                expected: 0,
                actual: 1
            })
        ));
    }

    #[test]
    fn issue_rejects_witness_with_forged_siblings() {
        let fx = Fixture::new();
        let forged = MerkleWitness::new(0, [TreeHash::new([7u8; 32]); 8]).unwrap();
        let req = IssueRequest {
            recipient: key(20).public,
            pass: key(10).public,
            authority_secret: &fx.authority.private,
            validity_witness: forged,
            ownership_witness: fx.ownership.witness(0).unwrap(),
        };
        assert!(matches!(
            issue(&fx.state, &RegistryParams::default(), &req),
            Err(RegistryError::StaleWitness {
                tree: TreeKind::Validity
            })
        ));
    }

    #[test]
    fn issue_respects_configured_capacity() {
        let mut fx = Fixture::new();
        fx.issue(key(10).public, key(20).public);
        let params = RegistryParams {
            capacity: 1,
            ..RegistryParams::default()
        };
        let req = IssueRequest {
            recipient: key(21).public,
            pass: key(11).public,
            authority_secret: &fx.authority.private,
            validity_witness: fx.validity.witness(1).unwrap(),
            ownership_witness: fx.ownership.witness(1).unwrap(),
        };
        assert!(matches!(
            issue(&fx.state, &params, &req),
            Err(RegistryError::CapacityExceeded { capacity: 1 })
        ));
    }

    #[test]
    fn transfer_rekeys_only_ownership() {
        let mut fx = Fixture::new();
        let pass = key(10).public;
        let owner = key(20);
        fx.issue(pass, owner.public);

        let req = TransferRequest {
            current_owner_secret: &owner.private,
            new_owner: key(21).public,
            pass,
            validity_witness: fx.validity.witness(0).unwrap(),
            current_owner_witness: fx.ownership.witness(0).unwrap(),
            new_owner_witness: fx.ownership.witness(0).unwrap(),
        };
        let t = transfer(&fx.state, &req).unwrap();
        assert_eq!(t.state.validity_root, fx.state.validity_root);
        assert_eq!(t.state.next_index, fx.state.next_index);
        assert_ne!(t.state.ownership_root, fx.state.ownership_root);
    }

    #[test]
    fn transfer_of_unclaimed_index_is_not_owner() {
        let mut fx = Fixture::new();
        let pass = key(10).public;
        fx.issue(pass, key(20).public);
        let stranger = key(30);

        let req = TransferRequest {
            current_owner_secret: &stranger.private,
            new_owner: stranger.public,
            pass,
            validity_witness: fx.validity.witness(0).unwrap(),
            current_owner_witness: fx.ownership.witness(0).unwrap(),
            new_owner_witness: fx.ownership.witness(0).unwrap(),
        };
        assert!(matches!(transfer(&fx.state, &req), Err(RegistryError::NotOwner)));
    }

    #[test]
    fn transfer_rejects_forged_write_path() {
        let mut fx = Fixture::new();
        let pass = key(10).public;
        let owner = key(20);
        fx.issue(pass, owner.public);

        let forged = MerkleWitness::new(0, [TreeHash::new([3u8; 32]); 8]).unwrap();
        let req = TransferRequest {
            current_owner_secret: &owner.private,
            new_owner: key(21).public,
            pass,
            validity_witness: fx.validity.witness(0).unwrap(),
            current_owner_witness: fx.ownership.witness(0).unwrap(),
            new_owner_witness: forged,
        };
        assert!(matches!(
            transfer(&fx.state, &req),
            Err(RegistryError::StaleWitness {
                tree: TreeKind::Ownership
            })
        ));
    }

    #[test]
    fn transfer_rejects_owner_witness_for_another_index() {
        let mut fx = Fixture::new();
        let pass = key(10).public;
        let owner = key(20);
        fx.issue(pass, owner.public);
        fx.issue(key(11).public, key(21).public);

        let req = TransferRequest {
            current_owner_secret: &owner.private,
            new_owner: key(22).public,
            pass,
            validity_witness: fx.validity.witness(0).unwrap(),
            current_owner_witness: fx.ownership.witness(1).unwrap(),
            new_owner_witness: fx.ownership.witness(0).unwrap(),
        };
        assert!(matches!(
            transfer(&fx.state, &req),
            Err(RegistryError::IndexMismatch {
                expected: 0,
                actual: 1
            })
        ));
    }

    #[test]
    fn transfer_rejects_write_path_for_another_index() {
        let mut fx = Fixture::new();
        let pass = key(10).public;
        let owner = key(20);
        fx.issue(pass, owner.public);
        fx.issue(key(11).public, key(21).public);

        let req = TransferRequest {
            current_owner_secret: &owner.private,
            new_owner: key(22).public,
            pass,
            validity_witness: fx.validity.witness(0).unwrap(),
            current_owner_witness: fx.ownership.witness(0).unwrap(),
            new_owner_witness: fx.ownership.witness(1).unwrap(),
        };
        assert!(matches!(
            transfer(&fx.state, &req),
            Err(RegistryError::IndexMismatch {
                expected: 0,
                actual: 1
            })
        ));
    }

    #[test]
    fn authenticate_checks_in_order() {
        let mut fx = Fixture::new();
        let pass = key(10).public;
        let owner = key(20);
        fx.issue(pass, owner.public);
        let params = RegistryParams::default();

        // Stale and badly signed: staleness is reported first.
        let mut challenge = fx.challenge(0, pass, &owner, 5);
        challenge.signature = sign_challenge(&pass, BlockHeight::new(6), &owner.private);
        assert!(matches!(
            authenticate(&fx.state, &params, &challenge, BlockHeight::new(100)),
            Err(RegistryError::StaleChallenge { .. })
        ));
        assert!(matches!(
            authenticate(&fx.state, &params, &challenge, BlockHeight::new(10)),
            Err(RegistryError::BadSignature)
        ));

        let ok = authenticate(&fx.state, &params, &fx.challenge(0, pass, &owner, 5), BlockHeight::new(15))
            .unwrap();
        assert_eq!(ok.index, 0);
        assert_eq!(ok.checked_at, BlockHeight::new(15));
    }

    #[test]
    fn authenticate_signed_by_non_owner_is_not_owner() {
        let mut fx = Fixture::new();
        let pass = key(10).public;
        fx.issue(pass, key(20).public);
        let stranger = key(30);

        let challenge = fx.challenge(0, pass, &stranger, 1);
        assert!(matches!(
            authenticate(&fx.state, &RegistryParams::default(), &challenge, BlockHeight::new(1)),
            Err(RegistryError::NotOwner)
        ));
    }

    #[test]
    fn authenticate_accepts_future_heights() {
        let mut fx = Fixture::new();
        let pass = key(10).public;
        let owner = key(20);
        fx.issue(pass, owner.public);

        let challenge = fx.challenge(0, pass, &owner, 1_000_000);
        assert!(authenticate(&fx.state, &RegistryParams::default(), &challenge, BlockHeight::new(3)).is_ok());
    }

    #[test]
    fn possession_check_needs_no_signature() {
        let mut fx = Fixture::new();
        let pass = key(10).public;
        let owner = key(20);
        fx.issue(pass, owner.public);

        let claim = PossessionClaim {
            owner_secret: &owner.private,
            pass,
            validity_witness: fx.validity.witness(0).unwrap(),
            ownership_witness: fx.ownership.witness(0).unwrap(),
        };
        assert_eq!(verify_possession_unprotected(&fx.state, &claim).unwrap(), owner.public);

        let stranger = key(30);
        let claim = PossessionClaim {
            owner_secret: &stranger.private,
            ..claim
        };
        assert!(matches!(
            verify_possession_unprotected(&fx.state, &claim),
            Err(RegistryError::NotOwner)
        ));
    }
}
