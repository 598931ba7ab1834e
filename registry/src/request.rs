//! Operation inputs.
//!
//! Secrets are borrowed: the registry derives public identities from them and
//! never keeps them.

use gatepass_merkle::MerkleWitness;
use gatepass_types::{BlockHeight, PassId, PrivateKey, PublicKey, Signature};

/// Authority-signed issuance of `pass` to `recipient` at the next free index.
pub struct IssueRequest<'a> {
    pub recipient: PublicKey,
    pub pass: PassId,
    pub authority_secret: &'a PrivateKey,
    /// Path to the next free slot in the validity tree.
    pub validity_witness: MerkleWitness,
    /// Path to the same slot in the ownership tree.
    pub ownership_witness: MerkleWitness,
}

/// Owner-signed re-keying of one ownership leaf.
pub struct TransferRequest<'a> {
    pub current_owner_secret: &'a PrivateKey,
    pub new_owner: PublicKey,
    pub pass: PassId,
    /// Proves `H(pass)` is in the validity tree.
    pub validity_witness: MerkleWitness,
    /// Proves `H(pass, current owner)` is in the ownership tree.
    pub current_owner_witness: MerkleWitness,
    /// Path the new ownership leaf is written through.
    pub new_owner_witness: MerkleWitness,
}

/// A signed, height-stamped claim to currently own a valid pass.
#[derive(Clone, Debug)]
pub struct AuthChallenge {
    pub claimant: PublicKey,
    pub asserted_height: BlockHeight,
    pub pass: PassId,
    /// Claimant's signature over `(pass, asserted_height)`.
    pub signature: Signature,
    pub validity_witness: MerkleWitness,
    pub ownership_witness: MerkleWitness,
}

/// Bare possession claim without signature or height.
///
/// Anyone who has seen the owner's secret once, or a transcript of a past
/// check, can replay it. Use [`AuthChallenge`] wherever replay matters.
pub struct PossessionClaim<'a> {
    pub owner_secret: &'a PrivateKey,
    pub pass: PassId,
    pub validity_witness: MerkleWitness,
    pub ownership_witness: MerkleWitness,
}
