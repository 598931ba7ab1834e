//! Full copies of the registry trees, kept in step by replaying events.

use gatepass_crypto::{hash_ownership, hash_pass, public_from_private, sign_challenge};
use gatepass_merkle::{MerkleTree, MerkleWitness};
use gatepass_registry::{
    AuthChallenge, IssueRequest, PossessionClaim, RegistryEvent, TransferRequest, TreeKind,
};
use gatepass_types::{BlockHeight, KeyPair, PassId, PrivateKey, PublicKey, RegistryState};
use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// One issued pass and its current owner. The entry's position is its index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorEntry {
    pub pass: PassId,
    pub owner: PublicKey,
}

/// Validity and ownership paths to the same index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassWitnesses {
    pub validity: MerkleWitness,
    pub ownership: MerkleWitness,
}

/// Witnesses for a transfer: both ownership paths are the live path to the
/// pass's slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferWitnesses {
    pub validity: MerkleWitness,
    pub current_owner: MerkleWitness,
    pub new_owner: MerkleWitness,
}

#[derive(Serialize, Deserialize)]
struct MirrorFile {
    entries: Vec<MirrorEntry>,
}

/// Client-side mirror of the registry.
///
/// Only the entry list is persisted; the trees are rebuilt from it on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "MirrorFile", into = "MirrorFile")]
pub struct RegistryMirror {
    entries: Vec<MirrorEntry>,
    validity: MerkleTree,
    ownership: MerkleTree,
}

impl TryFrom<MirrorFile> for RegistryMirror {
    type Error = WalletError;

    fn try_from(file: MirrorFile) -> Result<Self, Self::Error> {
        Self::from_entries(file.entries)
    }
}

impl From<RegistryMirror> for MirrorFile {
    fn from(mirror: RegistryMirror) -> Self {
        MirrorFile {
            entries: mirror.entries,
        }
    }
}

impl Default for RegistryMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryMirror {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            validity: MerkleTree::new(),
            ownership: MerkleTree::new(),
        }
    }

    /// Rebuild the trees from entries listed in index order.
    pub fn from_entries(entries: Vec<MirrorEntry>) -> Result<Self, WalletError> {
        let mut validity = Vec::with_capacity(entries.len());
        let mut ownership = Vec::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if entries[..position].iter().any(|e| e.pass == entry.pass) {
                return Err(WalletError::DuplicatePass(entry.pass));
            }
            validity.push(hash_pass(&entry.pass));
            ownership.push(hash_ownership(&entry.pass, &entry.owner));
        }
        Ok(Self {
            validity: MerkleTree::from_leaves(&validity)?,
            ownership: MerkleTree::from_leaves(&ownership)?,
            entries,
        })
    }

    pub fn entries(&self) -> &[MirrorEntry] {
        &self.entries
    }

    /// Index the next issuance will occupy.
    pub fn next_index(&self) -> u32 {
        self.entries.len() as u32
    }

    pub fn validity_root(&self) -> gatepass_types::TreeHash {
        self.validity.root()
    }

    pub fn ownership_root(&self) -> gatepass_types::TreeHash {
        self.ownership.root()
    }

    pub fn index_of(&self, pass: &PassId) -> Option<u32> {
        self.entries
            .iter()
            .position(|e| &e.pass == pass)
            .map(|i| i as u32)
    }

    pub fn owner_of(&self, pass: &PassId) -> Option<PublicKey> {
        self.entries.iter().find(|e| &e.pass == pass).map(|e| e.owner)
    }

    fn require_index(&self, pass: &PassId) -> Result<u32, WalletError> {
        self.index_of(pass).ok_or(WalletError::UnknownPass(*pass))
    }

    /// Current paths to any slot, issued or not.
    pub fn witnesses_at(&self, index: u32) -> Result<PassWitnesses, WalletError> {
        Ok(PassWitnesses {
            validity: self.validity.witness(index)?,
            ownership: self.ownership.witness(index)?,
        })
    }

    /// Paths to the next free slot. Fails once every slot is taken.
    pub fn issue_witnesses(&self) -> Result<PassWitnesses, WalletError> {
        self.witnesses_at(self.next_index())
    }

    /// Paths to an issued pass, for authentication or possession checks.
    pub fn pass_witnesses(&self, pass: &PassId) -> Result<PassWitnesses, WalletError> {
        self.witnesses_at(self.require_index(pass)?)
    }

    pub fn transfer_witnesses(&self, pass: &PassId) -> Result<TransferWitnesses, WalletError> {
        let PassWitnesses {
            validity,
            ownership,
        } = self.pass_witnesses(pass)?;
        Ok(TransferWitnesses {
            validity,
            current_owner: ownership.clone(),
            new_owner: ownership,
        })
    }

    pub fn issue_request<'a>(
        &self,
        recipient: PublicKey,
        pass: PassId,
        authority_secret: &'a PrivateKey,
    ) -> Result<IssueRequest<'a>, WalletError> {
        if self.index_of(&pass).is_some() {
            return Err(WalletError::DuplicatePass(pass));
        }
        let witnesses = self.issue_witnesses()?;
        Ok(IssueRequest {
            recipient,
            pass,
            authority_secret,
            validity_witness: witnesses.validity,
            ownership_witness: witnesses.ownership,
        })
    }

    pub fn transfer_request<'a>(
        &self,
        pass: PassId,
        current_owner_secret: &'a PrivateKey,
        new_owner: PublicKey,
    ) -> Result<TransferRequest<'a>, WalletError> {
        let witnesses = self.transfer_witnesses(&pass)?;
        Ok(TransferRequest {
            current_owner_secret,
            new_owner,
            pass,
            validity_witness: witnesses.validity,
            current_owner_witness: witnesses.current_owner,
            new_owner_witness: witnesses.new_owner,
        })
    }

    /// Sign `(pass, height)` with the owner's key and attach the paths.
    pub fn auth_challenge(
        &self,
        pass: PassId,
        owner: &KeyPair,
        height: BlockHeight,
    ) -> Result<AuthChallenge, WalletError> {
        let witnesses = self.pass_witnesses(&pass)?;
        Ok(AuthChallenge {
            claimant: owner.public,
            asserted_height: height,
            pass,
            signature: sign_challenge(&pass, height, &owner.private),
            validity_witness: witnesses.validity,
            ownership_witness: witnesses.ownership,
        })
    }

    pub fn possession_claim<'a>(
        &self,
        pass: PassId,
        owner_secret: &'a PrivateKey,
    ) -> Result<PossessionClaim<'a>, WalletError> {
        let witnesses = self.pass_witnesses(&pass)?;
        Ok(PossessionClaim {
            owner_secret,
            pass,
            validity_witness: witnesses.validity,
            ownership_witness: witnesses.ownership,
        })
    }

    /// Replay one committed event.
    pub fn apply(&mut self, event: &RegistryEvent) -> Result<(), WalletError> {
        match *event {
            RegistryEvent::PassIssued { index, pass, owner } => {
                let expected = self.next_index();
                if index != expected {
                    return Err(WalletError::OutOfOrder {
                        expected,
                        actual: index,
                    });
                }
                if self.index_of(&pass).is_some() {
                    return Err(WalletError::DuplicatePass(pass));
                }
                self.validity.set_leaf(index, hash_pass(&pass))?;
                self.ownership.set_leaf(index, hash_ownership(&pass, &owner))?;
                self.entries.push(MirrorEntry { pass, owner });
            }
            RegistryEvent::OwnershipTransferred {
                index,
                pass,
                new_owner,
                ..
            } => {
                if self.require_index(&pass)? != index {
                    return Err(WalletError::UnknownPass(pass));
                }
                self.ownership
                    .set_leaf(index, hash_ownership(&pass, &new_owner))?;
                self.entries[index as usize].owner = new_owner;
            }
        }
        Ok(())
    }

    /// Compare the mirror's roots with a committed registry state.
    pub fn check_against(&self, state: &RegistryState) -> Result<(), WalletError> {
        if self.validity.root() != state.validity_root {
            return Err(WalletError::OutOfSync {
                tree: TreeKind::Validity,
            });
        }
        if self.ownership.root() != state.ownership_root {
            return Err(WalletError::OutOfSync {
                tree: TreeKind::Ownership,
            });
        }
        Ok(())
    }

    /// Whether `secret` controls the current owner key of `pass`.
    pub fn is_owned_by(&self, pass: &PassId, secret: &PrivateKey) -> bool {
        self.owner_of(pass) == Some(public_from_private(secret))
    }
}
