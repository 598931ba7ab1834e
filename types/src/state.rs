//! The registry state tuple.

use crate::hash::TreeHash;
use crate::keys::PublicKey;
use serde::{Deserialize, Serialize};

/// The authoritative registry state.
///
/// This is everything the registry persists. Which pass sits at which index,
/// and who owns it, is only recoverable from a tree mirror or the event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    /// The only identity allowed to issue passes. Fixed at construction.
    pub authority: PublicKey,
    /// Root of the tree holding `H(pass)` for every issued pass.
    pub validity_root: TreeHash,
    /// Root of the tree holding `H(pass, owner)` at the pass's index.
    pub ownership_root: TreeHash,
    /// The only index issuance may write to next.
    pub next_index: u32,
}

impl RegistryState {
    /// Fresh state: both trees empty, nothing issued.
    pub fn genesis(authority: PublicKey, empty_root: TreeHash) -> Self {
        Self {
            authority,
            validity_root: empty_root,
            ownership_root: empty_root,
            next_index: 0,
        }
    }

    /// Number of passes issued so far.
    pub fn issued(&self) -> u32 {
        self.next_index
    }
}

/// A value tagged with the store version it was read at.
///
/// Every committed transition bumps the version by one, so two writers that
/// read the same version cannot both commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

impl<T> Versioned<T> {
    pub fn new(version: u64, value: T) -> Self {
        Self { version, value }
    }
}
