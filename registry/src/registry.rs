//! The registry service: pure transitions committed through a versioned store.

use std::collections::BTreeMap;

use gatepass_store::{RegistryStore, StoreError};
use gatepass_types::{HeightOracle, PublicKey, RegistryParams, RegistryState, Versioned};
use gatepass_utils::StatsCounter;
use tracing::{debug, info, warn};

use crate::error::RegistryError;
use crate::event::{EventBus, RegistryEvent};
use crate::request::{AuthChallenge, IssueRequest, PossessionClaim, TransferRequest};
use crate::transition::{self, Authenticated, Transition};

/// How many times a write is re-evaluated after losing a commit race.
pub const DEFAULT_MAX_COMMIT_ATTEMPTS: u32 = 8;

const STAT_ISSUED: &str = "issued";
const STAT_TRANSFERRED: &str = "transferred";
const STAT_AUTHENTICATED: &str = "authenticated";
const STAT_REJECTED: &str = "rejected";
const STAT_CONFLICTS: &str = "commit_conflicts";

/// Result of a committed write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Committed {
    /// Store version the new state was written at.
    pub version: u64,
    pub state: RegistryState,
    pub event: RegistryEvent,
}

/// Access-pass registry over a [`RegistryStore`].
///
/// Every write loads the current record, runs the transition against that
/// snapshot and commits with a compare-and-swap on the record version. A
/// write that loses the race is re-evaluated from scratch against the new
/// snapshot, so its witnesses are always checked against the roots it
/// actually replaces.
pub struct Registry<S, H> {
    store: S,
    heights: H,
    params: RegistryParams,
    max_commit_attempts: u32,
    events: EventBus,
    stats: StatsCounter,
}

impl<S: RegistryStore, H: HeightOracle> Registry<S, H> {
    pub fn new(store: S, heights: H, params: RegistryParams) -> Self {
        Self {
            store,
            heights,
            params,
            max_commit_attempts: DEFAULT_MAX_COMMIT_ATTEMPTS,
            events: EventBus::new(),
            stats: StatsCounter::new(&[
                STAT_ISSUED,
                STAT_TRANSFERRED,
                STAT_AUTHENTICATED,
                STAT_REJECTED,
                STAT_CONFLICTS,
            ]),
        }
    }

    /// Clamped to at least one attempt.
    pub fn with_max_commit_attempts(mut self, attempts: u32) -> Self {
        self.max_commit_attempts = attempts.max(1);
        self
    }

    /// Register a listener for committed writes.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&RegistryEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(Box::new(listener));
    }

    pub fn params(&self) -> &RegistryParams {
        &self.params
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn stats(&self) -> BTreeMap<&'static str, u64> {
        self.stats.snapshot()
    }

    /// Write the genesis record: empty trees, counter at zero.
    pub fn initialize(&self, authority: PublicKey) -> Result<Versioned<RegistryState>, RegistryError> {
        let genesis = RegistryState::genesis(authority, gatepass_merkle::empty_root());
        let record = self.store.initialize(&genesis)?;
        info!(%authority, root = %genesis.validity_root, "registry initialized");
        Ok(record)
    }

    /// Current committed state.
    pub fn state(&self) -> Result<Versioned<RegistryState>, RegistryError> {
        self.store.load()?.ok_or(RegistryError::NotInitialized)
    }

    pub fn issue(&self, req: &IssueRequest<'_>) -> Result<Committed, RegistryError> {
        let committed = self.commit("issue", |state| transition::issue(state, &self.params, req))?;
        self.stats.increment(STAT_ISSUED);
        info!(
            index = committed.event.index(),
            pass = %req.pass,
            owner = %req.recipient,
            version = committed.version,
            "pass issued"
        );
        Ok(committed)
    }

    pub fn transfer(&self, req: &TransferRequest<'_>) -> Result<Committed, RegistryError> {
        let committed = self.commit("transfer", |state| transition::transfer(state, req))?;
        self.stats.increment(STAT_TRANSFERRED);
        info!(
            index = committed.event.index(),
            pass = %req.pass,
            new_owner = %req.new_owner,
            version = committed.version,
            "ownership transferred"
        );
        Ok(committed)
    }

    /// Check a challenge against the current state and chain height.
    pub fn authenticate(&self, challenge: &AuthChallenge) -> Result<Authenticated, RegistryError> {
        let record = self.state()?;
        let current = self.heights.current_height();
        match transition::authenticate(&record.value, &self.params, challenge, current) {
            Ok(auth) => {
                self.stats.increment(STAT_AUTHENTICATED);
                debug!(
                    pass = %auth.pass,
                    claimant = %auth.claimant,
                    asserted = %auth.asserted_height,
                    current = %current,
                    "challenge accepted"
                );
                Ok(auth)
            }
            Err(e) => Err(self.rejected("authenticate", e)),
        }
    }

    /// Unsigned possession check. See [`PossessionClaim`] for why this is
    /// replayable.
    pub fn verify_possession_unprotected(
        &self,
        claim: &PossessionClaim<'_>,
    ) -> Result<PublicKey, RegistryError> {
        let record = self.state()?;
        transition::verify_possession_unprotected(&record.value, claim)
            .map_err(|e| self.rejected("verify_possession", e))
    }

    /// Load, transition and compare-and-swap.
    ///
    /// After a lost swap the same submission is validated again against the
    /// newer snapshot. This is re-validation, not a retry: witnesses are never
    /// rebuilt here, so a submission the winning write made stale fails with
    /// its own precondition error.
    fn commit<F>(&self, op: &'static str, apply: F) -> Result<Committed, RegistryError>
    where
        F: Fn(&RegistryState) -> Result<Transition, RegistryError>,
    {
        let mut attempt = 1;
        loop {
            let record = self.state()?;
            let Transition { state, event } =
                apply(&record.value).map_err(|e| self.rejected(op, e))?;

            match self.store.compare_and_swap(record.version, &state) {
                Ok(version) => {
                    self.events.emit(&event);
                    return Ok(Committed {
                        version,
                        state,
                        event,
                    });
                }
                Err(StoreError::Conflict { expected, actual })
                    if attempt < self.max_commit_attempts =>
                {
                    self.stats.increment(STAT_CONFLICTS);
                    debug!(op, attempt, expected, actual, "commit raced, re-evaluating");
                    attempt += 1;
                }
                Err(e) => {
                    warn!(op, attempt, error = %e, "commit failed");
                    return Err(e.into());
                }
            }
        }
    }

    fn rejected(&self, op: &'static str, err: RegistryError) -> RegistryError {
        self.stats.increment(STAT_REJECTED);
        debug!(op, error = %err, "operation rejected");
        err
    }
}
