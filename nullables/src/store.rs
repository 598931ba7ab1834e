//! Nullable store: thread-safe in-memory registry record for testing.

use gatepass_store::{RegistryStore, StoreError};
use gatepass_types::{RegistryState, Versioned};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// An in-memory [`RegistryStore`].
///
/// The compare-and-swap runs under one mutex, which is all the atomicity the
/// registry needs. Counts committed swaps so tests can assert that a rejected
/// operation never wrote.
pub struct NullStore {
    record: Mutex<Option<Versioned<RegistryState>>>,
    commits: AtomicUsize,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            record: Mutex::new(None),
            commits: AtomicUsize::new(0),
        }
    }

    /// Number of successful compare-and-swaps so far.
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Versioned<RegistryState>>>, StoreError> {
        self.record
            .lock()
            .map_err(|_| StoreError::Backend("null store mutex poisoned".into()))
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryStore for NullStore {
    fn load(&self) -> Result<Option<Versioned<RegistryState>>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn initialize(&self, state: &RegistryState) -> Result<Versioned<RegistryState>, StoreError> {
        let mut record = self.lock()?;
        if record.is_some() {
            return Err(StoreError::Duplicate("registry state".into()));
        }
        let genesis = Versioned::new(0, state.clone());
        *record = Some(genesis.clone());
        Ok(genesis)
    }

    fn compare_and_swap(
        &self,
        expected_version: u64,
        state: &RegistryState,
    ) -> Result<u64, StoreError> {
        let mut record = self.lock()?;
        let current = record
            .as_mut()
            .ok_or_else(|| StoreError::NotFound("registry state".into()))?;
        if current.version != expected_version {
            return Err(StoreError::Conflict {
                expected: expected_version,
                actual: current.version,
            });
        }
        current.version += 1;
        current.value = state.clone();
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(current.version)
    }
}
