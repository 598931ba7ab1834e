//! Registry state storage trait.

use crate::StoreError;
use gatepass_types::{RegistryState, Versioned};

/// Storage for the single versioned registry record.
///
/// The record is written once by [`initialize`](Self::initialize) and then only
/// through [`compare_and_swap`](Self::compare_and_swap), which must be atomic:
/// of two writers holding the same version, exactly one succeeds.
pub trait RegistryStore {
    /// Current record, or `None` before initialization.
    fn load(&self) -> Result<Option<Versioned<RegistryState>>, StoreError>;

    /// Store the genesis record at version 0.
    ///
    /// Fails with [`StoreError::Duplicate`] if a record already exists.
    fn initialize(&self, state: &RegistryState) -> Result<Versioned<RegistryState>, StoreError>;

    /// Replace the record if it is still at `expected_version`.
    ///
    /// Returns the new version (`expected_version + 1`) or
    /// [`StoreError::Conflict`] if another write got there first.
    fn compare_and_swap(
        &self,
        expected_version: u64,
        state: &RegistryState,
    ) -> Result<u64, StoreError>;

    /// Current record, failing with [`StoreError::NotFound`] before initialization.
    fn load_existing(&self) -> Result<Versioned<RegistryState>, StoreError> {
        self.load()?
            .ok_or_else(|| StoreError::NotFound("registry state".into()))
    }

    fn is_initialized(&self) -> Result<bool, StoreError> {
        self.load().map(|record| record.is_some())
    }
}
