//! LMDB implementation of RegistryStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use gatepass_store::{RegistryStore, StoreError};
use gatepass_types::{RegistryState, Versioned};

use crate::LmdbError;

const STATE_KEY: &[u8] = b"registry_state";

pub struct LmdbRegistryStore {
    pub(crate) env: Arc<Env>,
    pub(crate) registry_db: Database<Bytes, Bytes>,
}

fn decode(bytes: &[u8]) -> Result<Versioned<RegistryState>, LmdbError> {
    bincode::deserialize(bytes).map_err(|e| LmdbError::Serialization(e.to_string()))
}

fn encode(record: &Versioned<RegistryState>) -> Result<Vec<u8>, LmdbError> {
    bincode::serialize(record).map_err(|e| LmdbError::Serialization(e.to_string()))
}

impl RegistryStore for LmdbRegistryStore {
    fn load(&self) -> Result<Option<Versioned<RegistryState>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let record = self
            .registry_db
            .get(&rtxn, STATE_KEY)
            .map_err(LmdbError::from)?
            .map(decode)
            .transpose()?;
        Ok(record)
    }

    fn initialize(&self, state: &RegistryState) -> Result<Versioned<RegistryState>, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let existing = self
            .registry_db
            .get(&wtxn, STATE_KEY)
            .map_err(LmdbError::from)?
            .is_some();
        if existing {
            return Err(StoreError::Duplicate("registry state".into()));
        }
        let record = Versioned::new(0, state.clone());
        self.registry_db
            .put(&mut wtxn, STATE_KEY, &encode(&record)?)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(record)
    }

    fn compare_and_swap(
        &self,
        expected_version: u64,
        state: &RegistryState,
    ) -> Result<u64, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let current = match self
            .registry_db
            .get(&wtxn, STATE_KEY)
            .map_err(LmdbError::from)?
        {
            Some(bytes) => decode(bytes)?,
            None => return Err(StoreError::NotFound("registry state".into())),
        };
        if current.version != expected_version {
            // Dropping the write transaction aborts it.
            return Err(StoreError::Conflict {
                expected: expected_version,
                actual: current.version,
            });
        }
        let version = expected_version
            .checked_add(1)
            .ok_or_else(|| StoreError::Corruption("registry version overflow".into()))?;
        let record = Versioned::new(version, state.clone());
        self.registry_db
            .put(&mut wtxn, STATE_KEY, &encode(&record)?)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(version)
    }
}
