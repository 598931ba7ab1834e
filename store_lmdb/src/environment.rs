//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::registry::LmdbRegistryStore;
use crate::LmdbError;

/// Named databases inside the environment.
const MAX_DBS: u32 = 4;
const REGISTRY_DB: &str = "registry";

/// Default map size: the registry record is tiny, 16 MiB leaves ample headroom.
pub const DEFAULT_MAP_SIZE: usize = 16 * 1024 * 1024;

/// Wraps the LMDB environment and its database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    registry_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment directory is owned by this process; the same
        // path is never opened twice within it.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };
        let mut wtxn = env.write_txn()?;
        let registry_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(REGISTRY_DB))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(Self {
            env: Arc::new(env),
            registry_db,
        })
    }

    /// Handle to the registry record.
    pub fn registry_store(&self) -> LmdbRegistryStore {
        LmdbRegistryStore {
            env: Arc::clone(&self.env),
            registry_db: self.registry_db,
        }
    }
}
