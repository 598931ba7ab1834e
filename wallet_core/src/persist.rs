//! Mirror file I/O.

use std::path::Path;

use crate::error::WalletError;
use crate::mirror::RegistryMirror;

/// Write the mirror as pretty JSON, replacing any existing file.
pub fn save_mirror(mirror: &RegistryMirror, path: &Path) -> Result<(), WalletError> {
    let json = serde_json::to_string_pretty(mirror)
        .map_err(|e| WalletError::Format(format!("JSON serialization failed: {e}")))?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json)
        .map_err(|e| WalletError::Io(format!("failed to write {}: {e}", tmp.display())))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| WalletError::Io(format!("failed to replace {}: {e}", path.display())))?;
    Ok(())
}

/// Read a mirror file, or start empty if there is none yet.
pub fn load_mirror(path: &Path) -> Result<RegistryMirror, WalletError> {
    if !path.exists() {
        return Ok(RegistryMirror::new());
    }
    let json = std::fs::read_to_string(path)
        .map_err(|e| WalletError::Io(format!("failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&json).map_err(|e| WalletError::Format(e.to_string()))
}
