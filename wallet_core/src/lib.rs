//! Client side of the access-pass registry.
//!
//! The registry only commits to tree roots. [`RegistryMirror`] keeps the full
//! trees by replaying committed [`RegistryEvent`]s and builds the witnesses
//! and signed challenges that registry operations take as input.
//!
//! [`RegistryEvent`]: gatepass_registry::RegistryEvent

pub mod error;
pub mod mirror;
pub mod persist;

pub use error::WalletError;
pub use mirror::{MirrorEntry, PassWitnesses, RegistryMirror, TransferWitnesses};
pub use persist::{load_mirror, save_mirror};
