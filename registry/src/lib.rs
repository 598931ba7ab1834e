//! Access-pass registry.
//!
//! The registry commits to two fixed-depth Merkle trees and a counter:
//! - the **validity** tree holds `H(pass)` for every pass the authority issued
//! - the **ownership** tree holds `H(pass, owner)` at the same index
//! - `next_index` is the only slot issuance may write
//!
//! It never stores the trees. Callers bring a witness for every leaf an
//! operation reads or replaces, and every witness is checked against the roots
//! the registry holds at commit time.
//!
//! [`transition`] holds the pure state transitions; [`Registry`] wraps them in
//! optimistic read-verify-commit transactions over a [`RegistryStore`].
//!
//! [`RegistryStore`]: gatepass_store::RegistryStore

pub mod error;
pub mod event;
pub mod registry;
pub mod request;
pub mod transition;

pub use error::{RegistryError, TreeKind};
pub use event::{EventBus, RegistryEvent};
pub use registry::{Committed, Registry, DEFAULT_MAX_COMMIT_ATTEMPTS};
pub use request::{AuthChallenge, IssueRequest, PossessionClaim, TransferRequest};
pub use transition::{Authenticated, Transition};
