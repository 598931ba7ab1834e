//! Events emitted when a transition commits.
//!
//! The registry keeps only roots, so these events are the log a client
//! replays to rebuild "which pass is at which index, and who owns it".

use gatepass_types::{PassId, PublicKey};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// A pass was appended at `index` and claimed by `owner`.
    PassIssued {
        index: u32,
        pass: PassId,
        owner: PublicKey,
    },
    /// The ownership leaf at `index` was re-keyed.
    OwnershipTransferred {
        index: u32,
        pass: PassId,
        previous_owner: PublicKey,
        new_owner: PublicKey,
    },
}

impl RegistryEvent {
    pub fn index(&self) -> u32 {
        match self {
            Self::PassIssued { index, .. } | Self::OwnershipTransferred { index, .. } => *index,
        }
    }

    pub fn pass(&self) -> &PassId {
        match self {
            Self::PassIssued { pass, .. } | Self::OwnershipTransferred { pass, .. } => pass,
        }
    }
}

type Listener = Box<dyn Fn(&RegistryEvent) + Send + Sync>;

/// Synchronous fan-out of committed events.
///
/// Listeners run inline on the committing thread, after the commit.
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &RegistryEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
