#![allow(dead_code)]

use std::sync::Arc;

use gatepass_crypto::keypair_from_seed;
use gatepass_nullables::{NullHeight, NullStore};
use gatepass_registry::{Committed, Registry, RegistryError};
use gatepass_types::{BlockHeight, KeyPair, PassId, PublicKey, RegistryParams};
use gatepass_wallet::RegistryMirror;

pub fn key(seed: u8) -> KeyPair {
    keypair_from_seed(&[seed; 32])
}

pub fn key_n(n: u32) -> KeyPair {
    let mut seed = [0xA5u8; 32];
    seed[..4].copy_from_slice(&n.to_le_bytes());
    keypair_from_seed(&seed)
}

/// A registry over in-memory nullables plus a client mirror kept in step.
pub struct Harness {
    pub authority: KeyPair,
    pub heights: Arc<NullHeight>,
    pub registry: Registry<NullStore, Arc<NullHeight>>,
    pub mirror: RegistryMirror,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_params(RegistryParams::default())
    }

    pub fn with_params(params: RegistryParams) -> Self {
        let authority = key(1);
        let heights = Arc::new(NullHeight::new(100));
        let registry = Registry::new(NullStore::new(), Arc::clone(&heights), params);
        registry.initialize(authority.public).unwrap();
        Self {
            authority,
            heights,
            registry,
            mirror: RegistryMirror::new(),
        }
    }

    pub fn now(&self) -> BlockHeight {
        use gatepass_types::HeightOracle;
        self.heights.current_height()
    }

    pub fn issue(&mut self, pass: PassId, owner: PublicKey) -> Result<Committed, RegistryError> {
        let req = self
            .mirror
            .issue_request(owner, pass, &self.authority.private)
            .unwrap();
        let committed = self.registry.issue(&req)?;
        self.mirror.apply(&committed.event).unwrap();
        Ok(committed)
    }

    pub fn transfer(
        &mut self,
        pass: PassId,
        owner: &KeyPair,
        new_owner: PublicKey,
    ) -> Result<Committed, RegistryError> {
        let req = self
            .mirror
            .transfer_request(pass, &owner.private, new_owner)
            .unwrap();
        let committed = self.registry.transfer(&req)?;
        self.mirror.apply(&committed.event).unwrap();
        Ok(committed)
    }

    pub fn authenticate_now(&self, pass: PassId, claimant: &KeyPair) -> Result<(), RegistryError> {
        let challenge = self
            .mirror
            .auth_challenge(pass, claimant, self.now())
            .unwrap();
        self.registry.authenticate(&challenge).map(|_| ())
    }

    pub fn assert_in_sync(&self) {
        let state = self.registry.state().unwrap().value;
        self.mirror.check_against(&state).unwrap();
    }
}
