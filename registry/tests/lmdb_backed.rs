mod common;

use common::key;
use gatepass_nullables::NullHeight;
use gatepass_registry::{Registry, RegistryError};
use gatepass_store_lmdb::{LmdbEnvironment, DEFAULT_MAP_SIZE};
use gatepass_types::RegistryParams;
use gatepass_wallet::RegistryMirror;

#[test]
fn state_survives_reopening_the_environment() {
    let dir = tempfile::tempdir().unwrap();
    let authority = key(1);
    let owner = key(20);
    let pass = key(10).public;
    let mut mirror = RegistryMirror::new();

    {
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        let registry = Registry::new(env.registry_store(), NullHeight::new(7), RegistryParams::default());
        registry.initialize(authority.public).unwrap();
        let req = mirror
            .issue_request(owner.public, pass, &authority.private)
            .unwrap();
        let committed = registry.issue(&req).unwrap();
        mirror.apply(&committed.event).unwrap();
    }

    let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
    let registry = Registry::new(env.registry_store(), NullHeight::new(7), RegistryParams::default());
    let state = registry.state().unwrap();
    assert_eq!(state.version, 1);
    mirror.check_against(&state.value).unwrap();

    let challenge = mirror.auth_challenge(pass, &owner, 7u64.into()).unwrap();
    registry.authenticate(&challenge).unwrap();

    let stranger = key(30);
    let challenge = mirror.auth_challenge(pass, &stranger, 7u64.into()).unwrap();
    assert!(matches!(
        registry.authenticate(&challenge),
        Err(RegistryError::NotOwner)
    ));
}
