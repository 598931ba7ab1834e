//! Subcommand implementations.
//!
//! Every command opens the registry fresh, runs one operation and, for
//! writes, replays the committed event into the mirror file.

use anyhow::{bail, Context};
use gatepass_crypto::{generate_keypair, keypair_from_seed};
use gatepass_registry::{Committed, Registry};
use gatepass_store_lmdb::{LmdbEnvironment, LmdbRegistryStore};
use gatepass_types::{BlockHeight, FixedHeight, PublicKey};
use gatepass_wallet::{load_mirror, save_mirror, RegistryMirror};
use tracing::{info, warn};

use crate::config::RegistryConfig;

type CliRegistry = Registry<LmdbRegistryStore, FixedHeight>;

fn open(config: &RegistryConfig, height: BlockHeight) -> anyhow::Result<CliRegistry> {
    let env = LmdbEnvironment::open(&config.lmdb_dir(), config.map_size)
        .with_context(|| format!("opening registry at {}", config.lmdb_dir().display()))?;
    Ok(
        Registry::new(env.registry_store(), FixedHeight(height), config.params())
            .with_max_commit_attempts(config.max_commit_attempts),
    )
}

/// Load the mirror and refuse to build witnesses from one that has drifted.
fn synced_mirror(config: &RegistryConfig, registry: &CliRegistry) -> anyhow::Result<RegistryMirror> {
    let mirror = load_mirror(&config.mirror_path())?;
    let state = registry.state()?;
    mirror
        .check_against(&state.value)
        .context("local mirror does not match the registry")?;
    Ok(mirror)
}

/// Replay a committed event into the mirror file.
///
/// The registry write has already happened when this runs. If the mirror
/// cannot be updated, the event is logged in full so it can be replayed by
/// hand.
fn record_commit(
    config: &RegistryConfig,
    mirror: &mut RegistryMirror,
    committed: &Committed,
) -> anyhow::Result<()> {
    let path = config.mirror_path();
    let result = mirror
        .apply(&committed.event)
        .and_then(|()| save_mirror(mirror, &path));
    if let Err(e) = &result {
        warn!(
            version = committed.version,
            event = ?committed.event,
            mirror = %path.display(),
            error = %e,
            "registry committed but the mirror was not updated"
        );
    }
    result.with_context(|| format!("updating mirror at {}", path.display()))
}

pub fn keygen() -> anyhow::Result<()> {
    let pair = generate_keypair()?;
    println!("seed:     {}", hex::encode(pair.private.0));
    println!("identity: {}", pair.public);
    Ok(())
}

pub fn init(config: &RegistryConfig, authority_seed: &[u8; 32]) -> anyhow::Result<()> {
    let authority = keypair_from_seed(authority_seed);
    let registry = open(config, BlockHeight::GENESIS)?;
    let genesis = registry.initialize(authority.public)?;
    save_mirror(&RegistryMirror::new(), &config.mirror_path())?;
    info!(authority = %authority.public, data_dir = %config.data_dir.display(), "registry created");
    println!("authority:     {}", authority.public);
    println!("validity root: {}", genesis.value.validity_root);
    Ok(())
}

pub fn issue(
    config: &RegistryConfig,
    authority_seed: &[u8; 32],
    recipient: PublicKey,
    pass: PublicKey,
) -> anyhow::Result<()> {
    let authority = keypair_from_seed(authority_seed);
    let registry = open(config, BlockHeight::GENESIS)?;
    let mut mirror = synced_mirror(config, &registry)?;

    let req = mirror.issue_request(recipient, pass, &authority.private)?;
    let committed = registry.issue(&req)?;
    record_commit(config, &mut mirror, &committed)?;

    println!("issued pass {pass} at index {}", committed.event.index());
    Ok(())
}

pub fn transfer(
    config: &RegistryConfig,
    owner_seed: &[u8; 32],
    new_owner: PublicKey,
    pass: PublicKey,
) -> anyhow::Result<()> {
    let owner = keypair_from_seed(owner_seed);
    let registry = open(config, BlockHeight::GENESIS)?;
    let mut mirror = synced_mirror(config, &registry)?;

    let req = mirror.transfer_request(pass, &owner.private, new_owner)?;
    let committed = registry.transfer(&req)?;
    record_commit(config, &mut mirror, &committed)?;

    println!("pass {pass} now owned by {new_owner}");
    Ok(())
}

pub fn authenticate(
    config: &RegistryConfig,
    owner_seed: &[u8; 32],
    pass: PublicKey,
    asserted_height: u64,
    current_height: u64,
) -> anyhow::Result<()> {
    let owner = keypair_from_seed(owner_seed);
    let registry = open(config, BlockHeight::new(current_height))?;
    let mirror = synced_mirror(config, &registry)?;

    let challenge = mirror.auth_challenge(pass, &owner, BlockHeight::new(asserted_height))?;
    let auth = registry.authenticate(&challenge)?;
    println!(
        "{} owns pass {} (index {}, signed at {}, checked at {})",
        auth.claimant, auth.pass, auth.index, auth.asserted_height, auth.checked_at
    );
    Ok(())
}

pub fn possess(config: &RegistryConfig, owner_seed: &[u8; 32], pass: PublicKey) -> anyhow::Result<()> {
    let owner = keypair_from_seed(owner_seed);
    let registry = open(config, BlockHeight::GENESIS)?;
    let mirror = synced_mirror(config, &registry)?;

    warn!("possession check is not replay-protected");
    let claim = mirror.possession_claim(pass, &owner.private)?;
    let holder = registry.verify_possession_unprotected(&claim)?;
    println!("{holder} holds pass {pass}");
    Ok(())
}

pub fn status(config: &RegistryConfig) -> anyhow::Result<()> {
    let registry = open(config, BlockHeight::GENESIS)?;
    let record = registry.state()?;
    let state = &record.value;
    let params = registry.params();

    println!("version:        {}", record.version);
    println!("authority:      {}", state.authority);
    println!("issued:         {} / {}", state.issued(), params.effective_capacity());
    println!("validity root:  {}", state.validity_root);
    println!("ownership root: {}", state.ownership_root);
    println!("replay window:  {}", params.replay_window);

    let mirror = load_mirror(&config.mirror_path())?;
    match mirror.check_against(state) {
        Ok(()) => println!("mirror:         in sync ({} passes)", mirror.entries().len()),
        Err(e) => {
            println!("mirror:         {e}");
            bail!("mirror at {} is out of sync", config.mirror_path().display());
        }
    }
    Ok(())
}
