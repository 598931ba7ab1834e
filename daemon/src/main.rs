//! gatepass: command-line access to an LMDB-backed access-pass registry.

mod commands;
mod config;

use clap::Parser;
use gatepass_types::{PrivateKey, PublicKey};
use gatepass_utils::LogFormat;
use std::path::PathBuf;
use zeroize::Zeroizing;

use crate::config::RegistryConfig;

#[derive(Parser)]
#[command(name = "gatepass", about = "Access-pass registry tool")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "GATEPASS_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the registry database and the client mirror.
    #[arg(long, env = "GATEPASS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Blocks a signed challenge stays acceptable for.
    #[arg(long, env = "GATEPASS_REPLAY_WINDOW")]
    replay_window: Option<u64>,

    /// Log format: "human" or "json".
    #[arg(long, env = "GATEPASS_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "GATEPASS_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// A 32-byte seed, as 64 hex characters. Cleared on drop.
#[derive(Clone)]
struct Seed(Zeroizing<[u8; 32]>);

impl std::str::FromStr for Seed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = PrivateKey::from_hex(s).map_err(|e| format!("invalid seed: {e}"))?;
        Ok(Self(Zeroizing::new(key.0)))
    }
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print a fresh key seed and its public identity.
    Keygen,

    /// Create an empty registry controlled by the authority key.
    Init {
        #[arg(long, env = "GATEPASS_AUTHORITY_SEED", hide_env_values = true)]
        authority_seed: Seed,
    },

    /// Issue a pass to a recipient at the next free index.
    Issue {
        #[arg(long, env = "GATEPASS_AUTHORITY_SEED", hide_env_values = true)]
        authority_seed: Seed,
        #[arg(long)]
        recipient: PublicKey,
        #[arg(long)]
        pass: PublicKey,
    },

    /// Transfer a pass from its current owner to a new one.
    Transfer {
        #[arg(long, env = "GATEPASS_OWNER_SEED", hide_env_values = true)]
        owner_seed: Seed,
        #[arg(long)]
        new_owner: PublicKey,
        #[arg(long)]
        pass: PublicKey,
    },

    /// Sign a challenge for a pass and check it against the registry.
    Authenticate {
        #[arg(long, env = "GATEPASS_OWNER_SEED", hide_env_values = true)]
        owner_seed: Seed,
        #[arg(long)]
        pass: PublicKey,
        /// Height the challenge is signed for (defaults to the current height).
        #[arg(long)]
        asserted_height: Option<u64>,
        /// Chain height the check runs at.
        #[arg(long)]
        current_height: u64,
    },

    /// Unsigned possession check. Replayable; prefer `authenticate`.
    Possess {
        #[arg(long, env = "GATEPASS_OWNER_SEED", hide_env_values = true)]
        owner_seed: Seed,
        #[arg(long)]
        pass: PublicKey,
    },

    /// Show the committed state and whether the local mirror matches it.
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = match cli.config {
        Some(ref path) => RegistryConfig::from_toml_file(path)?,
        None => RegistryConfig::default(),
    };
    let config = RegistryConfig {
        data_dir: cli.data_dir.unwrap_or(file_config.data_dir),
        replay_window: cli.replay_window.unwrap_or(file_config.replay_window),
        log_format: cli.log_format.unwrap_or(file_config.log_format),
        log_level: cli.log_level.unwrap_or(file_config.log_level),
        ..file_config
    };

    gatepass_utils::init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::debug!(path = %path.display(), "loaded config file");
    }

    match cli.command {
        Command::Keygen => commands::keygen(),
        Command::Init { authority_seed } => commands::init(&config, &authority_seed.0),
        Command::Issue {
            authority_seed,
            recipient,
            pass,
        } => commands::issue(&config, &authority_seed.0, recipient, pass),
        Command::Transfer {
            owner_seed,
            new_owner,
            pass,
        } => commands::transfer(&config, &owner_seed.0, new_owner, pass),
        Command::Authenticate {
            owner_seed,
            pass,
            asserted_height,
            current_height,
        } => commands::authenticate(
            &config,
            &owner_seed.0,
            pass,
            asserted_height.unwrap_or(current_height),
            current_height,
        ),
        Command::Possess { owner_seed, pass } => commands::possess(&config, &owner_seed.0, pass),
        Command::Status => commands::status(&config),
    }
}
