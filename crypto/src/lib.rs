//! Cryptographic primitives for gatepass.
//!
//! - **Ed25519** for identities, authority checks and challenge signatures
//! - **Blake2b-256** as the hash oracle for tree leaves and interior nodes
//!
//! The registry treats both as oracles; nothing outside this crate touches
//! `ed25519-dalek` or `blake2` directly.

pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi, hash_node, hash_ownership, hash_pass};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{
    challenge_message, sign_challenge, sign_message, verify_challenge, verify_signature,
    CHALLENGE_MESSAGE_LEN,
};
