//! Ed25519 key generation.

use crate::error::CryptoError;
use ed25519_dalek::SigningKey;
use gatepass_types::{KeyPair, PrivateKey, PublicKey};

/// Generate a new Ed25519 key pair from the operating system's RNG.
pub fn generate_keypair() -> Result<KeyPair, CryptoError> {
    let mut seed = [0u8; 32];
    getrandom::getrandom(&mut seed).map_err(|e| CryptoError::Randomness(e.to_string()))?;
    let keypair = keypair_from_seed(&seed);
    seed.fill(0);
    Ok(keypair)
}

/// Derive the public identity of a secret key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    let signing_key = SigningKey::from_bytes(&private.0);
    PublicKey(signing_key.verifying_key().to_bytes())
}

/// Reconstruct a full key pair from a secret key.
pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    let public = public_from_private(&private);
    KeyPair { public, private }
}

/// Derive a key pair from a 32-byte seed (deterministic).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let signing_key = SigningKey::from_bytes(seed);
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}
