//! Ed25519 signing and the authentication challenge encoding.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use gatepass_types::{BlockHeight, PassId, PrivateKey, PublicKey, Signature};

/// Length of the encoded `(pass, height)` challenge.
pub const CHALLENGE_MESSAGE_LEN: usize = 32 + 8;

/// Sign a message with a secret key.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    Signature(signing_key.sign(message).to_bytes())
}

/// Verify a signature against a message and public key.
///
/// Returns `false` for malformed keys as well as bad signatures.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify_strict(message, &dalek_sig).is_ok()
}

/// Ordered encoding of an authentication challenge: pass bytes followed by
/// the asserted height as little-endian `u64`.
pub fn challenge_message(pass: &PassId, height: BlockHeight) -> [u8; CHALLENGE_MESSAGE_LEN] {
    let mut message = [0u8; CHALLENGE_MESSAGE_LEN];
    message[..32].copy_from_slice(pass.as_bytes());
    message[32..].copy_from_slice(&height.as_u64().to_le_bytes());
    message
}

/// Sign `(pass, height)` as the holder of `owner_secret`.
pub fn sign_challenge(pass: &PassId, height: BlockHeight, owner_secret: &PrivateKey) -> Signature {
    sign_message(&challenge_message(pass, height), owner_secret)
}

/// Check a challenge signature produced by [`sign_challenge`].
pub fn verify_challenge(
    pass: &PassId,
    height: BlockHeight,
    signature: &Signature,
    claimant: &PublicKey,
) -> bool {
    verify_signature(&challenge_message(pass, height), signature, claimant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::keypair_from_seed;

    #[test]
    fn sign_and_verify() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let sig = sign_message(b"gatepass", &kp.private);
        assert!(verify_signature(b"gatepass", &sig, &kp.public));
    }

    #[test]
    fn wrong_key_fails() {
        let kp1 = keypair_from_seed(&[1u8; 32]);
        let kp2 = keypair_from_seed(&[2u8; 32]);
        let sig = sign_message(b"test", &kp1.private);
        assert!(!verify_signature(b"test", &sig, &kp2.public));
    }

    #[test]
    fn invalid_public_key() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let sig = sign_message(b"test", &kp.private);
        assert!(!verify_signature(b"test", &sig, &PublicKey([0xFF; 32])));
    }

    #[test]
    fn challenge_layout() {
        let pass = PublicKey([0xAA; 32]);
        let msg = challenge_message(&pass, BlockHeight::new(0x0102));
        assert_eq!(&msg[..32], &[0xAA; 32]);
        assert_eq!(&msg[32..], &[0x02, 0x01, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn challenge_binds_height() {
        let owner = keypair_from_seed(&[3u8; 32]);
        let pass = PublicKey([4u8; 32]);
        let sig = sign_challenge(&pass, BlockHeight::new(50), &owner.private);
        assert!(verify_challenge(&pass, BlockHeight::new(50), &sig, &owner.public));
        assert!(!verify_challenge(&pass, BlockHeight::new(51), &sig, &owner.public));
    }

    #[test]
    fn challenge_binds_pass() {
        let owner = keypair_from_seed(&[3u8; 32]);
        let sig = sign_challenge(&PublicKey([4u8; 32]), BlockHeight::new(50), &owner.private);
        assert!(!verify_challenge(
            &PublicKey([5u8; 32]),
            BlockHeight::new(50),
            &sig,
            &owner.public
        ));
    }
}
