use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("system randomness unavailable: {0}")]
    Randomness(String),
}
