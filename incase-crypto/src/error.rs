//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in the encryption layer.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Tag mismatch, wrong key, or a ciphertext that cannot be decrypted.
    ///
    /// Deliberately carries no detail: callers must not be able to tell a
    /// wrong secret apart from tampered data.
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid {field} length: expected {expected}, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
