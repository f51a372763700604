//! Vault error types.

use crate::session::UnlockMode;
use thiserror::Error;

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors that can occur in the vault lifecycle.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("passphrase too short (min 8 characters)")]
    PassphraseTooShort,

    #[error("passphrases do not match")]
    PassphraseMismatch,

    /// Neither wrapped key opened with the supplied secret.
    ///
    /// The message depends only on the mode the caller chose, never on which
    /// slot was tried or whether the record looked damaged.
    #[error("{}", mode.failure_message())]
    AuthenticationFailed { mode: UnlockMode },

    #[error("vault record is corrupt: {0}")]
    CorruptRecord(String),

    #[error("invalid plan document: {0}")]
    InvalidDocument(String),

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("no vault exists")]
    NoVault,

    #[error("vault already initialized")]
    AlreadyInitialized,

    #[error("vault is locked")]
    Locked,

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("reset cancelled")]
    ResetCancelled,
}

/// Coarse error categories a caller reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; re-prompt.
    Validation,
    /// Wrong secret or tampered record; re-prompt with no hint.
    Authentication,
    /// The persisted record is unreadable; only reset or a backup helps.
    CorruptRecord,
    /// Storage or crypto backend failure; nothing was committed.
    Fatal,
    /// Operation not allowed in the current lifecycle state.
    State,
}

impl VaultError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PassphraseTooShort | Self::PassphraseMismatch | Self::InvalidDocument(_) => {
                ErrorKind::Validation
            }
            Self::AuthenticationFailed { .. } => ErrorKind::Authentication,
            Self::CorruptRecord(_) => ErrorKind::CorruptRecord,
            Self::Crypto(_) | Self::Storage(_) => ErrorKind::Fatal,
            Self::NoVault
            | Self::AlreadyInitialized
            | Self::Locked
            | Self::InvalidState(_)
            | Self::ResetCancelled => ErrorKind::State,
        }
    }
}
