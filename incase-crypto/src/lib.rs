//! Encryption layer for the incase vault.
//!
//! Provides whole-document encryption using:
//! - PBKDF2-HMAC-SHA256 (100,000 iterations) for key derivation from secrets
//! - AES-256-GCM for authenticated encryption
//! - Zeroization of every key and decrypted buffer on drop
//!
//! # Architecture
//!
//! The encryption uses an envelope scheme:
//!
//! 1. **Data Key (DEK)**: A random key generated on every seal. It encrypts
//!    the document and is never stored raw.
//!
//! 2. **Key-Encryption Key (KEK)**: Derived from a human secret (the
//!    passphrase or the recovery key) with a per-wrap salt. It only ever
//!    encrypts the DEK.
//!
//! One seal wraps the same DEK under every configured secret, so either the
//! passphrase or the recovery key alone can open the record.

mod cipher;
mod document;
pub mod encoding;
pub mod envelope;
mod error;
mod key;
pub mod recovery;
mod wrap;

pub use cipher::{decrypt, encrypt, generate_nonce, EncryptedData, NONCE_SIZE, TAG_SIZE};
pub use document::{open_document, seal_document};
pub use envelope::{open_vault, seal_vault, EncryptedVault, KeySlot, OpenedVault, WrappedKeys};
pub use error::{CryptoError, CryptoResult};
pub use key::{derive_key, DataKey, DerivedKey, Salt, KEY_SIZE, PBKDF2_ITERATIONS, SALT_SIZE};
pub use recovery::{generate_recovery_key, is_well_formed_recovery_key, RECOVERY_ALPHABET};
pub use wrap::{unwrap_key, wrap_key, WrappedKey, WRAPPED_KEY_SIZE};
