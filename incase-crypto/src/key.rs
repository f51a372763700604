//! Key material and password-based key derivation.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of every symmetric key in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// Size of a key-derivation salt in bytes.
pub const SALT_SIZE: usize = 16;

/// PBKDF2-HMAC-SHA256 iteration count.
///
/// Fixed: the iteration count is not stored in the vault record, so changing
/// it makes every existing record unreadable.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Random salt fed into key derivation. Unique per wrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    /// Generates a fresh random salt.
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// Key-encryption key derived from a human secret.
///
/// Only ever used to wrap or unwrap a [`DataKey`], never the document.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Random data-encryption key. Regenerated on every seal, never persisted raw.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DataKey([u8; KEY_SIZE]);

impl DataKey {
    /// Generates a fresh random 256-bit key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DataKey([REDACTED])")
    }
}

/// Derives a key-encryption key from `secret` and `salt`.
///
/// PBKDF2-HMAC-SHA256 over the UTF-8 bytes of the secret, no normalization.
/// Deterministic for a given `(secret, salt)` pair.
pub fn derive_key(secret: &str, salt: &Salt) -> DerivedKey {
    derive_key_with_iterations(secret.as_bytes(), salt.as_bytes(), PBKDF2_ITERATIONS)
}

pub(crate) fn derive_key_with_iterations(secret: &[u8], salt: &[u8], rounds: u32) -> DerivedKey {
    let mut out = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(secret, salt, rounds, &mut out);
    let key = DerivedKey(out);
    out.zeroize();
    key
}
