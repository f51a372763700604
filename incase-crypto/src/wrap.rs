//! Wrapping a data-encryption key under a secret-derived key.
//!
//! Each wrap draws its own salt and IV, so wrapping the same DEK under the
//! same secret twice yields two unrelated records.

use crate::cipher::{decrypt, encrypt, EncryptedData, NONCE_SIZE, TAG_SIZE};
use crate::error::{CryptoError, CryptoResult};
use crate::key::{derive_key, DataKey, Salt, KEY_SIZE, SALT_SIZE};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

/// Exact size of a wrapped DEK: the raw key plus the GCM tag.
pub const WRAPPED_KEY_SIZE: usize = KEY_SIZE + TAG_SIZE;

/// One DEK encrypted under one key-encryption key. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedKey {
    #[serde(with = "crate::encoding::array")]
    pub salt: [u8; SALT_SIZE],
    #[serde(with = "crate::encoding::array")]
    pub iv: [u8; NONCE_SIZE],
    #[serde(with = "crate::encoding::bytes")]
    pub blob: Vec<u8>,
}

impl WrappedKey {
    /// Rejects a blob whose length cannot hold a wrapped 256-bit key.
    pub fn validate(&self) -> CryptoResult<()> {
        if self.blob.len() != WRAPPED_KEY_SIZE {
            return Err(CryptoError::InvalidLength {
                field: "blob",
                expected: WRAPPED_KEY_SIZE,
                actual: self.blob.len(),
            });
        }
        Ok(())
    }
}

/// Wraps `dek` under a key derived from `secret` with a fresh salt and IV.
pub fn wrap_key(dek: &DataKey, secret: &str) -> CryptoResult<WrappedKey> {
    let salt = Salt::random();
    let kek = derive_key(secret, &salt);
    let sealed = encrypt(kek.as_bytes(), dek.as_bytes())?;

    Ok(WrappedKey {
        salt: *salt.as_bytes(),
        iv: sealed.nonce,
        blob: sealed.ciphertext,
    })
}

/// Recovers the DEK from `wrapped` using `secret`.
///
/// Wrong secret, tampered fields and malformed lengths all collapse into
/// [`CryptoError::AuthenticationFailed`]; no key material escapes a failure.
pub fn unwrap_key(wrapped: &WrappedKey, secret: &str) -> CryptoResult<DataKey> {
    let kek = derive_key(secret, &Salt::from_bytes(wrapped.salt));
    let sealed = EncryptedData {
        nonce: wrapped.iv,
        ciphertext: wrapped.blob.clone(),
    };
    let raw = Zeroizing::new(decrypt(kek.as_bytes(), &sealed)?);
    if raw.len() != KEY_SIZE {
        return Err(CryptoError::AuthenticationFailed);
    }

    let mut bytes = [0u8; KEY_SIZE];
    bytes.copy_from_slice(&raw);
    let dek = DataKey::from_bytes(bytes);
    bytes.zeroize();
    Ok(dek)
}
