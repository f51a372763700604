//! AES-256-GCM authenticated encryption.

use crate::error::{CryptoError, CryptoResult};
use crate::key::KEY_SIZE;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::RngCore;

/// Size of an AES-GCM nonce (IV) in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

/// Ciphertext plus the nonce it was produced with.
///
/// `ciphertext` carries the tag in its last [`TAG_SIZE`] bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedData {
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
}

/// Generates a fresh random nonce.
pub fn generate_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    rand::rng().fill_bytes(&mut nonce);
    nonce
}

/// Encrypts `plaintext` under `key` with a freshly generated nonce.
pub fn encrypt(key: &[u8; KEY_SIZE], plaintext: &[u8]) -> CryptoResult<EncryptedData> {
    let nonce = generate_nonce();
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    Ok(EncryptedData { nonce, ciphertext })
}

/// Decrypts and authenticates `data` under `key`.
///
/// Any failure, including a ciphertext shorter than the tag, is reported as
/// [`CryptoError::AuthenticationFailed`] and yields no plaintext.
pub fn decrypt(key: &[u8; KEY_SIZE], data: &EncryptedData) -> CryptoResult<Vec<u8>> {
    if data.ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::AuthenticationFailed);
    }
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(&data.nonce), data.ciphertext.as_ref())
        .map_err(|_| CryptoError::AuthenticationFailed)
}
