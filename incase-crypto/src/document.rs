//! Document sealing under a data-encryption key.

use crate::cipher::{decrypt, encrypt, EncryptedData};
use crate::error::CryptoResult;
use crate::key::DataKey;

/// Seals `plaintext` under `dek` with a fresh random IV.
pub fn seal_document(plaintext: &[u8], dek: &DataKey) -> CryptoResult<EncryptedData> {
    encrypt(dek.as_bytes(), plaintext)
}

/// Opens a sealed document. Fails atomically on any tag mismatch.
pub fn open_document(sealed: &EncryptedData, dek: &DataKey) -> CryptoResult<Vec<u8>> {
    decrypt(dek.as_bytes(), sealed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoError;

    #[test]
    fn seal_open_roundtrip() {
        let dek = DataKey::generate();
        let sealed = seal_document(br#"{"plan":true}"#, &dek).unwrap();
        assert_eq!(open_document(&sealed, &dek).unwrap(), br#"{"plan":true}"#);
    }

    #[test]
    fn open_with_other_dek_fails() {
        let sealed = seal_document(b"doc", &DataKey::generate()).unwrap();
        assert!(matches!(
            open_document(&sealed, &DataKey::generate()),
            Err(CryptoError::AuthenticationFailed)
        ));
    }

    #[test]
    fn flipped_iv_fails() {
        let dek = DataKey::generate();
        let mut sealed = seal_document(b"doc", &dek).unwrap();
        sealed.nonce[5] ^= 0x80;
        assert!(open_document(&sealed, &dek).is_err());
    }
}
