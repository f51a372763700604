//! The persisted vault record and whole-vault seal/open.
//!
//! A record holds the document sealed once under a fresh DEK, plus that same
//! DEK wrapped under every configured secret. Opening tries the primary slot
//! first and falls back to the recovery slot, so the caller never has to say
//! which kind of secret it holds.

use crate::cipher::{EncryptedData, NONCE_SIZE, TAG_SIZE};
use crate::document::{open_document, seal_document};
use crate::error::{CryptoError, CryptoResult};
use crate::key::DataKey;
use crate::wrap::{unwrap_key, wrap_key, WrappedKey};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// The DEK wrapped under each configured secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedKeys {
    pub primary: WrappedKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery: Option<WrappedKey>,
}

/// Persisted form of the whole plan. Replaced wholesale on every save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedVault {
    #[serde(with = "crate::encoding::bytes")]
    pub encrypted_data: Vec<u8>,
    #[serde(with = "crate::encoding::array")]
    pub data_iv: [u8; NONCE_SIZE],
    pub wrapped_keys: WrappedKeys,
}

/// Which wrapped key a secret opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySlot {
    Primary,
    Recovery,
}

/// Result of a successful [`open_vault`].
pub struct OpenedVault {
    pub plaintext: Zeroizing<Vec<u8>>,
    pub slot: KeySlot,
}

impl std::fmt::Debug for OpenedVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenedVault")
            .field("plaintext", &format_args!("[{} bytes]", self.plaintext.len()))
            .field("slot", &self.slot)
            .finish()
    }
}

impl EncryptedVault {
    /// Checks every length that the JSON form cannot pin down by itself.
    ///
    /// Salts and IVs are fixed-size arrays and are rejected while parsing;
    /// wrapped blobs and the document ciphertext are checked here.
    pub fn validate(&self) -> CryptoResult<()> {
        if self.encrypted_data.len() < TAG_SIZE {
            return Err(CryptoError::InvalidLength {
                field: "encryptedData",
                expected: TAG_SIZE,
                actual: self.encrypted_data.len(),
            });
        }
        self.wrapped_keys.primary.validate()?;
        if let Some(recovery) = &self.wrapped_keys.recovery {
            recovery.validate()?;
        }
        Ok(())
    }

    pub fn has_recovery_slot(&self) -> bool {
        self.wrapped_keys.recovery.is_some()
    }

    pub fn to_json(&self) -> CryptoResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses and validates a persisted record.
    pub fn from_json(json: &str) -> CryptoResult<Self> {
        let vault: Self = serde_json::from_str(json)?;
        vault.validate()?;
        Ok(vault)
    }

    fn sealed_document(&self) -> EncryptedData {
        EncryptedData {
            nonce: self.data_iv,
            ciphertext: self.encrypted_data.clone(),
        }
    }
}

/// Seals `plaintext` into a new record.
///
/// One fresh DEK seals the document and is wrapped under `passphrase` and,
/// when given, `recovery_key`. Either secret alone can open the result.
pub fn seal_vault(
    plaintext: &[u8],
    passphrase: &str,
    recovery_key: Option<&str>,
) -> CryptoResult<EncryptedVault> {
    let dek = DataKey::generate();
    let sealed = seal_document(plaintext, &dek)?;
    let primary = wrap_key(&dek, passphrase)?;
    let recovery = recovery_key.map(|r| wrap_key(&dek, r)).transpose()?;

    Ok(EncryptedVault {
        encrypted_data: sealed.ciphertext,
        data_iv: sealed.nonce,
        wrapped_keys: WrappedKeys { primary, recovery },
    })
}

/// Opens `vault` with a single secret of either kind.
///
/// The primary slot is tried first, then the recovery slot. Every failure,
/// including a document that does not open under the recovered DEK, is
/// reported as [`CryptoError::AuthenticationFailed`].
pub fn open_vault(vault: &EncryptedVault, secret: &str) -> CryptoResult<OpenedVault> {
    let (dek, slot) = match unwrap_key(&vault.wrapped_keys.primary, secret) {
        Ok(dek) => (dek, KeySlot::Primary),
        Err(CryptoError::AuthenticationFailed) => {
            let recovery = vault
                .wrapped_keys
                .recovery
                .as_ref()
                .ok_or(CryptoError::AuthenticationFailed)?;
            (unwrap_key(recovery, secret)?, KeySlot::Recovery)
        }
        Err(e) => return Err(e),
    };

    let plaintext = Zeroizing::new(open_document(&vault.sealed_document(), &dek)?);
    Ok(OpenedVault { plaintext, slot })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_without_recovery_opens_with_passphrase_only() {
        let vault = seal_vault(b"plan", "passphrase-1", None).unwrap();
        assert!(!vault.has_recovery_slot());
        let opened = open_vault(&vault, "passphrase-1").unwrap();
        assert_eq!(opened.slot, KeySlot::Primary);
        assert!(matches!(
            open_vault(&vault, "ABCDE-FGHJK-LMNPQ-RSTUV"),
            Err(CryptoError::AuthenticationFailed)
        ));
    }

    #[test]
    fn short_ciphertext_fails_validation() {
        let mut vault = seal_vault(b"plan", "passphrase-1", None).unwrap();
        vault.encrypted_data.truncate(TAG_SIZE - 1);
        assert!(matches!(
            vault.validate(),
            Err(CryptoError::InvalidLength { field: "encryptedData", .. })
        ));
    }

    #[test]
    fn debug_does_not_print_plaintext() {
        let vault = seal_vault(b"top secret plan", "passphrase-1", None).unwrap();
        let opened = open_vault(&vault, "passphrase-1").unwrap();
        let rendered = format!("{opened:?}");
        assert!(!rendered.contains("top secret"));
        assert!(rendered.contains("15 bytes"));
    }
}
