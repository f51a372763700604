//! Passphrase and recovery-key management for an unlocked vault.
//!
//! After a recovery-key unlock the session holds no passphrase, so changes
//! stay in memory until the owner chooses a new one with
//! [`Vault::set_passphrase`]. That reseal wraps the new data key under the
//! new passphrase and the same recovery key, which keeps working.

use incase_crypto::unwrap_key;
use tracing::info;
use zeroize::Zeroizing;

use crate::session::{SaveStatus, UnlockMode};
use crate::{session_mut, validate_new_passphrase, Vault, VaultError, VaultResult};

// ============================================================================
// Vault recovery methods
// ============================================================================

impl Vault {
    /// Sets a new primary passphrase and reseals immediately.
    ///
    /// On a failed reseal the previous passphrase (if any) stays in effect.
    pub fn set_passphrase(&self, passphrase: &str, confirm: &str) -> VaultResult<SaveStatus> {
        validate_new_passphrase(passphrase, confirm)?;

        let mut state = self.state()?;
        let session = session_mut(&mut state)?;
        let previous = session
            .passphrase
            .replace(Zeroizing::new(passphrase.to_string()));

        let next = session.plan.clone();
        match self.commit(session, next) {
            Ok(status) => {
                info!(?status, "passphrase changed");
                Ok(status)
            }
            Err(e) => {
                session.passphrase = previous;
                Err(e)
            }
        }
    }

    /// The recovery key held by the unlocked session, for display.
    pub fn recovery_key(&self) -> VaultResult<Option<String>> {
        let mut state = self.state()?;
        Ok(session_mut(&mut state)?.recovery_key.as_deref().cloned())
    }

    /// Supplies the recovery key to a session that lacks it.
    ///
    /// Needed after a passphrase unlock when no plaintext copy is persisted
    /// (`persist_recovery_key = false`). The key must open the record's
    /// recovery slot. Pending changes are sealed right away.
    pub fn provide_recovery_key(&self, recovery_key: &str) -> VaultResult<SaveStatus> {
        let mut state = self.state()?;
        let session = session_mut(&mut state)?;
        let record = self.load_record()?.ok_or(VaultError::NoVault)?;
        let slot = record
            .wrapped_keys
            .recovery
            .as_ref()
            .ok_or(VaultError::InvalidState("vault has no recovery slot"))?;
        unwrap_key(slot, recovery_key).map_err(|_| VaultError::AuthenticationFailed {
            mode: UnlockMode::Recovery,
        })?;

        session.recovery_key = Some(Zeroizing::new(recovery_key.to_string()));
        if self.config.persist_recovery_key {
            self.store.set(&self.config.recovery_key_key, recovery_key)?;
        }
        info!("recovery key restored to session");

        if session.unsaved {
            let next = session.plan.clone();
            self.commit(session, next)
        } else {
            Ok(session.save_readiness())
        }
    }
}
