//! Lock/unlock lifecycle for the incase legacy-plan vault.
//!
//! A [`Vault`] owns one persisted record (see [`incase_crypto::EncryptedVault`])
//! and, while unlocked, one [`LegacyPlan`] together with the secrets needed
//! to reseal it. Every change to the plan is sealed under a fresh data key
//! and replaces the record wholesale.
//!
//! ```text
//! NoVault -> SettingUp(ChoosingPassphrase) -> SettingUp(PresentingRecoveryKey) -> Unlocked
//!                                                         Locked <-> Unlocked
//! any state -> NoVault (reset)
//! ```
//!
//! Operations take `&self` and hold the state mutex for their full duration,
//! so reseals are applied one at a time in call order.

mod backup;
mod config;
mod error;
mod recovery;
mod session;
mod store;

pub use config::VaultConfig;
pub use error::{ErrorKind, VaultError, VaultResult};
pub use session::{
    RecoveryKeyPresented, ResetConfirmation, SaveStatus, SetupStep, UnlockMode, UnlockOutcome,
    VaultStatus,
};
pub use store::{FileStore, KeyValueStore, MemoryStore};

use incase_crypto::{
    generate_recovery_key, open_vault, seal_vault, unwrap_key, CryptoError, EncryptedVault, KeySlot,
};
use incase_plan::LegacyPlan;
use session::Session;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};
use zeroize::{Zeroize, Zeroizing};

/// Minimum passphrase length, counted in UTF-16 code units.
pub const MIN_PASSPHRASE_CHARS: usize = 8;

// ============================================================================
// Sealing
// ============================================================================

/// Seals `plan` under `passphrase` (and `recovery_key`, when given) and
/// replaces the persisted record.
///
/// The previous record stays in place until the new one is fully computed.
pub fn save(
    store: &dyn KeyValueStore,
    config: &VaultConfig,
    plan: &LegacyPlan,
    passphrase: &str,
    recovery_key: Option<&str>,
) -> VaultResult<()> {
    let plaintext = Zeroizing::new(
        serde_json::to_vec(plan).map_err(|e| VaultError::InvalidDocument(e.to_string()))?,
    );
    let record = seal_vault(&plaintext, passphrase, recovery_key)
        .map_err(|e| VaultError::Crypto(e.to_string()))?;
    let json = record
        .to_json()
        .map_err(|e| VaultError::Crypto(e.to_string()))?;

    store.set(&config.vault_key, &json)?;
    debug!(recovery_slot = recovery_key.is_some(), "vault resealed");
    Ok(())
}

/// Checks a new passphrase and its confirmation. Mismatch is reported first.
///
/// Length is measured in UTF-16 code units: an emoji outside the BMP counts
/// as two.
pub fn validate_new_passphrase(passphrase: &str, confirm: &str) -> VaultResult<()> {
    if passphrase != confirm {
        return Err(VaultError::PassphraseMismatch);
    }
    if passphrase.encode_utf16().count() < MIN_PASSPHRASE_CHARS {
        return Err(VaultError::PassphraseTooShort);
    }
    Ok(())
}

// ============================================================================
// Vault
// ============================================================================

struct PendingSetup {
    passphrase: Zeroizing<String>,
    recovery_key: Zeroizing<String>,
}

enum State {
    NoVault,
    ChoosingPassphrase,
    PresentingRecoveryKey(PendingSetup),
    Locked,
    Unlocked(Session),
}

/// The single encrypted plan of one installation.
pub struct Vault {
    store: Arc<dyn KeyValueStore>,
    config: VaultConfig,
    state: Mutex<State>,
}

impl Vault {
    /// Opens a vault over `store`. Starts `Locked` when a record exists,
    /// `NoVault` otherwise.
    pub fn open(store: Arc<dyn KeyValueStore>, config: VaultConfig) -> VaultResult<Self> {
        let exists = store.get(&config.vault_key)?.is_some();
        debug!(exists, "vault opened");
        Ok(Self {
            store,
            config,
            state: Mutex::new(if exists { State::Locked } else { State::NoVault }),
        })
    }

    /// Opens a vault backed by a fresh [`MemoryStore`].
    pub fn open_in_memory() -> VaultResult<Self> {
        Self::open(Arc::new(MemoryStore::new()), VaultConfig::default())
    }

    /// Opens a file-backed vault under `config.storage_dir`.
    pub fn with_config(config: VaultConfig) -> VaultResult<Self> {
        let store = FileStore::open(&config.storage_dir)?;
        Self::open(Arc::new(store), config)
    }

    /// Opens a file-backed vault in `dir` with default store keys.
    pub fn open_dir(dir: impl AsRef<Path>) -> VaultResult<Self> {
        Self::with_config(VaultConfig::in_dir(dir))
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    fn state(&self) -> VaultResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| VaultError::Storage("vault state lock poisoned".into()))
    }

    fn load_record(&self) -> VaultResult<Option<EncryptedVault>> {
        let Some(json) = self.store.get(&self.config.vault_key)? else {
            return Ok(None);
        };
        EncryptedVault::from_json(&json).map(Some).map_err(|e| {
            warn!("persisted vault record is malformed");
            VaultError::CorruptRecord(e.to_string())
        })
    }

    pub fn status(&self) -> VaultResult<VaultStatus> {
        Ok(match &*self.state()? {
            State::NoVault => VaultStatus::NoVault,
            State::ChoosingPassphrase => VaultStatus::SettingUp(SetupStep::ChoosingPassphrase),
            State::PresentingRecoveryKey(_) => {
                VaultStatus::SettingUp(SetupStep::PresentingRecoveryKey)
            }
            State::Locked => VaultStatus::Locked,
            State::Unlocked(_) => VaultStatus::Unlocked,
        })
    }

    /// Whether a persisted record exists.
    pub fn has_vault(&self) -> VaultResult<bool> {
        Ok(self.store.get(&self.config.vault_key)?.is_some())
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.status(), Ok(VaultStatus::Unlocked))
    }

    // ------------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------------

    fn ensure_can_set_up(&self, state: &State) -> VaultResult<()> {
        match state {
            State::NoVault | State::ChoosingPassphrase => {}
            State::PresentingRecoveryKey(_) => {
                return Err(VaultError::InvalidState("recovery key already presented"));
            }
            State::Locked | State::Unlocked(_) => return Err(VaultError::AlreadyInitialized),
        }
        if self.has_vault()? {
            return Err(VaultError::AlreadyInitialized);
        }
        Ok(())
    }

    /// `NoVault` -> `SettingUp(ChoosingPassphrase)`.
    pub fn begin_setup(&self) -> VaultResult<()> {
        let mut state = self.state()?;
        self.ensure_can_set_up(&state)?;
        *state = State::ChoosingPassphrase;
        Ok(())
    }

    /// Validates the chosen passphrase and generates the recovery key.
    ///
    /// Nothing is persisted until [`complete_setup`](Self::complete_setup).
    /// On a validation error the vault stays in `ChoosingPassphrase`.
    pub fn initialize_vault(&self, passphrase: &str, confirm: &str) -> VaultResult<RecoveryKeyPresented> {
        let mut state = self.state()?;
        self.ensure_can_set_up(&state)?;
        *state = State::ChoosingPassphrase;
        validate_new_passphrase(passphrase, confirm)?;

        let recovery_key = Zeroizing::new(generate_recovery_key());
        let presented = RecoveryKeyPresented::new(&recovery_key);
        *state = State::PresentingRecoveryKey(PendingSetup {
            passphrase: Zeroizing::new(passphrase.to_string()),
            recovery_key,
        });
        info!("recovery key generated, awaiting confirmation");
        Ok(presented)
    }

    /// Abandons setup, discarding the pending passphrase and recovery key.
    pub fn cancel_setup(&self) -> VaultResult<()> {
        let mut state = self.state()?;
        match &*state {
            State::NoVault | State::ChoosingPassphrase | State::PresentingRecoveryKey(_) => {
                *state = State::NoVault;
                Ok(())
            }
            State::Locked | State::Unlocked(_) => {
                Err(VaultError::InvalidState("no setup in progress"))
            }
        }
    }

    /// Seals the default plan under both secrets, persists it and unlocks.
    ///
    /// Call once the owner has confirmed they recorded the recovery key.
    pub fn complete_setup(&self) -> VaultResult<LegacyPlan> {
        let mut state = self.state()?;
        let State::PresentingRecoveryKey(pending) = &*state else {
            return Err(VaultError::InvalidState("no recovery key has been presented"));
        };
        if self.has_vault()? {
            return Err(VaultError::AlreadyInitialized);
        }

        let plan = LegacyPlan::default();
        if self.config.persist_recovery_key {
            self.store
                .set(&self.config.recovery_key_key, pending.recovery_key.as_str())?;
        }
        save(
            self.store.as_ref(),
            &self.config,
            &plan,
            pending.passphrase.as_str(),
            Some(pending.recovery_key.as_str()),
        )?;

        let session = Session::new(
            plan.clone(),
            Some(pending.passphrase.as_str()),
            Some(pending.recovery_key.as_str()),
            true,
        );
        *state = State::Unlocked(session);
        info!("vault setup complete");
        Ok(plan)
    }

    // ------------------------------------------------------------------------
    // Lock / unlock
    // ------------------------------------------------------------------------

    /// Unlocks with a single secret of either kind.
    ///
    /// The primary slot is tried first, then the recovery slot. The slot
    /// that opened decides which secret the session holds: a passphrase
    /// unlock picks up the persisted recovery key copy (if it still matches
    /// the record), a recovery unlock holds only the recovery key and
    /// returns it in the outcome.
    pub fn unlock(&self, secret: &str, mode: UnlockMode) -> VaultResult<UnlockOutcome> {
        let mut state = self.state()?;
        match &*state {
            State::NoVault | State::Locked => {}
            State::Unlocked(_) => return Err(VaultError::InvalidState("vault is already unlocked")),
            State::ChoosingPassphrase | State::PresentingRecoveryKey(_) => {
                return Err(VaultError::InvalidState("setup in progress"));
            }
        }

        let Some(record) = self.load_record()? else {
            *state = State::NoVault;
            return Err(VaultError::NoVault);
        };
        *state = State::Locked;

        let opened = match open_vault(&record, secret) {
            Ok(opened) => opened,
            Err(CryptoError::AuthenticationFailed) => {
                warn!(?mode, "unlock attempt failed");
                return Err(VaultError::AuthenticationFailed { mode });
            }
            Err(e) => return Err(VaultError::Crypto(e.to_string())),
        };
        let plan: LegacyPlan = serde_json::from_slice(&opened.plaintext).map_err(|e| {
            warn!("decrypted vault does not hold a plan document");
            VaultError::CorruptRecord(e.to_string())
        })?;

        let (passphrase, recovery_key) = match opened.slot {
            KeySlot::Primary => (Some(secret), self.stored_recovery_key(&record)?),
            KeySlot::Recovery => (None, Some(Zeroizing::new(secret.to_string()))),
        };
        let session = Session::new(
            plan.clone(),
            passphrase,
            recovery_key.as_ref().map(|r| r.as_str()),
            record.has_recovery_slot(),
        );
        *state = State::Unlocked(session);
        info!(slot = ?opened.slot, "vault unlocked");

        Ok(UnlockOutcome {
            plan,
            recovery_key: (opened.slot == KeySlot::Recovery).then(|| secret.to_string()),
        })
    }

    /// The persisted recovery key copy, if it opens the record's recovery slot.
    fn stored_recovery_key(&self, record: &EncryptedVault) -> VaultResult<Option<Zeroizing<String>>> {
        let Some(slot) = &record.wrapped_keys.recovery else {
            return Ok(None);
        };
        let Some(stored) = self.store.get(&self.config.recovery_key_key)?.map(Zeroizing::new) else {
            return Ok(None);
        };
        if unwrap_key(slot, &stored).is_err() {
            warn!("persisted recovery key does not match the vault record");
            return Ok(None);
        }
        Ok(Some(stored))
    }

    /// Drops the session; secrets and plaintext are wiped.
    pub fn lock(&self) -> VaultResult<()> {
        let mut state = self.state()?;
        if let State::Unlocked(session) = &*state {
            if session.unsaved {
                warn!("locking with changes that were never sealed");
            }
        }
        let exists = self.has_vault();
        *state = match exists {
            Ok(false) => State::NoVault,
            _ => State::Locked,
        };
        info!("vault locked");
        exists.map(|_| ())
    }

    // ------------------------------------------------------------------------
    // Document
    // ------------------------------------------------------------------------

    /// Snapshot of the unlocked plan.
    pub fn document(&self) -> VaultResult<LegacyPlan> {
        let mut state = self.state()?;
        Ok(session_mut(&mut state)?.plan.clone())
    }

    /// Applies `change` to a copy of the plan, reseals and persists it, then
    /// makes it current. A failed reseal leaves the session and the record
    /// untouched.
    ///
    /// `change` runs with the vault's state lock held and must not call back
    /// into this vault.
    pub fn update<F>(&self, change: F) -> VaultResult<SaveStatus>
    where
        F: FnOnce(&mut LegacyPlan),
    {
        let mut state = self.state()?;
        let session = session_mut(&mut state)?;
        let mut next = session.plan.clone();
        change(&mut next);
        self.commit(session, next)
    }

    /// Replaces the whole plan and reseals.
    pub fn replace_document(&self, plan: LegacyPlan) -> VaultResult<SaveStatus> {
        self.update(move |current| *current = plan)
    }

    /// Seals `next` with the session's secrets, or keeps it in memory when a
    /// required secret is missing.
    fn commit(&self, session: &mut Session, mut next: LegacyPlan) -> VaultResult<SaveStatus> {
        let status = session.save_readiness();
        match (status, session.passphrase.as_deref()) {
            (SaveStatus::Committed, Some(passphrase)) => {
                let recovery_key = session.recovery_key.as_deref().map(String::as_str);
                if let Err(e) = save(self.store.as_ref(), &self.config, &next, passphrase, recovery_key) {
                    next.zeroize();
                    return Err(e);
                }
            }
            _ => debug!(?status, "change kept in memory"),
        }

        let mut previous = std::mem::replace(&mut session.plan, next);
        previous.zeroize();
        session.unsaved = status != SaveStatus::Committed;
        Ok(status)
    }

    // ------------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------------

    /// Deletes the record and the recovery key copy. Irreversible.
    pub fn reset_vault(&self, confirmation: ResetConfirmation) -> VaultResult<()> {
        if confirmation == ResetConfirmation::Cancelled {
            return Err(VaultError::ResetCancelled);
        }
        let mut state = self.state()?;
        self.store.remove(&self.config.vault_key)?;
        *state = State::NoVault;
        self.store.remove(&self.config.recovery_key_key)?;
        info!("vault reset");
        Ok(())
    }
}

fn session_mut(state: &mut State) -> VaultResult<&mut Session> {
    match state {
        State::Unlocked(session) => Ok(session),
        State::NoVault => Err(VaultError::NoVault),
        _ => Err(VaultError::Locked),
    }
}
