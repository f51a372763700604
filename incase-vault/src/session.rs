//! The unlocked session and the values handed back to callers.

use incase_plan::LegacyPlan;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Which kind of secret the caller says it is supplying.
///
/// Unlocking always tries both wrapped keys; the mode only picks the failure
/// message. The wrapped key that actually opened decides which secret the
/// session holds: a recovery key entered in `Passphrase` mode is kept as the
/// recovery key, never as the passphrase, so later saves wait for
/// [`Vault::set_passphrase`](crate::Vault::set_passphrase) instead of
/// rewrapping the primary slot under it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnlockMode {
    #[default]
    Passphrase,
    Recovery,
}

impl UnlockMode {
    pub(crate) fn failure_message(self) -> &'static str {
        match self {
            Self::Passphrase => "incorrect passphrase",
            Self::Recovery => "invalid recovery key",
        }
    }
}

/// Public view of the lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaultStatus {
    NoVault,
    SettingUp(SetupStep),
    Locked,
    Unlocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupStep {
    ChoosingPassphrase,
    PresentingRecoveryKey,
}

/// Outcome of a change to the unlocked document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveStatus {
    /// Sealed and persisted.
    Committed,
    /// Kept in memory only: no passphrase is held (after a recovery-key
    /// unlock). Sealed once [`Vault::set_passphrase`](crate::Vault::set_passphrase) succeeds.
    AwaitingPassphrase,
    /// Kept in memory only: the record has a recovery slot but this session
    /// does not know the recovery key. Sealed once
    /// [`Vault::provide_recovery_key`](crate::Vault::provide_recovery_key) succeeds.
    AwaitingRecoveryKey,
}

/// Explicit intent required by [`Vault::reset_vault`](crate::Vault::reset_vault).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetConfirmation {
    Confirmed,
    Cancelled,
}

/// Returned by `initialize_vault`: the recovery key the owner must record
/// before setup can complete.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RecoveryKeyPresented {
    recovery_key: String,
}

impl RecoveryKeyPresented {
    pub(crate) fn new(recovery_key: &str) -> Self {
        Self {
            recovery_key: recovery_key.to_string(),
        }
    }

    pub fn recovery_key(&self) -> &str {
        &self.recovery_key
    }
}

impl fmt::Debug for RecoveryKeyPresented {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RecoveryKeyPresented([REDACTED])")
    }
}

/// Result of a successful unlock.
#[derive(Clone)]
pub struct UnlockOutcome {
    pub plan: LegacyPlan,
    /// The secret that was used, when it opened the recovery slot.
    pub recovery_key: Option<String>,
}

impl fmt::Debug for UnlockOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnlockOutcome")
            .field("recovered", &self.recovery_key.is_some())
            .finish_non_exhaustive()
    }
}

/// Secrets and plaintext held while unlocked. Wiped on drop.
pub(crate) struct Session {
    pub(crate) plan: LegacyPlan,
    pub(crate) passphrase: Option<Zeroizing<String>>,
    pub(crate) recovery_key: Option<Zeroizing<String>>,
    /// The persisted record carries a recovery slot that every reseal must
    /// keep.
    pub(crate) requires_recovery_key: bool,
    /// `plan` holds changes that are not in the persisted record yet.
    pub(crate) unsaved: bool,
}

impl Session {
    pub(crate) fn new(
        plan: LegacyPlan,
        passphrase: Option<&str>,
        recovery_key: Option<&str>,
        requires_recovery_key: bool,
    ) -> Self {
        Self {
            plan,
            passphrase: passphrase.map(|p| Zeroizing::new(p.to_string())),
            recovery_key: recovery_key.map(|r| Zeroizing::new(r.to_string())),
            requires_recovery_key,
            unsaved: false,
        }
    }

    /// What a reseal of this session would do right now.
    pub(crate) fn save_readiness(&self) -> SaveStatus {
        if self.passphrase.is_none() {
            SaveStatus::AwaitingPassphrase
        } else if self.requires_recovery_key && self.recovery_key.is_none() {
            SaveStatus::AwaitingRecoveryKey
        } else {
            SaveStatus::Committed
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.plan.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_follows_held_secrets() {
        let plan = LegacyPlan::default();
        let full = Session::new(plan.clone(), Some("passphrase"), Some("KEY"), true);
        assert_eq!(full.save_readiness(), SaveStatus::Committed);

        let recovered = Session::new(plan.clone(), None, Some("KEY"), true);
        assert_eq!(recovered.save_readiness(), SaveStatus::AwaitingPassphrase);

        let no_copy = Session::new(plan.clone(), Some("passphrase"), None, true);
        assert_eq!(no_copy.save_readiness(), SaveStatus::AwaitingRecoveryKey);

        let single_factor = Session::new(plan, Some("passphrase"), None, false);
        assert_eq!(single_factor.save_readiness(), SaveStatus::Committed);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let presented = RecoveryKeyPresented::new("ABCDE-FGHJK-LMNPQ-RSTUV");
        assert!(!format!("{presented:?}").contains("ABCDE"));

        let outcome = UnlockOutcome {
            plan: LegacyPlan::default(),
            recovery_key: Some("ABCDE-FGHJK-LMNPQ-RSTUV".to_string()),
        };
        let rendered = format!("{outcome:?}");
        assert!(!rendered.contains("ABCDE"));
        assert!(rendered.contains("recovered: true"));
    }

    #[test]
    fn unlock_mode_picks_failure_wording() {
        assert_eq!(UnlockMode::Passphrase.failure_message(), "incorrect passphrase");
        assert_eq!(UnlockMode::Recovery.failure_message(), "invalid recovery key");
    }
}
