//! Plaintext JSON backup of the unlocked plan.
//!
//! An export is readable by anyone holding the file. Importing replaces the
//! current plan and reseals it under the session's secrets.

use incase_plan::LegacyPlan;
use tracing::info;

use crate::session::SaveStatus;
use crate::{session_mut, Vault, VaultError, VaultResult};

impl Vault {
    /// The unlocked plan as indented JSON.
    pub fn export_json(&self) -> VaultResult<String> {
        let mut state = self.state()?;
        let session = session_mut(&mut state)?;
        session
            .plan
            .to_json_pretty()
            .map_err(|e| VaultError::InvalidDocument(e.to_string()))
    }

    /// Replaces the plan with a previously exported one.
    pub fn import_json(&self, json: &str) -> VaultResult<SaveStatus> {
        let plan =
            LegacyPlan::from_json(json).map_err(|e| VaultError::InvalidDocument(e.to_string()))?;
        let status = self.replace_document(plan)?;
        info!(?status, "plan imported");
        Ok(status)
    }
}
