//! The legacy plan: the single document the incase vault keeps encrypted.
//!
//! Pure data. The vault crate serializes a [`LegacyPlan`] to JSON, seals the
//! bytes and never looks inside. JSON field names follow the camelCase layout
//! of existing records so exports and vaults stay interchangeable.
//!
//! Every type implements `Zeroize` so a holder can wipe the plaintext when
//! the vault locks.

mod sections;

pub use sections::{
    AttachedFile, CreatorDetails, CriticalDocs, DigitalItems, Finances, FirstStep, HomeInsurance,
    HomeSecurity, Household, Hvac, LifeInsurance, MaintenanceItem, ManualAccount, Mortgage,
    Passwords, PersonalNotes, PetCare, Subscription, TeamMember, Utility,
};

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Generates an identifier for a new list entry.
pub fn new_item_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Everything the owner wants their family to find.
///
/// [`LegacyPlan::default`] is the document a fresh vault starts with: a
/// seeded checklist, the common e-mail providers, the usual professional
/// roles and household utilities, all other fields empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyPlan {
    pub creator_details: CreatorDetails,
    pub wants_local_services_info: bool,
    pub local_services_notes: String,
    pub personal_notes: PersonalNotes,
    pub first_steps: Vec<FirstStep>,
    pub passwords: Passwords,
    pub manual_accounts: Vec<ManualAccount>,
    pub critical_docs: CriticalDocs,
    pub subscriptions: Vec<Subscription>,
    pub digital_items: DigitalItems,
    pub finances: Finances,
    pub professional_team: Vec<TeamMember>,
    pub pet_care: PetCare,
    pub household: Household,
}

impl Default for LegacyPlan {
    fn default() -> Self {
        let step = |id: &str, text: &str| FirstStep {
            id: id.to_string(),
            text: text.to_string(),
            completed: false,
        };
        let email = |id: &str, service: &str| ManualAccount {
            id: id.to_string(),
            service: service.to_string(),
            ..ManualAccount::default()
        };
        let role = |id: &str, role: &str| TeamMember {
            id: id.to_string(),
            role: role.to_string(),
            ..TeamMember::default()
        };

        Self {
            creator_details: CreatorDetails::default(),
            wants_local_services_info: false,
            local_services_notes: String::new(),
            personal_notes: PersonalNotes::default(),
            first_steps: vec![
                step("1", "Call Advisor and Primary Family Member"),
                step("2", "Log in to Password Manager"),
                step("3", "Ensure access to main financial accounts for continuity"),
                step("4", "Locate estate planning documents (Fire box / Safe)"),
            ],
            passwords: Passwords::default(),
            manual_accounts: vec![
                email("email-gmail", "Gmail"),
                email("email-yahoo", "Yahoo Mail"),
                email("email-outlook", "Outlook/Hotmail"),
            ],
            critical_docs: CriticalDocs::default(),
            subscriptions: Vec::new(),
            digital_items: DigitalItems::default(),
            finances: Finances::default(),
            professional_team: vec![
                role("1", "Financial Advisor"),
                role("2", "Estate Attorney"),
                role("3", "Accountant"),
            ],
            pet_care: PetCare::default(),
            household: Household::default(),
        }
    }
}

impl LegacyPlan {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Indented JSON, as written by a plaintext backup export.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Marks a checklist step done or not done. Returns false for an unknown id.
    pub fn set_step_completed(&mut self, id: &str, completed: bool) -> bool {
        match self.first_steps.iter_mut().find(|s| s.id == id) {
            Some(step) => {
                step.completed = completed;
                true
            }
            None => false,
        }
    }

    /// `(completed, total)` for the first-steps checklist.
    pub fn first_steps_progress(&self) -> (usize, usize) {
        let done = self.first_steps.iter().filter(|s| s.completed).count();
        (done, self.first_steps.len())
    }

    pub fn add_manual_account(&mut self) -> &mut ManualAccount {
        push_new(
            &mut self.manual_accounts,
            ManualAccount {
                id: new_item_id(),
                ..ManualAccount::default()
            },
        )
    }

    pub fn remove_manual_account(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.manual_accounts, id, |a| &a.id)
    }

    pub fn add_team_member(&mut self) -> &mut TeamMember {
        push_new(
            &mut self.professional_team,
            TeamMember {
                id: new_item_id(),
                role: "New Role".to_string(),
                ..TeamMember::default()
            },
        )
    }

    pub fn remove_team_member(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.professional_team, id, |m| &m.id)
    }

    pub fn add_subscription(
        &mut self,
        name: impl Into<String>,
        cost: impl Into<String>,
        category: impl Into<String>,
    ) -> &mut Subscription {
        push_new(
            &mut self.subscriptions,
            Subscription {
                id: new_item_id(),
                name: name.into(),
                cost: cost.into(),
                category: category.into(),
            },
        )
    }

    pub fn remove_subscription(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.subscriptions, id, |s| &s.id)
    }
}

fn push_new<T>(items: &mut Vec<T>, item: T) -> &mut T {
    items.push(item);
    let last = items.len() - 1;
    &mut items[last]
}

fn remove_by_id<T>(items: &mut Vec<T>, id: &str, key: impl Fn(&T) -> &String) -> bool {
    let before = items.len();
    items.retain(|item| key(item) != id);
    items.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_plan_seeds_lists() {
        let plan = LegacyPlan::default();
        assert_eq!(plan.first_steps.len(), 4);
        assert_eq!(plan.first_steps_progress(), (0, 4));
        assert_eq!(
            plan.manual_accounts
                .iter()
                .map(|a| a.service.as_str())
                .collect::<Vec<_>>(),
            vec!["Gmail", "Yahoo Mail", "Outlook/Hotmail"]
        );
        assert_eq!(
            plan.professional_team
                .iter()
                .map(|m| m.role.as_str())
                .collect::<Vec<_>>(),
            vec!["Financial Advisor", "Estate Attorney", "Accountant"]
        );
        assert_eq!(plan.household.utilities.len(), 3);
        assert_eq!(plan.household.maintenance[1].kind, "Plumbing");
        assert!(plan.subscriptions.is_empty());
        assert!(!plan.wants_local_services_info);
    }

    #[test]
    fn zeroize_wipes_all_sections() {
        let mut plan = LegacyPlan::default();
        plan.passwords.master_password = "hunter22".to_string();
        plan.wants_local_services_info = true;
        plan.zeroize();
        assert!(plan.passwords.master_password.is_empty());
        assert!(plan.first_steps.is_empty());
        assert!(plan.household.utilities.is_empty());
        assert!(!plan.wants_local_services_info);
    }

    #[test]
    fn completing_steps_updates_progress() {
        let mut plan = LegacyPlan::default();
        assert!(plan.set_step_completed("2", true));
        assert!(plan.set_step_completed("4", true));
        assert!(!plan.set_step_completed("99", true));
        assert_eq!(plan.first_steps_progress(), (2, 4));
    }

    #[test]
    fn added_items_get_unique_ids_and_can_be_removed() {
        let mut plan = LegacyPlan::default();
        let a = plan.add_subscription("Streaming", "15.99", "Entertainment").id.clone();
        let b = plan.add_subscription("Cloud backup", "9.99", "Software").id.clone();
        assert_ne!(a, b);
        assert_eq!(plan.subscriptions.len(), 2);

        assert!(plan.remove_subscription(&a));
        assert!(!plan.remove_subscription(&a));
        assert_eq!(plan.subscriptions[0].id, b);
    }

    #[test]
    fn new_team_member_has_placeholder_role() {
        let mut plan = LegacyPlan::default();
        let member = plan.add_team_member();
        member.name = "Dana Reyes".to_string();
        let id = member.id.clone();
        assert_eq!(plan.professional_team.len(), 4);
        assert_eq!(plan.professional_team[3].role, "New Role");
        assert!(plan.remove_team_member(&id));
        assert_eq!(plan.professional_team.len(), 3);
    }

    #[test]
    fn new_manual_account_is_blank() {
        let mut plan = LegacyPlan::default();
        let account = plan.add_manual_account().clone();
        assert!(account.service.is_empty());
        assert_eq!(account.id.len(), 36);
        assert!(plan.remove_manual_account(&account.id));
    }
}
