//! Section types that make up a [`LegacyPlan`](crate::LegacyPlan).
//!
//! Field names serialize as camelCase. Every struct tolerates missing fields
//! so records written by older versions still load.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A file embedded in the plan as base64 text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttachedFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub base64_data: String,
    /// Size of the decoded file in bytes.
    pub size: u64,
}

impl AttachedFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        base64_data: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            id: crate::new_item_id(),
            name: name.into(),
            mime_type: mime_type.into(),
            base64_data: base64_data.into(),
            size,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatorDetails {
    pub legal_name: String,
    pub address: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalNotes {
    pub partner_letter: String,
    pub children_letter: String,
    pub intentions: String,
}

/// One entry of the "first steps" checklist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(default)]
pub struct FirstStep {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

/// Password-manager access details.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(rename_all = "camelCase", default)]
pub struct Passwords {
    pub manager: String,
    pub username: String,
    pub master_password: String,
}

/// Credentials kept by hand for owners without a password manager.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(default)]
pub struct ManualAccount {
    pub id: String,
    pub service: String,
    pub username: String,
    pub password: String,
    pub notes: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(rename_all = "camelCase", default)]
pub struct CriticalDocs {
    pub estate_plan_summary: String,
    pub attached_estate_plan_files: Vec<AttachedFile>,
    pub digital_copies_location: String,
    pub attached_digital_copies_files: Vec<AttachedFile>,
    pub health_directives_location: String,
    pub attached_health_directives_files: Vec<AttachedFile>,
    pub id_locations: String,
    pub attached_id_files: Vec<AttachedFile>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(default)]
pub struct Subscription {
    pub id: String,
    pub name: String,
    pub cost: String,
    pub category: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(rename_all = "camelCase", default)]
pub struct DigitalItems {
    pub phone_carrier: String,
    pub phone_pin: String,
    pub social_media_instructions: String,
    pub cloud_storage: String,
    pub domain_logins: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifeInsurance {
    pub benefit: String,
    pub company: String,
    pub premiums: String,
    pub instructions: String,
    pub attached_files: Vec<AttachedFile>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(rename_all = "camelCase", default)]
pub struct Finances {
    pub brokerage: String,
    pub banks: String,
    pub credit_cards: String,
    pub crypto: String,
    pub linked_apps: String,
    /// 529 education savings plans.
    pub five_two_nine: String,
    pub spreadsheet_link: String,
    pub attached_spreadsheet_files: Vec<AttachedFile>,
    pub life_insurance: LifeInsurance,
    pub other_investments: String,
}

/// A professional the family should contact (advisor, attorney, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(default)]
pub struct TeamMember {
    pub id: String,
    pub role: String,
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(default)]
pub struct PetCare {
    pub provider: String,
    pub food: String,
    pub medications: String,
    pub dogsitter: String,
    pub grooming: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(default)]
pub struct Mortgage {
    pub company: String,
    pub contact: String,
    pub website: String,
    pub monthly: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(default)]
pub struct HomeInsurance {
    pub company: String,
    pub contact: String,
    pub website: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeSecurity {
    pub provider: String,
    pub safe_word: String,
    pub alarm_code: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(default)]
pub struct Utility {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub provider: String,
    pub cost: String,
    pub website: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(default)]
pub struct MaintenanceItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub company: String,
    pub contact: String,
    pub notes: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hvac {
    pub last_filter_change: String,
    pub installed_by: String,
    pub warranty: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(default)]
pub struct Household {
    pub mortgage: Mortgage,
    pub insurance: HomeInsurance,
    pub security: HomeSecurity,
    pub utilities: Vec<Utility>,
    pub maintenance: Vec<MaintenanceItem>,
    pub hvac: Hvac,
}

impl Default for Household {
    fn default() -> Self {
        let utility = |id: &str, kind: &str| Utility {
            id: id.to_string(),
            kind: kind.to_string(),
            ..Utility::default()
        };
        let maintenance = |id: &str, kind: &str| MaintenanceItem {
            id: id.to_string(),
            kind: kind.to_string(),
            ..MaintenanceItem::default()
        };

        Self {
            mortgage: Mortgage::default(),
            insurance: HomeInsurance::default(),
            security: HomeSecurity::default(),
            utilities: vec![
                utility("1", "Power"),
                utility("2", "Water"),
                utility("3", "Gas"),
            ],
            maintenance: vec![
                maintenance("1", "Landscaping"),
                maintenance("2", "Plumbing"),
            ],
            hvac: Hvac::default(),
        }
    }
}
