use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::{QuotationLedger, QuotationTotals};
use crate::models::projection::{ProjectionInput, ProjectionPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    Active,
    Recycled,
    PermanentlyDeleted,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Recycled => "recycled",
            Self::PermanentlyDeleted => "permanently_deleted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "recycled" => Some(Self::Recycled),
            "permanently_deleted" => Some(Self::PermanentlyDeleted),
            _ => None,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a free-form proposal field, e.g. a list of selected panel brands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraFieldValue {
    Text(String),
    List(Vec<String>),
}

/// Free-form fields kept apart from the validated ones.
pub type ExtraFields = BTreeMap<String, ExtraFieldValue>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub customer_type: String,
}

/// Technical attributes of the proposed installation, as entered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemDetails {
    pub project_size: String,
    pub consumption: String,
    pub electricity_rate: String,
    pub generation: String,
    pub warranty: String,
    pub proposal_watt_peak: String,
    pub inverter_warranty: String,
    pub performance_warranty: String,
    pub quantity: String,
    pub inverter_size: String,
    pub inverter_quantity: String,
    pub proposal_structure: String,
    pub structure_description: String,
    pub system_warranty: String,
}

/// Everything a submitted proposal carries apart from identity and lifecycle.
///
/// Totals, the worded amount and the projection series are frozen at submit
/// time from `ledger` and `projection_input`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalContent {
    pub client: ClientDetails,
    pub system: SystemDetails,
    /// Payment schedule, stages 1 to 4.
    pub payment_stages: [String; 4],
    pub ledger: QuotationLedger,
    pub totals: QuotationTotals,
    pub amount_in_words: String,
    pub projection_input: ProjectionInput,
    pub projection: Vec<ProjectionPoint>,
    #[serde(default)]
    pub extra_fields: ExtraFields,
}

/// A persisted proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: i64,
    pub content: ProposalContent,
    pub state: LifecycleState,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_state_round_trips_through_as_str() {
        for state in [
            LifecycleState::Active,
            LifecycleState::Recycled,
            LifecycleState::PermanentlyDeleted,
        ] {
            assert_eq!(LifecycleState::parse(state.as_str()), Some(state));
        }
        assert_eq!(LifecycleState::parse("deleted"), None);
    }
}
