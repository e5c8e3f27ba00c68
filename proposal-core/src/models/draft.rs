use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calculations::QuotationLedger;
use crate::models::proposal::{ExtraFieldValue, ExtraFields};

/// Unsubmitted proposal form state.
///
/// `fields` holds the raw values of the required set keyed by their boundary
/// names (`clientName`, `yearsToProject`, ...). A draft with an `id` edits an
/// existing proposal; submitting it replaces that proposal wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProposalDraft {
    pub id: Option<i64>,
    pub fields: BTreeMap<String, String>,
    pub ledger: QuotationLedger,
    pub extra_fields: ExtraFields,
}

impl ProposalDraft {
    /// The canonical empty draft. Reset the form with this after a
    /// successful submit.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Starts a draft that will replace proposal `id` on submit.
    pub fn editing(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::blank()
        }
    }

    pub fn set_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.fields.insert(name.into(), value.into());
    }

    /// Trimmed value of `name`; empty and missing both read as `None`.
    pub fn field(
        &self,
        name: &str,
    ) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn set_extra(
        &mut self,
        name: impl Into<String>,
        value: ExtraFieldValue,
    ) {
        self.extra_fields.insert(name.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn blank_draft_is_empty() {
        let draft = ProposalDraft::blank();

        assert_eq!(draft.id, None);
        assert!(draft.fields.is_empty());
        assert!(draft.ledger.is_empty());
        assert!(draft.extra_fields.is_empty());
    }

    #[test]
    fn editing_draft_carries_id() {
        assert_eq!(ProposalDraft::editing(7).id, Some(7));
    }

    #[test]
    fn empty_and_missing_fields_both_read_as_absent() {
        let mut draft = ProposalDraft::blank();
        draft.set_field("clientName", "   ");

        assert_eq!(draft.field("clientName"), None);
        assert_eq!(draft.field("clientPhone"), None);
    }

    #[test]
    fn field_is_trimmed() {
        let mut draft = ProposalDraft::blank();
        draft.set_field("clientName", "  Asha Rao ");

        assert_eq!(draft.field("clientName"), Some("Asha Rao"));
    }
}
