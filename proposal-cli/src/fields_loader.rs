//! TOML loader for proposal form fields.
//!
//! Top-level keys are the camelCase field names of the proposal form. Values
//! may be strings or plain numbers; numbers are kept as their text. The
//! optional `[extra]` table holds free-form fields whose values are a string
//! or an array of strings.
//!
//! ```toml
//! clientName = "Meera Iyer"
//! yearsToProject = 25
//! direction = "LeftToRight"
//!
//! [extra]
//! panelBrands = ["Waaree", "Adani"]
//! siteVisit = "2026-03-14"
//! ```
//!
//! Keys outside the form are skipped with a warning. Missing keys are not an
//! error here; submitting the draft reports them.

use std::path::Path;

use proposal_core::proposal::REQUIRED_FIELDS;
use proposal_core::{ExtraFields, ProposalDraft};
use thiserror::Error;
use toml::{Table, Value};
use tracing::{debug, warn};

const EXTRA_TABLE: &str = "extra";

#[derive(Debug, Error)]
pub enum FieldsLoadError {
    #[error("invalid fields file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A form field holding a table, array, boolean or datetime.
    #[error("field '{key}' must be a string or number, found {kind}")]
    UnsupportedValue { key: String, kind: &'static str },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Parses `input` into a fresh draft with an empty ledger.
pub fn load_from_str(input: &str) -> Result<ProposalDraft, FieldsLoadError> {
    let mut table: Table = toml::from_str(input)?;
    let mut draft = ProposalDraft::blank();

    if let Some(extra) = table.remove(EXTRA_TABLE) {
        let extra: ExtraFields = extra.try_into()?;
        draft.extra_fields = extra;
    }

    for (key, value) in table {
        if !REQUIRED_FIELDS.contains(&key.as_str()) {
            warn!(key = %key, "unknown proposal field skipped");
            continue;
        }
        let text = match value {
            Value::String(s) => s,
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            other => {
                return Err(FieldsLoadError::UnsupportedValue {
                    key,
                    kind: other.type_str(),
                });
            }
        };
        draft.set_field(key, text);
    }

    debug!(
        fields = draft.fields.len(),
        extra = draft.extra_fields.len(),
        "proposal fields loaded"
    );
    Ok(draft)
}

pub fn load_from_file(path: &Path) -> Result<ProposalDraft, FieldsLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| FieldsLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proposal_core::ExtraFieldValue;

    use super::*;

    #[test]
    fn strings_and_numbers_become_field_text() {
        let draft = load_from_str(
            r#"
            clientName = "Meera Iyer"
            yearsToProject = 25
            generationDecrementPercent = 0.4
            "#,
        )
        .unwrap();

        assert_eq!(draft.field("clientName"), Some("Meera Iyer"));
        assert_eq!(draft.field("yearsToProject"), Some("25"));
        assert_eq!(draft.field("generationDecrementPercent"), Some("0.4"));
        assert_eq!(draft.id, None);
        assert!(draft.ledger.is_empty());
    }

    #[test]
    fn extra_table_fills_free_form_fields() {
        let draft = load_from_str(
            r#"
            clientName = "A"

            [extra]
            panelBrands = ["Waaree", "Adani"]
            siteVisit = "morning"
            "#,
        )
        .unwrap();

        assert_eq!(
            draft.extra_fields.get("panelBrands"),
            Some(&ExtraFieldValue::List(vec![
                "Waaree".to_string(),
                "Adani".to_string()
            ]))
        );
        assert_eq!(
            draft.extra_fields.get("siteVisit"),
            Some(&ExtraFieldValue::Text("morning".to_string()))
        );
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let draft = load_from_str("clientNmae = \"typo\"\n").unwrap();

        assert!(draft.fields.is_empty());
    }

    #[test]
    fn boolean_field_is_rejected() {
        assert!(matches!(
            load_from_str("stage1 = true\n"),
            Err(FieldsLoadError::UnsupportedValue { key, kind: "boolean" }) if key == "stage1"
        ));
    }

    #[test]
    fn numeric_extra_value_is_rejected() {
        assert!(matches!(
            load_from_str("[extra]\npanels = 9\n"),
            Err(FieldsLoadError::Parse(_))
        ));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(
            load_from_str("clientName = \n"),
            Err(FieldsLoadError::Parse(_))
        ));
    }
}
