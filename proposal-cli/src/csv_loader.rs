//! CSV loader for quotation line items.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does **not** matter. Header
//! names are case-sensitive and must match exactly.
//!
//! | Column        | Required | Type    | Notes                                       |
//! |---------------|----------|---------|---------------------------------------------|
//! | `description` | yes      | string  | Shown on the quotation as-is; may be empty  |
//! | `unit_price`  | yes      | decimal | `59,000` accepted; bad or negative → `0`    |
//! | `quantity`    | yes      | integer | Bad or negative → `0`                       |
//! | `note`        | no       | string  | Leave cell empty (or drop the column)       |
//!
//! Price and quantity cells are read as text and go through
//! [`LineItem::from_raw`], so a typo zeroes that cell (with a warning) instead
//! of rejecting the whole file. Structural problems such as a missing column or
//! a ragged row are still errors.
//!
//! ### Example
//!
//! ```csv
//! description,unit_price,quantity,note
//! Mono PERC panel 540Wp,59000,9,
//! String inverter 5kW,0,1,bundled with panels
//! ```
use proposal_core::LineItem;
use serde::Deserialize;
use tracing::debug;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    description: String,
    unit_price: String,
    quantity: String,
    #[serde(default)]
    note: String,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading line items.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(row: CsvRow) -> LineItem {
    LineItem::from_raw(&row.description, &row.unit_price, &row.quantity, &row.note)
}

/// Parse CSV text and return the line items in file order.
///
/// # Errors
///
/// Returns [CsvLoadError::Parse] if the CSV is structurally invalid.
pub fn load_from_str(input: &str) -> Result<Vec<LineItem>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    let items = reader
        .deserialize::<CsvRow>()
        .map(|result| result.map(convert_row))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = items.len(), "line items loaded");
    Ok(items)
}

/// Read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &std::path::Path) -> Result<Vec<LineItem>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const QUOTE_CSV: &str = "\
description,unit_price,quantity,note
Panel,59000,9,
Inverter,0,1,bundled
";

    // -----------------------------------------------------------------------
    // Happy paths
    // -----------------------------------------------------------------------

    #[test]
    fn test_load_keeps_file_order() {
        let items = load_from_str(QUOTE_CSV).unwrap();

        assert_eq!(
            items,
            vec![
                LineItem::new("Panel", dec!(59000), 9, ""),
                LineItem::new("Inverter", dec!(0), 1, "bundled"),
            ]
        );
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let csv = "\
quantity,note,description,unit_price
2,roof,Structure,1500.50
";
        let items = load_from_str(csv).unwrap();

        assert_eq!(items, vec![LineItem::new("Structure", dec!(1500.50), 2, "roof")]);
    }

    #[test]
    fn test_note_column_is_optional() {
        let csv = "\
description,unit_price,quantity
Panel,100,1
";
        let items = load_from_str(csv).unwrap();

        assert_eq!(items[0].note, "");
    }

    #[test]
    fn test_whitespace_and_thousands_separators() {
        let csv = "\
description,unit_price,quantity,note
  Panel  , \"59,000\" , 9 ,
";
        let items = load_from_str(csv).unwrap();

        assert_eq!(items[0].description, "Panel");
        assert_eq!(items[0].unit_price, dec!(59000));
        assert_eq!(items[0].quantity, 9);
    }

    #[test]
    fn test_header_only_yields_no_items() {
        let items = load_from_str("description,unit_price,quantity,note\n").unwrap();

        assert!(items.is_empty());
    }

    // -----------------------------------------------------------------------
    // Permissive numeric cells
    // -----------------------------------------------------------------------

    #[test]
    fn test_unreadable_numbers_become_zero() {
        let csv = "\
description,unit_price,quantity,note
Panel,abc,-3,
Cable,-10,two,
";
        let items = load_from_str(csv).unwrap();

        assert_eq!(items[0].unit_price, Decimal::ZERO);
        assert_eq!(items[0].quantity, 0);
        assert_eq!(items[1].unit_price, Decimal::ZERO);
        assert_eq!(items[1].quantity, 0);
    }

    // -----------------------------------------------------------------------
    // Error paths
    // -----------------------------------------------------------------------

    #[test]
    fn test_missing_required_column_is_parse_error() {
        let csv = "\
description,quantity
Panel,1
";
        assert!(matches!(load_from_str(csv), Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let csv = "\
description,unit_price,quantity,note
Panel,100,1,,extra
";
        assert!(matches!(load_from_str(csv), Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn test_blank_description_is_loaded() {
        let csv = "\
description,unit_price,quantity,note
Panel,100,1,
,200,1,spare
";
        let items = load_from_str(csv).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1], LineItem::new("", dec!(200), 1, "spare"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_from_file(std::path::Path::new("/definitely/not/here.csv"));

        assert!(matches!(result, Err(CsvLoadError::Io { .. })));
    }
}
