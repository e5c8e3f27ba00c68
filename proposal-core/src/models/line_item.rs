use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One priced row of a quotation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub note: String,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
        note: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            unit_price,
            quantity,
            note: note.into(),
        }
    }

    /// Builds an item from editor text. Price and quantity that cannot be
    /// read as non-negative numbers become zero.
    pub fn from_raw(
        description: &str,
        unit_price: &str,
        quantity: &str,
        note: &str,
    ) -> Self {
        Self {
            description: description.to_string(),
            unit_price: price_or_zero(unit_price),
            quantity: quantity_or_zero(quantity),
            note: note.to_string(),
        }
    }

    /// `unit_price × quantity`, or `None` when the product overflows.
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Reads a non-negative price; anything else is zero.
///
/// Accepts a comma thousands separator (`"59,000"`).
pub fn price_or_zero(raw: &str) -> Decimal {
    let normalized = raw.trim().replace(',', "");
    if normalized.is_empty() {
        return Decimal::ZERO;
    }
    match normalized.parse::<Decimal>() {
        Ok(price) if !price.is_sign_negative() => price,
        Ok(price) => {
            warn!(input = %raw, %price, "negative unit price replaced with zero");
            Decimal::ZERO
        }
        Err(e) => {
            warn!(input = %raw, "unparsable unit price replaced with zero: {}", e);
            Decimal::ZERO
        }
    }
}

/// Reads a non-negative whole quantity; anything else is zero.
pub fn quantity_or_zero(raw: &str) -> u32 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    trimmed.parse::<u32>().unwrap_or_else(|e| {
        warn!(input = %raw, "unparsable quantity replaced with zero: {}", e);
        0
    })
}
