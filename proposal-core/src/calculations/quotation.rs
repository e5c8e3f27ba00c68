//! Quotation ledger: ordered line items plus a single tax rate.
//!
//! Totals are derived on demand from the current items and tax rate, so there
//! is no cached state that can go stale after an edit. Tax is charged once on
//! the aggregate subtotal rather than per line, which keeps the total free of
//! per-line rounding drift.
//!
//! | Value        | Rule                                              |
//! |--------------|---------------------------------------------------|
//! | `subtotal`   | Σ `unit_price × quantity`                         |
//! | `tax_amount` | `subtotal × tax_percent / 100`, rounded to 2 dp   |
//! | `total`      | `subtotal + tax_amount`                           |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use proposal_core::LineItem;
//! use proposal_core::calculations::QuotationLedger;
//!
//! let mut ledger = QuotationLedger::new(dec!(13.8)).unwrap();
//! ledger.add_item(LineItem::new("Panel", dec!(59000), 9, ""));
//! ledger.add_item(LineItem::new("Inverter", dec!(0), 1, ""));
//!
//! let totals = ledger.totals().unwrap();
//! assert_eq!(totals.subtotal, dec!(531000));
//! assert_eq!(totals.tax_amount, dec!(73278));
//! assert_eq!(totals.total, dec!(604278));
//! assert_eq!(
//!     ledger.amount_in_words().unwrap(),
//!     "Six Hundred Four Thousand, Two Hundred Seventy-eight Rupees"
//! );
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{percent_of, round_half_up, round_to_unit};
use crate::calculations::number_words::{NumberWordsError, to_words};
use crate::models::line_item::{LineItem, price_or_zero, quantity_or_zero};

/// Errors raised by ledger edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// An item index past the end of the ledger.
    #[error("line item index {index} out of range (ledger has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A negative tax percentage.
    #[error("tax percent must not be negative: {0}")]
    InvalidAmount(Decimal),

    /// A line, subtotal or tax amount too large for a `Decimal`.
    #[error("quotation amount overflows")]
    Overflow,

    #[error(transparent)]
    Words(#[from] NumberWordsError),
}

/// A single editable field of a [`LineItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerField {
    Description,
    UnitPrice,
    Quantity,
    Note,
}

/// Derived totals of a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuotationTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Ordered line items and the tax rate applied to their sum.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuotationLedger {
    items: Vec<LineItem>,
    tax_percent: Decimal,
}

impl QuotationLedger {
    /// Creates an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidAmount`] if `tax_percent` is negative.
    pub fn new(tax_percent: Decimal) -> Result<Self, LedgerError> {
        let mut ledger = Self::default();
        ledger.set_tax_percent(tax_percent)?;
        Ok(ledger)
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn tax_percent(&self) -> Decimal {
        self.tax_percent
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn set_tax_percent(
        &mut self,
        tax_percent: Decimal,
    ) -> Result<(), LedgerError> {
        if tax_percent.is_sign_negative() && !tax_percent.is_zero() {
            return Err(LedgerError::InvalidAmount(tax_percent));
        }
        self.tax_percent = tax_percent;
        Ok(())
    }

    /// Appends an item. A negative unit price is stored as zero.
    pub fn add_item(
        &mut self,
        mut item: LineItem,
    ) {
        if item.unit_price.is_sign_negative() {
            warn!(description = %item.description, price = %item.unit_price, "negative unit price replaced with zero");
            item.unit_price = Decimal::ZERO;
        }
        self.items.push(item);
    }

    /// Replaces one field of the item at `index` with editor text.
    ///
    /// Numeric fields follow the same zero-on-garbage rule as
    /// [`LineItem::from_raw`].
    pub fn update_item(
        &mut self,
        index: usize,
        field: LedgerField,
        value: &str,
    ) -> Result<(), LedgerError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;

        match field {
            LedgerField::Description => item.description = value.to_string(),
            LedgerField::UnitPrice => item.unit_price = price_or_zero(value),
            LedgerField::Quantity => item.quantity = quantity_or_zero(value),
            LedgerField::Note => item.note = value.to_string(),
        }
        Ok(())
    }

    /// Removes and returns the item at `index`; later items shift down.
    pub fn remove_item(
        &mut self,
        index: usize,
    ) -> Result<LineItem, LedgerError> {
        if index >= self.items.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Computes subtotal, tax and total from the current state.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] if any amount exceeds the `Decimal`
    /// range.
    pub fn totals(&self) -> Result<QuotationTotals, LedgerError> {
        let subtotal = self.items.iter().try_fold(Decimal::ZERO, |sum, item| {
            item.line_total()
                .and_then(|line| sum.checked_add(line))
                .ok_or(LedgerError::Overflow)
        })?;
        let tax_amount = percent_of(subtotal, self.tax_percent)
            .map(round_half_up)
            .ok_or(LedgerError::Overflow)?;
        let total = subtotal
            .checked_add(tax_amount)
            .ok_or(LedgerError::Overflow)?;

        debug!(%subtotal, %tax_amount, %total, items = self.items.len(), "quotation totals");

        Ok(QuotationTotals {
            subtotal,
            tax_amount,
            total,
        })
    }

    /// The total, rounded to a whole currency unit, in words.
    pub fn amount_in_words(&self) -> Result<String, LedgerError> {
        Ok(to_words(round_to_unit(self.totals()?.total))?)
    }
}
