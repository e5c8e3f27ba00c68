//! Quotation and projection calculations for solar proposals.
//!
//! This module provides the pure computations behind a proposal: the priced
//! line-item ledger with its tax and worded total, and the multi-year
//! generation-versus-cost projection used for the comparison chart.

pub mod common;
pub mod number_words;
pub mod projection;
pub mod quotation;

pub use number_words::{CURRENCY_SUFFIX, NumberWordsError, to_words};
pub use projection::{
    MAX_PROJECTION_YEARS, ProjectionError, generate_series, parse_direction, parse_years,
};
pub use quotation::{LedgerError, LedgerField, QuotationLedger, QuotationTotals};
