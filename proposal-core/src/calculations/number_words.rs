//! Currency amounts in English words.
//!
//! Used to print the quotation total on a proposal ("Six Hundred Four
//! Thousand, Two Hundred Seventy-eight Rupees"). Grouping follows the short
//! scale; the fractional part of the amount is truncated, so callers round to
//! a whole currency unit first.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use proposal_core::calculations::to_words;
//!
//! assert_eq!(to_words(dec!(0)).unwrap(), "Zero Rupees");
//! assert_eq!(
//!     to_words(dec!(604278)).unwrap(),
//!     "Six Hundred Four Thousand, Two Hundred Seventy-eight Rupees"
//! );
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// Suffix appended to every worded amount.
pub const CURRENCY_SUFFIX: &str = "Rupees";

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

// Index 0 is the units group.
const SCALES: [&str; 10] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
    "sextillion",
    "septillion",
    "octillion",
];

/// Errors that can occur while wording an amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NumberWordsError {
    /// The amount was below zero.
    #[error("amount must not be negative: {0}")]
    InvalidAmount(Decimal),
}

/// Converts a non-negative currency amount into capitalized English words
/// followed by [`CURRENCY_SUFFIX`].
///
/// # Errors
///
/// Returns [`NumberWordsError::InvalidAmount`] when `amount` is negative.
pub fn to_words(amount: Decimal) -> Result<String, NumberWordsError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(NumberWordsError::InvalidAmount(amount));
    }

    // Decimal's 96-bit mantissa always fits in u128.
    let whole = amount.trunc().to_u128().unwrap_or_default();
    let words = integer_to_words(whole);

    Ok(format!("{} {}", capitalize_words(&words), CURRENCY_SUFFIX))
}

/// Lower-case words for a whole number, e.g. `"one thousand, five"`.
fn integer_to_words(mut value: u128) -> String {
    if value == 0 {
        return ONES[0].to_string();
    }

    let mut groups = Vec::new();
    let mut scale = 0;
    while value > 0 {
        let group = (value % 1000) as usize;
        if group > 0 {
            let mut text = group_to_words(group);
            if !SCALES[scale].is_empty() {
                text.push(' ');
                text.push_str(SCALES[scale]);
            }
            groups.push(text);
        }
        value /= 1000;
        scale += 1;
    }

    groups.reverse();
    groups.join(", ")
}

/// Words for 1..=999.
fn group_to_words(group: usize) -> String {
    let hundreds = group / 100;
    let rest = group % 100;

    let mut parts = Vec::with_capacity(2);
    if hundreds > 0 {
        parts.push(format!("{} hundred", ONES[hundreds]));
    }
    if rest > 0 {
        parts.push(tens_to_words(rest));
    }
    parts.join(" ")
}

/// Words for 1..=99, hyphenating compound tens.
fn tens_to_words(value: usize) -> String {
    if value < 20 {
        return ONES[value].to_string();
    }
    match value % 10 {
        0 => TENS[value / 10].to_string(),
        unit => format!("{}-{}", TENS[value / 10], ONES[unit]),
    }
}

/// Upper-cases the first letter of each whitespace-separated word.
fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn zero_is_worded() {
        assert_eq!(to_words(dec!(0)).unwrap(), "Zero Rupees");
    }

    #[test]
    fn negative_zero_is_treated_as_zero() {
        assert_eq!(to_words(-dec!(0)).unwrap(), "Zero Rupees");
    }

    #[test]
    fn negative_amount_is_rejected() {
        assert_eq!(
            to_words(dec!(-1)),
            Err(NumberWordsError::InvalidAmount(dec!(-1)))
        );
    }

    #[test]
    fn teens_and_tens() {
        assert_eq!(to_words(dec!(13)).unwrap(), "Thirteen Rupees");
        assert_eq!(to_words(dec!(40)).unwrap(), "Forty Rupees");
        assert_eq!(to_words(dec!(99)).unwrap(), "Ninety-nine Rupees");
    }

    #[test]
    fn hundreds_without_and() {
        assert_eq!(to_words(dec!(105)).unwrap(), "One Hundred Five Rupees");
        assert_eq!(to_words(dec!(700)).unwrap(), "Seven Hundred Rupees");
    }

    #[test]
    fn scale_groups_are_comma_separated() {
        assert_eq!(
            to_words(dec!(604278)).unwrap(),
            "Six Hundred Four Thousand, Two Hundred Seventy-eight Rupees"
        );
    }

    #[test]
    fn empty_groups_are_skipped() {
        assert_eq!(to_words(dec!(1000000)).unwrap(), "One Million Rupees");
        assert_eq!(
            to_words(dec!(2000015)).unwrap(),
            "Two Million, Fifteen Rupees"
        );
    }

    #[test]
    fn fraction_is_truncated() {
        assert_eq!(to_words(dec!(12.99)).unwrap(), "Twelve Rupees");
    }

    #[test]
    fn largest_decimal_is_worded() {
        let words = to_words(Decimal::MAX).unwrap();

        assert!(words.starts_with("Seventy-nine Octillion"));
        assert!(words.ends_with(" Rupees"));
    }
}
