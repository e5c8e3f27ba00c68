//! Year-by-year energy generation versus electricity cost projection.
//!
//! For year `y` in `1..=years_to_project`:
//!
//! ```text
//! generation(y) = yearly_generation_per_unit × (1 − generation_decrement_percent/100)^(y−1)
//! cost(y)       = yearly_consumption         × (1 + price_increment_percent/100)^(y−1)
//! ```
//!
//! Both series compound; year 1 is the raw input. The compounding factor is
//! carried at full precision and only the reported values are rounded to two
//! decimal places, so the series never drifts from the closed form.
//!
//! With [`ProjectionDirection::RightToLeft`] the finished series is reversed
//! by position. Year labels travel with their values, so the first point of a
//! right-to-left series is the last year.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use proposal_core::calculations::generate_series;
//! use proposal_core::{ProjectionDirection, ProjectionInput};
//!
//! let input = ProjectionInput {
//!     yearly_consumption: dec!(60000),
//!     yearly_generation_per_unit: dec!(1400),
//!     price_increment_percent: dec!(5),
//!     generation_decrement_percent: dec!(0.4),
//!     years_to_project: 3,
//!     direction: ProjectionDirection::LeftToRight,
//! };
//!
//! let series = generate_series(&input).unwrap();
//! let generation: Vec<_> = series.iter().map(|p| p.projected_generation).collect();
//! assert_eq!(generation, vec![dec!(1400), dec!(1394.40), dec!(1388.82)]);
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{growth_multiplier, round_half_up};
use crate::models::{ProjectionDirection, ProjectionInput, ProjectionPoint};

/// Longest series a projection may cover.
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// Errors raised while reading or evaluating projection inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("invalid projection input: {0}")]
    InvalidInput(String),
}

/// Generates the full projection series for `input`.
///
/// # Errors
///
/// Returns [`ProjectionError::InvalidInput`] if the year count exceeds
/// [`MAX_PROJECTION_YEARS`] or compounding overflows the decimal range.
pub fn generate_series(input: &ProjectionInput) -> Result<Vec<ProjectionPoint>, ProjectionError> {
    check_year_limit(input.years_to_project)?;

    let cost_step = growth_multiplier(input.price_increment_percent);
    let generation_step = growth_multiplier(-input.generation_decrement_percent);

    let mut cost_factor = Decimal::ONE;
    let mut generation_factor = Decimal::ONE;
    let mut series = Vec::new();

    for year in 1..=input.years_to_project {
        if year > 1 {
            cost_factor = compound(cost_factor, cost_step, year)?;
            generation_factor = compound(generation_factor, generation_step, year)?;
        }

        let projected_cost = scale(input.yearly_consumption, cost_factor, year)?;
        let projected_generation = scale(input.yearly_generation_per_unit, generation_factor, year)?;

        series.push(ProjectionPoint {
            year_label: year.to_string(),
            projected_cost: round_half_up(projected_cost),
            projected_generation: round_half_up(projected_generation),
        });
    }

    if input.direction == ProjectionDirection::RightToLeft {
        series.reverse();
    }

    debug!(
        years = input.years_to_project,
        direction = %input.direction,
        "projection series generated"
    );

    Ok(series)
}

/// Parses a year count: a whole number from 0 to [`MAX_PROJECTION_YEARS`].
///
/// `"10"` and `"10.0"` are accepted; `"-1"`, `"2.5"`, `"101"` and `"ten"`
/// are not.
pub fn parse_years(raw: &str) -> Result<u32, ProjectionError> {
    let trimmed = raw.trim();
    let value = trimmed.parse::<Decimal>().map_err(|_| {
        ProjectionError::InvalidInput(format!("years to project '{raw}' is not a number"))
    })?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(ProjectionError::InvalidInput(format!(
            "years to project must not be negative, got {value}"
        )));
    }
    if !value.fract().is_zero() {
        return Err(ProjectionError::InvalidInput(format!(
            "years to project must be a whole number, got {value}"
        )));
    }

    let years = value.trunc().to_u32().ok_or_else(|| {
        ProjectionError::InvalidInput(format!("years to project {value} is too large"))
    })?;
    check_year_limit(years)?;
    Ok(years)
}

fn check_year_limit(years: u32) -> Result<(), ProjectionError> {
    if years > MAX_PROJECTION_YEARS {
        return Err(ProjectionError::InvalidInput(format!(
            "years to project must be at most {MAX_PROJECTION_YEARS}, got {years}"
        )));
    }
    Ok(())
}

/// Parses a chart direction, see [`ProjectionDirection::parse`].
pub fn parse_direction(raw: &str) -> Result<ProjectionDirection, ProjectionError> {
    ProjectionDirection::parse(raw).ok_or_else(|| {
        ProjectionError::InvalidInput(format!(
            "direction '{raw}' must be LeftToRight or RightToLeft"
        ))
    })
}

fn compound(
    factor: Decimal,
    step: Decimal,
    year: u32,
) -> Result<Decimal, ProjectionError> {
    factor
        .checked_mul(step)
        .ok_or_else(|| overflow(year))
}

fn scale(
    base: Decimal,
    factor: Decimal,
    year: u32,
) -> Result<Decimal, ProjectionError> {
    base.checked_mul(factor).ok_or_else(|| overflow(year))
}

fn overflow(year: u32) -> ProjectionError {
    ProjectionError::InvalidInput(format!("projection overflows in year {year}"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn test_input() -> ProjectionInput {
        ProjectionInput {
            yearly_consumption: dec!(60000),
            yearly_generation_per_unit: dec!(1400),
            price_increment_percent: dec!(5),
            generation_decrement_percent: dec!(0.4),
            years_to_project: 3,
            direction: ProjectionDirection::LeftToRight,
        }
    }

    fn generation(series: &[ProjectionPoint]) -> Vec<Decimal> {
        series.iter().map(|p| p.projected_generation).collect()
    }

    fn cost(series: &[ProjectionPoint]) -> Vec<Decimal> {
        series.iter().map(|p| p.projected_cost).collect()
    }

    fn labels(series: &[ProjectionPoint]) -> Vec<&str> {
        series.iter().map(|p| p.year_label.as_str()).collect()
    }

    // =========================================================================
    // generate_series tests
    // =========================================================================

    #[test]
    fn generation_decays_compounding() {
        let series = generate_series(&test_input()).unwrap();

        assert_eq!(
            generation(&series),
            vec![dec!(1400), dec!(1394.40), dec!(1388.82)]
        );
    }

    #[test]
    fn cost_grows_compounding() {
        let series = generate_series(&test_input()).unwrap();

        assert_eq!(cost(&series), vec![dec!(60000), dec!(63000), dec!(66150)]);
    }

    #[test]
    fn labels_are_one_based() {
        let series = generate_series(&test_input()).unwrap();

        assert_eq!(labels(&series), vec!["1", "2", "3"]);
    }

    #[test]
    fn zero_years_is_empty() {
        let input = ProjectionInput {
            years_to_project: 0,
            ..test_input()
        };

        assert!(generate_series(&input).unwrap().is_empty());
    }

    #[test]
    fn one_year_returns_base_inputs() {
        let input = ProjectionInput {
            years_to_project: 1,
            ..test_input()
        };

        let series = generate_series(&input).unwrap();

        assert_eq!(
            series,
            vec![ProjectionPoint {
                year_label: "1".to_string(),
                projected_cost: dec!(60000),
                projected_generation: dec!(1400),
            }]
        );
    }

    #[test]
    fn right_to_left_reverses_positions_not_labels() {
        let forward = generate_series(&test_input()).unwrap();
        let backward = generate_series(&ProjectionInput {
            direction: ProjectionDirection::RightToLeft,
            ..test_input()
        })
        .unwrap();

        let mut expected = forward.clone();
        expected.reverse();
        assert_eq!(backward, expected);
        assert_eq!(labels(&backward), vec!["3", "2", "1"]);
    }

    #[test]
    fn negative_percentages_invert_trends() {
        let input = ProjectionInput {
            price_increment_percent: dec!(-10),
            generation_decrement_percent: dec!(-10),
            ..test_input()
        };

        let series = generate_series(&input).unwrap();

        assert_eq!(cost(&series), vec![dec!(60000), dec!(54000), dec!(48600)]);
        assert_eq!(generation(&series), vec![dec!(1400), dec!(1540), dec!(1694)]);
    }

    #[test]
    fn generation_is_idempotent() {
        let input = ProjectionInput {
            years_to_project: 25,
            ..test_input()
        };

        assert_eq!(generate_series(&input), generate_series(&input));
    }

    #[test]
    fn long_series_matches_closed_form() {
        let input = ProjectionInput {
            years_to_project: 25,
            ..test_input()
        };

        let series = generate_series(&input).unwrap();
        let last = &series[24];

        // 1400 × 0.996^24 = 1271.6048, 60000 × 1.05^24 = 193505.9966
        assert_eq!(last.year_label, "25");
        assert_eq!(last.projected_generation, dec!(1271.60));
        assert_eq!(last.projected_cost, dec!(193506.00));
    }

    #[test]
    fn overflow_is_reported() {
        let input = ProjectionInput {
            yearly_consumption: Decimal::MAX,
            price_increment_percent: dec!(100),
            years_to_project: 2,
            ..test_input()
        };

        assert!(matches!(
            generate_series(&input),
            Err(ProjectionError::InvalidInput(_))
        ));
    }

    // =========================================================================
    // parse_years / parse_direction tests
    // =========================================================================

    #[test]
    fn parse_years_accepts_whole_numbers() {
        assert_eq!(parse_years("25"), Ok(25));
        assert_eq!(parse_years(" 10.0 "), Ok(10));
        assert_eq!(parse_years("0"), Ok(0));
    }

    #[test]
    fn parse_years_rejects_fraction() {
        assert!(matches!(parse_years("2.5"), Err(ProjectionError::InvalidInput(_))));
    }

    #[test]
    fn parse_years_rejects_negative() {
        assert!(matches!(parse_years("-1"), Err(ProjectionError::InvalidInput(_))));
    }

    #[test]
    fn parse_years_caps_series_length() {
        assert_eq!(parse_years("100"), Ok(MAX_PROJECTION_YEARS));
        assert!(matches!(parse_years("101"), Err(ProjectionError::InvalidInput(_))));
        assert!(matches!(
            parse_years("4294967295"),
            Err(ProjectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn generate_rejects_year_count_past_limit() {
        let input = ProjectionInput {
            years_to_project: u32::MAX,
            ..test_input()
        };

        assert!(matches!(generate_series(&input), Err(ProjectionError::InvalidInput(_))));
    }

    #[test]
    fn parse_years_rejects_text() {
        assert!(matches!(parse_years("ten"), Err(ProjectionError::InvalidInput(_))));
    }

    #[test]
    fn parse_direction_rejects_unknown() {
        assert!(parse_direction("up").is_err());
        assert_eq!(parse_direction("rtl"), Ok(ProjectionDirection::RightToLeft));
    }
}
