use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order in which projection points are laid out for the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl ProjectionDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeftToRight => "LeftToRight",
            Self::RightToLeft => "RightToLeft",
        }
    }

    /// Accepts the variant name or the short `ltr` / `rtl` forms, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lefttoright" | "left-to-right" | "ltr" => Some(Self::LeftToRight),
            "righttoleft" | "right-to-left" | "rtl" => Some(Self::RightToLeft),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectionDirection {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar inputs of the generation-vs-cost projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Yearly electricity cost in the first year.
    pub yearly_consumption: Decimal,
    /// Yearly solar generation in the first year.
    pub yearly_generation_per_unit: Decimal,
    /// Yearly tariff escalation, in percent.
    pub price_increment_percent: Decimal,
    /// Yearly panel degradation, in percent.
    pub generation_decrement_percent: Decimal,
    pub years_to_project: u32,
    pub direction: ProjectionDirection,
}

/// One year of the projection series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// 1-based year number as text; not renumbered when the series is reversed.
    pub year_label: String,
    pub projected_cost: Decimal,
    pub projected_generation: Decimal,
}
