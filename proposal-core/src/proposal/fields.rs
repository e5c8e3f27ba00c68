//! The required field set and its conversion into a frozen proposal.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::{generate_series, parse_direction, parse_years};
use crate::error::{ProposalError, ValidationError};
use crate::models::{ClientDetails, ProjectionInput, ProposalContent, ProposalDraft, SystemDetails};

pub const CLIENT_NAME: &str = "clientName";
pub const CLIENT_PHONE: &str = "clientPhone";
pub const CLIENT_EMAIL: &str = "clientEmail";
pub const CLIENT_ADDRESS: &str = "clientAddress";
pub const CUSTOMER_TYPE: &str = "customerType";
pub const PROJECT_SIZE: &str = "projectSize";
pub const CONSUMPTION: &str = "consumption";
pub const ELECTRICITY_RATE: &str = "electricityRate";
pub const GENERATION: &str = "generation";
pub const WARRANTY: &str = "warranty";
pub const PROPOSAL_WATT_PEAK: &str = "proposalWattPeak";
pub const INVERTER_WARRANTY: &str = "inverterWarranty";
pub const PERFORMANCE_WARRANTY: &str = "performanceWarranty";
pub const QUANTITY: &str = "quantity";
pub const INVERTER_SIZE: &str = "inverterSize";
pub const INVERTER_QUANTITY: &str = "inverterQuantity";
pub const PROPOSAL_STRUCTURE: &str = "proposalStructure";
pub const STRUCTURE_DESCRIPTION: &str = "structureDescription";
pub const SYSTEM_WARRANTY: &str = "systemWarranty";
pub const STAGE_1: &str = "stage1";
pub const STAGE_2: &str = "stage2";
pub const STAGE_3: &str = "stage3";
pub const STAGE_4: &str = "stage4";
pub const YEARLY_CONSUMPTION: &str = "yearlyConsumption";
pub const YEARLY_SOLAR_GENERATION: &str = "yearlySolarGeneration";
pub const GENERATION_DECREMENT_PERCENT: &str = "generationDecrementPercent";
pub const YEARS_TO_PROJECT: &str = "yearsToProject";
pub const PRICE_INCREMENT_PERCENT: &str = "priceIncrementPercent";
pub const DIRECTION: &str = "direction";

/// Every field a draft must fill before it can be submitted, in the order
/// they are reported when missing.
pub const REQUIRED_FIELDS: [&str; 29] = [
    CLIENT_NAME,
    CLIENT_PHONE,
    CLIENT_EMAIL,
    CLIENT_ADDRESS,
    CUSTOMER_TYPE,
    PROJECT_SIZE,
    CONSUMPTION,
    ELECTRICITY_RATE,
    GENERATION,
    WARRANTY,
    PROPOSAL_WATT_PEAK,
    INVERTER_WARRANTY,
    PERFORMANCE_WARRANTY,
    QUANTITY,
    INVERTER_SIZE,
    INVERTER_QUANTITY,
    PROPOSAL_STRUCTURE,
    STRUCTURE_DESCRIPTION,
    SYSTEM_WARRANTY,
    STAGE_1,
    STAGE_2,
    STAGE_3,
    STAGE_4,
    YEARLY_CONSUMPTION,
    YEARLY_SOLAR_GENERATION,
    GENERATION_DECREMENT_PERCENT,
    YEARS_TO_PROJECT,
    PRICE_INCREMENT_PERCENT,
    DIRECTION,
];

/// Required fields that are missing or blank in `draft`.
pub fn missing_fields(draft: &ProposalDraft) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|name| draft.field(name).is_none())
        .map(|name| name.to_string())
        .collect()
}

/// Validates `draft` and computes everything frozen into a proposal: ledger
/// totals, the worded amount and the projection series.
///
/// # Errors
///
/// * [`ProposalError::Validation`]: a required field is missing, or one of
///   the projection amounts is not a number.
/// * [`ProposalError::InvalidProjectionInput`]: bad year count or direction,
///   or the projection overflows.
pub fn build_content(draft: &ProposalDraft) -> Result<ProposalContent, ProposalError> {
    let missing = missing_fields(draft);
    if !missing.is_empty() {
        return Err(ValidationError {
            missing_fields: missing,
            malformed_fields: Vec::new(),
        }
        .into());
    }

    let projection_input = projection_input(draft)?;
    let totals = draft.ledger.totals()?;
    let amount_in_words = draft.ledger.amount_in_words()?;
    let projection = generate_series(&projection_input)?;

    debug!(
        client = %draft.field(CLIENT_NAME).unwrap_or_default(),
        total = %totals.total,
        years = projection.len(),
        "proposal content built"
    );

    Ok(ProposalContent {
        client: ClientDetails {
            name: text(draft, CLIENT_NAME),
            phone: text(draft, CLIENT_PHONE),
            email: text(draft, CLIENT_EMAIL),
            address: text(draft, CLIENT_ADDRESS),
            customer_type: text(draft, CUSTOMER_TYPE),
        },
        system: SystemDetails {
            project_size: text(draft, PROJECT_SIZE),
            consumption: text(draft, CONSUMPTION),
            electricity_rate: text(draft, ELECTRICITY_RATE),
            generation: text(draft, GENERATION),
            warranty: text(draft, WARRANTY),
            proposal_watt_peak: text(draft, PROPOSAL_WATT_PEAK),
            inverter_warranty: text(draft, INVERTER_WARRANTY),
            performance_warranty: text(draft, PERFORMANCE_WARRANTY),
            quantity: text(draft, QUANTITY),
            inverter_size: text(draft, INVERTER_SIZE),
            inverter_quantity: text(draft, INVERTER_QUANTITY),
            proposal_structure: text(draft, PROPOSAL_STRUCTURE),
            structure_description: text(draft, STRUCTURE_DESCRIPTION),
            system_warranty: text(draft, SYSTEM_WARRANTY),
        },
        payment_stages: [
            text(draft, STAGE_1),
            text(draft, STAGE_2),
            text(draft, STAGE_3),
            text(draft, STAGE_4),
        ],
        ledger: draft.ledger.clone(),
        totals,
        amount_in_words,
        projection_input,
        projection,
        extra_fields: draft.extra_fields.clone(),
    })
}

/// Reads the projection inputs of a draft whose required fields are present.
pub fn projection_input(draft: &ProposalDraft) -> Result<ProjectionInput, ProposalError> {
    let mut malformed = Vec::new();
    let mut amount = |name: &str| match draft.field(name).and_then(parse_amount) {
        Some(value) => value,
        None => {
            malformed.push(name.to_string());
            Decimal::ZERO
        }
    };

    let yearly_consumption = amount(YEARLY_CONSUMPTION);
    let yearly_generation_per_unit = amount(YEARLY_SOLAR_GENERATION);
    let price_increment_percent = amount(PRICE_INCREMENT_PERCENT);
    let generation_decrement_percent = amount(GENERATION_DECREMENT_PERCENT);

    if !malformed.is_empty() {
        return Err(ValidationError {
            missing_fields: Vec::new(),
            malformed_fields: malformed,
        }
        .into());
    }

    Ok(ProjectionInput {
        yearly_consumption,
        yearly_generation_per_unit,
        price_increment_percent,
        generation_decrement_percent,
        years_to_project: parse_years(draft.field(YEARS_TO_PROJECT).unwrap_or_default())?,
        direction: parse_direction(draft.field(DIRECTION).unwrap_or_default())?,
    })
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    raw.replace(',', "").parse().ok()
}

fn text(
    draft: &ProposalDraft,
    name: &str,
) -> String {
    draft.field(name).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::LineItem;
    use crate::models::ProjectionDirection;

    fn complete_draft() -> ProposalDraft {
        let mut draft = ProposalDraft::blank();
        for name in REQUIRED_FIELDS {
            draft.set_field(name, "x");
        }
        draft.set_field(YEARLY_CONSUMPTION, "60,000");
        draft.set_field(YEARLY_SOLAR_GENERATION, "1400");
        draft.set_field(GENERATION_DECREMENT_PERCENT, "0.4");
        draft.set_field(PRICE_INCREMENT_PERCENT, "5");
        draft.set_field(YEARS_TO_PROJECT, "3");
        draft.set_field(DIRECTION, "LeftToRight");
        draft.ledger.set_tax_percent(dec!(13.8)).unwrap();
        draft.ledger.add_item(LineItem::new("Panel", dec!(59000), 9, ""));
        draft
    }

    #[test]
    fn required_fields_are_unique() {
        let mut names = REQUIRED_FIELDS.to_vec();
        names.sort_unstable();
        names.dedup();

        assert_eq!(names.len(), REQUIRED_FIELDS.len());
    }

    #[test]
    fn blank_draft_misses_every_field() {
        assert_eq!(missing_fields(&ProposalDraft::blank()).len(), REQUIRED_FIELDS.len());
    }

    #[test]
    fn missing_fields_keep_canonical_order() {
        let mut draft = complete_draft();
        draft.set_field(DIRECTION, "");
        draft.fields.remove(CLIENT_EMAIL);

        assert_eq!(missing_fields(&draft), vec!["clientEmail", "direction"]);
    }

    #[test]
    fn build_content_freezes_calculations() {
        let content = build_content(&complete_draft()).unwrap();

        assert_eq!(content.totals.total, dec!(604278));
        assert_eq!(
            content.amount_in_words,
            "Six Hundred Four Thousand, Two Hundred Seventy-eight Rupees"
        );
        assert_eq!(content.projection.len(), 3);
        assert_eq!(content.projection_input.yearly_consumption, dec!(60000));
        assert_eq!(content.projection_input.direction, ProjectionDirection::LeftToRight);
    }

    #[test]
    fn build_content_reports_missing_field() {
        let mut draft = complete_draft();
        draft.set_field(STAGE_3, "  ");

        assert_eq!(
            build_content(&draft),
            Err(ProposalError::Validation(ValidationError {
                missing_fields: vec!["stage3".to_string()],
                malformed_fields: Vec::new(),
            }))
        );
    }

    #[test]
    fn build_content_reports_malformed_amounts() {
        let mut draft = complete_draft();
        draft.set_field(YEARLY_CONSUMPTION, "lots");
        draft.set_field(PRICE_INCREMENT_PERCENT, "5%");

        assert_eq!(
            build_content(&draft),
            Err(ProposalError::Validation(ValidationError {
                missing_fields: Vec::new(),
                malformed_fields: vec![
                    "yearlyConsumption".to_string(),
                    "priceIncrementPercent".to_string()
                ],
            }))
        );
    }

    #[test]
    fn build_content_rejects_fractional_years() {
        let mut draft = complete_draft();
        draft.set_field(YEARS_TO_PROJECT, "2.5");

        assert!(matches!(
            build_content(&draft),
            Err(ProposalError::InvalidProjectionInput(_))
        ));
    }

    #[test]
    fn build_content_rejects_unknown_direction() {
        let mut draft = complete_draft();
        draft.set_field(DIRECTION, "TopToBottom");

        assert!(matches!(
            build_content(&draft),
            Err(ProposalError::InvalidProjectionInput(_))
        ));
    }
}
