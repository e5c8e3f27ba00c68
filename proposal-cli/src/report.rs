//! Plain-text rendering of quotations, projections and stored proposals.

use proposal_core::{ExtraFieldValue, Proposal, ProjectionPoint, QuotationLedger, QuotationTotals};

use crate::utils::format_amount;

const RULE: &str = "----------------------------------------------------------------------";

/// Item table followed by subtotal, tax, total and the worded amount.
pub fn render_quote(
    ledger: &QuotationLedger,
    totals: &QuotationTotals,
    amount_in_words: &str,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>3}  {:<30} {:>14} {:>5} {:>14}\n",
        "#", "Description", "Unit price", "Qty", "Amount"
    ));
    out.push_str(RULE);
    out.push('\n');
    for (i, item) in ledger.items().iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<30} {:>14} {:>5} {:>14}\n",
            i + 1,
            item.description,
            format_amount(item.unit_price),
            item.quantity,
            item.line_total().map(format_amount).unwrap_or_else(|| "overflow".to_string())
        ));
        if !item.note.is_empty() {
            out.push_str(&format!("     {}\n", item.note));
        }
    }
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("{:<52} {:>17}\n", "Subtotal", format_amount(totals.subtotal)));
    out.push_str(&format!(
        "{:<52} {:>17}\n",
        format!("Tax ({}%)", ledger.tax_percent()),
        format_amount(totals.tax_amount)
    ));
    out.push_str(&format!("{:<52} {:>17}\n", "Total", format_amount(totals.total)));
    out.push_str(&format!("Amount in words: {}\n", amount_in_words));
    out
}

pub fn render_projection(series: &[ProjectionPoint]) -> String {
    let mut out = format!("{:>6} {:>18} {:>18}\n", "Year", "Generation", "Cost");
    for point in series {
        out.push_str(&format!(
            "{:>6} {:>18} {:>18}\n",
            point.year_label,
            format_amount(point.projected_generation),
            format_amount(point.projected_cost)
        ));
    }
    out
}

/// Full view of a stored proposal.
pub fn render_proposal(proposal: &Proposal) -> String {
    let content = &proposal.content;
    let client = &content.client;
    let system = &content.system;

    let mut out = format!("Proposal #{} [{}]\n", proposal.id, proposal.state);
    out.push_str(&format!(
        "Created {}  Updated {}\n",
        proposal.created_at.format("%Y-%m-%d %H:%M"),
        proposal.updated_at.format("%Y-%m-%d %H:%M")
    ));
    if let Some(deleted_at) = proposal.deleted_at {
        out.push_str(&format!("Recycled {}\n", deleted_at.format("%Y-%m-%d %H:%M")));
    }

    out.push_str(&format!(
        "\nClient: {} ({})\n  {} | {}\n  {}\n",
        client.name, client.customer_type, client.phone, client.email, client.address
    ));

    out.push_str("\nSystem\n");
    for (label, value) in [
        ("Project size", &system.project_size),
        ("Consumption", &system.consumption),
        ("Electricity rate", &system.electricity_rate),
        ("Generation", &system.generation),
        ("Warranty", &system.warranty),
        ("Watt peak", &system.proposal_watt_peak),
        ("Panel quantity", &system.quantity),
        ("Inverter size", &system.inverter_size),
        ("Inverter quantity", &system.inverter_quantity),
        ("Inverter warranty", &system.inverter_warranty),
        ("Performance warranty", &system.performance_warranty),
        ("Structure", &system.proposal_structure),
        ("Structure details", &system.structure_description),
        ("System warranty", &system.system_warranty),
    ] {
        out.push_str(&format!("  {:<22} {}\n", label, value));
    }

    out.push_str("\nPayment stages\n");
    for (i, stage) in content.payment_stages.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, stage));
    }

    if !content.extra_fields.is_empty() {
        out.push_str("\nAdditional details\n");
        for (name, value) in &content.extra_fields {
            let text = match value {
                ExtraFieldValue::Text(text) => text.clone(),
                ExtraFieldValue::List(items) => items.join(", "),
            };
            out.push_str(&format!("  {:<22} {}\n", name, text));
        }
    }

    out.push_str("\nQuotation\n");
    out.push_str(&render_quote(&content.ledger, &content.totals, &content.amount_in_words));

    out.push_str(&format!(
        "\nProjection ({} years, {})\n",
        content.projection_input.years_to_project, content.projection_input.direction
    ));
    out.push_str(&render_projection(&content.projection));
    out
}

/// One line per proposal.
pub fn render_list(proposals: &[Proposal]) -> String {
    if proposals.is_empty() {
        return "No proposals.\n".to_string();
    }
    let mut out = format!("{:>5}  {:<28} {:<14} {:>16}  {}\n", "Id", "Client", "Type", "Total", "Updated");
    for proposal in proposals {
        let content = &proposal.content;
        let when = proposal.deleted_at.unwrap_or(proposal.updated_at);
        out.push_str(&format!(
            "{:>5}  {:<28} {:<14} {:>16}  {}\n",
            proposal.id,
            content.client.name,
            content.client.customer_type,
            format_amount(content.totals.total),
            when.format("%Y-%m-%d %H:%M")
        ));
    }
    out
}
