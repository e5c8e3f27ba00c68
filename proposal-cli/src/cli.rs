use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use proposal_core::ProjectionDirection;
use proposal_core::calculations::{parse_direction, parse_years};
use rust_decimal::Decimal;

use crate::config::Overrides;
use crate::utils::parse_decimal;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Solar proposal quotations and energy projections.
///
/// Prices line items, projects generation against electricity cost, and keeps
/// submitted proposals with a recycle bin.
#[derive(Debug, Parser)]
#[command(name = "proposal", version)]
pub struct Cli {
    /// TOML config file with `[database]` and `[quotation]` sections.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database backend to use (`sqlite` or `memory`).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Database connection string.
    /// For SQLite this is a file path (e.g. `proposals.db`) or `:memory:`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Log level or filter directive, used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        let tax_percent = match &self.command {
            Command::Quote(args) => args.tax_percent,
            Command::Stored(StoredCommand::Submit(args)) => args.tax_percent,
            _ => None,
        };
        Overrides {
            backend: self.backend.clone(),
            connection_string: self.db.clone(),
            tax_percent,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a CSV of line items and print the totals.
    Quote(QuoteArgs),

    /// Print a year-by-year generation and cost projection.
    Project(ProjectArgs),

    #[command(flatten)]
    Stored(StoredCommand),
}

/// Commands that read or write the proposal store.
#[derive(Debug, Subcommand)]
pub enum StoredCommand {
    /// Validate a proposal and save it (or replace an existing one with `--id`).
    Submit(SubmitArgs),

    /// Print one proposal.
    Show { id: i64 },

    /// List active proposals, or the recycle bin with `--recycled`.
    List {
        #[arg(long)]
        recycled: bool,
    },

    /// Move an active proposal to the recycle bin.
    Recycle { id: i64 },

    /// Bring a proposal back from the recycle bin.
    Restore { id: i64 },

    /// Delete a recycled proposal for good.
    Purge { id: i64 },
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Line items CSV (`description,unit_price,quantity,note`).
    #[arg(long)]
    pub items: PathBuf,

    /// Tax percentage applied to the subtotal.
    #[arg(long, value_parser = parse_decimal)]
    pub tax_percent: Option<Decimal>,
}

#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Year-one electricity cost.
    #[arg(long, value_parser = parse_decimal)]
    pub consumption: Decimal,

    /// Year-one generation per installed unit.
    #[arg(long, value_parser = parse_decimal)]
    pub generation: Decimal,

    /// Yearly electricity price increase, in percent.
    #[arg(long, value_parser = parse_decimal)]
    pub price_increment: Decimal,

    /// Yearly generation loss, in percent.
    #[arg(long, value_parser = parse_decimal)]
    pub generation_decrement: Decimal,

    /// Number of years to project (at most 100).
    #[arg(long, value_parser = parse_years)]
    pub years: u32,

    /// `LeftToRight` (year 1 first) or `RightToLeft`.
    #[arg(long, value_parser = parse_direction, default_value = "LeftToRight")]
    pub direction: ProjectionDirection,
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// TOML file with the proposal form fields.
    #[arg(long)]
    pub fields: PathBuf,

    /// Line items CSV.
    #[arg(long)]
    pub items: PathBuf,

    /// Tax percentage applied to the subtotal.
    #[arg(long, value_parser = parse_decimal)]
    pub tax_percent: Option<Decimal>,

    /// Replace this active proposal instead of creating a new one.
    #[arg(long)]
    pub id: Option<i64>,

    /// Validate and print the quotation and projection without saving.
    #[arg(long)]
    pub dry_run: bool,
}
