//! Command dispatch for the `proposal` binary.
//!
//! Every command returns the text to print on stdout; logging goes to stderr.

use anyhow::{Context, Result};
use proposal_core::calculations::generate_series;
use proposal_core::db::{MemoryRepositoryFactory, RepositoryRegistry};
use proposal_core::{
    LineItem, ProjectionInput, ProposalRepository, ProposalService, QuotationLedger,
};
use proposal_db_sqlite::SqliteRepositoryFactory;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::cli::{Cli, Command, ProjectArgs, QuoteArgs, StoredCommand, SubmitArgs};
use crate::config::AppConfig;
use crate::utils::format_amount;
use crate::{csv_loader, fields_loader, report};

/// Registry with every backend this binary ships.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(MemoryRepositoryFactory));
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Resolves configuration and runs the parsed command.
pub async fn run(cli: Cli) -> Result<String> {
    let config = AppConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_overrides(cli.overrides())
        .context("invalid configuration")?;

    match cli.command {
        Command::Quote(args) => quote(&args, &config),
        Command::Project(args) => project(&args),
        Command::Stored(command) => {
            debug!(backend = %config.database.backend, "opening proposal store");
            let repo = build_registry()
                .create(&config.database)
                .await
                .with_context(|| {
                    format!(
                        "cannot open '{}' backend at '{}'",
                        config.database.backend, config.database.connection_string
                    )
                })?;
            execute(command, &config, &*repo).await
        }
    }
}

fn ledger_from(
    items: Vec<LineItem>,
    tax_percent: Decimal,
) -> Result<QuotationLedger> {
    let mut ledger = QuotationLedger::new(tax_percent)?;
    for item in items {
        ledger.add_item(item);
    }
    Ok(ledger)
}

pub fn quote(
    args: &QuoteArgs,
    config: &AppConfig,
) -> Result<String> {
    let items = csv_loader::load_from_file(&args.items)
        .with_context(|| format!("failed to load line items from '{}'", args.items.display()))?;
    let ledger = ledger_from(items, config.tax_percent)?;
    let totals = ledger.totals()?;
    let words = ledger.amount_in_words()?;
    Ok(report::render_quote(&ledger, &totals, &words))
}

pub fn project(args: &ProjectArgs) -> Result<String> {
    let input = ProjectionInput {
        yearly_consumption: args.consumption,
        yearly_generation_per_unit: args.generation,
        price_increment_percent: args.price_increment,
        generation_decrement_percent: args.generation_decrement,
        years_to_project: args.years,
        direction: args.direction,
    };
    let series = generate_series(&input)?;
    Ok(report::render_projection(&series))
}

/// Runs a command against an open proposal store.
pub async fn execute(
    command: StoredCommand,
    config: &AppConfig,
    repo: &dyn ProposalRepository,
) -> Result<String> {
    let service = ProposalService::new(repo);

    match command {
        StoredCommand::Submit(args) => submit(&service, &args, config).await,
        StoredCommand::Show { id } => Ok(report::render_proposal(&service.get(id).await?)),
        StoredCommand::List { recycled } => {
            let proposals = if recycled {
                service.list_recycled().await?
            } else {
                service.list_active().await?
            };
            Ok(report::render_list(&proposals))
        }
        StoredCommand::Recycle { id } => {
            let proposal = service.recycle(id).await?;
            Ok(format!("Proposal #{} moved to the recycle bin.\n", proposal.id))
        }
        StoredCommand::Restore { id } => {
            let proposal = service.restore(id).await?;
            Ok(format!("Proposal #{} restored.\n", proposal.id))
        }
        StoredCommand::Purge { id } => {
            let proposal = service.permanently_delete(id).await?;
            Ok(format!("Proposal #{} permanently deleted.\n", proposal.id))
        }
    }
}

async fn submit(
    service: &ProposalService<'_>,
    args: &SubmitArgs,
    config: &AppConfig,
) -> Result<String> {
    let mut draft = fields_loader::load_from_file(&args.fields)
        .with_context(|| format!("failed to load fields from '{}'", args.fields.display()))?;
    let items = csv_loader::load_from_file(&args.items)
        .with_context(|| format!("failed to load line items from '{}'", args.items.display()))?;
    draft.id = args.id;
    draft.ledger = ledger_from(items, config.tax_percent)?;

    if args.dry_run {
        let content = service.preview(&draft)?;
        let mut out =
            report::render_quote(&content.ledger, &content.totals, &content.amount_in_words);
        out.push('\n');
        out.push_str(&report::render_projection(&content.projection));
        return Ok(out);
    }

    let proposal = service.submit(&draft).await?;
    info!(id = proposal.id, "proposal saved");

    let verb = if args.id.is_some() { "updated" } else { "saved" };
    Ok(format!(
        "Proposal #{} {} for {}: total {} ({}).\n",
        proposal.id,
        verb,
        proposal.content.client.name,
        format_amount(proposal.content.totals.total),
        proposal.content.amount_in_words
    ))
}
