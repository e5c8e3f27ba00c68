use clap::Parser;

use proposal_cli::cli::Cli;
use proposal_cli::{app, logging};

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_file.as_deref())?;

    let out = app::run(cli).await?;
    print!("{out}");

    Ok(())
}
