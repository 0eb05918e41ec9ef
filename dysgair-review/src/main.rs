//! dysgair-review - score and review pronunciation attempts
//!
//! Results go to stdout; logs go to stderr so output can be piped.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

use dysgair_review::cli::{self, Args, Command};
use dysgair_review::version;

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    if let Command::Version = args.command {
        println!("{}", version::version_long());
        return Ok(());
    }

    let config = args.load_config().context("Failed to load configuration")?;
    info!("Configuration loaded from {}", config.config_path.display());

    match &args.command {
        Command::Align(align) => println!("{}", cli::run_align(align)),
        Command::Score(score) => println!("{}", cli::run_score(score)?),
        Command::Match(matching) => println!("{}", cli::run_match(matching, &config)?),
        Command::Batch(batch) => {
            let summary = cli::run_batch_command(batch, &config).context("Batch run failed")?;
            if summary.processed == 0 && summary.skipped > 0 {
                anyhow::bail!("No attempts could be scored ({} skipped)", summary.skipped);
            }
        }
        Command::Version => {}
    }

    Ok(())
}
