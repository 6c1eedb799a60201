//! Best New Music Digest CLI
//!
//! Local and scheduled execution entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use best_new_music_digest::{
    config,
    error::Result,
    pipeline::{self, RunOptions, RunOutcome},
    storage::{CheckpointStore, LocalStorage},
};
use clap::{Parser, Subcommand};

/// bnm-digest - Best New Music Digest
#[derive(Parser, Debug)]
#[command(
    name = "bnm-digest",
    version,
    about = "Weekly email digest of best new music"
)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape every enabled source and email what is new
    Run {
        /// Run even if today is not the configured weekday
        #[arg(long)]
        force: bool,

        /// Scrape without saving checkpoints or sending anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration and mandatory settings
    Validate,

    /// List stored checkpoints
    Checkpoints,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run { force, dry_run } => {
            let config = config::load_all(&cli.config)?;
            log::info!("Loaded configuration from {}", cli.config.display());

            let outcome = pipeline::run(&config, RunOptions { force, dry_run }).await?;
            match outcome {
                RunOutcome::Skipped { today, run_on } => {
                    log::info!("Skipped: today is {}, configured day is {}", today, run_on);
                }
                RunOutcome::Quiet => log::info!("Done, nothing to report"),
                RunOutcome::Sent { items, failures } => {
                    log::info!("Done, emailed {} items ({} failed sources)", items, failures);
                }
                RunOutcome::DryRun { html, .. } => println!("{html}"),
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            config::load_all(&cli.config)?;
            log::info!("✓ Config OK");
        }

        Command::Checkpoints => {
            let config = config::load(&cli.config)?;
            let storage = LocalStorage::new(config.storage.dir.clone());
            let rows = storage.all().await?;

            if rows.is_empty() {
                log::info!("No checkpoints in {}", config.storage.dir.display());
            }
            for row in rows {
                println!("{}\t{}", row.name, row.marker);
            }
        }
    }

    Ok(())
}
