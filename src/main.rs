use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

mod catalog;
mod config;
mod confirm;

use catalog::BackupCatalog;
use config::Config;
use confirm::Confirm;

/// Catalog timestamped sets of database backup artifacts
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the settings document
    #[arg(short, long, default_value = "settings.yml")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List known backup sets and their artifacts
    History,
    /// List the artifacts belonging to one backup set
    Files { timestamp: String },
    /// Mint the canonical artifact name for an entity
    Name {
        entity: String,
        /// Timestamp to use instead of the current clock token
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Delete every artifact in one backup set
    Remove {
        timestamp: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> catalog::Result<()> {
    let config = Config::load(&cli.settings)?;
    let catalog = BackupCatalog::open(config).await?;

    match cli.command {
        Command::History => {
            for timestamp in catalog.list_timestamps().await? {
                println!("{timestamp}");
                for name in catalog.files_for_timestamp(&timestamp).await? {
                    println!("    {name}");
                }
            }
        }
        Command::Files { timestamp } => {
            if catalog.is_valid_timestamp(&timestamp).await? {
                for name in catalog.files_for_timestamp(&timestamp).await? {
                    println!("{name}");
                }
            }
        }
        Command::Name { entity, timestamp } => {
            println!("{}", catalog.name_for(&entity, timestamp.as_deref()));
        }
        Command::Remove { timestamp, yes } => {
            if !catalog.is_valid_timestamp(&timestamp).await? {
                return Ok(());
            }
            for name in catalog.files_for_timestamp(&timestamp).await? {
                println!("{name}");
            }
            if Confirm::new(yes).ask("Delete these artifacts?")? {
                let removed = catalog.remove_timestamp(&timestamp).await?;
                println!("{} artifacts removed", removed.len());
            }
        }
    }
    Ok(())
}
