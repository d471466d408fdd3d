//! Contact Bridge CLI
//!
//! Command-line interface for exporting and importing local contacts.

mod commands;
mod config;
mod display;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use config::CliConfig;

#[derive(Parser)]
#[command(name = "contact-bridge")]
#[command(version, about = "Checkpointed contact export and import")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory (default: ~/.contact-bridge)
    #[arg(long, global = true, env = "CONTACT_BRIDGE_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export contacts changed since the last sync
    Export {
        /// Output file path
        output: PathBuf,

        /// Export from this revision instead of the stored checkpoint
        #[arg(long, value_name = "REV")]
        since: Option<u64>,
    },

    /// Replace changed contacts with the contents of a document
    Import {
        /// Input file path
        input: PathBuf,
    },

    /// Add a local contact
    Add {
        /// Given name
        #[arg(long)]
        given: String,

        /// Family name
        #[arg(long)]
        family: String,

        /// Display name (default: "<given> <family>")
        #[arg(long)]
        display: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Mobile phone number
        #[arg(long)]
        phone: Option<String>,

        /// Remote identity to assign (default: a random UUID)
        #[arg(long)]
        remote_id: Option<String>,
    },

    /// Show checkpoint, revision and instance id
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("contact_bridge=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(CliConfig::default_data_dir);
    let config = CliConfig { data_dir };

    match cli.command {
        Commands::Export { output, since } => {
            commands::export::run(&config, &output, since).await?;
        }
        Commands::Import { input } => {
            commands::import::run(&config, &input).await?;
        }
        Commands::Add {
            given,
            family,
            display,
            email,
            phone,
            remote_id,
        } => {
            let request = commands::add::AddRequest {
                given,
                family,
                display,
                email,
                phone,
                remote_id,
            };
            commands::add::run(&config, request).await?;
        }
        Commands::Status => {
            commands::status::run(&config).await?;
        }
    }

    Ok(())
}
