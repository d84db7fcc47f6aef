//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod extract;
mod text;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use notice::config::Settings;
use notice::models::Dialect;

#[derive(Parser)]
#[command(name = "notice")]
#[command(about = "Structured field extraction for USACE public notices")]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to ./notice.toml when present)
    #[arg(short, long, global = true, env = "NOTICE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Extract records from a JSON array of documents
    Extract {
        /// JSON file holding the documents
        #[arg(short, long, env = "NOTICE_INPUT")]
        input: PathBuf,
        /// Write one record per line here instead of stdout
        #[arg(short, long, env = "NOTICE_OUTPUT")]
        output: Option<PathBuf>,
        /// Also write the split tables as JSON Lines files into this directory
        #[arg(long, env = "NOTICE_TABLES")]
        tables: Option<PathBuf>,
        /// Number given to the first notice in the tables
        #[arg(long, default_value = "1", env = "NOTICE_FIRST_NUMBER")]
        first_notice_number: usize,
        /// Documents in flight (overrides config)
        #[arg(short = 'j', long)]
        concurrency: Option<usize>,
        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Extract a record from already-decoded notice text
    Text {
        /// Text file; pages may be separated by form feeds
        #[arg(short, long)]
        input: PathBuf,
        /// District dialect (mvn, sam, saj, swg); resolved from --url when omitted
        #[arg(short, long, value_parser = parse_dialect)]
        dialect: Option<Dialect>,
        /// Notice webpage URL
        #[arg(short, long, default_value = "")]
        url: String,
        /// Display title, used when the body has no application number
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Check availability of external text tools
    Check,
}

fn parse_dialect(value: &str) -> Result<Dialect, String> {
    Dialect::from_str(value).ok_or_else(|| format!("unknown dialect '{}'", value))
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    tracing::debug!("settings: {:?}", settings);

    match cli.command {
        Commands::Extract {
            input,
            output,
            tables,
            first_notice_number,
            concurrency,
            quiet,
        } => {
            extract::cmd_extract(
                &settings,
                extract::ExtractArgs {
                    input,
                    output,
                    tables,
                    first_notice_number,
                    concurrency,
                    show_progress: !quiet,
                },
            )
            .await
        }
        Commands::Text {
            input,
            dialect,
            url,
            title,
        } => text::cmd_text(&settings, &input, dialect, &url, title),
        Commands::Check => check::cmd_check(&settings),
    }
}
