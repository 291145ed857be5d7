//! `rowsift` CLI - rebuild result rows from positioned text fragments

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rowsift")]
#[command(about = "Rebuild and classify result rows from positioned page text")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/rowsift/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Vertical tolerance for grouping fragments into one line
    #[arg(long, global = true)]
    line_pitch: Option<f64>,

    /// Log decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Structured output encoding
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON array
    #[default]
    Json,
    /// One JSON record per line
    Jsonl,
}

#[derive(Subcommand)]
enum Commands {
    /// Print data rows as plain text, one per line
    Lines {
        /// Fragment dump (.json) or PDF (.pdf, needs the `pdf` feature)
        input: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print every record, with section and stage context
    Rows {
        /// Fragment dump (.json) or PDF (.pdf, needs the `pdf` feature)
        input: PathBuf,

        /// Output encoding
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse data rows into competitor results and print CSV
    Results {
        /// Fragment dump (.json) or PDF (.pdf, needs the `pdf` feature)
        input: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr, so stdout stays clean for piping)
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let extractor = cmd::build_extractor(cli.config.as_deref(), cli.line_pitch)?;

    match cli.command {
        Commands::Lines { input, output } => {
            cmd::cmd_lines(&extractor, &input, output.as_deref()).await?;
        }
        Commands::Rows {
            input,
            format,
            output,
        } => {
            cmd::cmd_rows(&extractor, &input, format, output.as_deref()).await?;
        }
        Commands::Results { input, output } => {
            cmd::cmd_results(&extractor, &input, output.as_deref()).await?;
        }
    }

    Ok(())
}
