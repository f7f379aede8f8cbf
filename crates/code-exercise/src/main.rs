//! Code exercise CLI - Main entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod deck;
mod engine;

#[derive(Parser)]
#[command(name = "code-exercise")]
#[command(version)]
#[command(about = "Materialize code exercise slides in a presentation deck", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the initialization pass on a deck and write the materialized markup
    Render {
        /// Input deck markup
        input: PathBuf,

        /// Write output to FILE (stdout when omitted or '-')
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// JSON file with the host configuration object
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },

    /// Resolve the exercise declarations of a deck without changing it
    Check {
        /// Input deck markup
        input: PathBuf,

        /// JSON file with the host configuration object
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Print the declarations as JSON
        #[arg(long)]
        json: bool,
    },
}

fn log_filter(quiet: bool, log_level: Option<&str>) -> Result<EnvFilter> {
    if quiet {
        return Ok(EnvFilter::new("error"));
    }
    match log_level {
        Some(level) => {
            let level: tracing::Level = level
                .parse()
                .with_context(|| format!("Invalid log level: {}", level))?;
            Ok(EnvFilter::new(format!("code_exercise={}", level)))
        }
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "code_exercise=info".into())),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(log_filter(cli.quiet, cli.log_level.as_deref())?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Render {
            input,
            output,
            config,
        } => commands::render::execute(commands::render::RenderArgs {
            input,
            output,
            config,
        }),
        Commands::Check {
            input,
            config,
            json,
        } => commands::check::execute(commands::check::CheckArgs {
            input,
            config,
            json,
        }),
    }
}
