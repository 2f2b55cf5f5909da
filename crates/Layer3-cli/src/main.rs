//! permsync CLI - Main entry point

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// permsync - permission catalog synchronization
#[derive(Parser, Debug)]
#[command(name = "permsync")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Permission config file (TOML or JSON). Defaults to the global + project config.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the configured permission catalog as JSON
    Catalog,
    /// Print the change plan against a stored permission snapshot
    Diff {
        /// Snapshot of the stored permissions (JSON or TOML)
        #[arg(short, long)]
        existing: Option<PathBuf>,
    },
    /// Apply the change plan to an in-memory store seeded from a snapshot
    Sync {
        /// Snapshot of the stored permissions (JSON or TOML)
        #[arg(short, long)]
        existing: Option<PathBuf>,

        /// Catalog to synchronize (annotation, config, all)
        #[arg(short, long, default_value = "config")]
        source: String,

        /// Operator id recorded on published events
        #[arg(short, long, default_value = "0")]
        operator: i64,

        /// Write the resulting snapshot to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging (stdout는 JSON 출력 전용)
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = commands::load_config(args.config.as_deref())?;

    let output = match args.command {
        Command::Catalog => commands::catalog(config)?,
        Command::Diff { existing } => commands::diff(config, existing.as_deref()).await?,
        Command::Sync {
            existing,
            source,
            operator,
            out,
        } => {
            commands::sync(
                config,
                existing.as_deref(),
                &source,
                operator,
                out.as_deref(),
            )
            .await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
