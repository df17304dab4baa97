//! notetable: provision, load and page through a DynamoDB notes table.
//!
//! Settings come from the `DynamoDB` section of a JSON file; the AWS
//! endpoint, region and credentials come from the standard AWS environment.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use notetable_core::retry::Backoff;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod prelude;
mod shutdown;
mod storage;
mod workflows;

use crate::prelude::*;
use crate::shutdown::Shutdown;
use crate::storage::dynamodb::{create_client, AwsConfig, DynamoDbStore};
use crate::workflows::WorkflowContext;

/// Create, load and scan a DynamoDB notes table
#[derive(Debug, Parser)]
#[command(name = "notetable")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: Global,

    /// Settings file holding the `DynamoDB` section
    #[arg(
        long,
        global = true,
        env = "NOTETABLE_SETTINGS",
        default_value = config::DEFAULT_SETTINGS_PATH
    )]
    settings: PathBuf,

    /// Attempts per remote call before a throttling or network error is reported
    #[arg(long, global = true, default_value_t = Backoff::transient().max_attempts)]
    max_attempts: u32,

    #[command(subcommand)]
    command: commands::Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Silence progress output (scan data is still printed)
    #[clap(long, global = true)]
    pub silent: bool,

    /// Enable verbose logging
    #[clap(long, global = true)]
    pub verbose: bool,
}

impl Global {
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(&cli.global);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            anstream::eprintln!("{} {:#}", p_r("Error:"), err);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so scan output stays machine-readable.
fn init_tracing(global: &Global) {
    let default_filter = if global.is_verbose() {
        "notetable=debug,notetable_core=debug"
    } else {
        "notetable=warn,notetable_core=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = config::load_settings(&cli.settings)
        .await
        .with_context(|| format!("Invalid settings in {}", cli.settings.display()))?;

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown::listen_for_signals(shutdown.clone()));

    let aws_config = AwsConfig::default();
    if !cli.global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aprintln!("{} {}", p_b("Table:"), settings.table_name);
        aprintln!();
    }

    let store = DynamoDbStore::new(create_client(&aws_config).await);
    let ctx = WorkflowContext::new(
        shutdown,
        Backoff::transient().with_max_attempts(cli.max_attempts),
    );

    let result = commands::run(cli.command, &cli.global, &settings, &store, &ctx).await;
    if ctx.shutdown.is_triggered() {
        tracing::info!("Workflow stopped by shutdown signal");
    }

    Ok(result?)
}
