//! Statusboard CLI
//!
//! Command-line interface for the pipeline status dashboard: renders pipeline
//! progress from the live state, polls it on an interval, and archives
//! finished pipelines into history when a new state document is pushed.

mod commands;
mod config;
mod input;
mod render;
mod resolve;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "statusboard")]
#[command(about = "Pipeline status dashboard CLI", long_about = None)]
struct Cli {
    /// Base URL of the backing store
    #[arg(
        long,
        global = true,
        env = "STATUSBOARD_STORE_URL",
        default_value = "http://localhost:54321"
    )]
    store_url: String,

    /// API key for the backing store
    #[arg(long, global = true, env = "STATUSBOARD_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Table holding the live-state row
    #[arg(
        long,
        global = true,
        env = "STATUSBOARD_STATE_TABLE",
        default_value = statusboard_client::DEFAULT_STATE_TABLE
    )]
    state_table: String,

    /// Key of the live-state row
    #[arg(
        long,
        global = true,
        env = "STATUSBOARD_STATE_ID",
        default_value = statusboard_client::DEFAULT_STATE_ID
    )]
    state_id: String,

    /// Table holding archived pipeline runs
    #[arg(
        long,
        global = true,
        env = "STATUSBOARD_HISTORY_TABLE",
        default_value = statusboard_client::DEFAULT_HISTORY_TABLE
    )]
    history_table: String,

    /// Seconds between live-state polls
    #[arg(
        long,
        global = true,
        env = "STATUSBOARD_POLL_INTERVAL",
        default_value = "30"
    )]
    poll_interval: u64,

    /// Per-request timeout against the store, in seconds
    #[arg(
        long,
        global = true,
        env = "STATUSBOARD_REQUEST_TIMEOUT",
        default_value = "15"
    )]
    request_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays usable for JSON output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "statusboard=info,statusboard_client=info,statusboard_core=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        store_url: cli.store_url,
        api_key: cli.api_key,
        state_table: cli.state_table,
        state_id: cli.state_id,
        history_table: cli.history_table,
        poll_interval: Duration::from_secs(cli.poll_interval),
        request_timeout: Duration::from_secs(cli.request_timeout),
    };

    handle_command(cli.command, &config).await
}
