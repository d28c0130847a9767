//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod history;
mod pipeline;
mod schema;
mod update;
mod watch;

use anyhow::Result;
use clap::{Args, Subcommand};
use statusboard_core::projection::{ExpandState, PipelineView};

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Render a state document without contacting the store
    Project {
        /// State JSON, @path to a file, or - for stdin (default)
        state: Option<String>,

        #[command(flatten)]
        view: ViewArgs,
    },
    /// Fetch the live state once and render it
    Show {
        /// Only show this pipeline (ID or unambiguous prefix), expanded
        pipeline: Option<String>,

        #[command(flatten)]
        view: ViewArgs,
    },
    /// Poll the live state and re-render on every change
    Watch {
        #[command(flatten)]
        view: ViewArgs,

        /// Do not clear the screen between refreshes
        #[arg(long)]
        no_clear: bool,
    },
    /// Archive finished pipelines from a new state document, then store it
    Update {
        /// State JSON, @path to a file, or - for stdin (default)
        state: Option<String>,

        /// Archive only; leave the live-state row untouched
        #[arg(long)]
        archive_only: bool,

        /// Print the records that would be archived without touching the store
        #[arg(long)]
        dry_run: bool,
    },
    /// List archived pipeline runs
    History {
        /// Maximum number of records
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the SQL that provisions the store's tables
    Schema,
}

/// Options shared by the rendering commands
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Print the projected view as JSON
    #[arg(long)]
    pub json: bool,

    /// Expand this pipeline regardless of its status (repeatable)
    #[arg(long, value_name = "ID")]
    pub expand: Vec<String>,

    /// Collapse this pipeline regardless of its status (repeatable)
    #[arg(long, value_name = "ID")]
    pub collapse: Vec<String>,
}

impl ViewArgs {
    /// Expand state seeded from the command line
    pub fn expand_state(&self) -> ExpandState {
        let mut state = ExpandState::new();
        for id in &self.expand {
            state.set(id.clone(), true);
        }
        for id in &self.collapse {
            state.set(id.clone(), false);
        }
        state
    }
}

/// Views with `expanded` replaced by the effective value, for JSON output
pub fn effective_views(views: &[PipelineView], expand: &ExpandState) -> Vec<PipelineView> {
    views
        .iter()
        .map(|view| PipelineView {
            expanded: expand.is_expanded(view),
            ..view.clone()
        })
        .collect()
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Project { state, view } => pipeline::project_document(state.as_deref(), &view),
        Commands::Show { pipeline, view } => {
            pipeline::show_live(config, pipeline.as_deref(), &view).await
        }
        Commands::Watch { view, no_clear } => watch::watch(config, &view, !no_clear).await,
        Commands::Update {
            state,
            archive_only,
            dry_run,
        } => update::handle_update(config, state.as_deref(), archive_only, dry_run).await,
        Commands::History { limit, json } => history::list_history(config, limit, json).await,
        Commands::Schema => schema::print_schema(config),
    }
}
