//! Pipeline view command handlers
//!
//! Renders projected pipelines from a document on the command line
//! (`project`) or from the live-state row (`show`).

use anyhow::{Context, Result};
use serde::Serialize;
use statusboard_core::domain::pipeline::LiveState;
use statusboard_core::projection::{BoardSummary, ExpandState, PipelineView, project, summarize};

use super::{ViewArgs, effective_views};
use crate::config::Config;
use crate::input::read_state;
use crate::render;
use crate::resolve::resolve_pipeline;

/// JSON shape printed by `--json`
#[derive(Debug, Serialize)]
pub struct BoardJson {
    pub summary: BoardSummary,
    pub pipelines: Vec<PipelineView>,
}

/// Projects every pipeline in a state document
pub fn project_all(state: &LiveState) -> Vec<PipelineView> {
    state.pipelines.iter().map(project).collect()
}

/// Renders the board as text or JSON
pub fn render_board(views: &[PipelineView], expand: &ExpandState, json: bool) -> Result<String> {
    if json {
        let board = BoardJson {
            summary: summarize(views),
            pipelines: effective_views(views, expand),
        };
        serde_json::to_string_pretty(&board).context("Failed to serialize board")
    } else {
        Ok(render::format_board(views, expand))
    }
}

/// Render a state document given on the command line
pub fn project_document(source: Option<&str>, args: &ViewArgs) -> Result<()> {
    let state = read_state(source)?;
    let views = project_all(&state);

    println!("{}", render_board(&views, &args.expand_state(), args.json)?);
    Ok(())
}

/// Fetch the live state and render it, or a single pipeline of it
pub async fn show_live(config: &Config, pipeline: Option<&str>, args: &ViewArgs) -> Result<()> {
    let client = config.store_client()?;
    let state = client
        .fetch_live_state()
        .await
        .context("Failed to fetch live state")?;

    let mut expand = args.expand_state();
    let views = match pipeline {
        Some(id) => {
            let snapshot = resolve_pipeline(&state, id)?;
            let view = project(snapshot);
            if !args.collapse.iter().any(|c| c == view.key()) {
                expand.set(view.key().to_string(), true);
            }
            vec![view]
        }
        None => project_all(&state),
    };

    println!("{}", render_board(&views, &expand, args.json)?);
    Ok(())
}
