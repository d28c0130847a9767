//! Live board poller
//!
//! Re-reads the live-state row on a fixed interval and redraws the board
//! whenever the document changes. A failed fetch keeps the last good board on
//! screen.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};
use colored::*;
use statusboard_client::DashboardStore;
use statusboard_core::domain::pipeline::LiveState;
use statusboard_core::projection::{ExpandState, PipelineView};
use tokio::time;
use tracing::{debug, info, warn};

use super::ViewArgs;
use super::pipeline::{project_all, render_board};
use crate::config::Config;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// What the watcher remembers between polls
pub struct Dashboard {
    last: Option<LiveState>,
    views: Vec<PipelineView>,
    expand: ExpandState,
    last_refreshed: Option<DateTime<Local>>,
}

impl Dashboard {
    pub fn new(expand: ExpandState) -> Self {
        Self {
            last: None,
            views: Vec::new(),
            expand,
            last_refreshed: None,
        }
    }

    /// Takes a freshly fetched document; returns true when the board changed
    pub fn apply(&mut self, state: LiveState, at: DateTime<Local>) -> bool {
        self.last_refreshed = Some(at);
        if self.last.as_ref() == Some(&state) {
            return false;
        }

        self.views = project_all(&state);
        self.expand.retain_live(&self.views);
        self.last = Some(state);
        true
    }

    pub fn views(&self) -> &[PipelineView] {
        &self.views
    }

    pub fn expand(&self) -> &ExpandState {
        &self.expand
    }

    pub fn has_state(&self) -> bool {
        self.last.is_some()
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }
}

/// Handle `statusboard watch`
pub async fn watch(config: &Config, args: &ViewArgs, clear: bool) -> Result<()> {
    let client = config.store_client()?;
    let mut dashboard = Dashboard::new(args.expand_state());

    info!(
        "Watching live state (interval: {:?})",
        config.poll_interval
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    run(
        &client,
        &mut dashboard,
        config.poll_interval,
        args.json,
        |frame| {
            if clear {
                print!("{}", CLEAR_SCREEN);
            }
            println!("{}", frame);
        },
        shutdown,
    )
    .await
}

/// Polls until `shutdown` resolves, handing each changed frame to `draw`
///
/// `shutdown` is polled ahead of every tick, so a signal that arrives while a
/// fetch is in flight ends the loop as soon as that fetch returns.
pub async fn run(
    store: &dyn DashboardStore,
    dashboard: &mut Dashboard,
    every: Duration,
    json: bool,
    mut draw: impl FnMut(&str),
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let mut interval = time::interval(every);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Stopping watcher");
                return Ok(());
            }
            _ = interval.tick() => {
                if let Some(frame) = poll_once(store, dashboard, json).await? {
                    draw(&frame);
                }
            }
        }
    }
}

/// One poll cycle; returns the frame to draw, if any
async fn poll_once(
    store: &dyn DashboardStore,
    dashboard: &mut Dashboard,
    json: bool,
) -> Result<Option<String>> {
    debug!("Polling live state");

    let state = match store.fetch_live_state().await {
        Ok(state) => state,
        Err(e) => {
            if e.is_not_found() {
                warn!("Live-state row is missing: {}", e);
            } else {
                warn!("Failed to fetch live state: {}", e);
            }
            if !dashboard.has_state() {
                println!("{}", "Waiting for the live state...".yellow());
            }
            return Ok(None);
        }
    };

    if !dashboard.apply(state, Local::now()) {
        debug!("Live state unchanged");
        return Ok(None);
    }

    let mut frame = render_board(dashboard.views(), dashboard.expand(), json)?;
    if let Some(at) = dashboard.last_refreshed().filter(|_| !json) {
        frame.push_str(&format!(
            "\n\n{}",
            format!("Last updated {}", at.format("%H:%M:%S")).dimmed()
        ));
    }
    Ok(Some(frame))
}
