//! Status update command
//!
//! Entry point for whoever pushes a new live-state document. Finished
//! pipelines in the document are archived first; only then is the document
//! written to the live-state row. Run one update at a time per store.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::*;
use statusboard_client::{DashboardStore, MemoryStore};
use statusboard_core::archival::{ArchivalReport, archive_with_report, candidate_ids};
use statusboard_core::domain::pipeline::LiveState;
use tracing::info;

use crate::config::Config;
use crate::input::read_state;

/// Result of applying one state document
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub report: ArchivalReport,
    pub state_patched: bool,
}

/// Archives finished pipelines from `state`, then optionally stores `state`
///
/// The history lookup completes before any write is issued. A failed insert
/// aborts the update so the live state is not replaced while its finished
/// pipelines are still unarchived.
pub async fn apply_update(
    store: &dyn DashboardStore,
    state: &LiveState,
    now: DateTime<Utc>,
    patch_state: bool,
) -> Result<UpdateOutcome> {
    let candidates = candidate_ids(&state.pipelines);
    let archived = store
        .archived_ids(&candidates)
        .await
        .context("Failed to check pipeline history")?;

    let report = archive_with_report(&state.pipelines, &archived, now);

    store
        .insert_history(&report.records)
        .await
        .context("Failed to write history records")?;

    if patch_state {
        store
            .patch_live_state(state)
            .await
            .context("Failed to store live state")?;
    }

    Ok(UpdateOutcome {
        report,
        state_patched: patch_state,
    })
}

/// Handle `statusboard update`
pub async fn handle_update(
    config: &Config,
    source: Option<&str>,
    archive_only: bool,
    dry_run: bool,
) -> Result<()> {
    let state = read_state(source)?;
    let now = Utc::now();

    if dry_run {
        let store = MemoryStore::new();
        let outcome = apply_update(&store, &state, now, false).await?;
        let json = serde_json::to_string_pretty(&outcome.report.records)
            .context("Failed to serialize history records")?;
        println!("{}", json);
        return Ok(());
    }

    let client = config.store_client()?;
    let outcome = apply_update(&client, &state, now, !archive_only).await?;

    info!(
        "Update applied: {} archived, {} already archived",
        outcome.report.records.len(),
        outcome.report.already_archived.len()
    );
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &UpdateOutcome) {
    let report = &outcome.report;

    if report.records.is_empty() {
        println!("{}", "No newly finished pipelines to archive.".yellow());
    } else {
        println!(
            "{}",
            format!("✓ Archived {} pipeline(s):", report.records.len())
                .green()
                .bold()
        );
        for record in &report.records {
            println!(
                "  {} {} ({}, {})",
                "▸".cyan(),
                record.name.bold(),
                record.status,
                record.duration.dimmed()
            );
        }
    }

    if !report.already_archived.is_empty() {
        println!(
            "  {}",
            format!("Already archived: {}", report.already_archived.join(", ")).dimmed()
        );
    }
    if !report.duplicates.is_empty() {
        println!(
            "  {}",
            format!("Duplicate ids ignored: {}", report.duplicates.join(", ")).yellow()
        );
    }
    if report.unidentified > 0 {
        println!(
            "  {}",
            format!("{} finished pipeline(s) without an id skipped", report.unidentified).yellow()
        );
    }

    if outcome.state_patched {
        println!("{}", "✓ Live state updated".green());
    }
}
