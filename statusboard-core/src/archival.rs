//! Archival gatekeeper
//!
//! Moves finished pipelines from the live state into history at most once per
//! pipeline id. The gatekeeper only decides what to write; the caller performs
//! the existence lookup against the store beforehand and the insert afterwards.
//!
//! Callers must not run two gatekeepers against the same store at once. The
//! history table's unique key on `pipeline_id` backs this up, but the
//! gatekeeper itself does no locking.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::history::HistoryRecord;
use crate::domain::pipeline::PipelineSnapshot;
pub use crate::domain::pipeline::DEFAULT_PIPELINE_NAME;
use crate::duration::{parse_timestamp, run_duration};

/// Answers whether a pipeline id already has a history record
pub trait HistoryLookup {
    fn is_archived(&self, pipeline_id: &str) -> bool;
}

impl<F> HistoryLookup for F
where
    F: Fn(&str) -> bool,
{
    fn is_archived(&self, pipeline_id: &str) -> bool {
        self(pipeline_id)
    }
}

impl HistoryLookup for HashSet<String> {
    fn is_archived(&self, pipeline_id: &str) -> bool {
        self.contains(pipeline_id)
    }
}

/// What the gatekeeper did with a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchivalReport {
    /// Records to persist, in input order
    pub records: Vec<HistoryRecord>,
    /// Terminal pipelines skipped because history already has them
    pub already_archived: Vec<String>,
    /// Ids seen more than once in the batch; only the first was kept
    pub duplicates: Vec<String>,
    /// Terminal pipelines dropped for lack of a usable id
    pub unidentified: usize,
}

impl ArchivalReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Ids of terminal pipelines that are candidates for archival
///
/// This is the set the caller should look up in history before calling
/// [`archive`]. Order follows the input, without repeats.
pub fn candidate_ids(snapshots: &[PipelineSnapshot]) -> Vec<String> {
    let mut seen = HashSet::new();
    snapshots
        .iter()
        .filter(|s| s.status.is_terminal())
        .filter_map(PipelineSnapshot::archivable_id)
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Builds the history records for every newly finished pipeline
///
/// `completed_at` is stamped on each record and used as the end of its
/// duration.
pub fn archive(
    snapshots: &[PipelineSnapshot],
    history: &impl HistoryLookup,
    completed_at: DateTime<Utc>,
) -> Vec<HistoryRecord> {
    archive_with_report(snapshots, history, completed_at).records
}

/// Same as [`archive`], but also reports what was skipped and why
pub fn archive_with_report(
    snapshots: &[PipelineSnapshot],
    history: &impl HistoryLookup,
    completed_at: DateTime<Utc>,
) -> ArchivalReport {
    let mut report = ArchivalReport::default();
    let mut taken: HashSet<&str> = HashSet::new();

    for snapshot in snapshots {
        let Some(status) = snapshot.status.terminal() else {
            continue;
        };

        let Some(id) = snapshot.archivable_id() else {
            debug!(
                "Dropping {} pipeline {:?} without a usable id",
                status,
                snapshot.display_name()
            );
            report.unidentified += 1;
            continue;
        };

        if taken.contains(id) {
            warn!("Pipeline {} appears more than once in batch, keeping the first", id);
            report.duplicates.push(id.to_string());
            continue;
        }
        taken.insert(id);

        if history.is_archived(id) {
            info!("Pipeline {} already archived, skipping", id);
            report.already_archived.push(id.to_string());
            continue;
        }

        report
            .records
            .push(build_record(snapshot, id, status, completed_at));
    }

    report
}

fn build_record(
    snapshot: &PipelineSnapshot,
    id: &str,
    status: crate::domain::pipeline::TerminalStatus,
    completed_at: DateTime<Utc>,
) -> HistoryRecord {
    let started_at = snapshot.started_at.as_deref();
    let duration = run_duration(started_at, completed_at);

    HistoryRecord {
        pipeline_id: id.to_string(),
        name: snapshot.display_name().to_string(),
        stages: snapshot.stages.clone(),
        completed_stages: snapshot.completed_stages.clone(),
        started_at: started_at.and_then(parse_timestamp),
        completed_at,
        status,
        duration,
        tasks: snapshot.tasks.clone(),
    }
}
