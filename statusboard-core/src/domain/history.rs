//! History domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::pipeline::{TaskSummary, TerminalStatus};

/// Archived outcome of a finished pipeline run
///
/// Written once by the archival gatekeeper and never updated afterwards.
/// Field names match the history table's columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Unique per record; the history table enforces it as well
    pub pipeline_id: String,
    pub name: String,
    pub stages: Vec<String>,
    pub completed_stages: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: DateTime<Utc>,
    pub status: TerminalStatus,
    /// Human readable run time, e.g. `1h 5m`, `3m 10s` or `unknown`
    pub duration: String,
    #[serde(default)]
    pub tasks: Option<Vec<TaskSummary>>,
}

impl HistoryRecord {
    /// Fraction of stages finished when the run ended, as a whole percent
    pub fn completion_percent(&self) -> u8 {
        crate::projection::completion_percent(&self.stages, &self.completed_stages)
    }
}
