//! Pipeline projection
//!
//! Derives the per-stage view of a pipeline from a polled snapshot. The
//! projection is a pure function of the snapshot: expand/collapse toggles are
//! kept separately in [`ExpandState`], owned by whoever drives the refresh.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::pipeline::{PipelineSnapshot, PipelineStatus};

/// Display tag of one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageTag {
    Done,
    Current,
    Pending,
    /// The stage a failed run stopped on
    FailedHere,
}

impl StageTag {
    pub fn as_str(self) -> &'static str {
        match self {
            StageTag::Done => "done",
            StageTag::Current => "current",
            StageTag::Pending => "pending",
            StageTag::FailedHere => "failed-here",
        }
    }
}

impl std::fmt::Display for StageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageView {
    pub name: String,
    pub tag: StageTag,
}

/// Derived view state for one pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineView {
    pub id: Option<String>,
    pub name: String,
    pub status: PipelineStatus,
    pub stages: Vec<StageView>,
    pub completion_percent: u8,
    /// Default expand state before any user toggle
    pub expanded: bool,
    pub started_at: Option<String>,
    pub task_count: usize,
}

impl PipelineView {
    /// Key used to remember toggles across refreshes
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    /// The stage tagged `current`, if any
    pub fn current_stage(&self) -> Option<&StageView> {
        self.stages.iter().find(|s| s.tag == StageTag::Current)
    }

    pub fn completed_count(&self) -> usize {
        self.stages
            .iter()
            .filter(|s| s.tag == StageTag::Done)
            .count()
    }
}

/// Projects a snapshot into its view state
///
/// Never fails: a current stage that is not one of the declared stages simply
/// leaves every stage unhighlighted.
pub fn project(snapshot: &PipelineSnapshot) -> PipelineView {
    let highlighted = snapshot.highlighted_stage();

    let stages = snapshot
        .stages
        .iter()
        .map(|stage| StageView {
            name: stage.clone(),
            tag: stage_tag(snapshot, stage, highlighted),
        })
        .collect();

    PipelineView {
        id: snapshot.id.clone(),
        name: snapshot.display_name().to_string(),
        status: snapshot.status,
        stages,
        completion_percent: completion_percent(&snapshot.stages, &snapshot.completed_stages),
        expanded: snapshot.status == PipelineStatus::Running,
        started_at: snapshot.started_at.clone(),
        task_count: snapshot.tasks.as_ref().map_or(0, Vec::len),
    }
}

fn stage_tag(snapshot: &PipelineSnapshot, stage: &str, highlighted: Option<&str>) -> StageTag {
    let is_current = highlighted == Some(stage);

    if snapshot.is_completed(stage) {
        return StageTag::Done;
    }

    match snapshot.status {
        PipelineStatus::Running if is_current => StageTag::Current,
        PipelineStatus::Failed if is_current => StageTag::FailedHere,
        PipelineStatus::Running | PipelineStatus::Failed | PipelineStatus::Complete => {
            StageTag::Pending
        }
    }
}

/// Share of `stages` found in `completed`, rounded half-up to a whole percent
///
/// Completed entries that are not declared stages are ignored, so the result
/// never exceeds 100. An empty stage list yields 0.
pub fn completion_percent(stages: &[String], completed: &[String]) -> u8 {
    let total = stages.len();
    if total == 0 {
        return 0;
    }

    let done = stages.iter().filter(|s| completed.contains(s)).count();

    // round(100 * done / total) with halves rounding up
    ((200 * done + total) / (2 * total)) as u8
}

/// Caller-owned expand/collapse overrides, keyed by [`PipelineView::key`]
#[derive(Debug, Clone, Default)]
pub struct ExpandState {
    overrides: HashMap<String, bool>,
}

impl ExpandState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's choice if one was made, else the view's default
    pub fn is_expanded(&self, view: &PipelineView) -> bool {
        self.overrides
            .get(view.key())
            .copied()
            .unwrap_or(view.expanded)
    }

    /// Flips the expand state of `view` and returns the new value
    pub fn toggle(&mut self, view: &PipelineView) -> bool {
        let expanded = !self.is_expanded(view);
        self.overrides.insert(view.key().to_string(), expanded);
        expanded
    }

    pub fn set(&mut self, key: impl Into<String>, expanded: bool) {
        self.overrides.insert(key.into(), expanded);
    }

    /// Forgets overrides for pipelines no longer in `views`
    pub fn retain_live(&mut self, views: &[PipelineView]) {
        self.overrides
            .retain(|key, _| views.iter().any(|v| v.key() == key));
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// Header counts for a set of projected pipelines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    pub running: usize,
    pub complete: usize,
    pub failed: usize,
    /// Mean completion across all pipelines, rounded half-up
    pub mean_completion: u8,
}

pub fn summarize(views: &[PipelineView]) -> BoardSummary {
    let mut summary = BoardSummary::default();
    if views.is_empty() {
        return summary;
    }

    let mut percent_sum = 0usize;
    for view in views {
        match view.status {
            PipelineStatus::Running => summary.running += 1,
            PipelineStatus::Complete => summary.complete += 1,
            PipelineStatus::Failed => summary.failed += 1,
        }
        percent_sum += usize::from(view.completion_percent);
    }

    let count = views.len();
    summary.mean_completion = ((2 * percent_sum + count) / (2 * count)) as u8;
    summary
}
