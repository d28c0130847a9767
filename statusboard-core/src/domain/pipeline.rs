//! Pipeline domain types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Id marker written by producers that did not know the pipeline id
pub const UNKNOWN_PIPELINE_ID: &str = "unknown";

/// Name shown and archived for pipelines that arrive without a usable one
pub const DEFAULT_PIPELINE_NAME: &str = "Unknown Pipeline";

/// Live snapshot of a single pipeline run
///
/// Read from the live-state document, which is overwritten by an external
/// writer on every status change. Identity and timing fields are optional on
/// the wire so that one sloppy entry does not make the whole document
/// unreadable; projection and archival decide how to degrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSnapshot {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    /// Stage names in execution order
    #[serde(default)]
    pub stages: Vec<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_stage: Option<String>,

    #[serde(default)]
    pub completed_stages: Vec<String>,

    /// Raw start timestamp, parsed lazily by [`crate::duration::parse_timestamp`]
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub started_at: Option<String>,

    pub status: PipelineStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskSummary>>,

    /// Keys this crate does not interpret, kept so a patch writes them back
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PipelineSnapshot {
    /// Creates a running snapshot with no progress yet
    pub fn new(id: impl Into<String>, name: impl Into<String>, stages: Vec<String>) -> Self {
        let current_stage = stages.first().cloned();
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            stages,
            current_stage,
            completed_stages: Vec::new(),
            started_at: None,
            status: PipelineStatus::Running,
            tasks: None,
            extra: Map::new(),
        }
    }

    /// Id usable as a deduplication key, if any
    ///
    /// Absent, blank and `"unknown"` ids cannot be matched against history
    /// later, so they are treated as having no id at all.
    pub fn archivable_id(&self) -> Option<&str> {
        let id = self.id.as_deref()?.trim();
        if id.is_empty() || id.eq_ignore_ascii_case(UNKNOWN_PIPELINE_ID) {
            None
        } else {
            Some(id)
        }
    }

    /// Trimmed name, or [`DEFAULT_PIPELINE_NAME`] when absent or blank
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_PIPELINE_NAME)
    }

    pub fn is_completed(&self, stage: &str) -> bool {
        self.completed_stages.iter().any(|s| s == stage)
    }

    /// The current stage, but only when it is one of the declared stages
    pub fn highlighted_stage(&self) -> Option<&str> {
        let current = self.current_stage.as_deref()?;
        self.stages
            .iter()
            .any(|s| s == current)
            .then_some(current)
    }
}

/// Pipeline run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Running,
    Complete,
    Failed,
}

impl PipelineStatus {
    /// The terminal form of this status, or `None` while still running
    pub fn terminal(self) -> Option<TerminalStatus> {
        match self {
            PipelineStatus::Running => None,
            PipelineStatus::Complete => Some(TerminalStatus::Complete),
            PipelineStatus::Failed => Some(TerminalStatus::Failed),
        }
    }

    pub fn is_terminal(self) -> bool {
        self.terminal().is_some()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStatus::Running => "running",
            PipelineStatus::Complete => "complete",
            PipelineStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a finished pipeline, the only statuses history may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalStatus {
    Complete,
    Failed,
}

impl TerminalStatus {
    pub fn as_str(self) -> &'static str {
        PipelineStatus::from(self).as_str()
    }
}

impl From<TerminalStatus> for PipelineStatus {
    fn from(status: TerminalStatus) -> Self {
        match status {
            TerminalStatus::Complete => PipelineStatus::Complete,
            TerminalStatus::Failed => PipelineStatus::Failed,
        }
    }
}

impl std::fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-task row attached to a pipeline
///
/// Passed through to history untouched. Only a handful of well-known keys get
/// accessors, for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskSummary(pub Map<String, Value>);

impl TaskSummary {
    /// String value of `key`, with numbers and booleans rendered as text
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other @ (Value::Number(_) | Value::Bool(_)) => Some(other.to_string()),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn id(&self) -> Option<String> {
        self.text("id")
    }

    pub fn description(&self) -> Option<String> {
        self.text("description")
    }

    pub fn agent_name(&self) -> Option<String> {
        self.text("agentName")
    }

    pub fn status(&self) -> Option<String> {
        self.text("status")
    }

    pub fn duration(&self) -> Option<String> {
        self.text("duration")
    }
}

/// The document stored in the single live-state row
///
/// Only `pipelines` is interpreted. The rest of the dashboard's data (KPI
/// cards, task tables, error log, subscribers) rides along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveState {
    #[serde(default)]
    pub pipelines: Vec<PipelineSnapshot>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LiveState {
    /// Parses a live-state document from JSON text
    pub fn from_json(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(CoreError::EmptyDocument);
        }
        Ok(serde_json::from_str(input)?)
    }

    pub fn find(&self, id: &str) -> Option<&PipelineSnapshot> {
        self.pipelines.iter().find(|p| p.id.as_deref() == Some(id))
    }
}

/// Accepts strings, maps null to `None` and stringifies any other scalar
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot_camel_case() {
        let json = r#"{
            "id": "p1",
            "name": "Nightly build",
            "stages": ["fetch", "build", "test"],
            "currentStage": "build",
            "completedStages": ["fetch"],
            "startedAt": "2026-02-28T10:00:00Z",
            "status": "running"
        }"#;

        let snapshot: PipelineSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.id.as_deref(), Some("p1"));
        assert_eq!(snapshot.current_stage.as_deref(), Some("build"));
        assert_eq!(snapshot.completed_stages, vec!["fetch".to_string()]);
        assert_eq!(snapshot.status, PipelineStatus::Running);
        assert!(snapshot.tasks.is_none());
    }

    #[test]
    fn test_lenient_fields() {
        let json = r#"{"id": 42, "startedAt": null, "status": "failed"}"#;

        let snapshot: PipelineSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.id.as_deref(), Some("42"));
        assert!(snapshot.started_at.is_none());
        assert!(snapshot.name.is_none());
        assert!(snapshot.stages.is_empty());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let json = r#"{"id": "p1", "status": "paused"}"#;
        assert!(serde_json::from_str::<PipelineSnapshot>(json).is_err());
    }

    #[test]
    fn test_archivable_id() {
        let mut snapshot = PipelineSnapshot::new("p1", "demo", vec!["a".to_string()]);
        assert_eq!(snapshot.archivable_id(), Some("p1"));

        snapshot.id = Some("unknown".to_string());
        assert_eq!(snapshot.archivable_id(), None);

        snapshot.id = Some("  ".to_string());
        assert_eq!(snapshot.archivable_id(), None);

        snapshot.id = None;
        assert_eq!(snapshot.archivable_id(), None);
    }

    #[test]
    fn test_display_name() {
        let mut snapshot = PipelineSnapshot::new("p1", "  Nightly  ", vec![]);
        assert_eq!(snapshot.display_name(), "Nightly");

        snapshot.name = Some("   ".to_string());
        assert_eq!(snapshot.display_name(), DEFAULT_PIPELINE_NAME);

        snapshot.name = None;
        assert_eq!(snapshot.display_name(), DEFAULT_PIPELINE_NAME);
    }

    #[test]
    fn test_highlighted_stage_requires_membership() {
        let mut snapshot =
            PipelineSnapshot::new("p1", "demo", vec!["a".to_string(), "b".to_string()]);
        assert_eq!(snapshot.highlighted_stage(), Some("a"));

        snapshot.current_stage = Some("deploy".to_string());
        assert_eq!(snapshot.highlighted_stage(), None);
    }

    #[test]
    fn test_terminal_status() {
        assert_eq!(PipelineStatus::Running.terminal(), None);
        assert_eq!(
            PipelineStatus::Complete.terminal(),
            Some(TerminalStatus::Complete)
        );
        assert_eq!(
            PipelineStatus::Failed.terminal(),
            Some(TerminalStatus::Failed)
        );
        assert_eq!(TerminalStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_live_state_keeps_unknown_keys() {
        let json = r#"{
            "pipelines": [{"id": "p1", "status": "complete", "owner": "ops"}],
            "kpis": {"revenue": 1200},
            "errors": []
        }"#;

        let state = LiveState::from_json(json).unwrap();
        assert_eq!(state.pipelines.len(), 1);
        assert!(state.extra.contains_key("kpis"));
        assert!(state.pipelines[0].extra.contains_key("owner"));

        let round = serde_json::to_value(&state).unwrap();
        assert_eq!(round["kpis"]["revenue"], 1200);
        assert_eq!(round["pipelines"][0]["owner"], "ops");
    }

    #[test]
    fn test_live_state_empty_document() {
        assert!(matches!(
            LiveState::from_json("   "),
            Err(CoreError::EmptyDocument)
        ));
        assert!(matches!(
            LiveState::from_json("{not json"),
            Err(CoreError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_task_summary_accessors() {
        let task: TaskSummary = serde_json::from_str(
            r#"{"id": 7, "description": "Send digest", "agentName": "mailer", "status": "done"}"#,
        )
        .unwrap();

        assert_eq!(task.id().as_deref(), Some("7"));
        assert_eq!(task.agent_name().as_deref(), Some("mailer"));
        assert_eq!(task.duration(), None);
    }
}
