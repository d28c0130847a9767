//! Terminal rendering
//!
//! Formats projected pipelines and history records for the terminal. Every
//! status and stage tag maps to its glyph and color through an exhaustive
//! match, so a new variant fails to compile until it is given a look.

use colored::*;
use statusboard_core::domain::history::HistoryRecord;
use statusboard_core::domain::pipeline::PipelineStatus;
use statusboard_core::duration::parse_timestamp;
use statusboard_core::projection::{
    BoardSummary, ExpandState, PipelineView, StageTag, StageView, summarize,
};

const BAR_WIDTH: usize = 20;

/// Glyph shown in front of a stage
pub fn stage_marker(tag: StageTag) -> ColoredString {
    match tag {
        StageTag::Done => "✓".green(),
        StageTag::Current => "▶".cyan().bold(),
        StageTag::Pending => "○".dimmed(),
        StageTag::FailedHere => "✗".red().bold(),
    }
}

fn stage_name(stage: &StageView) -> ColoredString {
    match stage.tag {
        StageTag::Done => stage.name.normal(),
        StageTag::Current => stage.name.cyan().bold(),
        StageTag::Pending => stage.name.dimmed(),
        StageTag::FailedHere => stage.name.red().bold(),
    }
}

pub fn status_label(status: PipelineStatus) -> ColoredString {
    match status {
        PipelineStatus::Running => status.as_str().yellow().bold(),
        PipelineStatus::Complete => status.as_str().green().bold(),
        PipelineStatus::Failed => status.as_str().red().bold(),
    }
}

/// Fixed-width bar with `percent` of it filled
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn display_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// One-line board header
pub fn format_summary(summary: &BoardSummary) -> String {
    format!(
        "{} running, {} complete, {} failed, {}% average progress",
        summary.running.to_string().yellow(),
        summary.complete.to_string().green(),
        summary.failed.to_string().red(),
        summary.mean_completion
    )
}

/// A pipeline block; the stage list is shown only when expanded
pub fn format_pipeline(view: &PipelineView, expanded: bool) -> String {
    let mut lines = Vec::new();

    let fold = if expanded { "▾" } else { "▸" };
    lines.push(format!(
        "{} {} [{}] {} {:>3}%",
        fold.cyan(),
        view.name.bold(),
        status_label(view.status),
        progress_bar(view.completion_percent, BAR_WIDTH),
        view.completion_percent
    ));

    let mut meta = Vec::new();
    if let Some(id) = &view.id {
        meta.push(format!("ID: {}", id));
    }
    if let Some(started) = &view.started_at {
        meta.push(format!("Started: {}", display_time(started)));
    }
    if view.task_count > 0 {
        meta.push(format!("Tasks: {}", view.task_count));
    }
    if !meta.is_empty() {
        lines.push(format!("    {}", meta.join("  ").dimmed()));
    }

    if expanded {
        for stage in &view.stages {
            lines.push(format!("    {} {}", stage_marker(stage.tag), stage_name(stage)));
        }
    } else {
        let mut line = format!("{}/{} stages", view.completed_count(), view.stages.len());
        if let Some(stage) = view.stages.iter().find(|s| {
            matches!(s.tag, StageTag::Current | StageTag::FailedHere)
        }) {
            let verb = match stage.tag {
                StageTag::FailedHere => "stopped at",
                StageTag::Done | StageTag::Current | StageTag::Pending => "at",
            };
            line.push_str(&format!(", {} {}", verb, stage.name));
        }
        lines.push(format!("    {}", line.dimmed()));
    }

    lines.join("\n")
}

/// Summary header followed by every pipeline
pub fn format_board(views: &[PipelineView], expand: &ExpandState) -> String {
    if views.is_empty() {
        return "No pipelines in the live state.".yellow().to_string();
    }

    let mut blocks = vec![format_summary(&summarize(views))];
    for view in views {
        blocks.push(format_pipeline(view, expand.is_expanded(view)));
    }
    blocks.join("\n\n")
}

/// A history record, as listed by `statusboard history`
pub fn format_history_record(record: &HistoryRecord) -> String {
    let mut lines = vec![format!(
        "{} {} [{}] {}",
        "▸".cyan(),
        record.name.bold(),
        status_label(record.status.into()),
        record.duration
    )];

    lines.push(format!(
        "    {}",
        format!(
            "ID: {}  Completed: {}  Progress: {}%",
            record.pipeline_id,
            record.completed_at.format("%Y-%m-%d %H:%M:%S"),
            record.completion_percent()
        )
        .dimmed()
    ));

    if let Some(tasks) = record.tasks.as_deref().filter(|t| !t.is_empty()) {
        for task in tasks {
            let description = task.description().unwrap_or_else(|| "-".to_string());
            let agent = task.agent_name().unwrap_or_default();
            let status = task.status().unwrap_or_default();
            let duration = task.duration().unwrap_or_default();
            lines.push(format!(
                "      - {} {} {} {}",
                description,
                agent.cyan(),
                status,
                duration.dimmed()
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use statusboard_core::domain::pipeline::PipelineSnapshot;
    use statusboard_core::projection::project;

    fn plain() {
        colored::control::set_override(false);
    }

    fn running_view() -> PipelineView {
        let mut snapshot = PipelineSnapshot::new(
            "p1",
            "Release",
            vec!["fetch".to_string(), "build".to_string(), "ship".to_string()],
        );
        snapshot.current_stage = Some("build".to_string());
        snapshot.completed_stages = vec!["fetch".to_string()];
        snapshot.started_at = Some("2026-02-28T10:00:00Z".to_string());
        project(&snapshot)
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 4), "░░░░");
        assert_eq!(progress_bar(50, 4), "██░░");
        assert_eq!(progress_bar(100, 4), "████");
        assert_eq!(progress_bar(255, 4), "████");
    }

    #[test]
    fn test_expanded_pipeline_lists_stages() {
        plain();
        let text = format_pipeline(&running_view(), true);

        assert!(text.contains("Release [running]"));
        assert!(text.contains(" 33%"));
        assert!(text.contains("ID: p1"));
        assert!(text.contains("Started: 2026-02-28 10:00:00"));
        assert!(text.contains("✓ fetch"));
        assert!(text.contains("▶ build"));
        assert!(text.contains("○ ship"));
    }

    #[test]
    fn test_collapsed_pipeline_is_one_line_of_stages() {
        plain();
        let text = format_pipeline(&running_view(), false);

        assert!(text.contains("1/3 stages, at build"));
        assert!(!text.contains("○ ship"));
    }

    #[test]
    fn test_failed_pipeline_collapsed() {
        plain();
        let mut snapshot =
            PipelineSnapshot::new("p2", "Deploy", vec!["plan".to_string(), "apply".to_string()]);
        snapshot.status = PipelineStatus::Failed;
        snapshot.current_stage = Some("apply".to_string());
        snapshot.completed_stages = vec!["plan".to_string()];

        let text = format_pipeline(&project(&snapshot), false);
        assert!(text.contains("[failed]"));
        assert!(text.contains("1/2 stages, stopped at apply"));
    }

    #[test]
    fn test_history_record_shows_progress_at_finish() {
        plain();
        let record = HistoryRecord {
            pipeline_id: "p9".to_string(),
            name: "Deploy".to_string(),
            stages: vec!["plan".to_string(), "apply".to_string(), "verify".to_string()],
            completed_stages: vec!["plan".to_string(), "apply".to_string()],
            started_at: None,
            completed_at: parse_timestamp("2026-02-28T10:03:10Z").unwrap(),
            status: statusboard_core::domain::pipeline::TerminalStatus::Failed,
            duration: "3m 10s".to_string(),
            tasks: None,
        };

        let text = format_history_record(&record);
        assert!(text.contains("Deploy [failed] 3m 10s"));
        assert!(text.contains("ID: p9  Completed: 2026-02-28 10:03:10  Progress: 67%"));
    }

    #[test]
    fn test_empty_board() {
        plain();
        let text = format_board(&[], &ExpandState::new());
        assert!(text.contains("No pipelines"));
    }
}
