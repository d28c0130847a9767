//! Pipeline resolver module
//!
//! Resolves a pipeline id or an unambiguous prefix of one against the
//! pipelines in a live-state document, so users can type `show nig` instead of
//! `show nightly-build-2026-02-28`.

use anyhow::{Result, anyhow};
use statusboard_core::domain::pipeline::{LiveState, PipelineSnapshot};

/// Resolve a pipeline id or prefix to the matching snapshot
///
/// An exact id match always wins. Otherwise the input is treated as a
/// case-insensitive prefix.
///
/// # Errors
/// Returns an error if:
/// - No pipeline matches the prefix
/// - Multiple pipelines match the prefix (ambiguous)
pub fn resolve_pipeline<'a>(state: &'a LiveState, id_or_prefix: &str) -> Result<&'a PipelineSnapshot> {
    if let Some(exact) = state.find(id_or_prefix) {
        return Ok(exact);
    }

    let prefix = id_or_prefix.to_lowercase();

    let matches: Vec<_> = state
        .pipelines
        .iter()
        .filter(|p| {
            p.id
                .as_deref()
                .is_some_and(|id| id.to_lowercase().starts_with(&prefix))
        })
        .collect();

    match matches.len() {
        0 => Err(anyhow!(
            "No pipeline found with ID starting with '{}'",
            id_or_prefix
        )),
        1 => Ok(matches[0]),
        _ => {
            let ids: Vec<&str> = matches.iter().filter_map(|p| p.id.as_deref()).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple pipelines: {}",
                id_or_prefix,
                ids.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> LiveState {
        LiveState::from_json(
            r#"{"pipelines": [
                {"id": "nightly-build", "status": "running"},
                {"id": "nightly-deploy", "status": "complete"},
                {"id": "Weekly-Report", "status": "failed"},
                {"status": "running"}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_exact_match() {
        let state = state();
        let found = resolve_pipeline(&state, "nightly-build").unwrap();
        assert_eq!(found.id.as_deref(), Some("nightly-build"));
    }

    #[test]
    fn test_prefix_is_case_insensitive() {
        let state = state();
        let found = resolve_pipeline(&state, "week").unwrap();
        assert_eq!(found.id.as_deref(), Some("Weekly-Report"));
    }

    #[test]
    fn test_ambiguous_prefix() {
        let state = state();
        let err = resolve_pipeline(&state, "nightly").unwrap_err();
        assert!(err.to_string().contains("Ambiguous prefix"));
        assert!(err.to_string().contains("nightly-deploy"));
    }

    #[test]
    fn test_no_match() {
        let state = state();
        assert!(resolve_pipeline(&state, "monthly").is_err());
    }
}
