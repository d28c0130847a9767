//! In-memory store
//!
//! Behaves like the HTTP store, including the unique key on `pipeline_id`,
//! but keeps everything in process. Used for dry runs and tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use statusboard_core::domain::history::HistoryRecord;
use statusboard_core::domain::pipeline::LiveState;

use crate::error::{ClientError, Result};
use crate::store::DashboardStore;

#[derive(Debug, Default)]
struct Inner {
    live_state: Option<LiveState>,
    history: Vec<HistoryRecord>,
}

/// Thread-safe in-memory implementation of [`DashboardStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds history without going through the insert path
    pub fn seed_history(&self, records: impl IntoIterator<Item = HistoryRecord>) {
        self.lock().history.extend(records);
    }

    /// Copy of every stored history record, in insertion order
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.lock().history.clone()
    }

    pub fn live_state(&self) -> Option<LiveState> {
        self.lock().live_state.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn fetch_live_state(&self) -> Result<LiveState> {
        self.lock()
            .live_state
            .clone()
            .ok_or_else(|| ClientError::NotFound("live-state row".to_string()))
    }

    async fn patch_live_state(&self, state: &LiveState) -> Result<()> {
        self.lock().live_state = Some(state.clone());
        Ok(())
    }

    async fn archived_ids(&self, pipeline_ids: &[String]) -> Result<HashSet<String>> {
        let inner = self.lock();
        Ok(inner
            .history
            .iter()
            .filter(|r| pipeline_ids.contains(&r.pipeline_id))
            .map(|r| r.pipeline_id.clone())
            .collect())
    }

    async fn insert_history(&self, records: &[HistoryRecord]) -> Result<()> {
        let mut inner = self.lock();
        for record in records {
            let exists = inner
                .history
                .iter()
                .any(|r| r.pipeline_id == record.pipeline_id);
            if !exists {
                inner.history.push(record.clone());
            }
        }
        Ok(())
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryRecord>> {
        if limit == 0 {
            return Err(ClientError::InvalidRequest(
                "history limit must be greater than 0".to_string(),
            ));
        }

        let mut records = self.lock().history.clone();
        records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        records.truncate(limit);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use statusboard_core::domain::pipeline::TerminalStatus;

    fn record(id: &str, minutes_ago: i64) -> HistoryRecord {
        HistoryRecord {
            pipeline_id: id.to_string(),
            name: id.to_uppercase(),
            stages: vec![],
            completed_stages: vec![],
            started_at: None,
            completed_at: Utc::now() - TimeDelta::minutes(minutes_ago),
            status: TerminalStatus::Complete,
            duration: "unknown".to_string(),
            tasks: None,
        }
    }

    #[tokio::test]
    async fn test_insert_ignores_duplicate_ids() {
        let store = MemoryStore::new();
        store.insert_history(&[record("p1", 5)]).await.unwrap();

        let mut again = record("p1", 1);
        again.name = "second".to_string();
        store
            .insert_history(&[again, record("p2", 1)])
            .await
            .unwrap();

        let history = store.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].name, "P1");
    }

    #[tokio::test]
    async fn test_archived_ids_subset() {
        let store = MemoryStore::new();
        store.seed_history([record("p1", 1), record("p2", 1)]);

        let found = store
            .archived_ids(&["p2".to_string(), "p9".to_string()])
            .await
            .unwrap();
        assert_eq!(found, HashSet::from(["p2".to_string()]));
    }

    #[tokio::test]
    async fn test_list_history_newest_first() {
        let store = MemoryStore::new();
        store.seed_history([record("old", 30), record("new", 1), record("mid", 10)]);

        let listed = store.list_history(2).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|r| r.pipeline_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid"]);
    }

    #[tokio::test]
    async fn test_missing_live_state() {
        let store = MemoryStore::new();
        let err = store.fetch_live_state().await.unwrap_err();
        assert!(err.is_not_found());
    }
}
