//! Store abstraction
//!
//! The operations the dashboard needs from its backing store, as a trait so
//! the update flow can run against the HTTP store or an in-memory one.

use std::collections::HashSet;

use async_trait::async_trait;
use statusboard_core::domain::history::HistoryRecord;
use statusboard_core::domain::pipeline::LiveState;

use crate::StoreClient;
use crate::error::Result;

/// Repository trait for the live-state row and the history table
#[async_trait]
pub trait DashboardStore: Send + Sync {
    /// Reads the live-state document
    async fn fetch_live_state(&self) -> Result<LiveState>;

    /// Overwrites the live-state document
    async fn patch_live_state(&self, state: &LiveState) -> Result<()>;

    /// Returns the subset of `pipeline_ids` already present in history
    async fn archived_ids(&self, pipeline_ids: &[String]) -> Result<HashSet<String>>;

    /// Appends records; rows for already archived ids are ignored
    async fn insert_history(&self, records: &[HistoryRecord]) -> Result<()>;

    /// Newest history records first
    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryRecord>>;
}

#[async_trait]
impl DashboardStore for StoreClient {
    async fn fetch_live_state(&self) -> Result<LiveState> {
        StoreClient::fetch_live_state(self).await
    }

    async fn patch_live_state(&self, state: &LiveState) -> Result<()> {
        StoreClient::patch_live_state(self, state).await
    }

    async fn archived_ids(&self, pipeline_ids: &[String]) -> Result<HashSet<String>> {
        StoreClient::archived_ids(self, pipeline_ids).await
    }

    async fn insert_history(&self, records: &[HistoryRecord]) -> Result<()> {
        StoreClient::insert_history(self, records).await
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryRecord>> {
        StoreClient::list_history(self, limit).await
    }
}
