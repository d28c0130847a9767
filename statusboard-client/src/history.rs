//! History endpoints

use std::collections::HashSet;

use reqwest::{Method, RequestBuilder};
use statusboard_core::domain::history::HistoryRecord;
use statusboard_core::dto::history::ArchivedId;
use tracing::{debug, info};

use crate::StoreClient;
use crate::error::{ClientError, Result};

impl StoreClient {
    // =============================================================================
    // Existence Checks
    // =============================================================================

    /// Which of `pipeline_ids` already have a history record
    ///
    /// Issues a single query for the whole batch. An empty input returns an
    /// empty set without touching the store.
    pub async fn archived_ids(&self, pipeline_ids: &[String]) -> Result<HashSet<String>> {
        if pipeline_ids.is_empty() {
            return Ok(HashSet::new());
        }

        debug!("Checking {} id(s) against history", pipeline_ids.len());
        let response = self.archived_ids_request(pipeline_ids).send().await?;

        let rows: Vec<ArchivedId> = self.handle_response(response).await?;
        Ok(rows.into_iter().map(|row| row.pipeline_id).collect())
    }

    // =============================================================================
    // Append
    // =============================================================================

    /// Append history records in one all-or-nothing insert
    ///
    /// Rows whose `pipeline_id` already exists are ignored by the store, so a
    /// racing writer cannot produce a second record for the same pipeline.
    pub async fn insert_history(&self, records: &[HistoryRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let response = self.insert_history_request(records).send().await?;
        self.handle_empty_response(response).await?;

        info!(
            "Inserted {} history record(s) into {}",
            records.len(),
            self.history_table
        );
        Ok(())
    }

    // =============================================================================
    // Query
    // =============================================================================

    /// Most recently completed history records, newest first
    pub async fn list_history(&self, limit: usize) -> Result<Vec<HistoryRecord>> {
        if limit == 0 {
            return Err(ClientError::InvalidRequest(
                "history limit must be greater than 0".to_string(),
            ));
        }

        let response = self.list_history_request(limit).send().await?;
        self.handle_response(response).await
    }

    fn archived_ids_request(&self, pipeline_ids: &[String]) -> RequestBuilder {
        let url = self.table_url(&self.history_table);
        self.request(Method::GET, &url).query(&[
            ("select", "pipeline_id".to_string()),
            ("pipeline_id", in_filter(pipeline_ids)),
        ])
    }

    fn insert_history_request(&self, records: &[HistoryRecord]) -> RequestBuilder {
        let url = self.table_url(&self.history_table);
        self.request(Method::POST, &url)
            .query(&[("on_conflict", "pipeline_id")])
            .header("Prefer", "resolution=ignore-duplicates,return=minimal")
            .json(records)
    }

    fn list_history_request(&self, limit: usize) -> RequestBuilder {
        let url = self.table_url(&self.history_table);
        self.request(Method::GET, &url).query(&[
            ("select", "*".to_string()),
            ("order", "completed_at.desc".to_string()),
            ("limit", limit.to_string()),
        ])
    }
}

/// Builds an `in.(...)` filter with every value quoted
fn in_filter(values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}
