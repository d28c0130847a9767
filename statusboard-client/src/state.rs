//! Live-state endpoints

use reqwest::{Method, RequestBuilder};
use statusboard_core::domain::pipeline::LiveState;
use statusboard_core::dto::state::{StateKey, StatePatch, StateRow};
use tracing::debug;

use crate::StoreClient;
use crate::error::{ClientError, Result};

impl StoreClient {
    // =============================================================================
    // Live State
    // =============================================================================

    /// Fetch the current live-state document
    ///
    /// # Returns
    /// The document stored in the configured live-state row
    ///
    /// # Errors
    /// `NotFound` when the row does not exist (or row-level security hides it).
    pub async fn fetch_live_state(&self) -> Result<LiveState> {
        debug!("Fetching live state {}/{}", self.state_table, self.state_id);
        let response = self.live_state_request().send().await?;

        let rows: Vec<StateRow> = self.handle_response(response).await?;
        rows.into_iter()
            .next()
            .map(|row| row.data)
            .ok_or_else(|| self.missing_state_row())
    }

    /// Replace the live-state document
    ///
    /// # Arguments
    /// * `state` - The full document to store; last write wins
    ///
    /// # Errors
    /// `NotFound` when no row matched, since the store answers such a PATCH
    /// with success and an empty body.
    pub async fn patch_live_state(&self, state: &LiveState) -> Result<()> {
        debug!(
            "Patching live state {}/{} ({} pipeline(s))",
            self.state_table,
            self.state_id,
            state.pipelines.len()
        );
        let response = self.patch_state_request(state).send().await?;

        let updated: Vec<StateKey> = self.handle_response(response).await?;
        if updated.is_empty() {
            return Err(self.missing_state_row());
        }
        Ok(())
    }

    fn missing_state_row(&self) -> ClientError {
        ClientError::NotFound(format!(
            "live-state row '{}' in table '{}'",
            self.state_id, self.state_table
        ))
    }

    fn live_state_request(&self) -> RequestBuilder {
        let url = self.table_url(&self.state_table);
        self.request(Method::GET, &url).query(&[
            ("id", format!("eq.{}", self.state_id)),
            ("select", "data".to_string()),
        ])
    }

    fn patch_state_request(&self, state: &LiveState) -> RequestBuilder {
        let url = self.table_url(&self.state_table);
        self.request(Method::PATCH, &url)
            .query(&[
                ("id", format!("eq.{}", self.state_id)),
                ("select", "id".to_string()),
            ])
            .header("Prefer", "return=representation")
            .json(&StatePatch {
                data: state,
                updated_at: chrono::Utc::now(),
            })
    }
}
