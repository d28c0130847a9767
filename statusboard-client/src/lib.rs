//! Statusboard Store Client
//!
//! A small, typed HTTP client for the managed store behind the dashboard. The
//! store exposes its tables over a PostgREST-style interface at
//! `{base_url}/rest/v1/{table}`.
//!
//! Two tables are used:
//! - the live-state table, holding a single row whose `data` column is the
//!   whole dashboard document
//! - the history table, an append-only log of finished pipelines keyed by
//!   `pipeline_id`
//!
//! # Example
//!
//! ```no_run
//! use statusboard_client::StoreClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = StoreClient::new("https://example.supabase.co").with_api_key("anon-key");
//!
//!     let state = client.fetch_live_state().await?;
//!     println!("{} pipeline(s) live", state.pipelines.len());
//!     Ok(())
//! }
//! ```

pub mod error;
mod history;
pub mod memory;
pub mod schema;
mod state;
pub mod store;
#[cfg(test)]
mod test_server;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use memory::MemoryStore;
pub use store::DashboardStore;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

/// Default name of the live-state table
pub const DEFAULT_STATE_TABLE: &str = "dashboard_state";

/// Default key of the live-state row
pub const DEFAULT_STATE_ID: &str = "current";

/// Default name of the history table
pub const DEFAULT_HISTORY_TABLE: &str = "pipeline_history";

/// HTTP client for the dashboard's backing store
#[derive(Debug, Clone)]
pub struct StoreClient {
    /// Base URL of the store (e.g., "https://example.supabase.co")
    base_url: String,
    /// Key sent as both `apikey` and bearer token
    api_key: Option<String>,
    state_table: String,
    state_id: String,
    history_table: String,
    /// HTTP client instance
    client: Client,
}

impl StoreClient {
    /// Create a new store client with default table names
    ///
    /// # Example
    /// ```
    /// use statusboard_client::StoreClient;
    ///
    /// let client = StoreClient::new("http://localhost:54321");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new store client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            state_table: DEFAULT_STATE_TABLE.to_string(),
            state_id: DEFAULT_STATE_ID.to_string(),
            history_table: DEFAULT_HISTORY_TABLE.to_string(),
            client,
        }
    }

    /// Sets the key used to authenticate against the store
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Points the client at a different live-state table and row
    pub fn with_state_table(mut self, table: impl Into<String>, id: impl Into<String>) -> Self {
        self.state_table = table.into();
        self.state_id = id.into();
        self
    }

    /// Points the client at a different history table
    pub fn with_history_table(mut self, table: impl Into<String>) -> Self {
        self.history_table = table.into();
        self
    }

    /// Get the base URL of the store
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn history_table(&self) -> &str {
        &self.history_table
    }

    // =============================================================================
    // Request Building
    // =============================================================================

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Starts a request with the store's auth headers attached
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, url);

        if let Some(key) = &self.api_key {
            builder = builder.header("apikey", key.as_str());
            if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", key)) {
                builder = builder.header(AUTHORIZATION, bearer);
            }
        }

        builder
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle a store response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle a store response that returns no content (e.g., PATCH operations)
    ///
    /// This method checks the status code and returns an error if the request failed.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
