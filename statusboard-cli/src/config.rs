//! Configuration module
//!
//! Handles CLI configuration: where the store lives, which tables to use and
//! how often to poll.

use std::time::Duration;

use anyhow::{Context, Result};
use statusboard_client::StoreClient;
use statusboard_client::schema::is_valid_table_name;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the store (e.g., "https://example.supabase.co")
    pub store_url: String,

    /// Key sent with every store request
    pub api_key: Option<String>,

    /// Table and row holding the live-state document
    pub state_table: String,
    pub state_id: String,

    /// Append-only table of finished pipelines
    pub history_table: String,

    /// How often `watch` re-reads the live state
    pub poll_interval: Duration,

    /// Upper bound on a single store request
    pub request_timeout: Duration,
}

impl Config {
    /// Validates the settings needed to reach the store
    pub fn validate(&self) -> Result<()> {
        if self.store_url.is_empty() {
            anyhow::bail!("store_url cannot be empty");
        }

        if !self.store_url.starts_with("http://") && !self.store_url.starts_with("https://") {
            anyhow::bail!("store_url must start with http:// or https://");
        }

        if self.state_id.trim().is_empty() {
            anyhow::bail!("state_id cannot be empty");
        }

        self.validate_tables()?;

        if self.poll_interval.as_secs() == 0 {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.as_secs() == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Validates only the table names, for commands that never connect
    pub fn validate_tables(&self) -> Result<()> {
        for (setting, table) in [
            ("state_table", &self.state_table),
            ("history_table", &self.history_table),
        ] {
            if !is_valid_table_name(table) {
                anyhow::bail!("{} '{}' is not a valid table name", setting, table);
            }
        }
        Ok(())
    }

    /// Builds a store client from this configuration
    pub fn store_client(&self) -> Result<StoreClient> {
        self.validate()?;

        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let mut client = StoreClient::with_client(&self.store_url, http)
            .with_state_table(&self.state_table, &self.state_id)
            .with_history_table(&self.history_table);

        if let Some(key) = &self.api_key {
            client = client.with_api_key(key);
        }

        Ok(client)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:54321".to_string(),
            api_key: None,
            state_table: statusboard_client::DEFAULT_STATE_TABLE.to_string(),
            state_id: statusboard_client::DEFAULT_STATE_ID.to_string(),
            history_table: statusboard_client::DEFAULT_HISTORY_TABLE.to_string(),
            poll_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(15),
        }
    }
}
