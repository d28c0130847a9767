//! History command handler

use anyhow::{Context, Result};
use colored::*;

use crate::config::Config;
use crate::render;

/// List the most recently archived pipeline runs
pub async fn list_history(config: &Config, limit: usize, json: bool) -> Result<()> {
    let client = config.store_client()?;
    let records = client
        .list_history(limit)
        .await
        .context("Failed to fetch pipeline history")?;

    if json {
        let json = serde_json::to_string_pretty(&records)
            .context("Failed to serialize history records")?;
        println!("{}", json);
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", "No archived pipelines.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Archived pipelines ({}):", records.len()).bold()
    );
    println!();
    for record in &records {
        println!("{}", render::format_history_record(record));
    }

    Ok(())
}
