//! Schema command handler

use anyhow::Result;
use statusboard_client::schema::{history_table_ddl, state_table_ddl};

use crate::config::Config;

/// SQL for both tables under the configured names
pub fn schema_sql(config: &Config) -> Result<String> {
    config.validate_tables()?;

    Ok(format!(
        "-- Live-state document ({state}, row id '{id}')\n{state_ddl}\n\n-- Archived pipeline runs\n{history_ddl}\n",
        state = config.state_table,
        id = config.state_id,
        state_ddl = state_table_ddl(&config.state_table),
        history_ddl = history_table_ddl(&config.history_table),
    ))
}

/// Handle `statusboard schema`
pub fn print_schema(config: &Config) -> Result<()> {
    print!("{}", schema_sql(config)?);
    Ok(())
}
