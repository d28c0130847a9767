//! Table definitions for the backing store
//!
//! The store is provisioned by operators, not by this crate. These statements
//! are what `statusboard schema` prints for them to apply.

/// Whether `name` is safe to splice into SQL and URLs as a table name
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// DDL for the live-state table
pub fn state_table_ddl(table: &str) -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS {table} (
    id TEXT PRIMARY KEY,
    data JSONB NOT NULL DEFAULT '{{}}',
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);"#
    )
}

/// DDL for the history table
///
/// The unique key on `pipeline_id` makes archival at-most-once even when two
/// writers race past the existence check. The trailing index statement adds
/// the same guarantee to tables created before the constraint existed.
pub fn history_table_ddl(table: &str) -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS {table} (
    id BIGSERIAL PRIMARY KEY,
    pipeline_id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    stages TEXT[] NOT NULL DEFAULT '{{}}',
    completed_stages TEXT[] NOT NULL DEFAULT '{{}}',
    started_at TIMESTAMPTZ,
    completed_at TIMESTAMPTZ NOT NULL,
    status VARCHAR(20) NOT NULL CHECK (status IN ('complete', 'failed')),
    duration TEXT NOT NULL,
    tasks JSONB
);

CREATE UNIQUE INDEX IF NOT EXISTS {table}_pipeline_id_key ON {table} (pipeline_id);
CREATE INDEX IF NOT EXISTS {table}_completed_at_idx ON {table} (completed_at DESC);"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert!(is_valid_table_name("pipeline_history"));
        assert!(is_valid_table_name("_state2"));
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("2fast"));
        assert!(!is_valid_table_name("history; DROP TABLE x"));
        assert!(!is_valid_table_name(&"a".repeat(64)));
    }

    #[test]
    fn test_history_ddl_has_unique_pipeline_id() {
        let ddl = history_table_ddl("runs");
        assert!(ddl.contains("CREATE TABLE IF NOT EXISTS runs ("));
        assert!(ddl.contains("pipeline_id TEXT NOT NULL UNIQUE"));
        assert!(ddl.contains("runs_pipeline_id_key ON runs (pipeline_id)"));
        assert!(ddl.contains("DEFAULT '{}'"));
    }

    #[test]
    fn test_state_ddl() {
        let ddl = state_table_ddl("dashboard_state");
        assert!(ddl.contains("data JSONB NOT NULL DEFAULT '{}'"));
    }
}
