//! Live-state row DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::pipeline::LiveState;

/// A live-state row as returned by a `select=data` query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateRow {
    pub data: LiveState,
}

/// Body of the PATCH that replaces the live-state document
#[derive(Debug, Clone, Serialize)]
pub struct StatePatch<'a> {
    pub data: &'a LiveState,
    pub updated_at: DateTime<Utc>,
}

/// Key of a live-state row, returned by a PATCH with `select=id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateKey {
    pub id: String,
}
