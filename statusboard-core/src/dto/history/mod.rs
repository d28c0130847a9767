//! History row DTOs

use serde::{Deserialize, Serialize};

/// Projection of a history row down to its key, used by existence checks
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchivedId {
    pub pipeline_id: String,
}
