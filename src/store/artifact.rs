use crate::cluster::types::now_ms;
use serde::{Deserialize, Serialize};

/// The persisted description of a materialized index.
///
/// The chunk list is immutable once written; replacing an index writes a
/// whole new artifact over the old one, never edits it in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexArtifact {
    /// Ordered locators of the chunks that constitute the index.
    pub ichunks: Vec<String>,
    /// Name of the build job this artifact was materialized from, if any.
    /// Uploaded artifacts have no origin.
    #[serde(default)]
    pub origin: Option<String>,
    /// Timestamp (ms) when the artifact was persisted.
    pub created_at: u64,
}

impl IndexArtifact {
    /// An artifact materialized from a completed build job.
    pub fn from_job(ichunks: Vec<String>, job: &str) -> Self {
        Self {
            ichunks,
            origin: Some(job.to_string()),
            created_at: now_ms(),
        }
    }

    /// An artifact uploaded directly by a caller.
    pub fn uploaded(ichunks: Vec<String>) -> Self {
        Self {
            ichunks,
            origin: None,
            created_at: now_ms(),
        }
    }
}
