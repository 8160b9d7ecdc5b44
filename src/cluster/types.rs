use crate::query::predicate::Predicate;
use serde::{Deserialize, Serialize};

/// Unique identifier for a job on the compute cluster.
///
/// Wrapper around the name string handed out at submission time. Index names
/// that start with the configured job prefix are assumed to be of this form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct JobName(pub String);

impl JobName {
    /// Derives a fresh job name from the configured prefix.
    ///
    /// The prefix ties the name to this deployment so that status resolution
    /// can recognize cluster-built indices; the UUID suffix makes it unique.
    pub fn derive(prefix: &str) -> Self {
        Self(format!("{}:{}", prefix, uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a job as reported by the cluster.
///
/// This is also the status vocabulary of an index that has not been
/// materialized yet: `unknown` and `active` are retryable from the caller's
/// perspective, `ready` and `dead` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// The cluster has never heard of this job.
    Unknown,
    /// The job is still running.
    Active,
    /// The job finished; its result locations are available.
    Ready,
    /// The job failed terminally.
    Dead,
}

/// Status report for a job, including result locations once `Ready`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub status: JobStatus,
    /// Locators of the job's outputs. Empty unless `status` is `Ready`.
    #[serde(default)]
    pub results: Vec<String>,
}

/// The operation an iteration job performs against an index's chunks.
///
/// One orchestration routine covers all three; this tag selects which field
/// of each record the job emits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum IterateOp {
    /// Emit every record's key.
    Keys,
    /// Emit every record's value.
    Values,
    /// Emit the values of records whose key satisfies the predicate.
    Query { predicate: Predicate },
}

/// The definition of a unit of work submitted to the cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum JobSpec {
    /// Build a new index from raw inputs: parse, partition into `nr_ichunks`
    /// chunks, balance, and write the chunk files.
    Index {
        input: Vec<String>,
        nr_ichunks: usize,
        parser: String,
        demux: String,
        balancer: String,
    },
    /// Read every chunk of an existing index and emit records per `op`.
    Iterate { ichunks: Vec<String>, op: IterateOp },
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}
