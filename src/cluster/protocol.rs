//! Cluster Master Wire Protocol
//!
//! Defines the Data Transfer Objects (DTOs) exchanged with the compute
//! cluster master over HTTP: job submission, status/results reporting and
//! purging. Constants define the master's endpoints.

use super::types::{JobSpec, JobStatus};
use serde::{Deserialize, Serialize};

/// POST: submit a job. GET `/{name}`: report status. DELETE `/{name}`: purge.
pub const ENDPOINT_JOBS: &str = "/jobs";

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitJobRequest {
    /// The name the job should run under, derived by the caller.
    pub name: String,
    #[serde(flatten)]
    pub spec: JobSpec,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitJobResponse {
    /// The authoritative name the master registered the job under.
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobResultsResponse {
    pub status: JobStatus,
    /// Output locators, present once the job is `ready`.
    #[serde(default)]
    pub results: Vec<String>,
}
