//! Ephemeral Query Orchestrator
//!
//! One routine covers keys, values and predicate queries: submit an iteration
//! job over the index's chunks, poll it to completion under a deadline,
//! collect the emitted records, purge the job. The job handle lives inside a
//! guard that schedules the purge even if the request future is dropped
//! mid-flight, so no remote state outlives its request.

use super::predicate::Predicate;
use crate::cluster::client::ClusterClient;
use crate::cluster::types::{IterateOp, JobName, JobSpec, JobStatus};
use crate::error::{IndexError, Result};

use std::sync::Arc;
use std::time::Duration;

pub struct QueryOrchestrator {
    cluster: Arc<dyn ClusterClient>,
    job_prefix: String,
    job_timeout: Duration,
    poll_interval: Duration,
}

impl QueryOrchestrator {
    pub fn new(
        cluster: Arc<dyn ClusterClient>,
        job_prefix: impl Into<String>,
        job_timeout: Duration,
        poll_interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            cluster,
            job_prefix: job_prefix.into(),
            job_timeout,
            poll_interval,
        })
    }

    /// Enumerates every record's key across the chunks.
    pub async fn keys(&self, ichunks: Vec<String>) -> Result<Vec<String>> {
        self.run(ichunks, IterateOp::Keys).await
    }

    /// Enumerates every record's value across the chunks.
    pub async fn values(&self, ichunks: Vec<String>) -> Result<Vec<String>> {
        self.run(ichunks, IterateOp::Values).await
    }

    /// Returns the values of records whose key satisfies the predicate.
    pub async fn query(&self, ichunks: Vec<String>, predicate: Predicate) -> Result<Vec<String>> {
        self.run(ichunks, IterateOp::Query { predicate }).await
    }

    async fn run(&self, ichunks: Vec<String>, op: IterateOp) -> Result<Vec<String>> {
        let name = JobName::derive(&self.job_prefix);
        let spec = JobSpec::Iterate { ichunks, op };

        let submitted = self
            .cluster
            .submit(&name, spec)
            .await
            .map_err(|e| IndexError::Failed(format!("failed to run iteration job: {}", e)))?;

        let job = JobGuard::new(self.cluster.clone(), submitted);
        let outcome = self.collect(job.name()).await;
        job.purge().await;

        outcome
    }

    /// Polls the job to completion and gathers the emitted values.
    ///
    /// The deadline bounds the whole wait; on expiry the caller gets a
    /// job-failure instead of an indefinitely blocked request.
    async fn collect(&self, name: &str) -> Result<Vec<String>> {
        let deadline = tokio::time::Instant::now() + self.job_timeout;

        loop {
            let report = self
                .cluster
                .results(name)
                .await
                .map_err(|e| IndexError::Cluster(e.to_string()))?;

            match report.status {
                JobStatus::Ready => {
                    let mut values = Vec::new();
                    for location in &report.results {
                        let records = self
                            .cluster
                            .fetch_records(location)
                            .await
                            .map_err(|e| IndexError::Failed(e.to_string()))?;
                        values.extend(records.into_iter().map(|(_, v)| v));
                    }
                    tracing::debug!("Iteration job {} emitted {} values", name, values.len());
                    return Ok(values);
                }
                JobStatus::Dead => {
                    return Err(IndexError::Failed(format!("iteration job {} died", name)));
                }
                JobStatus::Unknown => {
                    return Err(IndexError::Failed(format!(
                        "iteration job {} disappeared from the cluster",
                        name
                    )));
                }
                JobStatus::Active => {
                    if tokio::time::Instant::now() >= deadline {
                        return Err(IndexError::Failed(format!(
                            "iteration job {} timed out",
                            name
                        )));
                    }
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }
}

/// Scoped ownership of a remote job handle.
///
/// The happy and error paths purge explicitly via [`JobGuard::purge`]; if the
/// request future is dropped before reaching either, `Drop` schedules the
/// purge on the runtime instead, so remote job state never leaks.
struct JobGuard {
    cluster: Arc<dyn ClusterClient>,
    name: JobName,
    purged: bool,
}

impl JobGuard {
    fn new(cluster: Arc<dyn ClusterClient>, name: JobName) -> Self {
        Self {
            cluster,
            name,
            purged: false,
        }
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }

    async fn purge(mut self) {
        if let Err(e) = self.cluster.purge(self.name.as_str()).await {
            tracing::warn!("Failed to purge iteration job {}: {}", self.name, e);
        }
        self.purged = true;
    }
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        if self.purged {
            return;
        }

        let cluster = self.cluster.clone();
        let name = self.name.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = cluster.purge(name.as_str()).await {
                    tracing::warn!("Failed to purge abandoned job {}: {}", name, e);
                }
            });
        } else {
            tracing::warn!("No runtime to purge abandoned job {}", name);
        }
    }
}
