//! Cluster Client
//!
//! The `ClusterClient` trait is the seam between the orchestration layers and
//! the remote compute cluster. `HttpCluster` is the production implementation,
//! speaking JSON over HTTP to the cluster master with bounded timeouts and
//! jittered retries so a flaky network surfaces as an error instead of an
//! indefinite stall.

use super::protocol::{JobResultsResponse, SubmitJobRequest, SubmitJobResponse, ENDPOINT_JOBS};
use super::types::{JobName, JobReport, JobSpec};

use anyhow::Result;
use async_trait::async_trait;

/// Operations the service consumes from the remote execution system.
///
/// Implementations must be safe to share across concurrent requests; every
/// request that needs cluster computation submits its own job and purges it
/// itself, so no job state is cached here.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Submits a job under the given name. Returns the authoritative name the
    /// cluster registered it under.
    async fn submit(&self, name: &JobName, spec: JobSpec) -> Result<JobName>;

    /// Reports the job's status and, when ready, its result locations.
    async fn results(&self, name: &str) -> Result<JobReport>;

    /// Releases the job's remote state. Callers treat failures as
    /// best-effort: they are logged, never propagated.
    async fn purge(&self, name: &str) -> Result<()>;

    /// Expands an index-build result location into its constituent chunk
    /// files, in order.
    async fn expand(&self, location: &str) -> Result<Vec<String>>;

    /// Fetches the key/value records an iteration job emitted at a result
    /// location.
    async fn fetch_records(&self, location: &str) -> Result<Vec<(String, String)>>;
}

/// HTTP implementation of [`ClusterClient`] against a cluster master.
pub struct HttpCluster {
    master: String,
    http_client: reqwest::Client,
    request_timeout: std::time::Duration,
}

impl HttpCluster {
    pub fn new(master: impl Into<String>) -> Self {
        Self {
            master: master.into().trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
            request_timeout: std::time::Duration::from_secs(10),
        }
    }

    fn job_url(&self, name: &str) -> String {
        format!("{}{}/{}", self.master, ENDPOINT_JOBS, name)
    }

    // --- HTTP Helpers with Backoff ---

    async fn post_with_retry<T: serde::Serialize>(
        &self,
        url: String,
        payload: &T,
        attempts: usize,
    ) -> Result<reqwest::Response> {
        let mut delay_ms = 150u64;

        for attempt in 0..attempts {
            let response = self
                .http_client
                .post(url.clone())
                .json(payload)
                .timeout(self.request_timeout)
                .send()
                .await;

            match response {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if attempt + 1 == attempts {
                        return Err(anyhow::anyhow!(e));
                    }
                    // Simple jitter to prevent thundering herd
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }

        Err(anyhow::anyhow!("Retry attempts exhausted"))
    }

    async fn get_with_retry(&self, url: String, attempts: usize) -> Result<reqwest::Response> {
        let mut delay_ms = 150u64;

        for attempt in 0..attempts {
            let response = self
                .http_client
                .get(url.clone())
                .timeout(self.request_timeout)
                .send()
                .await;

            match response {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if attempt + 1 == attempts {
                        return Err(anyhow::anyhow!(e));
                    }
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }

        Err(anyhow::anyhow!("Retry attempts exhausted"))
    }
}

#[async_trait]
impl ClusterClient for HttpCluster {
    async fn submit(&self, name: &JobName, spec: JobSpec) -> Result<JobName> {
        let payload = SubmitJobRequest {
            name: name.0.clone(),
            spec,
        };

        let response = self
            .post_with_retry(format!("{}{}", self.master, ENDPOINT_JOBS), &payload, 3)
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Job submission failed: {}", response.status()));
        }

        let submitted: SubmitJobResponse = response.json().await?;
        tracing::debug!("Submitted job {} to master", submitted.name);

        Ok(JobName(submitted.name))
    }

    async fn results(&self, name: &str) -> Result<JobReport> {
        let response = self.get_with_retry(self.job_url(name), 3).await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Job status query failed: {}",
                response.status()
            ));
        }

        let report: JobResultsResponse = response.json().await?;

        Ok(JobReport {
            status: report.status,
            results: report.results,
        })
    }

    async fn purge(&self, name: &str) -> Result<()> {
        let response = self
            .http_client
            .delete(self.job_url(name))
            .timeout(self.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Job purge failed: {}", response.status()));
        }

        tracing::debug!("Purged job {}", name);
        Ok(())
    }

    async fn expand(&self, location: &str) -> Result<Vec<String>> {
        let response = self.get_with_retry(location.to_string(), 3).await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Result expansion failed for {}: {}",
                location,
                response.status()
            ));
        }

        Ok(response.json().await?)
    }

    async fn fetch_records(&self, location: &str) -> Result<Vec<(String, String)>> {
        let response = self.get_with_retry(location.to_string(), 3).await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Record fetch failed for {}: {}",
                location,
                response.status()
            ));
        }

        Ok(response.json().await?)
    }
}
