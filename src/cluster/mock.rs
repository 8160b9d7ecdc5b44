//! In-Memory Cluster for Tests
//!
//! Implements [`ClusterClient`] against scripted state so lifecycle and query
//! logic can be exercised without a network. Index-build jobs stay `active`
//! until the test completes or kills them; iteration jobs run eagerly against
//! preloaded chunk data. Purges are counted so tests can assert that no job
//! handle leaks.

use super::client::ClusterClient;
use super::types::{IterateOp, JobName, JobReport, JobSpec, JobStatus};

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

struct MockJob {
    status: JobStatus,
    results: Vec<String>,
}

#[derive(Default)]
pub struct MockCluster {
    jobs: DashMap<String, MockJob>,
    /// Chunk locator -> records stored in that chunk.
    chunks: DashMap<String, Vec<(String, String)>>,
    /// Build-job result location -> chunk files it expands to.
    expansions: DashMap<String, Vec<String>>,
    /// Iteration-job result location -> records the job emitted.
    emitted: DashMap<String, Vec<(String, String)>>,
    pub purge_calls: AtomicUsize,
    pub results_calls: AtomicUsize,
    fail_submit: AtomicBool,
    fail_iterate: AtomicBool,
}

impl MockCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preloads a chunk with records for iteration jobs to read.
    pub fn load_chunk(&self, locator: &str, records: Vec<(&str, &str)>) {
        self.chunks.insert(
            locator.to_string(),
            records
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
    }

    /// Scripts what a build-job result location expands to.
    pub fn set_expansion(&self, location: &str, files: Vec<&str>) {
        self.expansions.insert(
            location.to_string(),
            files.into_iter().map(String::from).collect(),
        );
    }

    /// Marks a submitted build job as finished with the given result locations.
    pub fn complete(&self, name: &str, results: Vec<&str>) {
        self.jobs.insert(
            name.to_string(),
            MockJob {
                status: JobStatus::Ready,
                results: results.into_iter().map(String::from).collect(),
            },
        );
    }

    /// Marks a submitted build job as terminally failed.
    pub fn kill(&self, name: &str) {
        self.jobs.insert(
            name.to_string(),
            MockJob {
                status: JobStatus::Dead,
                results: Vec::new(),
            },
        );
    }

    /// Makes every subsequent submission fail (unreachable master).
    pub fn fail_submissions(&self) {
        self.fail_submit.store(true, Ordering::SeqCst);
    }

    /// Makes every subsequent iteration job come up `dead`.
    pub fn fail_iterations(&self) {
        self.fail_iterate.store(true, Ordering::SeqCst);
    }

    /// Number of jobs whose remote state has not been purged.
    pub fn live_jobs(&self) -> usize {
        self.jobs.len()
    }

    pub fn purge_count(&self) -> usize {
        self.purge_calls.load(Ordering::SeqCst)
    }

    pub fn results_count(&self) -> usize {
        self.results_calls.load(Ordering::SeqCst)
    }

    fn run_iterate(&self, name: &str, ichunks: &[String], op: &IterateOp) -> MockJob {
        let mut out = Vec::new();
        for chunk in ichunks {
            let records = match self.chunks.get(chunk) {
                Some(records) => records.clone(),
                None => Vec::new(),
            };
            for (key, value) in records {
                match op {
                    IterateOp::Keys => out.push((key.clone(), key.clone())),
                    IterateOp::Values => out.push((key.clone(), value.clone())),
                    IterateOp::Query { predicate } => {
                        if predicate.matches(&key) {
                            out.push((key.clone(), value.clone()));
                        }
                    }
                }
            }
        }

        let location = format!("mock://{}/part-0", name);
        self.emitted.insert(location.clone(), out);

        MockJob {
            status: JobStatus::Ready,
            results: vec![location],
        }
    }
}

#[async_trait]
impl ClusterClient for MockCluster {
    async fn submit(&self, name: &JobName, spec: JobSpec) -> Result<JobName> {
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("master unreachable"));
        }

        let job = match &spec {
            JobSpec::Index { .. } => MockJob {
                status: JobStatus::Active,
                results: Vec::new(),
            },
            JobSpec::Iterate { ichunks, op } => {
                if self.fail_iterate.load(Ordering::SeqCst) {
                    MockJob {
                        status: JobStatus::Dead,
                        results: Vec::new(),
                    }
                } else {
                    self.run_iterate(name.as_str(), ichunks, op)
                }
            }
        };

        self.jobs.insert(name.0.clone(), job);
        Ok(name.clone())
    }

    async fn results(&self, name: &str) -> Result<JobReport> {
        self.results_calls.fetch_add(1, Ordering::SeqCst);

        Ok(match self.jobs.get(name) {
            Some(job) => JobReport {
                status: job.status,
                results: job.results.clone(),
            },
            None => JobReport {
                status: JobStatus::Unknown,
                results: Vec::new(),
            },
        })
    }

    async fn purge(&self, name: &str) -> Result<()> {
        self.purge_calls.fetch_add(1, Ordering::SeqCst);
        self.jobs.remove(name);
        Ok(())
    }

    async fn expand(&self, location: &str) -> Result<Vec<String>> {
        match self.expansions.get(location) {
            Some(files) => Ok(files.clone()),
            None => Err(anyhow::anyhow!("unknown result location: {}", location)),
        }
    }

    async fn fetch_records(&self, location: &str) -> Result<Vec<(String, String)>> {
        match self.emitted.get(location) {
            Some(records) => Ok(records.clone()),
            None => Err(anyhow::anyhow!("unknown result location: {}", location)),
        }
    }
}
