//! Index Lifecycle Manager
//!
//! Implements the central state machine: resolve an index name to
//! `unknown | active | ready | dead`, materializing completed build jobs into
//! local artifacts on first observation. Also owns submission, replacement
//! and deletion of indices.
//!
//! ## Responsibilities
//! - **Status resolution**: local store first, then the cluster, then a local
//!   re-check to tolerate concurrent materialization.
//! - **Materialization**: flatten a ready job's result locations into one
//!   ordered chunk list, persist atomically, purge the remote job.
//! - **Submission**: translate a `DataSet` into a build job under a derived
//!   name; a failed submission creates no local state.

use super::types::DataSet;
use crate::cluster::client::ClusterClient;
use crate::cluster::types::{JobName, JobReport, JobSpec, JobStatus};
use crate::error::{IndexError, Result};
use crate::store::artifact::IndexArtifact;
use crate::store::store::ArtifactStore;

use regex::Regex;
use std::io;
use std::sync::Arc;

pub struct LifecycleManager {
    store: ArtifactStore,
    cluster: Arc<dyn ClusterClient>,
    job_prefix: String,
    retry_after_secs: u64,
    name_pattern: Regex,
}

impl LifecycleManager {
    pub fn new(
        store: ArtifactStore,
        cluster: Arc<dyn ClusterClient>,
        job_prefix: impl Into<String>,
        retry_after_secs: u64,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            cluster,
            job_prefix: job_prefix.into(),
            retry_after_secs,
            // Names become file names in the store root, so anything that
            // could escape the directory or hide as a dotfile is rejected.
            name_pattern: Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._:@-]*$").unwrap(),
        })
    }

    /// Whether the name denotes a cluster-submitted index.
    pub fn is_cluster_name(&self, name: &str) -> bool {
        name.starts_with(&self.job_prefix)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.name_pattern.is_match(name) {
            Ok(())
        } else {
            Err(IndexError::InvalidName(name.to_string()))
        }
    }

    /// Lists the names of all materialized indices.
    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self.store.list()?)
    }

    /// Resolves the current status of an index name.
    ///
    /// A pure function over (local store, remote cluster); nothing is cached.
    /// The first observation of a `ready` build job materializes it as a side
    /// effect, so every caller afterwards is answered locally.
    pub async fn status(&self, name: &str) -> Result<JobStatus> {
        self.validate(name)?;

        if self.store.exists(name) {
            return Ok(JobStatus::Ready);
        }

        if !self.is_cluster_name(name) {
            return Ok(JobStatus::Unknown);
        }

        let report = self
            .cluster
            .results(name)
            .await
            .map_err(|e| IndexError::Cluster(e.to_string()))?;

        // A concurrent request may have materialized the artifact while the
        // remote call was in flight; the local copy is authoritative.
        if self.store.exists(name) {
            return Ok(JobStatus::Ready);
        }

        if report.status == JobStatus::Ready {
            self.materialize(name, &report).await?;
        }

        Ok(report.status)
    }

    /// Collapses a ready build job's outputs into a persisted artifact.
    ///
    /// Chunk order is the enumeration order of result locations, then the
    /// intra-location order reported by the cluster. Losing the rename race to
    /// a concurrent request is harmless: both writers computed the same chunk
    /// list from the same completed job.
    async fn materialize(&self, name: &str, report: &JobReport) -> Result<()> {
        let mut ichunks = Vec::new();
        for location in &report.results {
            let files = self
                .cluster
                .expand(location)
                .await
                .map_err(|e| IndexError::Cluster(e.to_string()))?;
            ichunks.extend(files);
        }

        self.store
            .write(name, &IndexArtifact::from_job(ichunks, name))?;
        tracing::info!("Materialized index {} from build job", name);

        if let Err(e) = self.cluster.purge(name).await {
            tracing::warn!("Failed to purge build job {}: {}", name, e);
        }

        Ok(())
    }

    /// Returns the persisted artifact for a ready index; otherwise maps the
    /// current status into the error taxonomy so the caller can retry, report
    /// failure or report not-found.
    pub async fn read(&self, name: &str) -> Result<IndexArtifact> {
        match self.status(name).await? {
            JobStatus::Ready => self.store.read(name).map_err(|e| self.map_io(name, e)),
            JobStatus::Active => Err(IndexError::NotReady {
                name: name.to_string(),
                retry_after_secs: self.retry_after_secs,
            }),
            JobStatus::Dead => Err(IndexError::Failed(format!("indexing of {} failed", name))),
            JobStatus::Unknown => Err(IndexError::NotFound(name.to_string())),
        }
    }

    /// Submits a `DataSet` as a new build job and returns the derived job
    /// name, which doubles as the index name while the build is pending.
    pub async fn submit(&self, dataset: DataSet) -> Result<JobName> {
        if dataset.input.is_empty() {
            return Err(IndexError::Submission("dataset has no inputs".to_string()));
        }

        let name = JobName::derive(&self.job_prefix);
        let spec = JobSpec::Index {
            input: dataset.input,
            nr_ichunks: dataset.nr_ichunks,
            parser: dataset.parser,
            demux: dataset.demux,
            balancer: dataset.balancer,
        };

        self.cluster
            .submit(&name, spec)
            .await
            .map_err(|e| IndexError::Submission(e.to_string()))
    }

    /// Replaces (or creates) an index from a precomputed chunk list.
    pub fn replace(&self, name: &str, ichunks: Vec<String>) -> Result<()> {
        self.validate(name)?;
        self.store.write(name, &IndexArtifact::uploaded(ichunks))?;
        Ok(())
    }

    /// Deletes the local artifact and, for cluster-built indices, purges the
    /// remote job state. The artifact removal is the authoritative deletion;
    /// purge failures are logged, never surfaced.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.validate(name)?;

        self.store.remove(name).map_err(|e| self.map_io(name, e))?;

        if self.is_cluster_name(name) {
            if let Err(e) = self.cluster.purge(name).await {
                tracing::warn!("Failed to purge job state for deleted index {}: {}", name, e);
            }
        }

        Ok(())
    }

    fn map_io(&self, name: &str, e: io::Error) -> IndexError {
        if e.kind() == io::ErrorKind::NotFound {
            IndexError::NotFound(name.to_string())
        } else {
            IndexError::Io(e)
        }
    }
}
