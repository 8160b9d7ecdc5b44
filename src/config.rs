//! Runtime Settings
//!
//! All knobs come from environment variables with sensible defaults; `main.rs`
//! additionally accepts CLI flags that override them. Nothing here is
//! persisted; the artifact store directory is created on startup if missing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the compute cluster master, e.g. `http://localhost:8989`.
    pub master: String,
    /// Prefix of cluster-derived job names. An index name starting with this
    /// prefix is assumed to denote a cluster-submitted build job.
    pub job_prefix: String,
    /// Directory holding one artifact file per index name.
    pub index_root: PathBuf,
    /// Address the HTTP server binds to.
    pub bind: SocketAddr,
    /// Overall deadline for an ephemeral query job, submission to results.
    pub job_timeout: Duration,
    /// Delay between status polls of an ephemeral query job.
    pub poll_interval: Duration,
    /// Seconds suggested to clients via `Retry-After` while a build is active.
    pub retry_after_secs: u64,
}

impl Settings {
    /// Reads settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            master: env_or("CHUNKDEX_MASTER", "http://localhost:8989"),
            job_prefix: env_or("CHUNKDEX_JOB_PREFIX", "chunkdex"),
            index_root: PathBuf::from(env_or("CHUNKDEX_INDEX_ROOT", "indices")),
            bind: env_or("CHUNKDEX_BIND", "127.0.0.1:8080")
                .parse()
                .unwrap_or_else(|_| "127.0.0.1:8080".parse().unwrap()),
            job_timeout: Duration::from_secs(env_parsed("CHUNKDEX_JOB_TIMEOUT_SECS", 600)),
            poll_interval: Duration::from_millis(env_parsed("CHUNKDEX_POLL_INTERVAL_MS", 500)),
            retry_after_secs: env_parsed("CHUNKDEX_RETRY_AFTER_SECS", 100),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
