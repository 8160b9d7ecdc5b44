//! Service Error Taxonomy
//!
//! One typed error covers every operation the service exposes. Handlers never
//! build status codes by hand; the `IntoResponse` impl below is the single
//! place where taxonomy variants map onto HTTP.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Everything that can go wrong while resolving, building or querying an index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The name is unknown to both the artifact store and the cluster.
    #[error("index not found: {0}")]
    NotFound(String),

    /// The build job is still running; the caller should retry later.
    #[error("index {name} is still being built")]
    NotReady { name: String, retry_after_secs: u64 },

    /// The remote job died, or an ephemeral job errored while reading a
    /// materialized index.
    #[error("job failed: {0}")]
    Failed(String),

    /// Submitting the build job to the cluster failed; no local state was
    /// created.
    #[error("failed to submit indexing job: {0}")]
    Submission(String),

    /// The remote execution client itself failed (unreachable master,
    /// malformed response).
    #[error("cluster error: {0}")]
    Cluster(String),

    /// The index name is not a safe artifact-store path segment.
    #[error("invalid index name: {0}")]
    InvalidName(String),

    /// The query expression could not be parsed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Local artifact I/O failed for a reason other than absence.
    #[error("artifact store error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the service.
pub type Result<T> = std::result::Result<T, IndexError>;

/// JSON body rendered for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl IndexError {
    fn status_code(&self) -> StatusCode {
        match self {
            IndexError::NotFound(_) => StatusCode::NOT_FOUND,
            IndexError::NotReady { .. } => StatusCode::SERVICE_UNAVAILABLE,
            IndexError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            IndexError::Submission(_) => StatusCode::INTERNAL_SERVER_ERROR,
            IndexError::Cluster(_) => StatusCode::BAD_GATEWAY,
            IndexError::InvalidName(_) => StatusCode::BAD_REQUEST,
            IndexError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            IndexError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            IndexError::NotFound(_) => "not_found",
            IndexError::NotReady { .. } => "not_ready",
            IndexError::Failed(_) => "failed",
            IndexError::Submission(_) => "submission_error",
            IndexError::Cluster(_) => "cluster_error",
            IndexError::InvalidName(_) => "invalid_name",
            IndexError::InvalidQuery(_) => "invalid_query",
            IndexError::Io(_) => "io_error",
        }
    }
}

impl IntoResponse for IndexError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorBody {
            error: self.code(),
            message: self.to_string(),
        });

        match self {
            IndexError::NotReady {
                retry_after_secs, ..
            } => (
                status,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}
