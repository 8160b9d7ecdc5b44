//! Index Resource HTTP Protocol
//!
//! Data Transfer Objects (DTOs) for the index lifecycle endpoints. The read
//! endpoint returns the persisted artifact document itself, so it has no DTO
//! here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct IndicesResponse {
    pub indices: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateIndexResponse {
    /// Name of the build job; also the index name while the build is pending.
    pub job: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplaceIndexRequest {
    pub ichunks: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplaceIndexResponse {
    /// Path of the created index resource.
    pub location: String,
}
