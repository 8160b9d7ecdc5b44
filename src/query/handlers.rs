use super::orchestrator::QueryOrchestrator;
use super::predicate::Predicate;
use super::protocol::*;
use crate::error::IndexError;
use crate::lifecycle::manager::LifecycleManager;

use axum::{extract::Path, Extension, Json};
use std::sync::Arc;

pub async fn handle_keys(
    Extension(manager): Extension<Arc<LifecycleManager>>,
    Extension(orchestrator): Extension<Arc<QueryOrchestrator>>,
    Path(name): Path<String>,
) -> Result<Json<KeysResponse>, IndexError> {
    let artifact = manager.read(&name).await?;
    let keys = orchestrator.keys(artifact.ichunks).await?;
    Ok(Json(KeysResponse { keys }))
}

pub async fn handle_values(
    Extension(manager): Extension<Arc<LifecycleManager>>,
    Extension(orchestrator): Extension<Arc<QueryOrchestrator>>,
    Path(name): Path<String>,
) -> Result<Json<ValuesResponse>, IndexError> {
    let artifact = manager.read(&name).await?;
    let values = orchestrator.values(artifact.ichunks).await?;
    Ok(Json(ValuesResponse { values }))
}

pub async fn handle_query(
    Extension(manager): Extension<Arc<LifecycleManager>>,
    Extension(orchestrator): Extension<Arc<QueryOrchestrator>>,
    Path((name, expr)): Path<(String, String)>,
) -> Result<Json<ValuesResponse>, IndexError> {
    let predicate = Predicate::parse(&expr).map_err(IndexError::InvalidQuery)?;

    let artifact = manager.read(&name).await?;
    tracing::debug!("Running query {} against index {}", predicate, name);

    let values = orchestrator.query(artifact.ichunks, predicate).await?;
    Ok(Json(ValuesResponse { values }))
}

/// A query with no expression selects nothing; the index must still exist
/// and be ready.
pub async fn handle_query_empty(
    Extension(manager): Extension<Arc<LifecycleManager>>,
    Path(name): Path<String>,
) -> Result<Json<ValuesResponse>, IndexError> {
    manager.read(&name).await?;
    Ok(Json(ValuesResponse { values: Vec::new() }))
}
