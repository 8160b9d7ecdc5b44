use super::manager::LifecycleManager;
use super::protocol::*;
use super::types::DataSet;
use crate::error::IndexError;
use crate::store::artifact::IndexArtifact;

use axum::http::{header, StatusCode};
use axum::{extract::Path, Extension, Json};
use std::sync::Arc;

pub async fn handle_list_indices(
    Extension(manager): Extension<Arc<LifecycleManager>>,
) -> Result<Json<IndicesResponse>, IndexError> {
    let indices = manager.list()?;
    Ok(Json(IndicesResponse { indices }))
}

pub async fn handle_create_index(
    Extension(manager): Extension<Arc<LifecycleManager>>,
    Json(dataset): Json<DataSet>,
) -> Result<(StatusCode, Json<CreateIndexResponse>), IndexError> {
    match manager.submit(dataset).await {
        Ok(job) => {
            tracing::info!("Indexing job submitted: {}", job);
            Ok((
                StatusCode::ACCEPTED,
                Json(CreateIndexResponse { job: job.0 }),
            ))
        }
        Err(e) => {
            tracing::error!("Failed to submit indexing job: {}", e);
            Err(e)
        }
    }
}

pub async fn handle_read_index(
    Extension(manager): Extension<Arc<LifecycleManager>>,
    Path(name): Path<String>,
) -> Result<Json<IndexArtifact>, IndexError> {
    let artifact = manager.read(&name).await?;
    Ok(Json(artifact))
}

pub async fn handle_replace_index(
    Extension(manager): Extension<Arc<LifecycleManager>>,
    Path(name): Path<String>,
    Json(req): Json<ReplaceIndexRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<ReplaceIndexResponse>), IndexError>
{
    manager.replace(&name, req.ichunks)?;

    let location = format!("/indices/{}", name);
    tracing::info!("Replaced index {}", name);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location.clone())],
        Json(ReplaceIndexResponse { location }),
    ))
}

pub async fn handle_delete_index(
    Extension(manager): Extension<Arc<LifecycleManager>>,
    Path(name): Path<String>,
) -> Result<StatusCode, IndexError> {
    manager.delete(&name).await?;
    tracing::info!("Deleted index {}", name);
    Ok(StatusCode::NO_CONTENT)
}
