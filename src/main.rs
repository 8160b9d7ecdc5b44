use axum::{
    routing::get,
    Extension, Router,
};
use chunkdex::cluster::client::HttpCluster;
use chunkdex::config::Settings;
use chunkdex::lifecycle::handlers::{
    handle_create_index, handle_delete_index, handle_list_indices, handle_read_index,
    handle_replace_index,
};
use chunkdex::lifecycle::manager::LifecycleManager;
use chunkdex::query::handlers::{handle_keys, handle_query, handle_query_empty, handle_values};
use chunkdex::query::orchestrator::QueryOrchestrator;
use chunkdex::store::store::ArtifactStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut settings = Settings::from_env();

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                settings.bind = args[i + 1].parse()?;
                i += 2;
            }
            "--master" => {
                settings.master = args[i + 1].clone();
                i += 2;
            }
            "--index-root" => {
                settings.index_root = args[i + 1].clone().into();
                i += 2;
            }
            "--prefix" => {
                settings.job_prefix = args[i + 1].clone();
                i += 2;
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: {} [--bind <addr:port>] [--master <url>] [--index-root <dir>] [--prefix <name>]",
                    args[0]
                );
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    tracing::info!("Cluster master: {}", settings.master);
    tracing::info!("Index root: {}", settings.index_root.display());
    tracing::info!("Job prefix: {}", settings.job_prefix);

    // 1. Durable artifact store (created if missing):
    let store = ArtifactStore::open(&settings.index_root)?;

    // 2. Remote execution client:
    let cluster = Arc::new(HttpCluster::new(&settings.master));

    // 3. Orchestration layers:
    let manager = LifecycleManager::new(
        store,
        cluster.clone(),
        settings.job_prefix.clone(),
        settings.retry_after_secs,
    );
    let orchestrator = QueryOrchestrator::new(
        cluster,
        settings.job_prefix.clone(),
        settings.job_timeout,
        settings.poll_interval,
    );

    // 4. HTTP Router:
    let app = Router::new()
        .route(
            "/indices",
            get(handle_list_indices).post(handle_create_index),
        )
        .route(
            "/indices/:name",
            get(handle_read_index)
                .put(handle_replace_index)
                .delete(handle_delete_index),
        )
        .route("/indices/:name/keys", get(handle_keys))
        .route("/indices/:name/values", get(handle_values))
        .route("/indices/:name/query", get(handle_query_empty))
        .route("/indices/:name/query/*expr", get(handle_query))
        .layer(Extension(manager))
        .layer(Extension(orchestrator));

    // 5. Start HTTP server:
    tracing::info!("HTTP server listening on {}", settings.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(settings.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
