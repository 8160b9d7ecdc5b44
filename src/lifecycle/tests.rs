//! Lifecycle Module Tests
//!
//! Exercises the status-resolution state machine against the in-memory
//! cluster: local-first resolution, materialization of completed build jobs,
//! submission failures, deletion, and the concurrent-materialization race.

#[cfg(test)]
mod tests {
    use crate::cluster::mock::MockCluster;
    use crate::cluster::types::JobStatus;
    use crate::error::IndexError;
    use crate::lifecycle::manager::LifecycleManager;
    use crate::lifecycle::types::DataSet;
    use crate::store::store::ArtifactStore;
    use std::sync::Arc;

    const PREFIX: &str = "chunkdex";

    fn setup() -> (tempfile::TempDir, Arc<MockCluster>, Arc<LifecycleManager>) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(dir.path()).unwrap();
        let cluster = Arc::new(MockCluster::new());
        let manager = LifecycleManager::new(store, cluster.clone(), PREFIX, 100);
        (dir, cluster, manager)
    }

    fn dataset(inputs: &[&str]) -> DataSet {
        serde_json::from_value(serde_json::json!({
            "input": inputs,
            "nr_ichunks": 2,
        }))
        .unwrap()
    }

    // ============================================================
    // STATUS RESOLUTION
    // ============================================================

    #[tokio::test]
    async fn test_unsubmitted_names_resolve_to_unknown_without_cluster_calls() {
        let (_dir, cluster, manager) = setup();

        let status = manager.status("someindex").await.unwrap();

        assert_eq!(status, JobStatus::Unknown);
        // The name has no job prefix, so the cluster must not be consulted.
        assert_eq!(cluster.results_count(), 0);
    }

    #[tokio::test]
    async fn test_prefixed_but_unknown_names_resolve_to_unknown() {
        let (_dir, cluster, manager) = setup();

        let status = manager.status("chunkdex:no-such-job").await.unwrap();

        assert_eq!(status, JobStatus::Unknown);
        assert_eq!(cluster.results_count(), 1);
    }

    #[tokio::test]
    async fn test_unsafe_names_are_rejected() {
        let (_dir, _cluster, manager) = setup();

        for name in ["../escape", ".hidden", "a/b", ""] {
            match manager.status(name).await {
                Err(IndexError::InvalidName(_)) => {}
                other => panic!("expected InvalidName for {:?}, got {:?}", name, other),
            }
        }
    }

    // ============================================================
    // SUBMISSION
    // ============================================================

    #[tokio::test]
    async fn test_submitted_dataset_reports_active_until_completion() {
        let (_dir, _cluster, manager) = setup();

        let job = manager.submit(dataset(&["data://a"])).await.unwrap();

        assert!(job.as_str().starts_with("chunkdex:"));
        assert_eq!(manager.status(job.as_str()).await.unwrap(), JobStatus::Active);
    }

    #[tokio::test]
    async fn test_empty_dataset_is_a_submission_error() {
        let (_dir, cluster, manager) = setup();

        let result = manager.submit(dataset(&[])).await;

        assert!(matches!(result, Err(IndexError::Submission(_))));
        assert_eq!(cluster.live_jobs(), 0);
        assert!(manager.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_master_is_a_submission_error() {
        let (_dir, cluster, manager) = setup();
        cluster.fail_submissions();

        let result = manager.submit(dataset(&["data://a"])).await;

        assert!(matches!(result, Err(IndexError::Submission(_))));
        assert!(manager.list().unwrap().is_empty());
    }

    // ============================================================
    // MATERIALIZATION
    // ============================================================

    #[tokio::test]
    async fn test_ready_job_is_materialized_and_purged() {
        let (_dir, cluster, manager) = setup();

        let job = manager.submit(dataset(&["data://a"])).await.unwrap();
        cluster.complete(job.as_str(), vec!["dir://a"]);
        cluster.set_expansion("dir://a", vec!["chunk://a/0", "chunk://a/1"]);

        // ACT: first observation of the ready job collapses it locally.
        let status = manager.status(job.as_str()).await.unwrap();

        assert_eq!(status, JobStatus::Ready);
        let artifact = manager.read(job.as_str()).await.unwrap();
        assert_eq!(
            artifact.ichunks,
            vec!["chunk://a/0".to_string(), "chunk://a/1".to_string()]
        );
        assert_eq!(artifact.origin.as_deref(), Some(job.as_str()));
        // The build job's remote state is gone.
        assert_eq!(cluster.live_jobs(), 0);
    }

    #[tokio::test]
    async fn test_chunk_order_follows_result_location_enumeration() {
        let (_dir, cluster, manager) = setup();

        let job = manager.submit(dataset(&["data://a", "data://b"])).await.unwrap();
        cluster.complete(job.as_str(), vec!["dir://x", "dir://y"]);
        cluster.set_expansion("dir://x", vec!["chunk://x/0", "chunk://x/1"]);
        cluster.set_expansion("dir://y", vec!["chunk://y/0"]);

        manager.status(job.as_str()).await.unwrap();

        let artifact = manager.read(job.as_str()).await.unwrap();
        assert_eq!(
            artifact.ichunks,
            vec![
                "chunk://x/0".to_string(),
                "chunk://x/1".to_string(),
                "chunk://y/0".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_materialized_status_is_served_locally_afterwards() {
        let (_dir, cluster, manager) = setup();

        let job = manager.submit(dataset(&["data://a"])).await.unwrap();
        cluster.complete(job.as_str(), vec!["dir://a"]);
        cluster.set_expansion("dir://a", vec!["chunk://a/0"]);

        manager.status(job.as_str()).await.unwrap();
        let calls_after_materialization = cluster.results_count();

        // Subsequent resolutions must not touch the cluster again.
        assert_eq!(manager.status(job.as_str()).await.unwrap(), JobStatus::Ready);
        assert_eq!(manager.status(job.as_str()).await.unwrap(), JobStatus::Ready);
        assert_eq!(cluster.results_count(), calls_after_materialization);
    }

    #[tokio::test]
    async fn test_concurrent_resolutions_converge_on_one_valid_artifact() {
        let (_dir, cluster, manager) = setup();

        let job = manager.submit(dataset(&["data://a"])).await.unwrap();
        cluster.complete(job.as_str(), vec!["dir://a"]);
        cluster.set_expansion("dir://a", vec!["chunk://a/0", "chunk://a/1"]);

        let (a, b) = tokio::join!(manager.status(job.as_str()), manager.status(job.as_str()));

        assert_eq!(a.unwrap(), JobStatus::Ready);
        assert_eq!(b.unwrap(), JobStatus::Ready);
        // Whichever writer won the rename, the artifact is complete.
        let artifact = manager.read(job.as_str()).await.unwrap();
        assert_eq!(
            artifact.ichunks,
            vec!["chunk://a/0".to_string(), "chunk://a/1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_dead_job_is_terminal_and_not_materialized() {
        let (_dir, cluster, manager) = setup();

        let job = manager.submit(dataset(&["data://a"])).await.unwrap();
        cluster.kill(job.as_str());

        assert_eq!(manager.status(job.as_str()).await.unwrap(), JobStatus::Dead);
        assert!(manager.list().unwrap().is_empty());
        match manager.read(job.as_str()).await {
            Err(IndexError::Failed(_)) => {}
            other => panic!("expected Failed, got {:?}", other.map(|a| a.ichunks)),
        }
    }

    // ============================================================
    // READ
    // ============================================================

    #[tokio::test]
    async fn test_read_while_active_signals_not_ready_with_retry_hint() {
        let (_dir, _cluster, manager) = setup();

        let job = manager.submit(dataset(&["data://a"])).await.unwrap();

        match manager.read(job.as_str()).await {
            Err(IndexError::NotReady {
                name,
                retry_after_secs,
            }) => {
                assert_eq!(name, job.as_str());
                assert_eq!(retry_after_secs, 100);
            }
            other => panic!("expected NotReady, got {:?}", other.map(|a| a.ichunks)),
        }
    }

    #[tokio::test]
    async fn test_read_unknown_signals_not_found() {
        let (_dir, _cluster, manager) = setup();

        match manager.read("nosuchindex").await {
            Err(IndexError::NotFound(name)) => assert_eq!(name, "nosuchindex"),
            other => panic!("expected NotFound, got {:?}", other.map(|a| a.ichunks)),
        }
    }

    // ============================================================
    // REPLACE & DELETE
    // ============================================================

    #[tokio::test]
    async fn test_uploaded_chunk_list_is_immediately_ready() {
        let (_dir, cluster, manager) = setup();

        manager
            .replace("uploaded", vec!["chunk://u/0".to_string()])
            .unwrap();

        assert_eq!(manager.status("uploaded").await.unwrap(), JobStatus::Ready);
        assert_eq!(manager.list().unwrap(), vec!["uploaded"]);
        let artifact = manager.read("uploaded").await.unwrap();
        assert_eq!(artifact.ichunks, vec!["chunk://u/0".to_string()]);
        assert_eq!(artifact.origin, None);
        assert_eq!(cluster.results_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_returns_name_to_unknown() {
        let (_dir, _cluster, manager) = setup();

        manager
            .replace("doomed", vec!["chunk://d/0".to_string()])
            .unwrap();
        manager.delete("doomed").await.unwrap();

        assert_eq!(manager.status("doomed").await.unwrap(), JobStatus::Unknown);
        assert!(manager.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_reports_not_found_without_side_effects() {
        let (_dir, cluster, manager) = setup();

        match manager.delete("ghost").await {
            Err(IndexError::NotFound(name)) => assert_eq!(name, "ghost"),
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert_eq!(cluster.purge_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_of_cluster_index_purges_remote_state() {
        let (_dir, cluster, manager) = setup();

        let job = manager.submit(dataset(&["data://a"])).await.unwrap();
        cluster.complete(job.as_str(), vec!["dir://a"]);
        cluster.set_expansion("dir://a", vec!["chunk://a/0"]);
        manager.status(job.as_str()).await.unwrap();
        let purges_after_materialization = cluster.purge_count();

        manager.delete(job.as_str()).await.unwrap();

        assert_eq!(cluster.purge_count(), purges_after_materialization + 1);
    }

    #[tokio::test]
    async fn test_delete_of_uploaded_index_skips_remote_purge() {
        let (_dir, cluster, manager) = setup();

        manager
            .replace("uploaded", vec!["chunk://u/0".to_string()])
            .unwrap();
        manager.delete("uploaded").await.unwrap();

        assert_eq!(cluster.purge_count(), 0);
    }
}
