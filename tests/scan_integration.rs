//! End-to-end scans and analyses over real temporary directory trees,
//! running through the full pool with the default filesystem executor.

use scanpool::{PoolConfig, PoolError, ScanPool};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn fast_config() -> PoolConfig {
    PoolConfig {
        max_workers: 2,
        per_worker_limit: 3,
        task_timeout: Duration::from_secs(30),
        heartbeat_interval: Duration::from_millis(100),
        restart_backoff: Duration::from_millis(100),
    }
}

fn touch(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn project_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    touch(&root.join("Cargo.toml"), "[package]\nname = \"demo\"\n");
    touch(&root.join("README.md"), "# demo\n");
    fs::create_dir(root.join("src")).unwrap();
    touch(&root.join("src/main.rs"), "fn main() {}\n");
    touch(&root.join("src/lib.rs"), "pub fn demo() {}\n");

    // Entries a scan must never report.
    fs::create_dir(root.join("target")).unwrap();
    touch(&root.join("target/artifact.o"), "");
    fs::create_dir(root.join(".git")).unwrap();
    touch(&root.join(".gitignore"), "target\n");

    dir
}

#[tokio::test]
async fn scan_discovers_and_classifies_a_project_tree() {
    let dir = project_tree();
    let pool = ScanPool::new(fast_config());

    let entries = pool.scan_directory(dir.path()).await.unwrap();
    let relatives: Vec<&str> = entries.iter().map(|e| e.relative_path.as_str()).collect();

    assert!(relatives.contains(&"Cargo.toml"));
    assert!(relatives.contains(&"README.md"));
    assert!(relatives.contains(&"src"));
    assert!(relatives.contains(&"src/main.rs"));
    assert!(relatives.contains(&"src/lib.rs"));
    assert!(!relatives.contains(&"target"));
    assert!(!relatives.contains(&".git"));
    assert!(!relatives.contains(&".gitignore"));

    let manifest = entries
        .iter()
        .find(|e| e.relative_path == "Cargo.toml")
        .unwrap();
    assert!(manifest.is_importable);
    assert!(manifest.project_indicators.contains("rust"));
    assert!(manifest.modified.is_some());

    let main = entries
        .iter()
        .find(|e| e.relative_path == "src/main.rs")
        .unwrap();
    assert!(main.is_importable);
    assert_eq!(main.extension, "rs");

    pool.terminate().await.unwrap();
}

#[tokio::test]
async fn analyze_reports_a_single_file() {
    let dir = project_tree();
    let pool = ScanPool::new(fast_config());

    let info = pool
        .analyze_file(dir.path().join("Cargo.toml"), "", dir.path())
        .await
        .unwrap();

    assert_eq!(info.relative_path, "Cargo.toml");
    assert!(info.is_importable);
    assert!(info.project_indicators.contains("rust"));
    assert!(!info.is_directory);
    assert!(info.size > 0);

    pool.terminate().await.unwrap();
}

#[tokio::test]
async fn scan_of_missing_directory_fails_the_task() {
    let pool = ScanPool::new(fast_config());

    let result = pool.scan_directory("/nonexistent-scanpool-tree").await;
    assert!(matches!(result, Err(PoolError::TaskFailed(_))));

    // The failure is contained; the pool keeps serving.
    let dir = project_tree();
    assert!(pool.scan_directory(dir.path()).await.is_ok());

    pool.terminate().await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn unreadable_subdirectory_yields_partial_results() {
    use std::os::unix::fs::PermissionsExt;

    let dir = project_tree();
    let root = dir.path();
    fs::create_dir(root.join("locked")).unwrap();
    touch(&root.join("locked/secret.rs"), "");
    fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o000)).unwrap();

    let pool = ScanPool::new(fast_config());
    let entries = pool.scan_directory(root).await.unwrap();
    let relatives: Vec<&str> = entries.iter().map(|e| e.relative_path.as_str()).collect();

    // The directory itself stats fine; its contents are silently skipped.
    assert!(relatives.contains(&"locked"));
    assert!(!relatives.contains(&"locked/secret.rs"));
    assert!(relatives.contains(&"src/main.rs"));

    fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755)).unwrap();
    pool.terminate().await.unwrap();
}

#[tokio::test]
async fn concurrent_scans_settle_with_zero_load() {
    let dirs: Vec<_> = (0..4).map(|_| project_tree()).collect();
    let pool = Arc::new(ScanPool::new(fast_config()));

    let handles: Vec<_> = dirs
        .iter()
        .map(|dir| {
            let pool = pool.clone();
            let path = dir.path().to_path_buf();
            tokio::spawn(async move { pool.scan_directory(path).await })
        })
        .collect();
    for handle in handles {
        let entries = handle.await.unwrap().unwrap();
        assert!(!entries.is_empty());
    }

    let stats = pool.stats().await.unwrap();
    assert_eq!(stats.active_tasks, 0);
    assert_eq!(stats.queued_tasks, 0);
    assert!(stats.worker_load.iter().all(|&load| load == 0));
    assert_eq!(
        stats
            .worker_stats
            .iter()
            .map(|w| w.tasks_completed)
            .sum::<u64>(),
        4
    );

    pool.terminate().await.unwrap();
}
