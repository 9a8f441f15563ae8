use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use uuid::Uuid;

/// Unique identifier for submitted tasks
pub type TaskId = Uuid;

/// Priority assigned to a submission when the caller does not specify one
pub const DEFAULT_PRIORITY: i32 = 1;

/// Recursion limit applied to directory scans when the caller does not specify one
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Files at or above this size skip content-based classification
pub const CONTENT_ANALYSIS_MAX_BYTES: u64 = 50 * 1024;

/// Directory entries never descended into or reported during a scan
pub const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    "target",
    "__pycache__",
    ".git",
];

/// Work submitted to the pool, one variant per task kind
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum TaskPayload {
    /// Recursively list and classify a directory tree
    ScanDirectory {
        dir_path: PathBuf,
        relative_path: String,
        max_depth: u32,
        current_depth: u32,
    },
    /// Stat and classify a single file
    AnalyzeFile {
        file_path: PathBuf,
        relative_path: String,
        base_path: PathBuf,
    },
}

impl TaskPayload {
    /// Short kind name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            TaskPayload::ScanDirectory { .. } => "scan-directory",
            TaskPayload::AnalyzeFile { .. } => "analyze-file",
        }
    }
}

/// Result payload a worker posts back on success
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum TaskOutput {
    /// Produced by [`TaskPayload::ScanDirectory`]
    Files(Vec<FileInfo>),
    /// Produced by [`TaskPayload::AnalyzeFile`]
    File(FileInfo),
}

/// Description of one discovered filesystem entry
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FileInfo {
    pub path: PathBuf,
    pub relative_path: String,
    pub is_directory: bool,
    pub size: u64,
    /// Lowercased extension without the dot, empty when absent
    pub extension: String,
    pub is_importable: bool,
    pub project_indicators: BTreeSet<String>,
    pub modified: Option<DateTime<Utc>>,
}

/// Point-in-time view of the pool returned by [`crate::ScanPool::stats`]
#[derive(Serialize, Clone, Debug)]
pub struct PoolStats {
    pub workers: usize,
    pub active_tasks: usize,
    pub queued_tasks: usize,
    pub worker_load: Vec<usize>,
    pub worker_stats: Vec<WorkerStatsSnapshot>,
    pub started_at: DateTime<Utc>,
}

/// Cumulative per-slot counters derived from the registry
#[derive(Serialize, Clone, Debug)]
pub struct WorkerStatsSnapshot {
    pub tasks_completed: u64,
    pub average_task_time_ms: f64,
    pub errors: u64,
    pub error_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_kind_names() {
        let scan = TaskPayload::ScanDirectory {
            dir_path: PathBuf::from("/tmp"),
            relative_path: String::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            current_depth: 0,
        };
        assert_eq!(scan.kind(), "scan-directory");

        let analyze = TaskPayload::AnalyzeFile {
            file_path: PathBuf::from("/tmp/a.rs"),
            relative_path: "a.rs".to_string(),
            base_path: PathBuf::from("/tmp"),
        };
        assert_eq!(analyze.kind(), "analyze-file");
    }

    #[test]
    fn ignored_dirs_cover_common_build_output() {
        for name in ["node_modules", "target", ".git"] {
            assert!(IGNORED_DIRS.contains(&name));
        }
    }
}
