use crate::classify::{Classifier, ExtensionClassifier};
use crate::pool::{TaskOutput, TaskPayload};
use crate::worker::{analyze, scan};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Execution policy behind the worker units.
///
/// The pool dispatches and polices tasks; what a task *does* lives here.
/// The default [`FsExecutor`] performs real filesystem work; tests and
/// embedders substitute their own implementations through
/// [`crate::ScanPool::with_executor`].
#[async_trait]
pub trait TaskExecutor: Send + Sync + 'static {
    /// Execute one task to completion.
    ///
    /// Errors reject the caller's future with the error's message; they are
    /// never retried.
    async fn execute(&self, payload: &TaskPayload) -> Result<TaskOutput>;
}

/// Default executor: directory scans and file analysis against the local
/// filesystem, with verdicts from a [`Classifier`].
pub struct FsExecutor {
    classifier: Arc<dyn Classifier>,
}

impl FsExecutor {
    /// Executor with the built-in extension-based classifier
    pub fn new() -> Self {
        Self::with_classifier(Arc::new(ExtensionClassifier))
    }

    /// Executor with a caller-supplied classification policy
    pub fn with_classifier(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }
}

impl Default for FsExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskExecutor for FsExecutor {
    async fn execute(&self, payload: &TaskPayload) -> Result<TaskOutput> {
        match payload {
            TaskPayload::ScanDirectory {
                dir_path,
                relative_path,
                max_depth,
                current_depth,
            } => {
                let files = scan::scan_directory(
                    self.classifier.as_ref(),
                    dir_path,
                    relative_path,
                    *max_depth,
                    *current_depth,
                )
                .await?;
                Ok(TaskOutput::Files(files))
            }
            TaskPayload::AnalyzeFile {
                file_path,
                relative_path,
                base_path,
            } => {
                let info = analyze::analyze_file(
                    self.classifier.as_ref(),
                    file_path,
                    relative_path,
                    base_path,
                )
                .await?;
                Ok(TaskOutput::File(info))
            }
        }
    }
}
