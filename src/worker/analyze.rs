use crate::classify::Classifier;
use crate::pool::{CONTENT_ANALYSIS_MAX_BYTES, FileInfo};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::debug;

/// Stat and classify a single file.
///
/// The stat must succeed; content analysis is best-effort and only
/// attempted for files under [`CONTENT_ANALYSIS_MAX_BYTES`]. An unreadable
/// file keeps its name/extension verdict instead of failing the task.
pub(crate) async fn analyze_file(
    classifier: &dyn Classifier,
    file_path: &Path,
    relative_path: &str,
    base_path: &Path,
) -> Result<FileInfo> {
    let metadata = tokio::fs::metadata(file_path)
        .await
        .with_context(|| format!("failed to stat {}", file_path.display()))?;

    let name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = file_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let relative = if relative_path.is_empty() {
        file_path
            .strip_prefix(base_path)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| name.clone())
    } else {
        relative_path.to_string()
    };

    let mut verdict = classifier.classify(&name, &extension);
    if !metadata.is_dir() && metadata.len() < CONTENT_ANALYSIS_MAX_BYTES {
        match tokio::fs::read(file_path).await {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes);
                verdict = classifier.classify_content(&name, &extension, &content);
            }
            Err(err) => {
                debug!(path = %file_path.display(), error = %err, "content analysis skipped");
            }
        }
    }

    Ok(FileInfo {
        path: file_path.to_path_buf(),
        relative_path: relative,
        is_directory: metadata.is_dir(),
        size: metadata.len(),
        extension,
        is_importable: verdict.is_importable,
        project_indicators: verdict.project_indicators,
        modified: metadata.modified().ok().map(DateTime::<Utc>::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ExtensionClassifier;
    use std::fs;

    #[tokio::test]
    async fn analyzes_source_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lib.rs");
        fs::write(&path, "pub fn answer() -> u32 { 42 }").unwrap();

        let classifier = ExtensionClassifier;
        let info = analyze_file(&classifier, &path, "lib.rs", dir.path())
            .await
            .unwrap();

        assert!(info.is_importable);
        assert!(!info.is_directory);
        assert_eq!(info.extension, "rs");
        assert_eq!(info.relative_path, "lib.rs");
        assert!(info.size > 0);
        assert!(info.modified.is_some());
    }

    #[tokio::test]
    async fn derives_relative_path_from_base_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        let path = dir.path().join("src/app.py");
        fs::write(&path, "print('hi')").unwrap();

        let classifier = ExtensionClassifier;
        let info = analyze_file(&classifier, &path, "", dir.path()).await.unwrap();
        assert_eq!(info.relative_path, "src/app.py");
    }

    #[tokio::test]
    async fn small_file_content_refines_verdict() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy");
        fs::write(&path, "#!/usr/bin/env python\nprint('deploy')\n").unwrap();

        let classifier = ExtensionClassifier;
        let info = analyze_file(&classifier, &path, "deploy", dir.path())
            .await
            .unwrap();

        assert!(info.is_importable);
        assert!(info.project_indicators.contains("python"));
    }

    #[tokio::test]
    async fn large_file_skips_content_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big");
        let content = format!("#!/bin/sh\n{}", "x".repeat(CONTENT_ANALYSIS_MAX_BYTES as usize));
        fs::write(&path, content).unwrap();

        let classifier = ExtensionClassifier;
        let info = analyze_file(&classifier, &path, "big", dir.path())
            .await
            .unwrap();

        // Shebang never inspected; an extensionless name carries no verdict.
        assert!(!info.is_importable);
    }

    #[tokio::test]
    async fn missing_file_fails_the_task() {
        let classifier = ExtensionClassifier;
        let result = analyze_file(
            &classifier,
            Path::new("/nonexistent-scanpool/file.rs"),
            "file.rs",
            Path::new("/nonexistent-scanpool"),
        )
        .await;
        assert!(result.is_err());
    }
}
