use crate::classify::Classifier;
use crate::pool::{FileInfo, IGNORED_DIRS};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use tracing::debug;

/// Entries statted concurrently within one batch
const STAT_BATCH_SIZE: usize = 20;

/// Recursively list and classify a directory tree.
///
/// The task's root directory must be readable; everything below it is
/// best-effort. Entries that fail to stat and subdirectories that fail to
/// read are skipped, not reported, so a scan over a partially readable tree
/// still succeeds with a partial result set.
pub(crate) async fn scan_directory(
    classifier: &dyn Classifier,
    dir_path: &Path,
    relative_path: &str,
    max_depth: u32,
    current_depth: u32,
) -> io::Result<Vec<FileInfo>> {
    if current_depth >= max_depth {
        return Ok(Vec::new());
    }
    let names = read_entry_names(dir_path).await?;
    Ok(scan_entries(
        classifier,
        dir_path,
        relative_path,
        max_depth,
        current_depth,
        names,
    )
    .await)
}

fn scan_entries<'a>(
    classifier: &'a dyn Classifier,
    dir_path: &'a Path,
    relative_path: &'a str,
    max_depth: u32,
    current_depth: u32,
    names: Vec<String>,
) -> BoxFuture<'a, Vec<FileInfo>> {
    async move {
        let mut results = Vec::new();
        for batch in names.chunks(STAT_BATCH_SIZE) {
            let statted = join_all(
                batch
                    .iter()
                    .map(|name| stat_entry(classifier, dir_path, relative_path, name)),
            )
            .await;

            for info in statted.into_iter().flatten() {
                let descend = info.is_directory && current_depth + 1 < max_depth;
                let child_path = info.path.clone();
                let child_relative = info.relative_path.clone();
                results.push(info);

                if descend {
                    match read_entry_names(&child_path).await {
                        Ok(child_names) => {
                            let nested = scan_entries(
                                classifier,
                                &child_path,
                                &child_relative,
                                max_depth,
                                current_depth + 1,
                                child_names,
                            )
                            .await;
                            results.extend(nested);
                        }
                        Err(err) => {
                            debug!(path = %child_path.display(), error = %err, "skipping unreadable directory");
                        }
                    }
                }
            }
        }
        results
    }
    .boxed()
}

/// Stat one entry and build its [`FileInfo`]; `None` on stat failure
async fn stat_entry(
    classifier: &dyn Classifier,
    dir_path: &Path,
    relative_path: &str,
    name: &str,
) -> Option<FileInfo> {
    let path = dir_path.join(name);
    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "skipping unstattable entry");
            return None;
        }
    };

    let relative = if relative_path.is_empty() {
        name.to_string()
    } else {
        format!("{relative_path}/{name}")
    };
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let modified = metadata.modified().ok().map(DateTime::<Utc>::from);

    let mut info = FileInfo {
        path,
        relative_path: relative,
        is_directory: metadata.is_dir(),
        size: metadata.len(),
        extension,
        is_importable: false,
        project_indicators: BTreeSet::new(),
        modified,
    };
    if !info.is_directory {
        let verdict = classifier.classify(name, &info.extension);
        info.is_importable = verdict.is_importable;
        info.project_indicators = verdict.project_indicators;
    }
    Some(info)
}

/// Directory listing minus hidden entries and the fixed ignore set.
///
/// Sorted so batch composition and output order are deterministic.
async fn read_entry_names(dir_path: &Path) -> io::Result<Vec<String>> {
    let mut reader = tokio::fs::read_dir(dir_path).await?;
    let mut names = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_skipped(&name) {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

fn is_skipped(name: &str) -> bool {
    name.starts_with('.') || IGNORED_DIRS.contains(&name)
}
