//! File classification policy.
//!
//! The scheduler treats classification as an external collaborator: workers
//! hand every non-directory entry to a [`Classifier`] and record whatever it
//! decides. [`ExtensionClassifier`] is the built-in default used by the CLI
//! and by embedders that do not bring their own policy.

use std::collections::BTreeSet;

/// Verdict for one filesystem entry
#[derive(Clone, Debug, Default)]
pub struct FileClassification {
    /// Whether the entry should be offered for project import
    pub is_importable: bool,
    /// Project ecosystems this entry indicates (e.g. a manifest file)
    pub project_indicators: BTreeSet<String>,
}

/// Classification policy invoked by worker units.
///
/// Implementations must be cheap and infallible; classification runs inside
/// the scan hot path and has no error channel back to the caller.
pub trait Classifier: Send + Sync {
    /// Classify by file name and extension
    fn classify(&self, name: &str, extension: &str) -> FileClassification;

    /// Refine a verdict using file content; called only for small files
    /// that could be read, so implementations never see partial data.
    fn classify_content(
        &self,
        name: &str,
        extension: &str,
        content: &str,
    ) -> FileClassification {
        let _ = content;
        self.classify(name, extension)
    }
}

/// Extensions treated as importable source files
const IMPORTABLE_EXTENSIONS: &[&str] = &[
    "rs", "py", "js", "jsx", "ts", "tsx", "go", "java", "kt", "c", "h", "cc", "cpp", "hpp", "cs",
    "rb", "php", "swift", "scala", "sh", "sql", "toml", "yaml", "yml", "json",
];

/// Manifest and tooling files that mark a project root, with the ecosystem
/// they indicate
const PROJECT_INDICATOR_FILES: &[(&str, &str)] = &[
    ("package.json", "node"),
    ("cargo.toml", "rust"),
    ("go.mod", "go"),
    ("pyproject.toml", "python"),
    ("requirements.txt", "python"),
    ("setup.py", "python"),
    ("pom.xml", "java"),
    ("build.gradle", "java"),
    ("gemfile", "ruby"),
    ("composer.json", "php"),
    ("makefile", "make"),
    ("dockerfile", "docker"),
    ("cmakelists.txt", "cmake"),
];

/// Default name/extension based classification with shebang sniffing.
#[derive(Clone, Debug, Default)]
pub struct ExtensionClassifier;

impl Classifier for ExtensionClassifier {
    fn classify(&self, name: &str, extension: &str) -> FileClassification {
        let lowered = name.to_ascii_lowercase();
        let mut verdict = FileClassification::default();

        for (indicator, ecosystem) in PROJECT_INDICATOR_FILES {
            if lowered == *indicator {
                verdict.is_importable = true;
                verdict.project_indicators.insert((*ecosystem).to_string());
            }
        }
        if IMPORTABLE_EXTENSIONS.contains(&extension) {
            verdict.is_importable = true;
        }
        verdict
    }

    fn classify_content(
        &self,
        name: &str,
        extension: &str,
        content: &str,
    ) -> FileClassification {
        let mut verdict = self.classify(name, extension);
        if let Some(first_line) = content.lines().next() {
            if first_line.starts_with("#!") {
                verdict.is_importable = true;
                if first_line.contains("python") {
                    verdict.project_indicators.insert("python".to_string());
                } else if first_line.contains("node") {
                    verdict.project_indicators.insert("node".to_string());
                } else if first_line.contains("sh") {
                    verdict.project_indicators.insert("shell".to_string());
                }
            }
        }
        verdict
    }
}
