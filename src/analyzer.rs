//! Tree-wide analysis: walk a source tree once per operation, dispatch each
//! file to the first matching language detector, and aggregate the results.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::languages::{all_detectors, LanguageDetector};
use crate::model::{Endpoint, FunctionSignature, Language};

/// Directory names pruned from every walk unless the caller overrides them.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    "target",
    "dist",
    "build",
    "__pycache__",
    "venv",
    "bin",
    "obj",
];

/// Owns the registered detector set and offers tree-wide extraction.
///
/// Registration order is priority order; the first detector whose `detect`
/// returns true claims a file. Files matching no detector are ignored, and
/// unreadable files are skipped so one bad file never aborts a scan.
pub struct PolyglotAnalyzer {
    detectors: Vec<Box<dyn LanguageDetector>>,
    ignore_dirs: HashSet<String>,
}

impl PolyglotAnalyzer {
    /// Create an analyzer with all six detectors registered.
    pub fn new(ignore_dirs: &[String]) -> Self {
        Self {
            detectors: all_detectors(),
            ignore_dirs: ignore_dirs.iter().cloned().collect(),
        }
    }

    /// Count recognized files per language.
    pub fn detect_languages(&self, root: &Path) -> anyhow::Result<BTreeMap<Language, usize>> {
        let mut census = BTreeMap::new();
        for path in self.walk_files(root)? {
            if let Some(detector) = self.detector_for(&path) {
                *census.entry(detector.language()).or_insert(0) += 1;
            }
        }
        Ok(census)
    }

    /// Extract every endpoint declaration found in the tree.
    pub fn extract_all_endpoints(&self, root: &Path) -> anyhow::Result<Vec<Endpoint>> {
        let mut endpoints = Vec::new();
        for path in self.walk_files(root)? {
            let Some(detector) = self.detector_for(&path) else {
                continue;
            };
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            endpoints.extend(detector.extract_endpoints(&path, &content));
        }
        Ok(endpoints)
    }

    /// Extract every function signature found in the tree.
    pub fn extract_all_functions(&self, root: &Path) -> anyhow::Result<Vec<FunctionSignature>> {
        let mut functions = Vec::new();
        for path in self.walk_files(root)? {
            let Some(detector) = self.detector_for(&path) else {
                continue;
            };
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            functions.extend(detector.extract_functions(&path, &content));
        }
        Ok(functions)
    }

    /// Whether a directory name should be pruned from walks.
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        name.starts_with('.') || self.ignore_dirs.contains(name)
    }

    fn detector_for(&self, path: &Path) -> Option<&dyn LanguageDetector> {
        self.detectors
            .iter()
            .find(|d| d.detect(path))
            .map(|d| d.as_ref())
    }

    /// Walk the tree, pruning ignored and hidden directories.
    ///
    /// An unreadable root is a hard error; entry-level errors deeper in the
    /// tree are skipped.
    fn walk_files(&self, root: &Path) -> anyhow::Result<Vec<PathBuf>> {
        std::fs::metadata(root)
            .map_err(|e| anyhow::anyhow!("reading scan root {}: {}", root.display(), e))?;

        let mut files = Vec::new();
        for entry in WalkDir::new(root).into_iter().filter_entry(|e| {
            if !e.file_type().is_dir() || e.path() == root {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !self.is_ignored_dir(&name)
        }) {
            let Ok(entry) = entry else {
                continue;
            };
            if entry.file_type().is_file() {
                files.push(entry.path().to_path_buf());
            }
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn default_ignores() -> Vec<String> {
        DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_census_counts_per_language() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("main.go"), "package main\n").unwrap();
        std::fs::write(temp.path().join("app.py"), "x = 1\n").unwrap();
        std::fs::write(temp.path().join("index.ts"), "export {};\n").unwrap();
        std::fs::write(temp.path().join("notes.txt"), "ignored\n").unwrap();

        let analyzer = PolyglotAnalyzer::new(&default_ignores());
        let census = analyzer.detect_languages(temp.path()).unwrap();
        assert_eq!(census.get(&Language::Go), Some(&1));
        assert_eq!(census.get(&Language::Python), Some(&1));
        assert_eq!(census.get(&Language::Javascript), Some(&1));
        assert_eq!(census.len(), 3);
    }

    #[test]
    fn test_ignored_dirs_are_pruned() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("node_modules")).unwrap();
        std::fs::write(temp.path().join("node_modules").join("dep.js"), "x").unwrap();
        std::fs::create_dir(temp.path().join(".git")).unwrap();
        std::fs::write(temp.path().join(".git").join("hook.py"), "x").unwrap();
        std::fs::write(temp.path().join("main.go"), "package main\n").unwrap();

        let analyzer = PolyglotAnalyzer::new(&default_ignores());
        let census = analyzer.detect_languages(temp.path()).unwrap();
        assert_eq!(census.len(), 1);
        assert_eq!(census.get(&Language::Go), Some(&1));
    }

    #[test]
    fn test_unreadable_root_is_hard_error() {
        let analyzer = PolyglotAnalyzer::new(&default_ignores());
        let missing = Path::new("/nonexistent/specdrift-test-root");
        assert!(analyzer.detect_languages(missing).is_err());
    }

    #[test]
    fn test_endpoints_across_languages() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("routes.go"),
            "r.GET(\"/api/users\", handlers.List)\n",
        )
        .unwrap();
        std::fs::write(
            temp.path().join("app.py"),
            "@app.route(\"/health\")\ndef health():\n    pass\n",
        )
        .unwrap();

        let analyzer = PolyglotAnalyzer::new(&default_ignores());
        let mut endpoints = analyzer.extract_all_endpoints(temp.path()).unwrap();
        endpoints.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].path, "/api/users");
        assert_eq!(endpoints[1].path, "/health");
    }

    #[test]
    fn test_malformed_file_does_not_abort_scan() {
        let temp = TempDir::new().unwrap();
        // Invalid UTF-8: read_to_string fails, file is skipped.
        std::fs::write(temp.path().join("binary.go"), [0xff, 0xfe, 0x00]).unwrap();
        std::fs::write(
            temp.path().join("routes.go"),
            "r.GET(\"/api/users\", handlers.List)\n",
        )
        .unwrap();

        let analyzer = PolyglotAnalyzer::new(&default_ignores());
        let endpoints = analyzer.extract_all_endpoints(temp.path()).unwrap();
        assert_eq!(endpoints.len(), 1);
    }
}
