//! Inspection orchestrator: runs every validation stage and builds the result.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::analyzer::{PolyglotAnalyzer, DEFAULT_IGNORE_DIRS};
use crate::model::{InspectResult, Severity, Summary};

use super::{reconcile_modules, validate_contracts, validate_signatures};

/// What to inspect and how deep.
#[derive(Debug, Clone)]
pub struct InspectOptions {
    /// Root of the code tree to scan.
    pub root_dir: PathBuf,
    /// Directory holding foundation module markdown and descriptors.
    pub foundation_path: PathBuf,
    /// Directory holding API contracts (OpenAPI, architecture markdown).
    pub blueprints_path: Option<PathBuf>,
    /// Directory names pruned from every walk, merged with the always-on
    /// hidden-directory rule.
    pub ignore_dirs: Vec<String>,
    /// Whether module descriptors participate in checking.
    pub use_descriptors: bool,
    /// Analysis depth: 1 = structure, 2 = +API contracts, 3 = +signatures.
    pub depth: u8,
    /// Force contract validation regardless of depth.
    pub check_api: bool,
    /// Force signature validation regardless of depth.
    pub check_signatures: bool,
}

impl InspectOptions {
    pub fn new(root_dir: PathBuf, foundation_path: PathBuf) -> Self {
        Self {
            root_dir,
            foundation_path,
            blueprints_path: None,
            ignore_dirs: DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect(),
            use_descriptors: true,
            depth: 1,
            check_api: false,
            check_signatures: false,
        }
    }

    fn api_requested(&self) -> bool {
        self.depth >= 2 || self.check_api
    }

    fn signatures_requested(&self) -> bool {
        self.depth >= 3 || self.check_signatures
    }
}

/// Runs one full inspection. Stateless and idempotent: identical filesystem
/// snapshots yield identical results.
pub struct Inspector {
    options: InspectOptions,
}

impl Inspector {
    pub fn new(options: InspectOptions) -> Self {
        Self { options }
    }

    /// Run language census, module reconciliation and any requested
    /// validation stages, appending warnings in stage order.
    ///
    /// Returns a hard error only for top-level I/O failures; drift findings
    /// are reported through the result, with `success` false when any
    /// error-severity warning exists.
    pub fn run(&self) -> anyhow::Result<InspectResult> {
        let opts = &self.options;
        let analyzer = PolyglotAnalyzer::new(&opts.ignore_dirs);
        let ignore_set: HashSet<String> = opts.ignore_dirs.iter().cloned().collect();

        let languages = analyzer.detect_languages(&opts.root_dir)?;

        let module_report = reconcile_modules(
            &opts.root_dir,
            &opts.foundation_path,
            &ignore_set,
            opts.use_descriptors,
        )?;

        let mut warnings = module_report.warnings;
        let mut summary = Summary {
            total_modules: module_report.total_modules,
            matching_modules: module_report.matching_modules,
            missing_modules: module_report.missing_modules,
            extra_code_dirs: module_report.extra_code_dirs,
            ..Summary::default()
        };

        if opts.api_requested() {
            let endpoints = analyzer.extract_all_endpoints(&opts.root_dir)?;
            let contract_report = validate_contracts(
                opts.blueprints_path.as_deref(),
                &opts.foundation_path,
                &endpoints,
            )?;
            summary.missing_endpoints = contract_report.missing_endpoints;
            summary.undocumented_endpoints = contract_report.undocumented_endpoints;
            warnings.extend(contract_report.warnings);
        }

        if opts.signatures_requested() {
            let functions = analyzer.extract_all_functions(&opts.root_dir)?;
            let signature_report = validate_signatures(&module_report.descriptors, &functions);
            summary.signature_mismatches = signature_report.signature_mismatches;
            warnings.extend(signature_report.warnings);
        }

        summary.errors = warnings
            .iter()
            .filter(|w| w.severity == Severity::Error)
            .count();
        summary.warnings = warnings
            .iter()
            .filter(|w| w.severity == Severity::Warning)
            .count();

        Ok(InspectResult {
            success: summary.errors == 0,
            summary,
            warnings,
            languages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WarningKind;
    use tempfile::TempDir;

    fn options(temp: &TempDir) -> InspectOptions {
        let foundation = temp.path().join("foundation");
        std::fs::create_dir_all(&foundation).unwrap();
        InspectOptions::new(temp.path().to_path_buf(), foundation)
    }

    #[test]
    fn test_depth_one_skips_api_and_signatures() {
        let temp = TempDir::new().unwrap();
        let mut opts = options(&temp);
        opts.depth = 1;

        let blueprints = temp.path().join("blueprints");
        std::fs::create_dir(&blueprints).unwrap();
        std::fs::write(
            blueprints.join("openapi.yaml"),
            "paths:\n  /v1/users:\n    get:\n      summary: x\n",
        )
        .unwrap();
        opts.blueprints_path = Some(blueprints);

        let result = Inspector::new(opts.clone()).run().unwrap();
        assert_eq!(result.summary.missing_endpoints, 0);
        assert!(result.success);

        // check_api forces the stage at depth 1.
        opts.check_api = true;
        let result = Inspector::new(opts).run().unwrap();
        assert_eq!(result.summary.missing_endpoints, 1);
        assert!(!result.success);
    }

    #[test]
    fn test_success_tracks_error_count() {
        let temp = TempDir::new().unwrap();
        let opts = options(&temp);
        std::fs::write(
            temp.path().join("foundation").join("auth.md"),
            "# auth\n",
        )
        .unwrap();

        let result = Inspector::new(opts).run().unwrap();
        // MISSING_MODULE is only warning severity; the run still "succeeds".
        assert!(result.success);
        assert_eq!(result.summary.errors, 0);
        assert_eq!(result.summary.warnings, 1);
        assert_eq!(result.warnings[0].kind, WarningKind::MissingModule);
    }

    #[test]
    fn test_idempotence() {
        let temp = TempDir::new().unwrap();
        let mut opts = options(&temp);
        opts.depth = 3;
        std::fs::write(temp.path().join("foundation").join("auth.md"), "# auth\n").unwrap();
        std::fs::create_dir_all(temp.path().join("src").join("api")).unwrap();
        std::fs::write(
            temp.path().join("src").join("api").join("routes.go"),
            "r.GET(\"/api/users\", handlers.List)\n",
        )
        .unwrap();

        let first = Inspector::new(opts.clone()).run().unwrap();
        let second = Inspector::new(opts).run().unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_unreadable_root_is_hard_error() {
        let temp = TempDir::new().unwrap();
        let mut opts = options(&temp);
        opts.root_dir = PathBuf::from("/nonexistent/specdrift-root");
        assert!(Inspector::new(opts).run().is_err());
    }
}
