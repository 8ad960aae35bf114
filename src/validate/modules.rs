//! Module reconciliation: foundation-vs-code drift at directory granularity.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use globset::Glob;
use walkdir::WalkDir;

use crate::descriptor::ModuleDescriptor;
use crate::model::{Severity, Warning, WarningKind};

/// Foundation markdown files that are not module specs.
const NON_MODULE_STEMS: &[&str] = &["README", "ARCHITECTURE"];

/// Output of the reconciliation stage.
#[derive(Debug, Default)]
pub struct ModuleReport {
    pub warnings: Vec<Warning>,
    pub total_modules: usize,
    pub matching_modules: usize,
    pub missing_modules: usize,
    pub extra_code_dirs: usize,
    /// Descriptors loaded for matching modules; consumed later by signature
    /// validation.
    pub descriptors: Vec<ModuleDescriptor>,
}

/// Compute the set difference between foundation module names and code module
/// directories, then verify descriptor expectations for matching modules.
pub fn reconcile_modules(
    root: &Path,
    foundation_dir: &Path,
    ignore_dirs: &HashSet<String>,
    use_descriptors: bool,
) -> anyhow::Result<ModuleReport> {
    let mut report = ModuleReport::default();

    let foundation = foundation_modules(foundation_dir, &mut report.warnings)?;
    let code = code_modules(root, foundation_dir, ignore_dirs)?;

    report.total_modules = foundation.len();

    for module in &foundation {
        if code.contains(module) {
            report.matching_modules += 1;
            if use_descriptors {
                if let Some(descriptor) =
                    ModuleDescriptor::load_for_module(foundation_dir, module)?
                {
                    check_descriptor(root, module, &descriptor, &mut report.warnings);
                    report.descriptors.push(descriptor);
                }
            }
            continue;
        }

        report.missing_modules += 1;

        // A case-insensitive match is name drift, not a missing module.
        if let Some(variant) = code
            .iter()
            .find(|c| c.eq_ignore_ascii_case(module) && c.as_str() != module)
        {
            report.warnings.push(Warning {
                kind: WarningKind::MismatchedName,
                module: module.clone(),
                message: format!(
                    "foundation module {:?} matches code directory {:?} only case-insensitively",
                    module, variant
                ),
                severity: Severity::Warning,
                remediation: format!("rename directory {:?} to {:?}", variant, module),
            });
        } else {
            report.warnings.push(Warning {
                kind: WarningKind::MissingModule,
                module: module.clone(),
                message: format!("foundation module {:?} has no code directory", module),
                severity: Severity::Warning,
                remediation: format!(
                    "create a {}/ directory or archive {}.md in the foundation",
                    module, module
                ),
            });
        }
    }

    for dir in &code {
        if foundation.contains(dir) {
            continue;
        }
        if foundation.iter().any(|m| m.eq_ignore_ascii_case(dir)) {
            // Already reported as MISMATCHED_NAME.
            continue;
        }
        report.extra_code_dirs += 1;
        report.warnings.push(Warning {
            kind: WarningKind::ExtraCode,
            module: dir.clone(),
            message: format!("code directory {:?} has no foundation module", dir),
            severity: Severity::Info,
            remediation: format!(
                "document {} with a foundation module or add it to the ignore list",
                dir
            ),
        });
    }

    Ok(report)
}

/// Foundation modules are stems of `*.md` files directly inside the foundation
/// directory, `archive/` excluded. Stray non-spec files get flagged.
fn foundation_modules(
    foundation_dir: &Path,
    warnings: &mut Vec<Warning>,
) -> anyhow::Result<BTreeSet<String>> {
    let entries = std::fs::read_dir(foundation_dir).map_err(|e| {
        anyhow::anyhow!(
            "reading foundation directory {}: {}",
            foundation_dir.display(),
            e
        )
    })?;

    let mut modules = BTreeSet::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        if let Some(stem) = name.strip_suffix(".md") {
            if !NON_MODULE_STEMS.contains(&stem) {
                modules.insert(stem.to_string());
            }
            continue;
        }
        if name.ends_with(".module.yaml") || name.ends_with(".module.yml") {
            continue;
        }
        warnings.push(Warning {
            kind: WarningKind::UnexpectedFile,
            module: String::new(),
            message: format!("unexpected file {:?} in foundation directory", name),
            severity: Severity::Info,
            remediation: "foundation directories hold module markdown and descriptors only"
                .to_string(),
        });
    }
    Ok(modules)
}

/// Code modules are non-hidden, non-ignored directories directly inside
/// `<root>/src` if that exists, else directly inside `<root>`. The foundation
/// directory itself never counts as code.
fn code_modules(
    root: &Path,
    foundation_dir: &Path,
    ignore_dirs: &HashSet<String>,
) -> anyhow::Result<BTreeSet<String>> {
    let src = root.join("src");
    let base = if src.is_dir() { src } else { root.to_path_buf() };

    let entries = std::fs::read_dir(&base)
        .map_err(|e| anyhow::anyhow!("reading code root {}: {}", base.display(), e))?;

    let mut modules = BTreeSet::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if entry.path() == foundation_dir {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') || ignore_dirs.contains(&name) {
            continue;
        }
        modules.insert(name);
    }
    Ok(modules)
}

/// Existence-only checks for a module's descriptor expectations. Content is
/// never inspected at this level.
fn check_descriptor(
    root: &Path,
    module: &str,
    descriptor: &ModuleDescriptor,
    warnings: &mut Vec<Warning>,
) {
    let src = root.join("src");
    let module_dir = if src.is_dir() {
        src.join(module)
    } else {
        root.join(module)
    };

    for expected in descriptor
        .expected_files
        .iter()
        .chain(descriptor.expected_dirs.iter())
    {
        if !module_dir.join(expected).exists() {
            warnings.push(Warning {
                kind: WarningKind::MissingFile,
                module: module.to_string(),
                message: format!("expected {:?} not found in module {:?}", expected, module),
                severity: Severity::Warning,
                remediation: format!("create {}/{} or update the module descriptor", module, expected),
            });
        }
    }

    for pattern in &descriptor.patterns {
        let Ok(glob) = Glob::new(pattern) else {
            warnings.push(Warning {
                kind: WarningKind::MissingFile,
                module: module.to_string(),
                message: format!("invalid pattern {:?} in descriptor for {:?}", pattern, module),
                severity: Severity::Info,
                remediation: "fix the glob pattern in the module descriptor".to_string(),
            });
            continue;
        };
        let matcher = glob.compile_matcher();

        let matched = WalkDir::new(&module_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .any(|e| matcher.is_match(e.file_name().to_string_lossy().as_ref()));

        if !matched {
            warnings.push(Warning {
                kind: WarningKind::MissingFile,
                module: module.to_string(),
                message: format!(
                    "no file in module {:?} matches pattern {:?}",
                    module, pattern
                ),
                severity: Severity::Info,
                remediation: format!("add a file matching {} or drop the pattern", pattern),
            });
        }
    }
}
