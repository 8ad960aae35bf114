//! Signature validation: function contracts declared in module descriptors
//! against functions extracted from code.

use std::collections::HashMap;
use std::path::Path;

use globset::Glob;

use crate::descriptor::{FunctionSpec, ModuleDescriptor};
use crate::model::{FunctionSignature, Language, Severity, Warning, WarningKind};

/// Output of the signature validation stage.
#[derive(Debug, Default)]
pub struct SignatureReport {
    pub warnings: Vec<Warning>,
    pub signature_mismatches: usize,
}

/// Match each descriptor's expected functions against extracted ones by exact
/// name, then diff parameter/return/visibility shape.
///
/// A no-op when no descriptor declares expected functions.
pub fn validate_signatures(
    descriptors: &[ModuleDescriptor],
    functions: &[FunctionSignature],
) -> SignatureReport {
    let mut report = SignatureReport::default();

    let mut by_name: HashMap<&str, Vec<&FunctionSignature>> = HashMap::new();
    for function in functions {
        by_name.entry(function.name.as_str()).or_default().push(function);
    }

    for descriptor in descriptors {
        for spec in &descriptor.expected_functions {
            let Some(candidates) = by_name.get(spec.name.as_str()) else {
                report.warnings.push(missing_function(&descriptor.name, spec));
                continue;
            };

            let Some(candidate) = candidates
                .iter()
                .find(|f| matches_filters(spec, f))
            else {
                report.warnings.push(missing_function(&descriptor.name, spec));
                continue;
            };

            let discrepancies = compare_signatures(&descriptor.name, spec, candidate);
            report.signature_mismatches += discrepancies.len();
            report.warnings.extend(discrepancies);
        }
    }

    report
}

fn missing_function(module: &str, spec: &FunctionSpec) -> Warning {
    Warning {
        kind: WarningKind::MissingFunction,
        module: module.to_string(),
        message: format!("expected function {:?} not found", spec.name),
        severity: Severity::Error,
        remediation: format!(
            "define {} in module {} or remove it from the descriptor",
            spec.name, module
        ),
    }
}

/// Apply a spec's optional language and file-pattern filters to a candidate.
fn matches_filters(spec: &FunctionSpec, function: &FunctionSignature) -> bool {
    if let Some(language) = spec.language {
        let ext = Path::new(&function.file)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        if Language::from_extension(ext) != Some(language) {
            return false;
        }
    }
    if let Some(pattern) = &spec.file_pattern {
        let base = Path::new(&function.file)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        match Glob::new(pattern) {
            Ok(glob) => {
                if !glob.compile_matcher().is_match(&base) {
                    return false;
                }
            }
            Err(_) => return false,
        }
    }
    true
}

/// Diff an expected signature against an extracted one, field by field.
///
/// Every discrepancy is its own warning so the caller gets actionable
/// per-field output rather than one opaque mismatch.
pub fn compare_signatures(
    module: &str,
    spec: &FunctionSpec,
    actual: &FunctionSignature,
) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let location = format!("{}:{}", actual.file, actual.line);

    if spec.parameters.len() != actual.parameters.len() {
        warnings.push(mismatch(
            module,
            Severity::Warning,
            format!(
                "{} ({}): expected {} parameters, found {}",
                spec.name,
                location,
                spec.parameters.len(),
                actual.parameters.len()
            ),
        ));
    } else {
        for (position, (expected, found)) in
            spec.parameters.iter().zip(actual.parameters.iter()).enumerate()
        {
            if !expected.name.is_empty()
                && !found.name.is_empty()
                && expected.name != found.name
            {
                warnings.push(mismatch(
                    module,
                    Severity::Info,
                    format!(
                        "{} ({}): parameter {} named {:?}, expected {:?}",
                        spec.name,
                        location,
                        position + 1,
                        found.name,
                        expected.name
                    ),
                ));
            }
            if !expected.type_.is_empty()
                && !found.type_.is_empty()
                && !types_match(&expected.type_, &found.type_)
            {
                warnings.push(mismatch(
                    module,
                    Severity::Warning,
                    format!(
                        "{} ({}): parameter {} has type {:?}, expected {:?}",
                        spec.name,
                        location,
                        position + 1,
                        found.type_,
                        expected.type_
                    ),
                ));
            }
        }
    }

    if spec.returns.len() != actual.returns.len() {
        warnings.push(mismatch(
            module,
            Severity::Warning,
            format!(
                "{} ({}): expected {} return values, found {}",
                spec.name,
                location,
                spec.returns.len(),
                actual.returns.len()
            ),
        ));
    } else {
        for (position, (expected, found)) in
            spec.returns.iter().zip(actual.returns.iter()).enumerate()
        {
            if !expected.type_.is_empty()
                && !found.type_.is_empty()
                && !types_match(&expected.type_, &found.type_)
            {
                warnings.push(mismatch(
                    module,
                    Severity::Warning,
                    format!(
                        "{} ({}): return {} has type {:?}, expected {:?}",
                        spec.name,
                        location,
                        position + 1,
                        found.type_,
                        expected.type_
                    ),
                ));
            }
        }
    }

    if let Some(visibility) = spec.visibility {
        if visibility != actual.visibility {
            warnings.push(mismatch(
                module,
                Severity::Info,
                format!(
                    "{} ({}): visibility is {}, expected {}",
                    spec.name, location, actual.visibility, visibility
                ),
            ));
        }
    }

    warnings
}

fn mismatch(module: &str, severity: Severity, message: String) -> Warning {
    Warning {
        kind: WarningKind::SignatureMismatch,
        module: module.to_string(),
        message,
        severity,
        remediation: "align the implementation with the documented signature".to_string(),
    }
}

/// Whether two type strings are equivalent for drift purposes.
///
/// Case-insensitive after normalization; this is deliberately loose so common
/// cross-language spellings do not produce false positives.
pub fn types_match(a: &str, b: &str) -> bool {
    normalize_type(a).eq_ignore_ascii_case(&normalize_type(b))
}

/// Strip one leading `*` and any dotted package prefix from a type string.
fn normalize_type(type_: &str) -> String {
    let trimmed = type_.trim();
    let trimmed = trimmed.strip_prefix('*').unwrap_or(trimmed);
    // pkg.User and models.User both reduce to User.
    match trimmed.rsplit_once('.') {
        Some((prefix, name)) if !prefix.contains('<') && !name.is_empty() => name.to_string(),
        _ => trimmed.to_string(),
    }
}
