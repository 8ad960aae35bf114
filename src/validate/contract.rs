//! Contract validation: documented endpoints vs endpoints observed in code.

use std::collections::BTreeMap;
use std::path::Path;

use serde_yaml::Value;
use walkdir::WalkDir;

use crate::archmd;
use crate::model::{Endpoint, Severity, Warning, WarningKind};

const HTTP_VERBS: &[&str] = &["get", "post", "put", "delete", "patch", "options", "head"];

/// Output of the contract validation stage.
#[derive(Debug, Default)]
pub struct ContractReport {
    pub warnings: Vec<Warning>,
    pub missing_endpoints: usize,
    pub undocumented_endpoints: usize,
}

/// Diff documented endpoints against implemented ones by normalized key.
///
/// Documented endpoints come from OpenAPI files and architecture markdown
/// under the blueprints tree, with a foundation-level `ARCHITECTURE.md` as
/// last resort. No documented endpoints means nothing to validate: an
/// undocumented project is valid, just unchecked.
pub fn validate_contracts(
    blueprints_dir: Option<&Path>,
    foundation_dir: &Path,
    implemented: &[Endpoint],
) -> anyhow::Result<ContractReport> {
    let mut report = ContractReport::default();

    let documented = load_documented_endpoints(blueprints_dir, foundation_dir)?;
    if documented.is_empty() {
        return Ok(report);
    }

    let documented_keys: BTreeMap<String, &Endpoint> = documented
        .iter()
        .map(|e| (endpoint_key(e), e))
        .collect();
    let implemented_keys: BTreeMap<String, &Endpoint> = implemented
        .iter()
        .map(|e| (endpoint_key(e), e))
        .collect();

    for (key, endpoint) in &documented_keys {
        if implemented_keys.contains_key(key) {
            continue;
        }
        report.missing_endpoints += 1;
        report.warnings.push(Warning {
            kind: WarningKind::MissingEndpoint,
            module: String::new(),
            message: format!(
                "documented endpoint {} {} has no implementation",
                endpoint.method, endpoint.path
            ),
            severity: Severity::Error,
            remediation: format!(
                "implement {} {} or remove it from the API contract",
                endpoint.method, endpoint.path
            ),
        });
    }

    for (key, endpoint) in &implemented_keys {
        if documented_keys.contains_key(key) {
            continue;
        }
        report.undocumented_endpoints += 1;
        report.warnings.push(Warning {
            kind: WarningKind::UndocumentedEndpoint,
            module: String::new(),
            message: format!(
                "endpoint {} {} ({}:{}) is not documented",
                endpoint.method, endpoint.path, endpoint.file, endpoint.line
            ),
            severity: Severity::Warning,
            remediation: format!(
                "document {} {} in the API contract",
                endpoint.method, endpoint.path
            ),
        });
    }

    Ok(report)
}

/// Comparison key for an endpoint: `"<METHOD> <normalized path>"`.
fn endpoint_key(endpoint: &Endpoint) -> String {
    format!(
        "{} {}",
        endpoint.method.to_uppercase(),
        normalize_path(&endpoint.path)
    )
}

/// Canonicalize a route path so documentation dialects compare equal.
///
/// `:id` and `<id>` parameter styles become `{id}`, one trailing slash is
/// stripped, and exactly one leading slash is guaranteed.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    let trimmed = trimmed.trim_start_matches('/');

    let segments: Vec<String> = trimmed
        .split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{}}}", name)
            } else if segment.starts_with('<') && segment.ends_with('>') && segment.len() > 2 {
                // Django converters: <int:id> keeps only the name.
                let inner = &segment[1..segment.len() - 1];
                let name = inner.rsplit(':').next().unwrap_or(inner);
                format!("{{{}}}", name)
            } else {
                segment.to_string()
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}

fn load_documented_endpoints(
    blueprints_dir: Option<&Path>,
    foundation_dir: &Path,
) -> anyhow::Result<Vec<Endpoint>> {
    let mut documented = Vec::new();

    if let Some(blueprints) = blueprints_dir.filter(|p| p.is_dir()) {
        for entry in WalkDir::new(blueprints).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_lowercase();
            if name == "openapi.yaml" || name == "openapi.yml" {
                // A malformed OpenAPI file is skipped, not fatal.
                if let Some(endpoints) = parse_openapi(entry.path()) {
                    documented.extend(endpoints);
                }
            } else if name == "architecture.md" {
                documented.extend(archmd::parse_architecture_file(entry.path())?);
            }
        }
    }

    if documented.is_empty() {
        let fallback = foundation_dir.join("ARCHITECTURE.md");
        if fallback.is_file() {
            documented.extend(archmd::parse_architecture_file(&fallback)?);
        }
    }

    Ok(documented)
}

/// Extract endpoints from an OpenAPI document's `paths` map.
///
/// Returns None when the file cannot be read or parsed; per-item failures are
/// soft by design.
fn parse_openapi(path: &Path) -> Option<Vec<Endpoint>> {
    let content = std::fs::read_to_string(path).ok()?;
    let doc: Value = serde_yaml::from_str(&content).ok()?;
    let paths = doc.get("paths")?.as_mapping()?;

    let file = path.to_string_lossy().to_string();
    let mut endpoints = Vec::new();

    for (route, operations) in paths {
        let Some(route) = route.as_str() else {
            continue;
        };
        let Some(operations) = operations.as_mapping() else {
            continue;
        };
        for (verb, operation) in operations {
            let Some(verb) = verb.as_str() else {
                continue;
            };
            if !HTTP_VERBS.contains(&verb.to_lowercase().as_str()) {
                continue;
            }
            let description = operation
                .get("summary")
                .or_else(|| operation.get("description"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            endpoints.push(Endpoint {
                method: verb.to_uppercase(),
                path: route.to_string(),
                handler: String::new(),
                description,
                file: file.clone(),
                line: 0,
                language: None,
            });
        }
    }

    Some(endpoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;
    use tempfile::TempDir;

    fn implemented(method: &str, path: &str) -> Endpoint {
        Endpoint {
            method: method.to_string(),
            path: path.to_string(),
            handler: "handlers.List".to_string(),
            description: None,
            file: "routes.go".to_string(),
            line: 10,
            language: Some(Language::Go),
        }
    }

    #[test]
    fn test_normalize_path_is_an_equivalence() {
        assert_eq!(normalize_path("/v1/users/:id"), "/v1/users/{id}");
        assert_eq!(normalize_path("/v1/users/{id}"), "/v1/users/{id}");
        assert_eq!(normalize_path("/v1/users/<id>/"), "/v1/users/{id}");
        assert_eq!(normalize_path("v1/users/<int:id>"), "/v1/users/{id}");
        assert_eq!(normalize_path("/v1/users/"), "/v1/users");
        assert_eq!(normalize_path("/"), "/");
    }

    /// Scenario: openapi documents GET /v1/users, code serves GET /api/users.
    #[test]
    fn test_both_drift_directions() {
        let temp = TempDir::new().unwrap();
        let blueprints = temp.path().join("blueprints");
        std::fs::create_dir(&blueprints).unwrap();
        std::fs::write(
            blueprints.join("openapi.yaml"),
            r#"
openapi: 3.0.0
paths:
  /v1/users:
    get:
      summary: List users
"#,
        )
        .unwrap();
        let foundation = temp.path().join("foundation");
        std::fs::create_dir(&foundation).unwrap();

        let code = vec![implemented("GET", "/api/users")];
        let report = validate_contracts(Some(&blueprints), &foundation, &code).unwrap();

        assert_eq!(report.missing_endpoints, 1);
        assert_eq!(report.undocumented_endpoints, 1);

        let missing = report
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::MissingEndpoint)
            .unwrap();
        assert_eq!(missing.severity, Severity::Error);
        assert!(missing.message.contains("GET /v1/users"));

        let undocumented = report
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::UndocumentedEndpoint)
            .unwrap();
        assert_eq!(undocumented.severity, Severity::Warning);
        assert!(undocumented.message.contains("routes.go:10"));
    }

    #[test]
    fn test_param_styles_compare_equal() {
        let temp = TempDir::new().unwrap();
        let blueprints = temp.path().join("blueprints");
        std::fs::create_dir(&blueprints).unwrap();
        std::fs::write(
            blueprints.join("openapi.yaml"),
            "paths:\n  /v1/users/{id}:\n    get:\n      summary: x\n",
        )
        .unwrap();
        let foundation = temp.path().join("foundation");
        std::fs::create_dir(&foundation).unwrap();

        let code = vec![implemented("GET", "/v1/users/:id")];
        let report = validate_contracts(Some(&blueprints), &foundation, &code).unwrap();
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_no_documentation_is_a_noop() {
        let temp = TempDir::new().unwrap();
        let foundation = temp.path().join("foundation");
        std::fs::create_dir(&foundation).unwrap();

        let code = vec![implemented("GET", "/api/users")];
        let report = validate_contracts(None, &foundation, &code).unwrap();
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_malformed_openapi_is_skipped() {
        let temp = TempDir::new().unwrap();
        let blueprints = temp.path().join("blueprints");
        std::fs::create_dir(&blueprints).unwrap();
        std::fs::write(blueprints.join("openapi.yaml"), ": not yaml [").unwrap();
        let foundation = temp.path().join("foundation");
        std::fs::create_dir(&foundation).unwrap();

        let report = validate_contracts(Some(&blueprints), &foundation, &[]).unwrap();
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_architecture_fallback() {
        let temp = TempDir::new().unwrap();
        let foundation = temp.path().join("foundation");
        std::fs::create_dir(&foundation).unwrap();
        std::fs::write(
            foundation.join("ARCHITECTURE.md"),
            "### GET /v1/ping\nHealth check.\n",
        )
        .unwrap();

        let report = validate_contracts(None, &foundation, &[]).unwrap();
        assert_eq!(report.missing_endpoints, 1);
    }
}
