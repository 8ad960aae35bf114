//! Integration tests for the full inspection pipeline.
//!
//! Each test builds a small project fixture in a temp directory and runs the
//! inspector end to end. Warning sets, not their order, are the contract;
//! one test pins determinism explicitly.

use std::path::Path;

use tempfile::TempDir;

use specdrift::{InspectOptions, Inspector, Severity, WarningKind};

/// Write a file, creating parent directories as needed.
fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// A project where the docs and the code disagree in every supported way:
/// - foundation documents `auth` (missing from code) and `api` (present)
/// - code has an undocumented `utils` directory
/// - the OpenAPI contract documents GET /v1/users but code serves GET /api/users
/// - the api descriptor expects CreateUser(ctx Context, user *User)
fn drifted_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write(root, "foundation/auth.md", "# auth\n\nAuthentication.\n");
    write(root, "foundation/api.md", "# api\n\nHTTP surface.\n");
    write(
        root,
        "foundation/api.module.yaml",
        r#"
expected_files:
  - routes.go
expected_functions:
  - name: CreateUser
    language: go
    parameters:
      - name: ctx
        type: Context
      - name: user
        type: "*User"
    returns:
      - type: "*User"
      - type: error
"#,
    );
    write(
        root,
        "blueprints/openapi.yaml",
        r#"
openapi: 3.0.0
paths:
  /v1/users:
    get:
      summary: List users
"#,
    );
    write(
        root,
        "src/api/routes.go",
        "package api\n\nfunc routes(r *gin.Engine) {\n\tr.GET(\"/api/users\", handlers.List)\n}\n",
    );
    write(
        root,
        "src/api/service.go",
        "package api\n\nfunc CreateUser(ctx Context, u User) (*User, error) {\n\treturn nil, nil\n}\n",
    );
    write(root, "src/utils/strings.go", "package utils\n");

    temp
}

fn inspect(temp: &TempDir, depth: u8) -> specdrift::InspectResult {
    let root = temp.path();
    let mut options =
        InspectOptions::new(root.to_path_buf(), root.join("foundation"));
    options.blueprints_path = Some(root.join("blueprints"));
    options.depth = depth;
    Inspector::new(options).run().expect("inspection should succeed")
}

#[test]
fn test_structure_drift() {
    let temp = drifted_project();
    let result = inspect(&temp, 1);

    assert_eq!(result.summary.total_modules, 2);
    assert_eq!(result.summary.matching_modules, 1);
    assert_eq!(result.summary.missing_modules, 1);
    assert_eq!(result.summary.extra_code_dirs, 1);

    let missing: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::MissingModule)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].module, "auth");
    assert!(!missing[0].remediation.is_empty());

    let extra: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::ExtraCode)
        .collect();
    assert_eq!(extra.len(), 1);
    assert_eq!(extra[0].module, "utils");

    // Structure drift alone is not build-breaking.
    assert!(result.success);
    assert_eq!(result.summary.missing_endpoints, 0);
}

#[test]
fn test_contract_drift_at_depth_two() {
    let temp = drifted_project();
    let result = inspect(&temp, 2);

    assert_eq!(result.summary.missing_endpoints, 1);
    assert_eq!(result.summary.undocumented_endpoints, 1);

    let missing = result
        .warnings
        .iter()
        .find(|w| w.kind == WarningKind::MissingEndpoint)
        .unwrap();
    assert_eq!(missing.severity, Severity::Error);
    assert!(missing.message.contains("GET /v1/users"));

    let undocumented = result
        .warnings
        .iter()
        .find(|w| w.kind == WarningKind::UndocumentedEndpoint)
        .unwrap();
    assert_eq!(undocumented.severity, Severity::Warning);
    assert!(undocumented.message.contains("GET /api/users"));
    assert!(undocumented.message.contains("routes.go"));

    // A missing documented endpoint breaks the run.
    assert!(!result.success);
}

#[test]
fn test_signature_drift_at_depth_three() {
    let temp = drifted_project();
    let result = inspect(&temp, 3);

    let mismatches: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::SignatureMismatch)
        .collect();
    // Pointer-tolerant matching keeps *User vs User quiet; only the
    // user-vs-u parameter name drifts, at info severity.
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].severity, Severity::Info);
    assert!(mismatches[0].message.contains("\"u\""));
    assert_eq!(result.summary.signature_mismatches, 1);

    assert!(!result
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::MissingFunction));
}

#[test]
fn test_language_census() {
    let temp = drifted_project();
    let root = temp.path();
    write(root, "src/web/app.py", "def main():\n    pass\n");
    write(root, "src/web/index.ts", "export {};\n");

    let result = inspect(&temp, 1);
    let go = result
        .languages
        .get(&specdrift::Language::Go)
        .copied()
        .unwrap_or(0);
    assert_eq!(go, 3);
    assert_eq!(
        result.languages.get(&specdrift::Language::Python),
        Some(&1)
    );
    assert_eq!(
        result.languages.get(&specdrift::Language::Javascript),
        Some(&1)
    );
}

#[test]
fn test_clean_project_passes() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "foundation/api.md", "# api\n");
    write(
        root,
        "blueprints/openapi.yaml",
        "paths:\n  /api/users:\n    get:\n      summary: List\n",
    );
    write(
        root,
        "src/api/routes.go",
        "package api\n\nfunc routes() {\n\tr.GET(\"/api/users\", handlers.List)\n}\n",
    );

    let result = inspect(&temp, 3);
    assert!(result.success);
    assert_eq!(result.summary.errors, 0);
    assert!(result.warnings.is_empty());
    assert_eq!(result.summary.matching_modules, 1);
}

#[test]
fn test_deterministic_output() {
    let temp = drifted_project();
    let first = inspect(&temp, 3);
    let second = inspect(&temp, 3);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_ignored_directories_do_not_leak() {
    let temp = drifted_project();
    let root = temp.path();
    // node_modules content must affect neither census nor module listing.
    write(root, "src/node_modules/dep/index.js", "module.exports = 1;\n");
    write(root, "node_modules/other/app.py", "x = 1\n");

    let result = inspect(&temp, 1);
    assert!(result.languages.get(&specdrift::Language::Python).is_none());
    assert!(!result
        .warnings
        .iter()
        .any(|w| w.module.contains("node_modules")));
}
