//! Core types shared by detectors and validators.
//!
//! Everything the engine extracts from source trees or specification files is
//! expressed in this vocabulary: endpoints, function signatures, and the
//! warnings produced by reconciling the two.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source languages the engine recognizes.
///
/// `Javascript` covers TypeScript, JSX and TSX as well; they share the same
/// web-framework route syntax for our purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    Python,
    Javascript,
    Java,
    Csharp,
    Ruby,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Java => "java",
            Language::Csharp => "csharp",
            Language::Ruby => "ruby",
        }
    }

    /// Infer a language from a file extension (without dot, any case).
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext.to_lowercase().as_str() {
            "go" => Some(Language::Go),
            "py" => Some(Language::Python),
            "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => Some(Language::Javascript),
            "java" => Some(Language::Java),
            "cs" => Some(Language::Csharp),
            "rb" => Some(Language::Ruby),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "go" => Ok(Language::Go),
            "python" => Ok(Language::Python),
            "javascript" | "typescript" => Ok(Language::Javascript),
            "java" => Ok(Language::Java),
            "csharp" | "c#" => Ok(Language::Csharp),
            "ruby" => Ok(Language::Ruby),
            _ => Err(format!("unknown language: {}", s)),
        }
    }
}

/// An HTTP endpoint, either observed in code or declared in documentation.
///
/// Duplicates are expected; deduplication happens only at comparison time via
/// a normalized `METHOD path` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub handler: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub line: usize,
    /// Absent for documented endpoints, which have no source language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Visibility of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Protected,
    Package,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Package => write!(f, "package"),
        }
    }
}

/// One parameter of an extracted or expected function.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_: String,
}

/// One return value of an extracted or expected function.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnSpec {
    #[serde(default, rename = "type")]
    pub type_: String,
}

/// A function signature extracted from source.
///
/// Parameter and return ordering is significant; comparison is positional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    #[serde(default)]
    pub returns: Vec<ReturnSpec>,
    pub file: String,
    pub line: usize,
    pub visibility: Visibility,
}

/// Severity levels for warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Drift classes reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    #[serde(rename = "MISSING_MODULE")]
    MissingModule,
    #[serde(rename = "EXTRA_CODE")]
    ExtraCode,
    #[serde(rename = "MISMATCHED_NAME")]
    MismatchedName,
    #[serde(rename = "MISSING_FILE")]
    MissingFile,
    #[serde(rename = "UNEXPECTED_FILE")]
    UnexpectedFile,
    #[serde(rename = "MISSING_ENDPOINT")]
    MissingEndpoint,
    #[serde(rename = "UNDOCUMENTED_ENDPOINT")]
    UndocumentedEndpoint,
    #[serde(rename = "MISSING_FUNCTION")]
    MissingFunction,
    #[serde(rename = "SIGNATURE_MISMATCH")]
    SignatureMismatch,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::MissingModule => "MISSING_MODULE",
            WarningKind::ExtraCode => "EXTRA_CODE",
            WarningKind::MismatchedName => "MISMATCHED_NAME",
            WarningKind::MissingFile => "MISSING_FILE",
            WarningKind::UnexpectedFile => "UNEXPECTED_FILE",
            WarningKind::MissingEndpoint => "MISSING_ENDPOINT",
            WarningKind::UndocumentedEndpoint => "UNDOCUMENTED_ENDPOINT",
            WarningKind::MissingFunction => "MISSING_FUNCTION",
            WarningKind::SignatureMismatch => "SIGNATURE_MISMATCH",
        }
    }
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single drift finding.
///
/// Warnings are pure values appended in stage order; no identity beyond
/// insertion order is guaranteed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub module: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub remediation: String,
}

/// Aggregate counters for one inspection run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_modules: usize,
    pub matching_modules: usize,
    pub missing_modules: usize,
    pub extra_code_dirs: usize,
    pub missing_endpoints: usize,
    pub undocumented_endpoints: usize,
    pub signature_mismatches: usize,
    pub errors: usize,
    pub warnings: usize,
}

/// The output of one inspection run. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectResult {
    pub success: bool,
    pub summary: Summary,
    pub warnings: Vec<Warning>,
    /// Files seen per language during the census walk.
    #[serde(default)]
    pub languages: BTreeMap<Language, usize>,
}

impl InspectResult {
    /// Check if there are any error-severity warnings.
    pub fn has_errors(&self) -> bool {
        self.warnings.iter().any(|w| w.severity == Severity::Error)
    }
}
