//! Language-specific detector implementations.
//!
//! Each detector recognizes files by extension and extracts endpoints and
//! function signatures from raw text with ordered regex rules tuned to that
//! ecosystem's dominant web frameworks. No ASTs: extraction is best-effort and
//! never fails, a file matching no rule simply yields nothing.

mod csharp;
mod go;
mod java;
mod javascript;
mod python;
mod ruby;

pub use csharp::CsharpDetector;
pub use go::GoDetector;
pub use java::JavaDetector;
pub use javascript::JavascriptDetector;
pub use python::PythonDetector;
pub use ruby::RubyDetector;

use std::path::Path;

use crate::model::{Endpoint, FunctionSignature, Language};

/// A per-language recognizer and extractor.
///
/// Extraction methods never return errors; silent skip-on-failure is the
/// contract so one malformed file never aborts a scan.
pub trait LanguageDetector: Send + Sync {
    /// The language this detector handles.
    fn language(&self) -> Language;

    /// Whether this detector claims the given file (by extension,
    /// case-insensitive).
    fn detect(&self, path: &Path) -> bool;

    /// Extract HTTP endpoint declarations from file content.
    fn extract_endpoints(&self, path: &Path, content: &str) -> Vec<Endpoint>;

    /// Extract function signatures from file content.
    fn extract_functions(&self, path: &Path, content: &str) -> Vec<FunctionSignature>;
}

/// Build the full detector set, in registration (priority) order.
///
/// Extensions are disjoint by construction, so registration order does not
/// change which file maps to which language.
pub fn all_detectors() -> Vec<Box<dyn LanguageDetector>> {
    vec![
        Box::new(GoDetector),
        Box::new(PythonDetector),
        Box::new(JavascriptDetector),
        Box::new(JavaDetector),
        Box::new(CsharpDetector),
        Box::new(RubyDetector),
    ]
}

/// Lowercased extension of a path, or empty string.
pub(crate) fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Pending-route state for annotation-before-declaration languages.
///
/// A line matching an annotation or decorator pattern arms the state; the
/// next line matching a declaration pattern consumes it and emits endpoints.
/// If no declaration follows before the next annotation, the pending routes
/// are silently dropped (one-shot pairing).
#[derive(Debug, Default)]
pub(crate) enum RouteState {
    #[default]
    Idle,
    AwaitingDeclaration {
        routes: Vec<(String, String)>,
        line: usize,
    },
}

impl RouteState {
    /// Arm the state with method/path pairs seen on an annotation line.
    pub(crate) fn arm(&mut self, routes: Vec<(String, String)>, line: usize) {
        *self = RouteState::AwaitingDeclaration { routes, line };
    }

    /// Consume pending routes, resetting to idle.
    pub(crate) fn take(&mut self) -> Option<(Vec<(String, String)>, usize)> {
        match std::mem::take(self) {
            RouteState::Idle => None,
            RouteState::AwaitingDeclaration { routes, line } => Some((routes, line)),
        }
    }
}

/// Split a parameter or return list on top-level commas.
///
/// Commas nested inside `<>`, `()`, `[]` or `{}` do not split, so Java and C#
/// generics like `Map<String, User>` survive as one piece. Empty pieces are
/// dropped.
pub(crate) fn split_top_level(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();

    for ch in text.chars() {
        match ch {
            '<' | '(' | '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            '>' | ')' | ']' | '}' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                let piece = current.trim().to_string();
                if !piece.is_empty() {
                    pieces.push(piece);
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    let piece = current.trim().to_string();
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
