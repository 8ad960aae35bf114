//! Specdrift - spec-vs-code drift detection across polyglot source trees.
//!
//! Specdrift compares human-authored specification fragments (foundation
//! modules with optional structured descriptors, plus API contracts) against
//! what a source tree actually contains. Detection is heuristic: per-language
//! regex pattern rules, no ASTs, no execution of the target code.
//!
//! # Architecture
//!
//! - `model`: the fact vocabulary every stage speaks (endpoints, signatures,
//!   warnings)
//! - `languages`: one detector per language (Go, Python, JavaScript, Java,
//!   C#, Ruby)
//! - `analyzer`: tree walks that dispatch files to detectors and aggregate
//! - `descriptor`: module descriptor YAML schema
//! - `archmd`: architecture-markdown endpoint parser
//! - `validate`: the reconciliation stages and the orchestrating inspector
//! - `report`: output formatting (pretty, JSON)
//!
//! # Adding a New Language
//!
//! See `src/languages/` for examples. Implement `LanguageDetector` and
//! register it in `languages::all_detectors`.

pub mod analyzer;
pub mod archmd;
pub mod cli;
pub mod descriptor;
pub mod languages;
pub mod model;
pub mod report;
pub mod validate;

pub use analyzer::{PolyglotAnalyzer, DEFAULT_IGNORE_DIRS};
pub use descriptor::{FunctionSpec, ModuleDescriptor};
pub use languages::{all_detectors, LanguageDetector};
pub use model::{
    Endpoint, FunctionSignature, InspectResult, Language, ParameterSpec, ReturnSpec, Severity,
    Summary, Visibility, Warning, WarningKind,
};
pub use validate::{InspectOptions, Inspector};
