//! Module descriptor schema and loading.
//!
//! A descriptor is an optional YAML file sitting next to a foundation module's
//! markdown, enumerating the files, directories, glob patterns and function
//! signatures the module is expected to contain.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::model::{Language, ParameterSpec, ReturnSpec, Visibility};

/// Structured expectations for one foundation module.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModuleDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub expected_files: Vec<String>,
    #[serde(default)]
    pub expected_dirs: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub expected_functions: Vec<FunctionSpec>,
}

/// An expected function signature, with optional filters narrowing which
/// extracted functions are eligible matches.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FunctionSpec {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    #[serde(default)]
    pub returns: Vec<ReturnSpec>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub language: Option<Language>,
    /// Glob matched against the base name of a candidate's file.
    #[serde(default)]
    pub file_pattern: Option<String>,
}

impl ModuleDescriptor {
    /// Parse a descriptor from a YAML file.
    ///
    /// A malformed descriptor is a hard error; the caller chose to describe
    /// this module, so a broken description should not be silently ignored.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading descriptor {}: {}", path.display(), e))?;
        let descriptor: ModuleDescriptor = serde_yaml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("parsing descriptor {}: {}", path.display(), e))?;
        Ok(descriptor)
    }

    /// Load the descriptor for a named module, if one exists.
    ///
    /// Looks for `<module>.module.yaml` (or `.yml`) next to the module's
    /// markdown inside the foundation directory. Absence is not an error; the
    /// module degrades to directory-existence-only checking.
    pub fn load_for_module(foundation_dir: &Path, module: &str) -> anyhow::Result<Option<Self>> {
        let path = ["yaml", "yml"]
            .iter()
            .map(|ext| foundation_dir.join(format!("{}.module.{}", module, ext)))
            .find(|p| p.exists());
        let Some(path) = path else {
            return Ok(None);
        };
        let mut descriptor = Self::parse_file(&path)?;
        if descriptor.name.is_empty() {
            descriptor.name = module.to_string();
        }
        Ok(Some(descriptor))
    }
}
