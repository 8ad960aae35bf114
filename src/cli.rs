//! Command-line interface for specdrift.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::analyzer::DEFAULT_IGNORE_DIRS;
use crate::report;
use crate::validate::{InspectOptions, Inspector};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Conventional foundation locations probed when --foundation is not given,
/// relative to the scan root.
const DEFAULT_FOUNDATION_DIRS: &[&str] = &["foundation", "docs/foundation", ".foundation/foundation"];

/// Detect drift between specifications and code.
///
/// Specdrift compares what a project's foundation modules and API contracts
/// document against what its source tree actually contains, across Go,
/// Python, JavaScript/TypeScript, Java, C# and Ruby.
#[derive(Parser)]
#[command(name = "specdrift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect a source tree for drift against its specifications
    #[command(visible_alias = "check")]
    Inspect(InspectArgs),
}

/// Arguments for the inspect command.
#[derive(Parser)]
pub struct InspectArgs {
    /// Root of the source tree to inspect
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Foundation directory (default: auto-discover under the root)
    #[arg(short, long)]
    pub foundation: Option<PathBuf>,

    /// Blueprints directory holding API contracts (default: sibling of the
    /// foundation directory)
    #[arg(short, long)]
    pub blueprints: Option<PathBuf>,

    /// Analysis depth: 1 = structure, 2 = +API contracts, 3 = +signatures
    #[arg(short, long, default_value_t = 1)]
    pub depth: u8,

    /// Run contract validation regardless of depth
    #[arg(long)]
    pub check_api: bool,

    /// Run signature validation regardless of depth
    #[arg(long)]
    pub check_signatures: bool,

    /// Skip module descriptor checks
    #[arg(long)]
    pub no_descriptors: bool,

    /// Additional directory names to ignore during scans (repeatable)
    #[arg(short, long)]
    pub ignore: Vec<String>,

    /// Output format: pretty or json
    #[arg(long, default_value = "pretty")]
    pub format: String,
}

/// Discover the foundation directory under a root.
fn discover_foundation(root: &Path) -> anyhow::Result<PathBuf> {
    for candidate in DEFAULT_FOUNDATION_DIRS {
        let path = root.join(candidate);
        if path.is_dir() {
            return Ok(path);
        }
    }
    anyhow::bail!(
        "no foundation directory found (looked for {} under {})",
        DEFAULT_FOUNDATION_DIRS.join(", "),
        root.display()
    )
}

/// Run the inspect command.
pub fn run_inspect(args: &InspectArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }
    if !(1..=3).contains(&args.depth) {
        eprintln!("Error: invalid depth {}, must be 1, 2 or 3", args.depth);
        return Ok(EXIT_ERROR);
    }

    let root = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let foundation = match &args.foundation {
        Some(p) => p.clone(),
        None => match discover_foundation(&root) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(EXIT_ERROR);
            }
        },
    };

    // Blueprints conventionally sit next to the foundation directory.
    let blueprints = args.blueprints.clone().or_else(|| {
        foundation
            .parent()
            .map(|parent| parent.join("blueprints"))
            .filter(|p| p.is_dir())
    });

    let mut ignore_dirs: Vec<String> =
        DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect();
    ignore_dirs.extend(args.ignore.iter().cloned());

    let options = InspectOptions {
        root_dir: root,
        foundation_path: foundation.clone(),
        blueprints_path: blueprints,
        ignore_dirs,
        use_descriptors: !args.no_descriptors,
        depth: args.depth,
        check_api: args.check_api,
        check_signatures: args.check_signatures,
    };

    let result = Inspector::new(options).run()?;

    match args.format.as_str() {
        "json" => report::write_json(&result)?,
        _ => report::write_pretty(
            &args.path.to_string_lossy(),
            &foundation.to_string_lossy(),
            &result,
        ),
    }

    if result.success {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_foundation() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("docs").join("foundation")).unwrap();
        let found = discover_foundation(temp.path()).unwrap();
        assert!(found.ends_with("docs/foundation"));
    }

    #[test]
    fn test_discover_foundation_missing() {
        let temp = TempDir::new().unwrap();
        assert!(discover_foundation(temp.path()).is_err());
    }
}
