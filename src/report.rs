//! Output formatting for inspection results.
//!
//! Two formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;

use crate::model::{InspectResult, Severity, Warning};

/// Write the result as pretty-printed JSON to stdout.
pub fn write_json(result: &InspectResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{}", json);
    Ok(())
}

/// Write the result in human-readable form to stdout.
pub fn write_pretty(path: &str, foundation: &str, result: &InspectResult) {
    println!();
    print!("  ");
    print!("{}", "specdrift".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning:   ".dimmed());
    println!("{}", path);
    print!("  {}", "Foundation: ".dimmed());
    println!("{}", foundation);
    println!();

    if result.success {
        print!("  {}", "✓ PASS".green());
    } else {
        print!("  {}", "✗ FAIL".red());
    }
    println!(
        "  {} error(s), {} warning(s)",
        result.summary.errors, result.summary.warnings
    );
    println!();

    if !result.languages.is_empty() {
        println!("  {}", "Languages:".bold());
        for (language, count) in &result.languages {
            let plural = if *count != 1 { "s" } else { "" };
            println!("    {:<12} {} file{}", language.to_string(), count, plural);
        }
        println!();
    }

    if !result.warnings.is_empty() {
        write_warnings(&result.warnings);
        println!();
    }

    write_summary(result);
    println!();
}

fn write_warnings(warnings: &[Warning]) {
    println!("  {} ({}):", "Drift".bold(), warnings.len());
    println!();

    for warning in warnings {
        write_severity_tag(&warning.severity);
        print!("   ");
        print!("{:<24}", warning.kind.as_str().dimmed());
        if !warning.module.is_empty() {
            print!("{}", warning.module.blue());
        }
        println!();

        println!("            {}", warning.message);
        if !warning.remediation.is_empty() {
            println!("            {}", format!("fix: {}", warning.remediation).dimmed());
        }
        println!();
    }
}

fn write_severity_tag(severity: &Severity) {
    match severity {
        Severity::Error => print!("    {} ", "ERROR".red()),
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
        Severity::Info => print!("    {} ", "INFO ".blue()),
    }
}

fn write_summary(result: &InspectResult) {
    let s = &result.summary;
    println!("  {}", "Modules:".bold());
    println!(
        "    {} total, {} matching, {} missing, {} undocumented code dir(s)",
        s.total_modules, s.matching_modules, s.missing_modules, s.extra_code_dirs
    );

    if s.missing_endpoints > 0 || s.undocumented_endpoints > 0 {
        println!("  {}", "Endpoints:".bold());
        println!(
            "    {} missing, {} undocumented",
            s.missing_endpoints, s.undocumented_endpoints
        );
    }
    if s.signature_mismatches > 0 {
        println!("  {}", "Signatures:".bold());
        println!("    {} mismatch(es)", s.signature_mismatches);
    }

    print!("  ");
    if result.success {
        println!("{}", "PASSED".green());
    } else {
        println!("{}", "FAILED".red());
    }
}
