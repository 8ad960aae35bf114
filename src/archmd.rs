//! Architecture-markdown endpoint parser.
//!
//! Parses the conventional documentation dialect where each endpoint is a
//! level-3 heading like `### GET /v1/users/{id}` followed by free text,
//! optional fenced JSON examples and bullet-list parameter declarations. Only
//! the heading and the first plain description line feed drift detection.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use crate::model::Endpoint;

lazy_static! {
    static ref ENDPOINT_HEADING: Regex =
        Regex::new(r"^###\s+(GET|POST|PUT|DELETE|PATCH|OPTIONS|HEAD)\s+(\S+)").unwrap();
}

/// Parse documented endpoints out of an architecture markdown file.
///
/// An unreadable file is a hard error; the caller decided this file is a
/// contract source.
pub fn parse_architecture_file(path: &Path) -> anyhow::Result<Vec<Endpoint>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("reading architecture file {}: {}", path.display(), e))?;
    Ok(parse_architecture(&content, &path.to_string_lossy()))
}

fn parse_architecture(content: &str, file: &str) -> Vec<Endpoint> {
    let mut endpoints: Vec<Endpoint> = Vec::new();
    let mut in_fence = false;

    for (idx, line) in content.lines().enumerate() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        if let Some(caps) = ENDPOINT_HEADING.captures(line) {
            endpoints.push(Endpoint {
                method: caps[1].to_string(),
                path: caps[2].to_string(),
                handler: String::new(),
                description: None,
                file: file.to_string(),
                line: idx + 1,
                language: None,
            });
            continue;
        }

        // First plain text line after a heading becomes its description.
        if let Some(last) = endpoints.last_mut() {
            let trimmed = line.trim();
            if last.description.is_none()
                && !trimmed.is_empty()
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('-')
                && !trimmed.starts_with('*')
            {
                last.description = Some(trimmed.to_string());
            }
        }
    }

    endpoints
}
