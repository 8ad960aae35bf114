//! C# detector.
//!
//! Endpoint rules target ASP.NET Core attributes: `[HttpGet("/path")]` and
//! bare `[HttpGet]` combined with a preceding `[Route("/path")]`. Attribute
//! lines arm the pending state; the next method declaration consumes it.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use super::{extension, split_top_level, LanguageDetector, RouteState};
use crate::model::{Endpoint, FunctionSignature, Language, ParameterSpec, ReturnSpec, Visibility};

lazy_static! {
    /// [HttpGet("/users")] or [HttpGet]
    static ref HTTP_ATTR: Regex =
        Regex::new(r#"\[Http(Get|Post|Put|Delete|Patch)(?:\(\s*"([^"]+)"\s*\))?\]"#).unwrap();
    /// [Route("/users")]
    static ref ROUTE_ATTR: Regex = Regex::new(r#"\[Route\(\s*"([^"]+)"\s*\)\]"#).unwrap();
    /// public async Task<User> Create(User user)
    static ref METHOD_DECL: Regex = Regex::new(
        r"^\s*(public|private|protected|internal)\s+((?:static|async|virtual|override|sealed|partial)\s+)*([\w<>\[\],.? ]+?)\s+([A-Za-z_]\w*)\s*\((.*?)\)"
    )
    .unwrap();
}

pub struct CsharpDetector;

impl LanguageDetector for CsharpDetector {
    fn language(&self) -> Language {
        Language::Csharp
    }

    fn detect(&self, path: &Path) -> bool {
        extension(path) == "cs"
    }

    fn extract_endpoints(&self, path: &Path, content: &str) -> Vec<Endpoint> {
        let file = path.to_string_lossy().to_string();
        let mut endpoints = Vec::new();
        let mut state = RouteState::default();
        // Most recent [Route] attribute; used when an Http verb attribute
        // carries no path of its own.
        let mut route_prefix: Option<String> = None;

        for (idx, line) in content.lines().enumerate() {
            let line_number = idx + 1;

            if let Some(caps) = ROUTE_ATTR.captures(line) {
                route_prefix = Some(caps[1].to_string());
                continue;
            }
            if let Some(caps) = HTTP_ATTR.captures(line) {
                let path = caps
                    .get(2)
                    .map(|m| m.as_str().to_string())
                    .or_else(|| route_prefix.clone())
                    .unwrap_or_else(|| "/".to_string());
                state.arm(vec![(caps[1].to_uppercase(), path)], line_number);
                continue;
            }
            if let Some(caps) = METHOD_DECL.captures(line) {
                if let Some((routes, armed_line)) = state.take() {
                    for (method, route_path) in routes {
                        endpoints.push(Endpoint {
                            method,
                            path: route_path,
                            handler: caps[4].to_string(),
                            description: None,
                            file: file.clone(),
                            line: armed_line,
                            language: Some(Language::Csharp),
                        });
                    }
                }
            }
        }

        endpoints
    }

    fn extract_functions(&self, path: &Path, content: &str) -> Vec<FunctionSignature> {
        let file = path.to_string_lossy().to_string();
        let mut functions = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let Some(caps) = METHOD_DECL.captures(line) else {
                continue;
            };
            let visibility = match &caps[1] {
                "public" => Visibility::Public,
                "protected" => Visibility::Protected,
                "internal" => Visibility::Package,
                _ => Visibility::Private,
            };
            let return_type = caps[3].trim().to_string();
            let returns = if return_type == "void" || return_type == "Task" {
                Vec::new()
            } else {
                vec![ReturnSpec { type_: return_type }]
            };

            functions.push(FunctionSignature {
                name: caps[4].to_string(),
                parameters: parse_params(&caps[5]),
                returns,
                file: file.clone(),
                line: idx + 1,
                visibility,
            });
        }

        functions
    }
}

/// Parse `Dictionary<string, User> users, int count` into name/type pairs.
fn parse_params(text: &str) -> Vec<ParameterSpec> {
    split_top_level(text)
        .iter()
        .map(|piece| {
            let without_default = piece.split('=').next().unwrap_or(piece).trim();
            match without_default.rsplit_once(' ') {
                Some((type_, name)) => ParameterSpec {
                    name: name.trim().to_string(),
                    type_: type_.trim().to_string(),
                },
                None => ParameterSpec {
                    name: String::new(),
                    type_: without_default.to_string(),
                },
            }
        })
        .collect()
}
