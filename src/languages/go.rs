//! Go detector.
//!
//! Endpoint rules cover Gin/Echo style uppercase verbs, Chi's capitalized
//! verbs, and net/http / gorilla-mux `HandleFunc` registrations. Function
//! extraction handles plain functions and methods with receivers.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use super::{extension, split_top_level, LanguageDetector};
use crate::model::{Endpoint, FunctionSignature, Language, ParameterSpec, ReturnSpec, Visibility};

lazy_static! {
    /// Gin/Echo: r.GET("/users", handlers.List)
    static ref VERB_UPPER: Regex =
        Regex::new(r#"\b\w+\.(GET|POST|PUT|DELETE|PATCH|OPTIONS|HEAD)\(\s*"([^"]+)"\s*,\s*([\w.]+)"#)
            .unwrap();
    /// Chi: r.Get("/users", listUsers)
    static ref VERB_TITLE: Regex =
        Regex::new(r#"\b\w+\.(Get|Post|Put|Delete|Patch|Options|Head)\(\s*"([^"]+)"\s*,\s*([\w.]+)"#)
            .unwrap();
    /// net/http or gorilla-mux: mux.HandleFunc("/users", list).Methods("POST")
    static ref HANDLE_FUNC: Regex =
        Regex::new(r#"\bHandleFunc\(\s*"([^"]+)"\s*,\s*([\w.]+)\s*\)(?:\.Methods\(\s*"(\w+)"\s*\))?"#)
            .unwrap();
    /// func (s *Server) CreateUser(ctx Context, u *User) (*User, error) {
    static ref FUNC_DECL: Regex =
        Regex::new(r"^func\s+(?:\(\s*\w+\s+\*?[\w.]+\s*\)\s+)?([A-Za-z_]\w*)\s*\((.*?)\)\s*(.*?)\s*\{")
            .unwrap();
}

pub struct GoDetector;

impl LanguageDetector for GoDetector {
    fn language(&self) -> Language {
        Language::Go
    }

    fn detect(&self, path: &Path) -> bool {
        extension(path) == "go"
    }

    fn extract_endpoints(&self, path: &Path, content: &str) -> Vec<Endpoint> {
        let file = path.to_string_lossy().to_string();
        let mut endpoints = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let line_number = idx + 1;

            if let Some(caps) = VERB_UPPER.captures(line) {
                endpoints.push(endpoint(&caps[1], &caps[2], &caps[3], &file, line_number));
                continue;
            }
            if let Some(caps) = VERB_TITLE.captures(line) {
                endpoints.push(endpoint(&caps[1], &caps[2], &caps[3], &file, line_number));
                continue;
            }
            if let Some(caps) = HANDLE_FUNC.captures(line) {
                let method = caps.get(3).map(|m| m.as_str()).unwrap_or("GET");
                endpoints.push(endpoint(method, &caps[1], &caps[2], &file, line_number));
            }
        }

        endpoints
    }

    fn extract_functions(&self, path: &Path, content: &str) -> Vec<FunctionSignature> {
        let file = path.to_string_lossy().to_string();
        let mut functions = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let Some(caps) = FUNC_DECL.captures(line) else {
                continue;
            };
            let name = caps[1].to_string();
            let visibility = if name.starts_with(char::is_uppercase) {
                Visibility::Public
            } else {
                Visibility::Private
            };

            functions.push(FunctionSignature {
                parameters: parse_params(&caps[2]),
                returns: parse_returns(&caps[3]),
                file: file.clone(),
                line: idx + 1,
                visibility,
                name,
            });
        }

        functions
    }
}

fn endpoint(method: &str, path: &str, handler: &str, file: &str, line: usize) -> Endpoint {
    Endpoint {
        method: method.to_uppercase(),
        path: path.to_string(),
        handler: handler.to_string(),
        description: None,
        file: file.to_string(),
        line,
        language: Some(Language::Go),
    }
}

/// Parse `ctx Context, user *User` into name/type pairs.
///
/// A piece with a single token is treated as an unnamed type, which also
/// covers the grouped-parameter shorthand imperfectly; good enough for
/// heuristic comparison.
fn parse_params(text: &str) -> Vec<ParameterSpec> {
    split_top_level(text)
        .iter()
        .map(|piece| {
            let mut tokens = piece.split_whitespace();
            let first = tokens.next().unwrap_or("").to_string();
            let rest: Vec<&str> = tokens.collect();
            if rest.is_empty() {
                ParameterSpec {
                    name: String::new(),
                    type_: first,
                }
            } else {
                ParameterSpec {
                    name: first,
                    type_: rest.join(" "),
                }
            }
        })
        .collect()
}

/// Parse `(*User, error)`, `error`, or nothing into return specs.
fn parse_returns(text: &str) -> Vec<ReturnSpec> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(trimmed);
    split_top_level(inner)
        .iter()
        .map(|piece| {
            // Named returns: "err error" -> keep the type only.
            let type_ = piece.rsplit(' ').next().unwrap_or(piece).to_string();
            ReturnSpec { type_ }
        })
        .collect()
}
