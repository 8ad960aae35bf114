//! Python detector.
//!
//! Endpoint rules cover Flask `@app.route`, FastAPI verb decorators and
//! Django `path()`/`re_path()` URL tables. Route decorators pair with the
//! `def` on a following line; Django entries carry their view inline.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use super::{extension, split_top_level, LanguageDetector, RouteState};
use crate::model::{Endpoint, FunctionSignature, Language, ParameterSpec, ReturnSpec, Visibility};

lazy_static! {
    /// @app.route("/users", methods=["GET", "POST"])
    static ref FLASK_ROUTE: Regex =
        Regex::new(r#"@\w+\.route\(\s*['"]([^'"]+)['"]"#).unwrap();
    static ref FLASK_METHODS: Regex =
        Regex::new(r"methods\s*=\s*\[([^\]]*)\]").unwrap();
    /// @app.get("/users") (FastAPI, also Flask 2 shortcuts)
    static ref VERB_DECORATOR: Regex =
        Regex::new(r#"@\w+\.(get|post|put|delete|patch|options|head)\(\s*['"]([^'"]+)['"]"#)
            .unwrap();
    /// path("users/", views.index) / re_path(r"^users/$", views.index)
    static ref DJANGO_PATH: Regex =
        Regex::new(r#"\b(?:re_)?path\(\s*r?['"]([^'"]+)['"]\s*,\s*([\w.]+)"#).unwrap();
    /// def create_user(db: Session, user: User) -> User:
    static ref DEF_DECL: Regex =
        Regex::new(r"^\s*(?:async\s+)?def\s+([A-Za-z_]\w*)\s*\((.*?)\)\s*(?:->\s*([^:]+))?:")
            .unwrap();
}

pub struct PythonDetector;

impl LanguageDetector for PythonDetector {
    fn language(&self) -> Language {
        Language::Python
    }

    fn detect(&self, path: &Path) -> bool {
        extension(path) == "py"
    }

    fn extract_endpoints(&self, path: &Path, content: &str) -> Vec<Endpoint> {
        let file = path.to_string_lossy().to_string();
        let mut endpoints = Vec::new();
        let mut state = RouteState::default();

        for (idx, line) in content.lines().enumerate() {
            let line_number = idx + 1;

            if let Some(caps) = FLASK_ROUTE.captures(line) {
                let route_path = caps[1].to_string();
                let methods = FLASK_METHODS
                    .captures(line)
                    .map(|m| parse_method_list(&m[1]))
                    .unwrap_or_else(|| vec!["GET".to_string()]);
                state.arm(
                    methods.into_iter().map(|m| (m, route_path.clone())).collect(),
                    line_number,
                );
                continue;
            }
            if let Some(caps) = VERB_DECORATOR.captures(line) {
                state.arm(
                    vec![(caps[1].to_uppercase(), caps[2].to_string())],
                    line_number,
                );
                continue;
            }
            if let Some(caps) = DJANGO_PATH.captures(line) {
                endpoints.push(Endpoint {
                    method: "GET".to_string(),
                    path: caps[1].to_string(),
                    handler: caps[2].to_string(),
                    description: None,
                    file: file.clone(),
                    line: line_number,
                    language: Some(Language::Python),
                });
                continue;
            }
            if let Some(caps) = DEF_DECL.captures(line) {
                if let Some((routes, armed_line)) = state.take() {
                    for (method, route_path) in routes {
                        endpoints.push(Endpoint {
                            method,
                            path: route_path,
                            handler: caps[1].to_string(),
                            description: None,
                            file: file.clone(),
                            line: armed_line,
                            language: Some(Language::Python),
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
            let Some(caps) = DEF_DECL.captures(line) else {
                continue;
            };
            let name = caps[1].to_string();
            let visibility = if name.starts_with('_') {
                Visibility::Private
            } else {
                Visibility::Public
            };

            let returns = caps
                .get(3)
                .map(|m| m.as_str().trim())
                .filter(|t| !t.is_empty() && *t != "None")
                .map(|t| {
                    vec![ReturnSpec {
                        type_: t.to_string(),
                    }]
                })
                .unwrap_or_default();

            functions.push(FunctionSignature {
                parameters: parse_params(&caps[2]),
                returns,
                file: file.clone(),
                line: idx + 1,
                visibility,
                name,
            });
        }

        functions
    }
}

/// Parse `"GET", 'POST'` out of a Flask methods list.
fn parse_method_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(|m| m.trim().trim_matches(|c| c == '"' || c == '\'').to_uppercase())
        .filter(|m| !m.is_empty())
        .collect()
}

/// Parse `db: Session, user: User = None` into name/type pairs.
fn parse_params(text: &str) -> Vec<ParameterSpec> {
    split_top_level(text)
        .iter()
        .filter(|piece| !piece.starts_with('*'))
        .map(|piece| {
            let without_default = piece.split('=').next().unwrap_or(piece);
            match without_default.split_once(':') {
                Some((name, type_)) => ParameterSpec {
                    name: name.trim().to_string(),
                    type_: type_.trim().to_string(),
                },
                None => ParameterSpec {
                    name: without_default.trim().to_string(),
                    type_: String::new(),
                },
            }
        })
        .collect()
}
