//! JavaScript / TypeScript detector.
//!
//! One detector covers js, jsx, ts, tsx and module variants; Express, Fastify
//! and Koa all register routes with the same `app.get(path, handler)` shape.
//! Function extraction handles declarations, arrow consts and class methods
//! with TypeScript visibility keywords.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use super::{extension, split_top_level, LanguageDetector};
use crate::model::{Endpoint, FunctionSignature, Language, ParameterSpec, ReturnSpec, Visibility};

const EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs"];

lazy_static! {
    /// app.get('/users', listUsers) / router.post("/users", create)
    static ref ROUTE_CALL: Regex = Regex::new(
        r#"\b(?:app|router|server|api|fastify)\.(get|post|put|delete|patch|options|head)\(\s*['"`]([^'"`]+)['"`]\s*,?\s*([\w.]*)"#
    )
    .unwrap();
    /// export async function createUser(user: User): Promise<User> {
    static ref FUNC_DECL: Regex = Regex::new(
        r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s+([A-Za-z_$][\w$]*)\s*\((.*?)\)\s*(?::\s*([^({]+))?"
    )
    .unwrap();
    /// export const createUser = async (user: User): Promise<User> =>
    static ref ARROW_CONST: Regex = Regex::new(
        r"^\s*(?:export\s+)?const\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?\((.*?)\)\s*(?::\s*([^=]+))?=>"
    )
    .unwrap();
    /// private async refresh(token: string): Promise<void> {
    static ref CLASS_METHOD: Regex = Regex::new(
        r"^\s*(public|private|protected)\s+(?:static\s+)?(?:async\s+)?([A-Za-z_$][\w$]*)\s*\((.*?)\)\s*(?::\s*([^({]+))?"
    )
    .unwrap();
}

pub struct JavascriptDetector;

impl LanguageDetector for JavascriptDetector {
    fn language(&self) -> Language {
        Language::Javascript
    }

    fn detect(&self, path: &Path) -> bool {
        EXTENSIONS.contains(&extension(path).as_str())
    }

    fn extract_endpoints(&self, path: &Path, content: &str) -> Vec<Endpoint> {
        let file = path.to_string_lossy().to_string();
        let mut endpoints = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            if let Some(caps) = ROUTE_CALL.captures(line) {
                endpoints.push(Endpoint {
                    method: caps[1].to_uppercase(),
                    path: caps[2].to_string(),
                    handler: caps.get(3).map(|m| m.as_str()).unwrap_or("").to_string(),
                    description: None,
                    file: file.clone(),
                    line: idx + 1,
                    language: Some(Language::Javascript),
                });
            }
        }

        endpoints
    }

    fn extract_functions(&self, path: &Path, content: &str) -> Vec<FunctionSignature> {
        let file = path.to_string_lossy().to_string();
        let mut functions = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let line_number = idx + 1;

            if let Some(caps) = CLASS_METHOD.captures(line) {
                let visibility = match &caps[1] {
                    "private" => Visibility::Private,
                    "protected" => Visibility::Protected,
                    _ => Visibility::Public,
                };
                functions.push(signature(
                    &caps[2],
                    &caps[3],
                    caps.get(4).map(|m| m.as_str()),
                    &file,
                    line_number,
                    visibility,
                ));
                continue;
            }

            let caps = FUNC_DECL
                .captures(line)
                .or_else(|| ARROW_CONST.captures(line));
            if let Some(caps) = caps {
                let name = &caps[1];
                let visibility = if name.starts_with('_') {
                    Visibility::Private
                } else {
                    Visibility::Public
                };
                functions.push(signature(
                    name,
                    &caps[2],
                    caps.get(3).map(|m| m.as_str()),
                    &file,
                    line_number,
                    visibility,
                ));
            }
        }

        functions
    }
}

fn signature(
    name: &str,
    params: &str,
    return_type: Option<&str>,
    file: &str,
    line: usize,
    visibility: Visibility,
) -> FunctionSignature {
    let returns = return_type
        .map(|t| t.trim())
        .filter(|t| !t.is_empty() && *t != "void" && *t != "Promise<void>")
        .map(|t| {
            vec![ReturnSpec {
                type_: t.to_string(),
            }]
        })
        .unwrap_or_default();

    FunctionSignature {
        name: name.to_string(),
        parameters: parse_params(params),
        returns,
        file: file.to_string(),
        line,
        visibility,
    }
}

/// Parse `user: User, opts = {}` into name/type pairs. Destructured object
/// parameters survive as one untyped piece thanks to depth-aware splitting.
fn parse_params(text: &str) -> Vec<ParameterSpec> {
    split_top_level(text)
        .iter()
        .map(|piece| {
            let without_default = piece.split('=').next().unwrap_or(piece).trim();
            match without_default.split_once(':') {
                Some((name, type_)) => ParameterSpec {
                    name: name.trim().trim_end_matches('?').to_string(),
                    type_: type_.trim().to_string(),
                },
                None => ParameterSpec {
                    name: without_default.to_string(),
                    type_: String::new(),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_extensions() {
        for ext in ["js", "jsx", "ts", "tsx", "mjs"] {
            assert!(JavascriptDetector.detect(Path::new(&format!("a.{}", ext))));
        }
        assert!(!JavascriptDetector.detect(Path::new("a.java")));
    }

    #[test]
    fn test_express_routes() {
        let content = r#"
app.get('/api/users', listUsers);
router.post("/api/users", createUser);
app.delete(`/api/users/:id`, removeUser);
"#;
        let endpoints = JavascriptDetector.extract_endpoints(Path::new("routes.js"), content);
        assert_eq!(endpoints.len(), 3);
        assert_eq!(endpoints[0].method, "GET");
        assert_eq!(endpoints[0].handler, "listUsers");
        assert_eq!(endpoints[2].path, "/api/users/:id");
    }

    #[test]
    fn test_function_shapes() {
        let content = r#"
export async function createUser(user: User): Promise<User> {
}
const listUsers = async (page: number, limit: number) => {
}
  private refresh(token: string): Promise<void> {
"#;
        let functions = JavascriptDetector.extract_functions(Path::new("svc.ts"), content);
        assert_eq!(functions.len(), 3);

        assert_eq!(functions[0].name, "createUser");
        assert_eq!(functions[0].parameters[0].name, "user");
        assert_eq!(functions[0].parameters[0].type_, "User");
        assert_eq!(functions[0].returns[0].type_, "Promise<User>");

        assert_eq!(functions[1].name, "listUsers");
        assert_eq!(functions[1].parameters.len(), 2);
        assert_eq!(functions[1].visibility, Visibility::Public);

        assert_eq!(functions[2].name, "refresh");
        assert_eq!(functions[2].visibility, Visibility::Private);
        // void returns are not recorded.
        assert!(functions[2].returns.is_empty());
    }
}
