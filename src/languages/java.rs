//! Java detector.
//!
//! Endpoint rules target Spring annotations: the `@GetMapping` family and
//! `@RequestMapping` with an explicit method. An annotation line arms the
//! pending state and the next method declaration consumes it.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use super::{extension, split_top_level, LanguageDetector, RouteState};
use crate::model::{Endpoint, FunctionSignature, Language, ParameterSpec, ReturnSpec, Visibility};

lazy_static! {
    /// @GetMapping("/users") or @PostMapping(value = "/users")
    static ref VERB_MAPPING: Regex =
        Regex::new(r#"@(Get|Post|Put|Delete|Patch)Mapping\(\s*(?:value\s*=\s*)?"([^"]+)""#)
            .unwrap();
    /// @RequestMapping(value = "/users", method = RequestMethod.POST)
    static ref REQUEST_MAPPING_METHOD: Regex = Regex::new(
        r#"@RequestMapping\([^)]*value\s*=\s*"([^"]+)"[^)]*method\s*=\s*RequestMethod\.(\w+)"#
    )
    .unwrap();
    /// @RequestMapping("/users") with no method defaults to GET
    static ref REQUEST_MAPPING_PLAIN: Regex =
        Regex::new(r#"@RequestMapping\(\s*"([^"]+)"\s*\)"#).unwrap();
    /// public Map<String, User> listUsers(int page) throws IOException {
    static ref METHOD_DECL: Regex = Regex::new(
        r"^\s*(public|private|protected)?\s*((?:static|final|abstract|synchronized|default)\s+)*([\w<>\[\],.? ]+?)\s+([a-zA-Z_]\w*)\s*\((.*?)\)\s*(?:throws\s+[\w.,\s]+)?\s*\{"
    )
    .unwrap();
}

/// Tokens that rule out a method-declaration match (control flow, calls).
const NON_DECL_KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "switch", "catch", "return", "new", "throw",
];

pub struct JavaDetector;

impl LanguageDetector for JavaDetector {
    fn language(&self) -> Language {
        Language::Java
    }

    fn detect(&self, path: &Path) -> bool {
        extension(path) == "java"
    }

    fn extract_endpoints(&self, path: &Path, content: &str) -> Vec<Endpoint> {
        let file = path.to_string_lossy().to_string();
        let mut endpoints = Vec::new();
        let mut state = RouteState::default();

        for (idx, line) in content.lines().enumerate() {
            let line_number = idx + 1;

            if let Some(caps) = VERB_MAPPING.captures(line) {
                state.arm(
                    vec![(caps[1].to_uppercase(), caps[2].to_string())],
                    line_number,
                );
                continue;
            }
            if let Some(caps) = REQUEST_MAPPING_METHOD.captures(line) {
                state.arm(
                    vec![(caps[2].to_uppercase(), caps[1].to_string())],
                    line_number,
                );
                continue;
            }
            if let Some(caps) = REQUEST_MAPPING_PLAIN.captures(line) {
                state.arm(vec![("GET".to_string(), caps[1].to_string())], line_number);
                continue;
            }
            if let Some(decl) = match_declaration(line) {
                if let Some((routes, armed_line)) = state.take() {
                    for (method, route_path) in routes {
                        endpoints.push(Endpoint {
                            method,
                            path: route_path,
                            handler: decl.name.clone(),
                            description: None,
                            file: file.clone(),
                            line: armed_line,
                            language: Some(Language::Java),
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
            let Some(decl) = match_declaration(line) else {
                continue;
            };
            functions.push(FunctionSignature {
                name: decl.name,
                parameters: decl.parameters,
                returns: decl.returns,
                file: file.clone(),
                line: idx + 1,
                visibility: decl.visibility,
            });
        }

        functions
    }
}

struct Declaration {
    name: String,
    parameters: Vec<ParameterSpec>,
    returns: Vec<ReturnSpec>,
    visibility: Visibility,
}

fn match_declaration(line: &str) -> Option<Declaration> {
    let caps = METHOD_DECL.captures(line)?;
    let return_type = caps[3].trim().to_string();
    let name = caps[4].to_string();

    // `return foo(x) {` style false positives carry a keyword where the
    // return type should be.
    let first_type_token = return_type.split_whitespace().next().unwrap_or("");
    if NON_DECL_KEYWORDS.contains(&first_type_token) || NON_DECL_KEYWORDS.contains(&name.as_str()) {
        return None;
    }

    let visibility = match caps.get(1).map(|m| m.as_str()) {
        Some("public") => Visibility::Public,
        Some("private") => Visibility::Private,
        Some("protected") => Visibility::Protected,
        _ => Visibility::Package,
    };

    let returns = if return_type == "void" {
        Vec::new()
    } else {
        vec![ReturnSpec { type_: return_type }]
    };

    Some(Declaration {
        name,
        parameters: parse_params(&caps[5]),
        returns,
        visibility,
    })
}

/// Parse `Map<String, User> users, int count` into name/type pairs:
/// the last token is the name, everything before it the type.
fn parse_params(text: &str) -> Vec<ParameterSpec> {
    split_top_level(text)
        .iter()
        .map(|piece| {
            let piece = piece.trim_start_matches("final ").trim();
            match piece.rsplit_once(' ') {
                Some((type_, name)) => ParameterSpec {
                    name: name.trim().to_string(),
                    type_: type_.trim().to_string(),
                },
                None => ParameterSpec {
                    name: String::new(),
                    type_: piece.to_string(),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_mapping_pairs_with_method() {
        let content = r#"
    @GetMapping("/api/users")
    public List<User> listUsers(int page) {
        return null;
    }

    @RequestMapping(value = "/api/users", method = RequestMethod.POST)
    public User create(User user) {
    }
"#;
        let endpoints = JavaDetector.extract_endpoints(Path::new("UserController.java"), content);
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].method, "GET");
        assert_eq!(endpoints[0].path, "/api/users");
        assert_eq!(endpoints[0].handler, "listUsers");
        assert_eq!(endpoints[1].method, "POST");
        assert_eq!(endpoints[1].handler, "create");
    }

    #[test]
    fn test_extract_functions_with_generics() {
        let content = r#"
    public Map<String, User> index(Map<String, String> filters, int limit) {
    }
    void helper() {
    }
"#;
        let functions = JavaDetector.extract_functions(Path::new("Service.java"), content);
        assert_eq!(functions.len(), 2);

        let index = &functions[0];
        assert_eq!(index.name, "index");
        assert_eq!(index.visibility, Visibility::Public);
        assert_eq!(index.parameters.len(), 2);
        assert_eq!(index.parameters[0].name, "filters");
        assert_eq!(index.parameters[0].type_, "Map<String, String>");
        assert_eq!(index.returns[0].type_, "Map<String, User>");

        let helper = &functions[1];
        assert_eq!(helper.visibility, Visibility::Package);
        assert!(helper.returns.is_empty());
    }

    #[test]
    fn test_control_flow_is_not_a_declaration() {
        let content = r#"
        if (user.isActive()) {
        return build(x) {
        while (running) {
"#;
        let functions = JavaDetector.extract_functions(Path::new("Service.java"), content);
        assert!(functions.is_empty());
    }
}
