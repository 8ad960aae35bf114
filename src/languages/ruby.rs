//! Ruby detector.
//!
//! Endpoint rules cover Rails route entries (`get '/users', to: 'users#index'`)
//! and Sinatra blocks (`get '/users' do`), both single-line. Method extraction
//! tracks `private`/`protected`/`public` section keywords to assign visibility.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use super::{extension, LanguageDetector};
use crate::model::{Endpoint, FunctionSignature, Language, ParameterSpec, Visibility};

lazy_static! {
    /// get '/users', to: 'users#index'  (Rails)
    /// get '/users' do                  (Sinatra)
    static ref ROUTE_LINE: Regex = Regex::new(
        r#"^\s*(get|post|put|delete|patch|options|head)\s+['"]([^'"]+)['"](?:\s*,\s*to:\s*['"]([^'"]+)['"])?"#
    )
    .unwrap();
    /// def create_user(name, email) / def self.find(id)
    static ref DEF_DECL: Regex =
        Regex::new(r"^\s*def\s+(?:self\.)?([a-z_]\w*[?!=]?)\s*(?:\(([^)]*)\))?").unwrap();
    /// Bare visibility keyword starting a section.
    static ref SECTION_KEYWORD: Regex =
        Regex::new(r"^\s*(private|protected|public)\s*(?:#.*)?$").unwrap();
}

pub struct RubyDetector;

impl LanguageDetector for RubyDetector {
    fn language(&self) -> Language {
        Language::Ruby
    }

    fn detect(&self, path: &Path) -> bool {
        extension(path) == "rb"
    }

    fn extract_endpoints(&self, path: &Path, content: &str) -> Vec<Endpoint> {
        let file = path.to_string_lossy().to_string();
        let mut endpoints = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            if let Some(caps) = ROUTE_LINE.captures(line) {
                endpoints.push(Endpoint {
                    method: caps[1].to_uppercase(),
                    path: caps[2].to_string(),
                    handler: caps.get(3).map(|m| m.as_str()).unwrap_or("").to_string(),
                    description: None,
                    file: file.clone(),
                    line: idx + 1,
                    language: Some(Language::Ruby),
                });
            }
        }

        endpoints
    }

    fn extract_functions(&self, path: &Path, content: &str) -> Vec<FunctionSignature> {
        let file = path.to_string_lossy().to_string();
        let mut functions = Vec::new();
        let mut section = Visibility::Public;

        for (idx, line) in content.lines().enumerate() {
            if let Some(caps) = SECTION_KEYWORD.captures(line) {
                section = match &caps[1] {
                    "private" => Visibility::Private,
                    "protected" => Visibility::Protected,
                    _ => Visibility::Public,
                };
                continue;
            }
            let Some(caps) = DEF_DECL.captures(line) else {
                continue;
            };

            let parameters = caps
                .get(2)
                .map(|m| m.as_str())
                .unwrap_or("")
                .split(',')
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(|p| ParameterSpec {
                    // Strip defaults, keyword-argument colons and splats;
                    // Ruby parameters carry no types.
                    name: p
                        .split('=')
                        .next()
                        .unwrap_or(p)
                        .trim()
                        .trim_start_matches(|c| c == '*' || c == '&')
                        .trim_end_matches(':')
                        .to_string(),
                    type_: String::new(),
                })
                .collect();

            functions.push(FunctionSignature {
                name: caps[1].to_string(),
                parameters,
                returns: Vec::new(),
                file: file.clone(),
                line: idx + 1,
                visibility: section,
            });
        }

        functions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rails_and_sinatra_routes() {
        let content = r#"
Rails.application.routes.draw do
  get '/users', to: 'users#index'
  post '/users', to: 'users#create'
end

get '/health' do
  'ok'
end
"#;
        let endpoints = RubyDetector.extract_endpoints(Path::new("routes.rb"), content);
        assert_eq!(endpoints.len(), 3);
        assert_eq!(endpoints[0].method, "GET");
        assert_eq!(endpoints[0].path, "/users");
        assert_eq!(endpoints[0].handler, "users#index");
        assert_eq!(endpoints[2].path, "/health");
        assert_eq!(endpoints[2].handler, "");
    }

    #[test]
    fn test_visibility_sections() {
        let content = r#"
class UserService
  def create_user(name, email = nil)
  end

  private

  def validate(record)
  end
end
"#;
        let functions = RubyDetector.extract_functions(Path::new("user_service.rb"), content);
        assert_eq!(functions.len(), 2);

        let create = &functions[0];
        assert_eq!(create.name, "create_user");
        assert_eq!(create.visibility, Visibility::Public);
        assert_eq!(create.parameters.len(), 2);
        assert_eq!(create.parameters[1].name, "email");

        let validate = &functions[1];
        assert_eq!(validate.name, "validate");
        assert_eq!(validate.visibility, Visibility::Private);
    }

    #[test]
    fn test_def_without_parens() {
        let functions = RubyDetector.extract_functions(Path::new("a.rb"), "def run\nend\n");
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].name, "run");
        assert!(functions[0].parameters.is_empty());
    }
}
