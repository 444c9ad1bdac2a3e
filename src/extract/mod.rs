//! API fact extraction module
//!
//! This module handles extracting API-level facts from:
//! - Documentation text (signature-shaped pattern matching, noisy)
//! - Code-analysis records (already structured, authoritative)

pub mod code;
pub mod doc;

pub use code::build_code_index;
pub use doc::DocApiExtractor;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Name-keyed API index, rebuilt wholesale on each extraction pass.
///
/// Insertion order is preserved, so downstream passes iterate
/// deterministically on identical input.
pub type ApiIndex = IndexMap<String, ApiEntry>;

/// Compute a stable fingerprint for source content
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Kind of API surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKind {
    Function,
    Method,
    Class,
}

impl std::fmt::Display for ApiKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiKind::Function => write!(f, "function"),
            ApiKind::Method => write!(f, "method"),
            ApiKind::Class => write!(f, "class"),
        }
    }
}

/// A single parameter of a callable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Declared type, when the source specifies one
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Default value, when the source specifies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Parameter {
    /// Create a parameter with just a name
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: None,
            default: None,
        }
    }

    /// Render the parameter as it would appear in a signature
    pub fn render(&self) -> String {
        let mut out = self.name.clone();
        if let Some(ref ty) = self.type_name {
            out.push_str(": ");
            out.push_str(ty);
        }
        if let Some(ref default) = self.default {
            out.push_str(" = ");
            out.push_str(default);
        }
        out
    }
}

/// A named callable surface (function, method, or class) extracted from one source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEntry {
    /// Unique key within one index; dotted for methods (e.g. "ClassName.method")
    pub name: String,
    /// Kind of surface
    pub kind: ApiKind,
    /// Ordered parameter list
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Declared return type, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    /// Docstring or surrounding description, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    /// File path or documentation URL this entry came from
    pub source: String,
    /// Verbatim matched signature text (doc index only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_signature: Option<String>,
    /// Which extraction template produced the entry (doc index only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_template: Option<String>,
    /// Base classes (class entries only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_classes: Vec<String>,
    /// Whether the callable is async
    #[serde(default)]
    pub is_async: bool,
}

impl ApiEntry {
    /// Create a new entry with empty parameter list
    pub fn new(name: &str, kind: ApiKind, source: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            parameters: Vec::new(),
            return_type: None,
            docstring: None,
            source: source.to_string(),
            raw_signature: None,
            matched_template: None,
            base_classes: Vec::new(),
            is_async: false,
        }
    }

    /// Render a canonical signature string for this entry
    pub fn signature(&self) -> String {
        if self.kind == ApiKind::Class {
            return if self.base_classes.is_empty() {
                format!("class {}", self.name)
            } else {
                format!("class {}({})", self.name, self.base_classes.join(", "))
            };
        }

        let params: Vec<String> = self.parameters.iter().map(Parameter::render).collect();
        let mut sig = format!("{}({})", self.name, params.join(", "));
        if let Some(ref ret) = self.return_type {
            sig.push_str(" -> ");
            sig.push_str(ret);
        }
        if self.is_async {
            sig.insert_str(0, "async ");
        }
        sig
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_rendering() {
        let mut entry = ApiEntry::new("fetch", ApiKind::Function, "docs/api.md");
        entry.parameters = vec![
            Parameter::named("url"),
            Parameter {
                name: "timeout".to_string(),
                type_name: Some("int".to_string()),
                default: Some("30".to_string()),
            },
        ];
        entry.return_type = Some("Response".to_string());

        assert_eq!(
            entry.signature(),
            "fetch(url, timeout: int = 30) -> Response"
        );

        entry.is_async = true;
        assert!(entry.signature().starts_with("async fetch("));
    }

    #[test]
    fn test_class_signature_rendering() {
        let mut entry = ApiEntry::new("Client", ApiKind::Class, "client.py");
        assert_eq!(entry.signature(), "class Client");

        entry.base_classes = vec!["BaseClient".to_string()];
        assert_eq!(entry.signature(), "class Client(BaseClient)");
    }

    #[test]
    fn test_content_hash_stability() {
        assert_eq!(content_hash("abc"), content_hash("abc"));
        assert_ne!(content_hash("abc"), content_hash("abd"));
    }
}
