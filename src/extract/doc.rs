//! Documentation API extraction using signature-shaped pattern templates
//!
//! Scans free-text documentation pages for anything that looks like a
//! callable signature and emits candidate API entries. Matches are not
//! verified to sit inside code samples; false positives are tolerated
//! downstream because the code index always takes precedence.

use super::{content_hash, ApiEntry, ApiIndex, ApiKind, Parameter};
use crate::error::ReconcileError;
use crate::input::DocPage;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `def`-style definition, optionally async, with optional return annotation
static DEFINITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(async\s+)?def\s+([A-Za-z_][\w.]*)\s*\(([^()]*)\)(?:\s*->\s*([A-Za-z_][\w.\[\]]*))?")
        .expect("invalid definition pattern")
});

/// Return-type-leading declaration (`ResultType name(params)`)
static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z_][\w.\[\]]*)\s+([A-Za-z_]\w*)\s*\(([^()]*)\)")
        .expect("invalid declaration pattern")
});

/// Dotted method-call style (`receiver.method(args)`)
static METHOD_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z_]\w*(?:\.[A-Za-z_]\w*)+)\s*\(([^()]*)\)")
        .expect("invalid method-call pattern")
});

/// Leading tokens that disqualify a declaration-style match
const DECLARATION_KEYWORDS: &[&str] = &[
    "def", "async", "return", "await", "if", "elif", "while", "for", "class", "new", "not", "in",
    "and", "or", "assert", "raise", "import", "print",
];

/// Extracts candidate API entries from documentation text
pub struct DocApiExtractor;

impl DocApiExtractor {
    /// Create a new doc extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract candidate APIs from a collection of pages into one index.
    ///
    /// Name collisions across pages follow the same confidence policy as
    /// collisions within a page.
    pub fn extract_pages(&self, pages: &[DocPage]) -> ApiIndex {
        let mut index = ApiIndex::new();
        for page in pages {
            let source = page.source_id();
            self.extract_into(&page.content, &source, &mut index);
        }
        index
    }

    /// Extract candidate APIs from a single page
    pub fn extract_page(&self, content: &str, source: &str) -> ApiIndex {
        let mut index = ApiIndex::new();
        self.extract_into(content, source, &mut index);
        index
    }

    fn extract_into(&self, content: &str, source: &str, index: &mut ApiIndex) {
        debug!(
            source = source,
            fingerprint = %content_hash(content),
            "extracting candidate APIs from page"
        );

        for caps in DEFINITION_RE.captures_iter(content) {
            let name = caps.get(2).map_or("", |m| m.as_str());
            let params = caps.get(3).map_or("", |m| m.as_str());
            let mut entry = match self.build_entry(name, params, source, "definition") {
                Some(e) => e,
                None => continue,
            };
            entry.is_async = caps.get(1).is_some();
            entry.return_type = caps.get(4).map(|m| m.as_str().to_string());
            entry.raw_signature = Some(caps.get(0).map_or("", |m| m.as_str()).trim().to_string());
            insert_candidate(index, entry);
        }

        for caps in DECLARATION_RE.captures_iter(content) {
            let leading = caps.get(1).map_or("", |m| m.as_str());
            if DECLARATION_KEYWORDS.contains(&leading) {
                continue;
            }
            let name = caps.get(2).map_or("", |m| m.as_str());
            let params = caps.get(3).map_or("", |m| m.as_str());
            let mut entry = match self.build_entry(name, params, source, "declaration") {
                Some(e) => e,
                None => continue,
            };
            entry.return_type = Some(leading.to_string());
            entry.raw_signature = Some(caps.get(0).map_or("", |m| m.as_str()).trim().to_string());
            insert_candidate(index, entry);
        }

        for caps in METHOD_CALL_RE.captures_iter(content) {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let params = caps.get(2).map_or("", |m| m.as_str());
            let mut entry = match self.build_entry(name, params, source, "method_call") {
                Some(e) => e,
                None => continue,
            };
            entry.raw_signature = Some(caps.get(0).map_or("", |m| m.as_str()).trim().to_string());
            insert_candidate(index, entry);
        }
    }

    /// Build an entry from a matched name and raw parameter list.
    ///
    /// A malformed match is skipped; the page is never aborted.
    fn build_entry(
        &self,
        name: &str,
        raw_params: &str,
        source: &str,
        template: &str,
    ) -> Option<ApiEntry> {
        if name.is_empty() {
            return None;
        }

        let kind = if name.contains('.') {
            ApiKind::Method
        } else {
            ApiKind::Function
        };

        let mut entry = ApiEntry::new(name, kind, source);
        entry.matched_template = Some(template.to_string());

        for token in split_top_level_commas(raw_params) {
            match parse_parameter(&token) {
                Some(param) => entry.parameters.push(param),
                None => {
                    let err = ReconcileError::MalformedSourceRecord {
                        source_id: source.to_string(),
                        detail: format!("candidate '{}' has unparseable parameter '{}'", name, token),
                    };
                    debug!(%err, "skipping candidate");
                    return None;
                }
            }
        }

        Some(entry)
    }
}

impl Default for DocApiExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Confidence rank a template name carries
fn template_confidence(template: &str) -> u8 {
    match template {
        "definition" => 3,
        "declaration" => 2,
        _ => 1,
    }
}

/// Insert a candidate, keeping the higher-confidence entry on name collision.
///
/// Equal confidence keeps the earlier match.
fn insert_candidate(index: &mut ApiIndex, entry: ApiEntry) {
    let confidence = entry
        .matched_template
        .as_deref()
        .map(template_confidence)
        .unwrap_or(0);
    if let Some(existing) = index.get(&entry.name) {
        let existing_confidence = existing
            .matched_template
            .as_deref()
            .map(template_confidence)
            .unwrap_or(0);
        if existing_confidence >= confidence {
            return;
        }
    }
    index.insert(entry.name.clone(), entry);
}

/// Split a raw parameter list on top-level commas.
///
/// Commas nested inside brackets (`Dict[str, int]`) do not split.
fn split_top_level_commas(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();

    for ch in raw.chars() {
        match ch {
            '[' | '{' | '<' | '(' => {
                depth += 1;
                current.push(ch);
            }
            ']' | '}' | '>' | ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                tokens.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    let last = current.trim();
    if !last.is_empty() {
        tokens.push(last.to_string());
    }

    tokens.into_iter().filter(|t| !t.is_empty()).collect()
}

/// Parse one parameter token into name / type / default.
///
/// The token splits on `=` (default value) and then `:` (type annotation).
/// Returns None when the remaining name is not identifier-shaped.
fn parse_parameter(token: &str) -> Option<Parameter> {
    let (head, default) = match token.split_once('=') {
        Some((head, default)) => (head.trim(), Some(default.trim().to_string())),
        None => (token.trim(), None),
    };

    let (name, type_name) = match head.split_once(':') {
        Some((name, ty)) => (name.trim(), Some(ty.trim().to_string())),
        None => (head, None),
    };

    let name = name.trim_start_matches('*').trim();
    if name.is_empty() || !is_identifier(name) {
        return None;
    }

    Some(Parameter {
        name: name.to_string(),
        type_name: type_name.filter(|t| !t.is_empty()),
        default: default.filter(|d| !d.is_empty()),
    })
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
