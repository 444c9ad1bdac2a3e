//! Conflict detection between the documentation and code indexes
//!
//! Three independent passes, concatenated in a fixed order:
//! 1. code APIs absent from the docs (missing_in_docs)
//! 2. documented APIs absent from the code (missing_in_code)
//! 3. structural comparison of APIs present in both (signature_mismatch)
//!
//! The whole detector is a deterministic pure function of the two indexes;
//! it performs no I/O.

use super::{Conflict, ConflictType, Severity};
use crate::extract::{ApiEntry, ApiIndex};
use similar::TextDiff;

/// Parameter names at or above this similarity ratio are treated as the
/// same parameter (tolerates near-synonyms like "item" vs "items").
///
/// The ratio is the Ratcliff/Obershelp-style measure computed by
/// `similar::TextDiff::ratio` over characters.
pub const PARAM_NAME_SIMILARITY_THRESHOLD: f32 = 0.8;

/// Normalized similarity ratio between two parameter names, in [0, 1]
pub fn name_similarity(a: &str, b: &str) -> f32 {
    TextDiff::from_chars(a, b).ratio()
}

/// Detects disagreements between a documentation index and a code index
pub struct ConflictDetector<'a> {
    doc_index: &'a ApiIndex,
    code_index: &'a ApiIndex,
    similarity_threshold: f32,
}

impl<'a> ConflictDetector<'a> {
    /// Create a detector over the two indexes with the default
    /// similarity tolerance
    pub fn new(doc_index: &'a ApiIndex, code_index: &'a ApiIndex) -> Self {
        Self {
            doc_index,
            code_index,
            similarity_threshold: PARAM_NAME_SIMILARITY_THRESHOLD,
        }
    }

    /// Override the parameter-name similarity tolerance
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Run all three detection passes and concatenate their output.
    ///
    /// Within each pass, output follows the insertion order of the index
    /// being iterated, so identical input yields identical output.
    pub fn detect_all_conflicts(&self) -> Vec<Conflict> {
        let mut conflicts = self.detect_missing_in_docs();
        conflicts.extend(self.detect_missing_in_code());
        conflicts.extend(self.detect_signature_mismatches());
        conflicts
    }

    /// Every code API absent from the documentation index.
    ///
    /// Internal naming conventions (leading underscore, double underscore)
    /// downgrade the severity: undocumented internals are expected.
    fn detect_missing_in_docs(&self) -> Vec<Conflict> {
        self.code_index
            .iter()
            .filter(|(name, _)| !self.doc_index.contains_key(*name))
            .map(|(name, entry)| {
                let severity = if is_internal_name(name) {
                    Severity::Low
                } else {
                    Severity::Medium
                };
                Conflict::new(
                    ConflictType::MissingInDocs,
                    severity,
                    name,
                    &format!("'{}' exists in code but is not documented", name),
                    &format!("add documentation for '{}'", entry.signature()),
                )
                .with_code_info(entry)
            })
            .collect()
    }

    /// Every documented API absent from the code index.
    ///
    /// Documentation for a nonexistent API is the most actively misleading
    /// class of drift, so every hit is high severity.
    fn detect_missing_in_code(&self) -> Vec<Conflict> {
        self.doc_index
            .iter()
            .filter(|(name, _)| !self.code_index.contains_key(*name))
            .map(|(name, entry)| {
                Conflict::new(
                    ConflictType::MissingInCode,
                    Severity::High,
                    name,
                    &format!("'{}' is documented but does not exist in code", name),
                    "remove or correct the stale documentation",
                )
                .with_docs_info(entry)
            })
            .collect()
    }

    /// Structural comparison for APIs present in both indexes
    fn detect_signature_mismatches(&self) -> Vec<Conflict> {
        self.code_index
            .iter()
            .filter_map(|(name, code_entry)| {
                let doc_entry = self.doc_index.get(name)?;
                self.compare_signatures(name, doc_entry, code_entry)
            })
            .collect()
    }

    /// Ordered comparison rules; the first rule that fires wins.
    ///
    /// A parameter-count mismatch always suppresses name/type reports for
    /// the same API: positional comparison of differently-sized lists
    /// would only produce noise.
    fn compare_signatures(
        &self,
        name: &str,
        doc_entry: &ApiEntry,
        code_entry: &ApiEntry,
    ) -> Option<Conflict> {
        let doc_params = &doc_entry.parameters;
        let code_params = &code_entry.parameters;

        if doc_params.len() != code_params.len() {
            return Some(
                self.mismatch(
                    name,
                    Severity::Medium,
                    &format!(
                        "documentation lists {} parameter(s) but code defines {}",
                        doc_params.len(),
                        code_params.len()
                    ),
                    doc_entry,
                    code_entry,
                ),
            );
        }

        for (position, (doc_param, code_param)) in
            doc_params.iter().zip(code_params.iter()).enumerate()
        {
            if doc_param.name == code_param.name {
                continue;
            }
            let similarity = name_similarity(&doc_param.name, &code_param.name);
            if similarity < self.similarity_threshold {
                return Some(self.mismatch(
                    name,
                    Severity::Medium,
                    &format!(
                        "parameter {} is named '{}' in documentation but '{}' in code (similarity {:.2})",
                        position + 1,
                        doc_param.name,
                        code_param.name,
                        similarity
                    ),
                    doc_entry,
                    code_entry,
                ));
            }
        }

        for (doc_param, code_param) in doc_params.iter().zip(code_params.iter()) {
            if let (Some(doc_type), Some(code_type)) =
                (doc_param.type_name.as_deref(), code_param.type_name.as_deref())
            {
                if doc_type.trim() != code_type.trim() {
                    return Some(self.mismatch(
                        name,
                        Severity::Low,
                        &format!(
                            "parameter '{}' is typed '{}' in documentation but '{}' in code",
                            code_param.name, doc_type, code_type
                        ),
                        doc_entry,
                        code_entry,
                    ));
                }
            }
        }

        if let (Some(doc_ret), Some(code_ret)) =
            (doc_entry.return_type.as_deref(), code_entry.return_type.as_deref())
        {
            if doc_ret.trim() != code_ret.trim() {
                return Some(self.mismatch(
                    name,
                    Severity::Low,
                    &format!(
                        "return type is '{}' in documentation but '{}' in code",
                        doc_ret, code_ret
                    ),
                    doc_entry,
                    code_entry,
                ));
            }
        }

        None
    }

    fn mismatch(
        &self,
        name: &str,
        severity: Severity,
        difference: &str,
        doc_entry: &ApiEntry,
        code_entry: &ApiEntry,
    ) -> Conflict {
        Conflict::new(
            ConflictType::SignatureMismatch,
            severity,
            name,
            difference,
            &format!(
                "update the documented signature to '{}'",
                code_entry.signature()
            ),
        )
        .with_docs_info(doc_entry)
        .with_code_info(code_entry)
    }
}

/// Internal naming convention: leading underscore or embedded dunder
fn is_internal_name(name: &str) -> bool {
    name.starts_with('_') || name.contains("__")
}
