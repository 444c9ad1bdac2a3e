//! Conflict model and detection
//!
//! A Conflict is a detected, severity-tagged disagreement between the
//! documentation view and the code view of one API: existence on only one
//! side, or a structural mismatch between the two signatures.

mod detector;

pub use detector::{name_similarity, ConflictDetector, PARAM_NAME_SIMILARITY_THRESHOLD};

use crate::extract::ApiEntry;
use serde::{Deserialize, Serialize};

/// Severity of a conflict.
///
/// Variants are declared in ascending order so the derived `Ord` matches
/// the domain order (Low < Medium < High).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

impl Severity {
    /// All severities, ascending
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];
}

/// Kind of disagreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    MissingInDocs,
    MissingInCode,
    SignatureMismatch,
    DescriptionMismatch,
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictType::MissingInDocs => write!(f, "missing_in_docs"),
            ConflictType::MissingInCode => write!(f, "missing_in_code"),
            ConflictType::SignatureMismatch => write!(f, "signature_mismatch"),
            ConflictType::DescriptionMismatch => write!(f, "description_mismatch"),
        }
    }
}

impl ConflictType {
    /// All conflict types
    pub const ALL: [ConflictType; 4] = [
        ConflictType::MissingInDocs,
        ConflictType::MissingInCode,
        ConflictType::SignatureMismatch,
        ConflictType::DescriptionMismatch,
    ];
}

/// A detected disagreement between the documentation and code views of one API.
///
/// Invariant: `Missing*` conflicts carry exactly one of docs_info/code_info;
/// `SignatureMismatch` carries both. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    /// Kind of disagreement
    #[serde(rename = "type")]
    pub kind: ConflictType,
    /// Severity, ordered Low < Medium < High
    pub severity: Severity,
    /// Name of the API the conflict concerns
    pub api_name: String,
    /// Documentation-side entry, when that side exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_info: Option<ApiEntry>,
    /// Code-side entry, when that side exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_info: Option<ApiEntry>,
    /// Human-readable explanation of the difference
    pub difference: String,
    /// Suggested remediation
    pub suggestion: String,
}

impl Conflict {
    /// Create a new conflict with neither side attached
    pub fn new(
        kind: ConflictType,
        severity: Severity,
        api_name: &str,
        difference: &str,
        suggestion: &str,
    ) -> Self {
        Self {
            kind,
            severity,
            api_name: api_name.to_string(),
            docs_info: None,
            code_info: None,
            difference: difference.to_string(),
            suggestion: suggestion.to_string(),
        }
    }

    /// Attach the documentation-side entry
    pub fn with_docs_info(mut self, entry: &ApiEntry) -> Self {
        self.docs_info = Some(entry.clone());
        self
    }

    /// Attach the code-side entry
    pub fn with_code_info(mut self, entry: &ApiEntry) -> Self {
        self.code_info = Some(entry.clone());
        self
    }
}
