//! Merged output contract
//!
//! One MergeResult per reconciliation run: a record per distinct API name
//! seen in either index, plus rollup statistics. This is the sole contract
//! consumed by downstream rendering.

mod merger;

pub use merger::{SourceMerger, DOC_EXCERPT_MAX_CHARS};

use crate::conflict::{Conflict, ConflictType, Severity};
use crate::input::GithubMetadata;
use crate::issues::{Issue, LabelCount};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reconciliation status of one API name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStatus {
    /// Present in both indexes, no conflict detected
    Matched,
    /// Present in both indexes with a detected conflict
    Conflict,
    /// Only the documentation claims this API
    DocsOnly,
    /// Exists in code but is undocumented
    CodeOnly,
}

impl std::fmt::Display for MergeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeStatus::Matched => write!(f, "matched"),
            MergeStatus::Conflict => write!(f, "conflict"),
            MergeStatus::DocsOnly => write!(f, "docs_only"),
            MergeStatus::CodeOnly => write!(f, "code_only"),
        }
    }
}

/// The authoritative per-API record produced by the merger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedApiRecord {
    pub name: String,
    pub status: MergeStatus,
    /// Precedence-resolved signature (code over docs)
    pub merged_signature: String,
    /// Precedence-resolved description (code over docs)
    pub merged_description: String,
    /// Explanation of the conflict, when status is Conflict
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Back-reference to the originating conflict; its docs_info and
    /// code_info retain both sides verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict: Option<Conflict>,
    /// Source of the winning side
    pub source: String,
    /// Issues linked to this API; absent entirely when nothing linked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_links: Option<Vec<Issue>>,
}

/// Counts by status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    pub total: usize,
    pub matched: usize,
    pub conflicts: usize,
    pub docs_only: usize,
    pub code_only: usize,
}

/// Counts by conflict type and by severity.
///
/// Every type and severity key is present, zero or not, so the rollup
/// shape is stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictSummary {
    pub total: usize,
    pub by_type: IndexMap<ConflictType, usize>,
    pub by_severity: IndexMap<Severity, usize>,
}

impl ConflictSummary {
    /// Aggregate a conflict list
    pub fn from_conflicts(conflicts: &[Conflict]) -> Self {
        let mut by_type: IndexMap<ConflictType, usize> =
            ConflictType::ALL.iter().map(|t| (*t, 0)).collect();
        let mut by_severity: IndexMap<Severity, usize> =
            Severity::ALL.iter().map(|s| (*s, 0)).collect();

        for conflict in conflicts {
            *by_type.entry(conflict.kind).or_insert(0) += 1;
            *by_severity.entry(conflict.severity).or_insert(0) += 1;
        }

        Self {
            total: conflicts.len(),
            by_type,
            by_severity,
        }
    }
}

/// GitHub context attached to the result when an insights layer was supplied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubContext {
    /// Leading excerpt of the repository documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_excerpt: Option<String>,
    pub metadata: GithubMetadata,
    pub top_labels: Vec<LabelCount>,
}

/// The single output contract of a reconciliation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeResult {
    pub apis: IndexMap<String, MergedApiRecord>,
    pub summary: MergeSummary,
    /// Absent (not empty) when no GitHub layer was supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_context: Option<GithubContext>,
    pub conflict_summary: ConflictSummary,
    pub issue_links: IndexMap<String, Vec<Issue>>,
}
