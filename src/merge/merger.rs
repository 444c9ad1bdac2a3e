//! Source merging under the code-over-docs precedence policy
//!
//! The final reduction step: consumes both indexes, the conflict list, and
//! the optional GitHub layer, and emits the MergeResult. The code index is
//! authoritative; documentation fills in only what the code side lacks.

use super::{
    ConflictSummary, GithubContext, MergeResult, MergeStatus, MergeSummary, MergedApiRecord,
};
use crate::conflict::Conflict;
use crate::error::ReconcileError;
use crate::extract::{ApiEntry, ApiIndex};
use crate::input::GithubLayer;
use crate::issues::{link_issues_to_apis, Issue, MIN_API_KEYWORD_LEN};
use indexmap::IndexMap;
use tracing::warn;

/// Default character cap for the GitHub documentation excerpt
pub const DOC_EXCERPT_MAX_CHARS: usize = 500;

/// Merges the documentation index, code index, conflict list, and optional
/// GitHub layer into one MergeResult
pub struct SourceMerger<'a> {
    doc_index: &'a ApiIndex,
    code_index: &'a ApiIndex,
    conflicts: &'a [Conflict],
    github: Option<&'a GithubLayer>,
    excerpt_max_chars: usize,
    min_keyword_len: usize,
}

impl<'a> SourceMerger<'a> {
    /// Create a merger over already-computed inputs
    pub fn new(
        doc_index: &'a ApiIndex,
        code_index: &'a ApiIndex,
        conflicts: &'a [Conflict],
        github: Option<&'a GithubLayer>,
    ) -> Self {
        Self {
            doc_index,
            code_index,
            conflicts,
            github,
            excerpt_max_chars: DOC_EXCERPT_MAX_CHARS,
            min_keyword_len: MIN_API_KEYWORD_LEN,
        }
    }

    /// Override the documentation excerpt cap
    pub fn with_excerpt_cap(mut self, max_chars: usize) -> Self {
        self.excerpt_max_chars = max_chars;
        self
    }

    /// Override the API keyword length floor used for issue linking
    pub fn with_min_keyword_len(mut self, len: usize) -> Self {
        self.min_keyword_len = len;
        self
    }

    /// Merge everything into the single output contract
    pub fn merge_all(&self) -> MergeResult {
        let live_conflicts = self.live_conflicts();
        let conflict_by_name: IndexMap<&str, &Conflict> = live_conflicts
            .iter()
            .map(|c| (c.api_name.as_str(), *c))
            .collect();

        // Union of names: code-index order first (it is authoritative),
        // then doc-only names in doc-index order.
        let mut names: Vec<String> = self.code_index.keys().cloned().collect();
        names.extend(
            self.doc_index
                .keys()
                .filter(|name| !self.code_index.contains_key(*name))
                .cloned(),
        );

        let issue_links = self.link_issues(&names);

        let mut apis: IndexMap<String, MergedApiRecord> = IndexMap::new();
        let mut summary = MergeSummary::default();

        for name in names {
            let doc_entry = self.doc_index.get(&name);
            let code_entry = self.code_index.get(&name);
            let conflict = conflict_by_name.get(name.as_str()).copied();

            let record = self.merge_one(&name, doc_entry, code_entry, conflict, &issue_links);

            summary.total += 1;
            match record.status {
                MergeStatus::Matched => summary.matched += 1,
                MergeStatus::Conflict => summary.conflicts += 1,
                MergeStatus::DocsOnly => summary.docs_only += 1,
                MergeStatus::CodeOnly => summary.code_only += 1,
            }

            apis.insert(name, record);
        }

        let owned: Vec<Conflict> = live_conflicts.into_iter().cloned().collect();

        MergeResult {
            apis,
            summary,
            github_context: self.github.map(|layer| self.github_context(layer)),
            conflict_summary: ConflictSummary::from_conflicts(&owned),
            issue_links,
        }
    }

    /// Drop conflicts naming an API absent from both live indexes.
    ///
    /// Such a conflict is an invariant violation: it is logged and excluded
    /// from aggregation rather than merged or allowed to crash the run.
    fn live_conflicts(&self) -> Vec<&'a Conflict> {
        self.conflicts
            .iter()
            .filter(|conflict| {
                let known = self.doc_index.contains_key(&conflict.api_name)
                    || self.code_index.contains_key(&conflict.api_name);
                if !known {
                    let err = ReconcileError::InvariantViolation(format!(
                        "{} conflict references '{}', which is absent from both indexes",
                        conflict.kind, conflict.api_name
                    ));
                    warn!(%err, "excluding conflict from aggregation");
                }
                known
            })
            .collect()
    }

    /// Merge one API name under code-over-docs precedence
    fn merge_one(
        &self,
        name: &str,
        doc_entry: Option<&ApiEntry>,
        code_entry: Option<&ApiEntry>,
        conflict: Option<&Conflict>,
        issue_links: &IndexMap<String, Vec<Issue>>,
    ) -> MergedApiRecord {
        let status = match (doc_entry, code_entry) {
            (Some(_), Some(_)) if conflict.is_some() => MergeStatus::Conflict,
            (Some(_), Some(_)) => MergeStatus::Matched,
            (Some(_), None) => MergeStatus::DocsOnly,
            (None, Some(_)) => MergeStatus::CodeOnly,
            (None, None) => unreachable!("name came from the union of both indexes"),
        };

        // Code side wins wherever it exists.
        let winner = code_entry.or(doc_entry).expect("union member");

        let merged_signature = match (code_entry, doc_entry) {
            (Some(code), _) => code.signature(),
            (None, Some(doc)) => doc
                .raw_signature
                .clone()
                .unwrap_or_else(|| doc.signature()),
            (None, None) => unreachable!(),
        };

        let merged_description = code_entry
            .and_then(|e| e.docstring.clone())
            .or_else(|| doc_entry.and_then(|e| e.docstring.clone()))
            .unwrap_or_default();

        let (warning, conflict) = match (status, conflict) {
            (MergeStatus::Conflict, Some(conflict)) => {
                (Some(conflict.difference.clone()), Some(conflict.clone()))
            }
            _ => (None, None),
        };

        MergedApiRecord {
            name: name.to_string(),
            status,
            merged_signature,
            merged_description,
            warning,
            conflict,
            source: winner.source.clone(),
            issue_links: issue_links.get(name).cloned(),
        }
    }

    /// Issue links from the GitHub layer's issue pool, when one was supplied
    fn link_issues(&self, names: &[String]) -> IndexMap<String, Vec<Issue>> {
        match self.github {
            Some(layer) => link_issues_to_apis(&layer.issues(), names, self.min_keyword_len),
            None => IndexMap::new(),
        }
    }

    fn github_context(&self, layer: &GithubLayer) -> GithubContext {
        GithubContext {
            documentation_excerpt: layer
                .documentation
                .as_deref()
                .map(|docs| truncate_chars(docs, self.excerpt_max_chars)),
            metadata: layer.metadata.clone(),
            top_labels: layer.top_labels.clone(),
        }
    }
}

/// Truncate to at most `max_chars` characters, on a char boundary
fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_index, _)) => s[..byte_index].to_string(),
        None => s.to_string(),
    }
}
