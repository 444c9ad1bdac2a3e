//! Single-pass reconciliation pipeline
//!
//! Per-source extraction is stateless and independent; detection,
//! categorization, and merging run as one single-threaded reduction once
//! every extraction has completed. All inputs are immutable snapshots for
//! the duration of the pass.

use crate::config::ReconcileConfig;
use crate::conflict::ConflictDetector;
use crate::extract::{build_code_index, DocApiExtractor};
use crate::input::{DocPage, FileAnalysis, GithubLayer};
use crate::issues::{categorize_issues_by_topic, Issue};
use crate::merge::{MergeResult, SourceMerger};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything one reconciliation pass produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileOutput {
    /// The merged per-API contract
    pub merge: MergeResult,
    /// Issues grouped into the supplied topic buckets
    pub topics: IndexMap<String, Vec<Issue>>,
}

/// Run one full reconciliation pass.
///
/// Extraction of the two indexes is independent; everything downstream is
/// a deterministic reduction over the extracted snapshots.
pub fn reconcile(
    pages: &[DocPage],
    analyses: &[FileAnalysis],
    topics: &[String],
    github: Option<&GithubLayer>,
    config: &ReconcileConfig,
) -> ReconcileOutput {
    let doc_index = DocApiExtractor::new().extract_pages(pages);
    let code_index = build_code_index(analyses);
    debug!(
        doc_apis = doc_index.len(),
        code_apis = code_index.len(),
        "extraction complete"
    );

    let conflicts = ConflictDetector::new(&doc_index, &code_index)
        .with_threshold(config.similarity_threshold)
        .detect_all_conflicts();

    let topic_buckets = match github {
        Some(layer) => {
            categorize_issues_by_topic(&layer.common_problems, &layer.known_solutions, topics)
        }
        None => IndexMap::new(),
    };

    let merge = SourceMerger::new(&doc_index, &code_index, &conflicts, github)
        .with_excerpt_cap(config.excerpt_max_chars)
        .with_min_keyword_len(config.min_keyword_len)
        .merge_all();

    ReconcileOutput {
        merge,
        topics: topic_buckets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Parameter;
    use crate::input::{ClassRecord, FunctionRecord, GithubMetadata};
    use crate::issues::IssueState;
    use crate::merge::MergeStatus;

    fn pages() -> Vec<DocPage> {
        vec![DocPage {
            content: "Use def fetch(url, retries) -> Response to download pages. \
                      The legacy def download(url) helper is also available."
                .to_string(),
            title: Some("API guide".to_string()),
            url: Some("https://docs.example/guide".to_string()),
        }]
    }

    fn analyses() -> Vec<FileAnalysis> {
        vec![FileAnalysis {
            path: "src/http.py".to_string(),
            classes: vec![ClassRecord {
                name: "Session".to_string(),
                base_classes: vec![],
                methods: vec![FunctionRecord {
                    name: "close".to_string(),
                    parameters: vec![Parameter::named("self")],
                    return_type: None,
                    docstring: None,
                    line_number: Some(40),
                    is_async: false,
                }],
                docstring: Some("Connection pool.".to_string()),
                line_number: Some(30),
            }],
            functions: vec![FunctionRecord {
                name: "fetch".to_string(),
                parameters: vec![Parameter::named("url"), Parameter::named("retries")],
                return_type: Some("Response".to_string()),
                docstring: Some("Fetch a page over HTTP.".to_string()),
                line_number: Some(5),
                is_async: false,
            }],
        }]
    }

    fn github() -> GithubLayer {
        GithubLayer {
            documentation: Some("Example HTTP library".to_string()),
            metadata: GithubMetadata::default(),
            common_problems: vec![Issue {
                number: 11,
                title: "fetch hangs behind proxies".to_string(),
                state: IssueState::Open,
                comments: 12,
                labels: vec!["network".to_string()],
            }],
            known_solutions: vec![Issue {
                number: 4,
                title: "Timeout documentation unclear".to_string(),
                state: IssueState::Closed,
                comments: 3,
                labels: vec!["docs".to_string()],
            }],
            top_labels: vec![],
        }
    }

    fn init_logging() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    #[test]
    fn test_full_pass_produces_consistent_output() {
        init_logging();
        let layer = github();
        let topics = vec!["network".to_string()];
        let output = reconcile(
            &pages(),
            &analyses(),
            &topics,
            Some(&layer),
            &ReconcileConfig::default(),
        );

        let merge = &output.merge;
        // fetch matches on both sides; download is documented only; the
        // Session class and its method exist only in code.
        assert_eq!(merge.apis["fetch"].status, MergeStatus::Matched);
        assert_eq!(merge.apis["download"].status, MergeStatus::DocsOnly);
        assert_eq!(merge.apis["Session"].status, MergeStatus::CodeOnly);
        assert_eq!(merge.apis["Session.close"].status, MergeStatus::CodeOnly);

        // Code precedence: fetch description comes from the docstring.
        assert_eq!(merge.apis["fetch"].merged_description, "Fetch a page over HTTP.");

        // The proxy issue links to the fetch API and lands in its topic.
        assert_eq!(merge.issue_links["fetch"][0].number, 11);
        assert_eq!(output.topics["network"].len(), 1);

        // Status buckets partition the union.
        assert_eq!(
            merge.summary.total,
            merge.summary.matched
                + merge.summary.conflicts
                + merge.summary.docs_only
                + merge.summary.code_only
        );
    }

    #[test]
    fn test_rerun_is_deterministic() {
        let layer = github();
        let topics = vec!["network".to_string()];
        let config = ReconcileConfig::default();

        let first = reconcile(&pages(), &analyses(), &topics, Some(&layer), &config);
        let second = reconcile(&pages(), &analyses(), &topics, Some(&layer), &config);

        let a = serde_json::to_string(&first.merge).unwrap();
        let b = serde_json::to_string(&second.merge).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_github_layer_degrades_gracefully() {
        let topics = vec!["network".to_string()];
        let output = reconcile(
            &pages(),
            &analyses(),
            &topics,
            None,
            &ReconcileConfig::default(),
        );

        assert!(output.merge.github_context.is_none());
        assert!(output.merge.issue_links.is_empty());
        assert!(output.topics.is_empty());
    }
}
