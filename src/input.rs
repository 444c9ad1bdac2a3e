//! Input boundary normalization
//!
//! All external data enters through the adapters here. Shape tolerance is
//! resolved once at this boundary (list vs. keyed mapping for pages, lenient
//! parsing for the optional GitHub layer) so the reconciliation passes only
//! ever see one canonical form of each input.

use crate::error::{ReconcileError, Result};
use crate::extract::Parameter;
use crate::issues::{Issue, LabelCount};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One documentation page, already fetched and text-extracted upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocPage {
    /// Page text
    pub content: String,
    /// Page title, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Page URL, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DocPage {
    /// Create a page from bare text
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            title: None,
            url: None,
        }
    }

    /// Identifier recorded as the `source` of entries extracted from this page
    pub fn source_id(&self) -> String {
        self.url
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| "<untitled page>".to_string())
    }
}

/// Documentation pages arrive as either an ordered list or a keyed mapping.
///
/// The ambiguity is modeled as a sum type and resolved exactly once, here.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PageCollection {
    /// Ordered list of pages
    List(Vec<DocPage>),
    /// Mapping of page key (usually URL or title) to page
    Keyed(IndexMap<String, DocPage>),
}

impl PageCollection {
    /// Normalize into an ordered page list.
    ///
    /// Keyed pages with no URL of their own inherit the mapping key as
    /// their source identifier.
    pub fn into_pages(self) -> Vec<DocPage> {
        match self {
            PageCollection::List(pages) => pages,
            PageCollection::Keyed(map) => map
                .into_iter()
                .map(|(key, mut page)| {
                    if page.url.is_none() && page.title.is_none() {
                        page.title = Some(key);
                    }
                    page
                })
                .collect(),
        }
    }
}

/// Normalize a raw JSON value into a page list.
///
/// A value matching neither shape drops that source's contribution; the
/// caller decides whether other sources keep the run alive.
pub fn normalize_pages(value: serde_json::Value) -> Result<Vec<DocPage>> {
    let found = value_shape(&value);
    serde_json::from_value::<PageCollection>(value)
        .map(PageCollection::into_pages)
        .map_err(|_| ReconcileError::StructuralShapeMismatch {
            expected: "list or mapping of {content, title, url} pages",
            found,
        })
}

fn value_shape(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(_) => "bool".to_string(),
        serde_json::Value::Number(_) => "number".to_string(),
        serde_json::Value::String(_) => "string".to_string(),
        serde_json::Value::Array(_) => "array".to_string(),
        serde_json::Value::Object(_) => "object".to_string(),
    }
}

/// One function or method record produced by the upstream static analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Bare name (never dotted; nesting is expressed by the class record)
    pub name: String,
    /// Ordered parameter list
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Declared return type, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    /// Docstring, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    /// 1-based line number in the analyzed file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    /// Whether the callable is async
    #[serde(default)]
    pub is_async: bool,
}

/// One class record with nested methods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    #[serde(default)]
    pub base_classes: Vec<String>,
    #[serde(default)]
    pub methods: Vec<FunctionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
}

/// Per-file output of the upstream static analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// Analyzed file path
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub classes: Vec<ClassRecord>,
    #[serde(default)]
    pub functions: Vec<FunctionRecord>,
}

/// Repository metadata carried by the GitHub layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubMetadata {
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub forks: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Optional GitHub docs/insights layer supplied to the merger
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubLayer {
    /// Repository documentation excerpt source (usually the README)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default)]
    pub metadata: GithubMetadata,
    #[serde(default)]
    pub common_problems: Vec<Issue>,
    #[serde(default)]
    pub known_solutions: Vec<Issue>,
    #[serde(default)]
    pub top_labels: Vec<LabelCount>,
}

impl GithubLayer {
    /// Parse a raw JSON value leniently.
    ///
    /// A malformed layer degrades to `None` with a warning; it never fails
    /// the run.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match serde_json::from_value(value.clone()) {
            Ok(layer) => Some(layer),
            Err(err) => {
                warn!(error = %err, "dropping malformed GitHub layer");
                None
            }
        }
    }

    /// Build a layer from a raw issue list, deriving the insight categories
    /// (common problems, known solutions, top labels) with their default
    /// thresholds.
    pub fn from_issues(
        metadata: GithubMetadata,
        documentation: Option<String>,
        issues: &[Issue],
    ) -> Self {
        Self {
            documentation,
            metadata,
            common_problems: crate::issues::common_problems(
                issues,
                crate::issues::COMMON_PROBLEM_COMMENT_THRESHOLD,
            ),
            known_solutions: crate::issues::known_solutions(
                issues,
                crate::issues::KNOWN_SOLUTION_COMMENT_THRESHOLD,
            ),
            top_labels: crate::issues::top_labels(issues, crate::issues::TOP_LABELS_CAP),
        }
    }

    /// All issues carried by this layer, common problems first
    pub fn issues(&self) -> Vec<Issue> {
        let mut all = self.common_problems.clone();
        all.extend(self.known_solutions.iter().cloned());
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pages_from_list() {
        let value = json!([
            {"content": "first page", "title": "Intro"},
            {"content": "second page", "url": "https://docs.example/api"},
        ]);

        let pages = normalize_pages(value).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].source_id(), "Intro");
        assert_eq!(pages[1].source_id(), "https://docs.example/api");
    }

    #[test]
    fn test_pages_from_keyed_mapping() {
        let value = json!({
            "getting-started": {"content": "install it"},
            "api": {"content": "call it", "url": "https://docs.example/api"},
        });

        let pages = normalize_pages(value).unwrap();
        assert_eq!(pages.len(), 2);
        // Keyed pages without their own identifier inherit the key.
        let sources: Vec<String> = pages.iter().map(DocPage::source_id).collect();
        assert!(sources.contains(&"getting-started".to_string()));
        assert!(sources.contains(&"https://docs.example/api".to_string()));
    }

    #[test]
    fn test_unrecognized_shape_is_rejected_not_panicked() {
        let err = normalize_pages(json!(42)).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::StructuralShapeMismatch { .. }
        ));
    }

    #[test]
    fn test_malformed_github_layer_degrades_to_none() {
        let layer = GithubLayer::from_value(&json!("not an object"));
        assert!(layer.is_none());
    }

    #[test]
    fn test_github_layer_tolerates_missing_fields() {
        let layer = GithubLayer::from_value(&json!({
            "metadata": {"stars": 12}
        }))
        .expect("partial layer parses");

        assert_eq!(layer.metadata.stars, 12);
        assert!(layer.common_problems.is_empty());
        assert!(layer.documentation.is_none());
    }

    #[test]
    fn test_layer_from_issues_derives_insight_categories() {
        use crate::issues::IssueState;

        let issues = vec![
            Issue {
                number: 1,
                title: "crash on startup".to_string(),
                state: IssueState::Open,
                comments: 8,
                labels: vec!["bug".to_string()],
            },
            Issue {
                number: 2,
                title: "how to configure proxies".to_string(),
                state: IssueState::Closed,
                comments: 2,
                labels: vec!["question".to_string()],
            },
        ];

        let layer = GithubLayer::from_issues(GithubMetadata::default(), None, &issues);

        assert_eq!(layer.common_problems.len(), 1);
        assert_eq!(layer.common_problems[0].number, 1);
        assert_eq!(layer.known_solutions.len(), 1);
        assert_eq!(layer.known_solutions[0].number, 2);
        assert_eq!(layer.top_labels.len(), 2);
    }
}
