//! Issue-tracker data model and derived categories
//!
//! Issues are the third provenance: they never change the merged signature,
//! but they attach activity context (known problems, solved threads, label
//! statistics) to the APIs they concern.

mod categorizer;

pub use categorizer::{
    categorize_issues_by_topic, link_issues_to_apis, MIN_API_KEYWORD_LEN, OTHER_TOPIC,
};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An open issue needs at least this many comments to count as a
/// common problem
pub const COMMON_PROBLEM_COMMENT_THRESHOLD: u32 = 5;

/// A closed issue needs at least this many comments to count as a
/// known solution
pub const KNOWN_SOLUTION_COMMENT_THRESHOLD: u32 = 1;

/// Label statistics are capped at this many entries
pub const TOP_LABELS_CAP: usize = 10;

/// Issue state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl std::fmt::Display for IssueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueState::Open => write!(f, "open"),
            IssueState::Closed => write!(f, "closed"),
        }
    }
}

/// One issue-tracker item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Issue {
    /// Open and actively discussed
    pub fn is_common_problem(&self, comment_threshold: u32) -> bool {
        self.state == IssueState::Open && self.comments >= comment_threshold
    }

    /// Closed with at least some discussion
    pub fn is_known_solution(&self, comment_threshold: u32) -> bool {
        self.state == IssueState::Closed && self.comments >= comment_threshold
    }
}

/// Label with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u32,
}

/// Open issues with enough discussion to count as common problems
pub fn common_problems(issues: &[Issue], comment_threshold: u32) -> Vec<Issue> {
    issues
        .iter()
        .filter(|i| i.is_common_problem(comment_threshold))
        .cloned()
        .collect()
}

/// Closed issues with enough discussion to count as known solutions
pub fn known_solutions(issues: &[Issue], comment_threshold: u32) -> Vec<Issue> {
    issues
        .iter()
        .filter(|i| i.is_known_solution(comment_threshold))
        .cloned()
        .collect()
}

/// Label counts sorted descending, capped.
///
/// Ties break by label name so the truncation point is deterministic.
pub fn top_labels(issues: &[Issue], cap: usize) -> Vec<LabelCount> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for issue in issues {
        for label in &issue.labels {
            *counts.entry(label.as_str()).or_insert(0) += 1;
        }
    }

    let mut labels: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();

    labels.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    labels.truncate(cap);
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(number: u64, state: IssueState, comments: u32, labels: &[&str]) -> Issue {
        Issue {
            number,
            title: format!("issue {}", number),
            state,
            comments,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_common_problem_requires_open_and_discussion() {
        let issues = vec![
            issue(1, IssueState::Open, 10, &[]),
            issue(2, IssueState::Open, 4, &[]),
            issue(3, IssueState::Closed, 10, &[]),
        ];

        let problems = common_problems(&issues, COMMON_PROBLEM_COMMENT_THRESHOLD);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].number, 1);
    }

    #[test]
    fn test_known_solution_requires_closed_and_any_comment() {
        let issues = vec![
            issue(1, IssueState::Closed, 1, &[]),
            issue(2, IssueState::Closed, 0, &[]),
            issue(3, IssueState::Open, 8, &[]),
        ];

        let solutions = known_solutions(&issues, KNOWN_SOLUTION_COMMENT_THRESHOLD);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].number, 1);
    }

    #[test]
    fn test_top_labels_sorted_and_capped() {
        let issues = vec![
            issue(1, IssueState::Open, 0, &["bug", "auth"]),
            issue(2, IssueState::Open, 0, &["bug"]),
            issue(3, IssueState::Closed, 0, &["docs", "auth", "bug"]),
        ];

        let labels = top_labels(&issues, 2);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label, "bug");
        assert_eq!(labels[0].count, 3);
        assert_eq!(labels[1].label, "auth");
    }

    #[test]
    fn test_top_labels_ties_break_by_name() {
        let issues = vec![issue(1, IssueState::Open, 0, &["zeta", "alpha"])];

        let labels = top_labels(&issues, TOP_LABELS_CAP);
        assert_eq!(labels[0].label, "alpha");
        assert_eq!(labels[1].label, "zeta");
    }
}
