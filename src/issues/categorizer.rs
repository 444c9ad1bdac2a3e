//! Issue categorization and API linking by keyword overlap
//!
//! Two separate routings over the same issue pool: topic buckets for
//! thematic grouping, and per-API links driven by the API's dotted-name
//! components. Both are O(issues x topics x keywords), which is fine at
//! issue-tracker scale.

use super::Issue;
use indexmap::IndexMap;

/// Bucket that accumulates issues matching no supplied topic.
///
/// The key is absent from the result when every issue matched somewhere.
pub const OTHER_TOPIC: &str = "other";

/// Minimum length for an API-derived keyword; shorter fragments would link
/// nearly every issue
pub const MIN_API_KEYWORD_LEN: usize = 3;

/// Group issues into topic buckets by keyword match.
///
/// A topic tokenizes into lowercase keywords ("async api" yields two). An
/// issue matches a topic when any of its title words or any of its labels
/// contains any keyword, case-insensitively. Matching issues land in every
/// topic they match; there is no cross-topic deduplication, so one issue
/// can be cross-referenced from several buckets.
pub fn categorize_issues_by_topic(
    problems: &[Issue],
    solutions: &[Issue],
    topics: &[String],
) -> IndexMap<String, Vec<Issue>> {
    let mut buckets: IndexMap<String, Vec<Issue>> = IndexMap::new();

    let topic_keywords: Vec<(&String, Vec<String>)> = topics
        .iter()
        .map(|topic| {
            let keywords = topic
                .split_whitespace()
                .map(str::to_lowercase)
                .collect::<Vec<_>>();
            (topic, keywords)
        })
        .collect();

    for issue in problems.iter().chain(solutions.iter()) {
        let title_words: Vec<String> = issue
            .title
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        let labels: Vec<String> = issue.labels.iter().map(|l| l.to_lowercase()).collect();

        let mut matched = false;
        for (topic, keywords) in &topic_keywords {
            let hit = keywords.iter().any(|keyword| {
                title_words.iter().any(|word| word.contains(keyword))
                    || labels.iter().any(|label| label.contains(keyword))
            });
            if hit {
                buckets
                    .entry((*topic).clone())
                    .or_default()
                    .push(issue.clone());
                matched = true;
            }
        }

        if !matched {
            buckets
                .entry(OTHER_TOPIC.to_string())
                .or_default()
                .push(issue.clone());
        }
    }

    buckets
}

/// Link issues to individual APIs by keyword overlap with the API's name.
///
/// Keywords derive from the dotted-name components, split on `.` and `_`
/// and lowercased; fragments shorter than `min_keyword_len` are discarded.
/// APIs with no matching issue are absent from the result rather than
/// mapped to an empty list.
pub fn link_issues_to_apis(
    issues: &[Issue],
    api_names: &[String],
    min_keyword_len: usize,
) -> IndexMap<String, Vec<Issue>> {
    let mut links: IndexMap<String, Vec<Issue>> = IndexMap::new();

    for api_name in api_names {
        let keywords = api_keywords(api_name, min_keyword_len);
        if keywords.is_empty() {
            continue;
        }

        for issue in issues {
            let title = issue.title.to_lowercase();
            let hit = keywords.iter().any(|keyword| {
                title.contains(keyword)
                    || issue
                        .labels
                        .iter()
                        .any(|label| label.to_lowercase().contains(keyword))
            });
            if !hit {
                continue;
            }

            let linked = links.entry(api_name.clone()).or_default();
            if !linked.iter().any(|existing| existing.number == issue.number) {
                linked.push(issue.clone());
            }
        }
    }

    links
}

/// Lowercased keywords derived from an API's dotted-name components
fn api_keywords(api_name: &str, min_keyword_len: usize) -> Vec<String> {
    api_name
        .split(['.', '_'])
        .filter(|part| part.len() >= min_keyword_len)
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::IssueState;

    fn issue(number: u64, title: &str, labels: &[&str]) -> Issue {
        Issue {
            number,
            title: title.to_string(),
            state: IssueState::Open,
            comments: 10,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_no_issues_yields_no_topic_keys() {
        let topics = vec!["auth".to_string(), "async api".to_string()];
        let buckets = categorize_issues_by_topic(&[], &[], &topics);
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_oauth_scenario() {
        let topics = vec!["oauth".to_string()];
        let problems = vec![issue(1, "OAuth login fails", &["bug", "oauth"])];

        let buckets = categorize_issues_by_topic(&problems, &[], &topics);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets["oauth"].len(), 1);
        assert_eq!(buckets["oauth"][0].number, 1);
        assert!(!buckets.contains_key(OTHER_TOPIC));
    }

    #[test]
    fn test_issue_lands_in_every_matching_topic() {
        let topics = vec!["auth".to_string(), "login".to_string()];
        let problems = vec![issue(7, "Login fails when auth token expires", &[])];

        let buckets = categorize_issues_by_topic(&problems, &[], &topics);

        assert_eq!(buckets["auth"].len(), 1);
        assert_eq!(buckets["login"].len(), 1);
    }

    #[test]
    fn test_unmatched_issues_accumulate_under_other() {
        let topics = vec!["database".to_string()];
        let problems = vec![issue(3, "UI glitch on resize", &["frontend"])];

        let buckets = categorize_issues_by_topic(&problems, &[], &topics);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[OTHER_TOPIC].len(), 1);
    }

    #[test]
    fn test_multiword_topic_matches_on_any_keyword() {
        let topics = vec!["async api".to_string()];
        let problems = vec![issue(9, "API rate limiting is unclear", &[])];

        let buckets = categorize_issues_by_topic(&problems, &[], &topics);
        assert_eq!(buckets["async api"].len(), 1);
    }

    #[test]
    fn test_label_match_counts_too() {
        let topics = vec!["performance".to_string()];
        let problems = vec![issue(4, "Slow response", &["performance"])];

        let buckets = categorize_issues_by_topic(&problems, &[], &topics);
        assert_eq!(buckets["performance"].len(), 1);
    }

    #[test]
    fn test_link_issues_to_apis_by_name_component() {
        let issues = vec![
            issue(1, "fetch_page times out on slow hosts", &[]),
            issue(2, "Unrelated build question", &[]),
        ];
        let names = vec!["Client.fetch_page".to_string(), "configure".to_string()];

        let links = link_issues_to_apis(&issues, &names, MIN_API_KEYWORD_LEN);

        assert_eq!(links.len(), 1);
        assert_eq!(links["Client.fetch_page"].len(), 1);
        assert_eq!(links["Client.fetch_page"][0].number, 1);
        // APIs with zero matches are absent, not empty.
        assert!(!links.contains_key("configure"));
    }

    #[test]
    fn test_link_deduplicates_by_issue_number() {
        let duplicated = vec![
            issue(5, "fetch panics", &[]),
            issue(5, "fetch panics", &[]),
        ];
        let names = vec!["fetch".to_string()];

        let links = link_issues_to_apis(&duplicated, &names, MIN_API_KEYWORD_LEN);
        assert_eq!(links["fetch"].len(), 1);
    }

    #[test]
    fn test_short_name_fragments_do_not_link() {
        let issues = vec![issue(6, "nothing relevant here at all", &[])];
        let names = vec!["Db.at".to_string()];

        // "at" is below the keyword length floor; "db" too.
        let links = link_issues_to_apis(&issues, &names, MIN_API_KEYWORD_LEN);
        assert!(links.is_empty());
    }
}
