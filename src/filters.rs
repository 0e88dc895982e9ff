//! Pure filtering stages: title validation, case-insensitive deduplication,
//! and the title-word frequency report.
//!
//! These functions never touch the network; they transform in-memory
//! collections of titles and log what they drop so nothing disappears
//! silently.

use crate::config::CuratorConfig;
use itertools::Itertools;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

/// Check whether a title qualifies for the curated pool.
///
/// A title passes iff it is at most `max_title_len` characters long and
/// contains none of the blacklisted substrings. The `",_"` entry is kept
/// literally as-is; it catches comma titles like `/Portland,_Oregon`.
pub fn is_valid_link(title: &str, config: &CuratorConfig) -> bool {
    if title.chars().count() > config.max_title_len {
        return false;
    }
    config.blacklist.iter().all(|bad| !title.contains(bad))
}

/// Filter a set of titles through [`is_valid_link`], logging every rejection.
///
/// The input is an exact-match set: titles differing only by case both
/// survive this stage and are collapsed later by [`remove_duplicates`].
#[instrument(level = "info", skip_all, fields(input = titles.len()))]
pub fn validate_articles(titles: &BTreeSet<String>, config: &CuratorConfig) -> Vec<String> {
    let mut valid = Vec::new();
    for title in titles {
        if is_valid_link(title, config) {
            valid.push(title.clone());
        } else {
            warn!(%title, "Rejected title");
        }
    }
    info!(
        input = titles.len(),
        valid = valid.len(),
        rejected = titles.len() - valid.len(),
        "Validated titles"
    );
    valid
}

/// Remove case-insensitive duplicates, keeping the first occurrence in input
/// order. Every dropped duplicate is logged with the title it collided with.
#[instrument(level = "info", skip_all, fields(input = titles.len()))]
pub fn remove_duplicates(titles: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(titles.len());
    let mut unique = Vec::with_capacity(titles.len());
    for title in titles {
        if seen.insert(title.to_lowercase()) {
            unique.push(title);
        } else {
            warn!(duplicate = %title, "Dropped case-insensitive duplicate");
        }
    }
    info!(unique = unique.len(), "Deduplicated titles");
    unique
}

/// Count how often each word appears across the given titles.
///
/// Titles are tokenized by stripping the leading slash, replacing
/// underscores with spaces, and splitting on whitespace.
pub fn title_word_frequencies(titles: &[String]) -> HashMap<String, u64> {
    let mut words: HashMap<String, u64> = HashMap::new();
    for title in titles {
        let readable = title.trim_start_matches('/').replace('_', " ");
        for word in readable.split_whitespace() {
            *words.entry(word.to_string()).or_insert(0) += 1;
        }
    }
    debug!(distinct_words = words.len(), "Computed title word frequencies");
    words
}

/// Render the word-frequency table as `"word: count"` lines, most frequent
/// first.
pub fn word_frequency_report(titles: &[String]) -> String {
    let words = title_word_frequencies(titles);
    let mut report = String::new();
    for (word, count) in words
        .iter()
        .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
    {
        report.push_str(&format!("{word}: {count}\n"));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CuratorConfig {
        CuratorConfig::default()
    }

    #[test]
    fn test_overlong_titles_are_invalid() {
        let title = format!("/{}", "a".repeat(30));
        assert!(!is_valid_link(&title, &config()));
    }

    #[test]
    fn test_blacklisted_substrings_are_invalid_regardless_of_length() {
        for title in [
            "/Foo:Bar",
            "/Foo#Section",
            "/Portland,_Oregon",
            "/List_of_lakes",
            "/Mercury_(planet)",
            "/Outline_of_Apple",
            "/X_disambiguation",
        ] {
            assert!(!is_valid_link(title, &config()), "{title} should be invalid");
        }
    }

    #[test]
    fn test_plain_short_title_is_valid() {
        assert!(is_valid_link("/Apple_Inc.", &config()));
    }

    #[test]
    fn test_comma_without_underscore_is_allowed() {
        // Only the literal ",_" pattern is blacklisted.
        assert!(is_valid_link("/A,B", &config()));
    }

    #[test]
    fn test_validate_rejects_outline_scenario() {
        let titles: BTreeSet<String> = ["/Apple_Inc.", "/apple_inc.", "/Outline_of_Apple"]
            .into_iter()
            .map(String::from)
            .collect();
        let valid = validate_articles(&titles, &config());
        assert!(valid.contains(&"/Apple_Inc.".to_string()));
        assert!(valid.contains(&"/apple_inc.".to_string()));
        assert!(!valid.iter().any(|t| t.contains("Outline")));
    }

    #[test]
    fn test_remove_duplicates_first_seen_wins() {
        let titles = vec!["/Apple_Inc.".to_string(), "/apple_inc.".to_string()];
        assert_eq!(remove_duplicates(titles), vec!["/Apple_Inc.".to_string()]);
    }

    #[test]
    fn test_remove_duplicates_is_idempotent() {
        let titles = vec![
            "/Apple_Inc.".to_string(),
            "/apple_inc.".to_string(),
            "/Banana".to_string(),
            "/BANANA".to_string(),
            "/Cherry".to_string(),
        ];
        let once = remove_duplicates(titles);
        let twice = remove_duplicates(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_duplicates_no_case_insensitive_pair_survives() {
        let titles = vec![
            "/Ab".to_string(),
            "/aB".to_string(),
            "/AB".to_string(),
            "/Cd".to_string(),
        ];
        let unique = remove_duplicates(titles);
        for (i, a) in unique.iter().enumerate() {
            for b in &unique[i + 1..] {
                assert_ne!(a.to_lowercase(), b.to_lowercase());
            }
        }
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn test_word_frequencies_tokenize_on_underscores() {
        let titles = vec![
            "/Apple_Inc.".to_string(),
            "/Apple_Pie".to_string(),
            "/Banana".to_string(),
        ];
        let words = title_word_frequencies(&titles);
        assert_eq!(words.get("Apple"), Some(&2));
        assert_eq!(words.get("Pie"), Some(&1));
        assert_eq!(words.get("Banana"), Some(&1));
    }

    #[test]
    fn test_word_frequency_report_sorted_descending() {
        let titles = vec![
            "/Apple_Inc.".to_string(),
            "/Apple_Pie".to_string(),
            "/Banana".to_string(),
        ];
        let report = word_frequency_report(&titles);
        let first = report.lines().next().unwrap();
        assert_eq!(first, "Apple: 2");
    }
}
