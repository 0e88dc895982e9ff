//! Data models for the curation pipeline.
//!
//! Article titles are plain strings in the wiki's path convention: a leading
//! slash followed by the underscored title, e.g. `/Apple_Inc.`. Titles are
//! case-sensitive but compared case-insensitively when deduplicating.
//!
//! The batch runners return explicit result structs rather than mutating
//! shared accumulators:
//! - [`BatchOutcome`]: the valid / redirected / error partition from the
//!   full validation run
//! - [`LinkBuckets`]: inbound-link-count classification into seven maps

use std::collections::BTreeMap;

/// Result of a full validation batch: every input title lands in exactly one
/// of the three buckets.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Titles that fetched cleanly with no redirect notice.
    pub valid: Vec<String>,
    /// Canonical titles resolved from pages that carried a redirect notice.
    pub redirected: Vec<String>,
    /// Titles whose page does not exist.
    pub error: Vec<String>,
}

impl BatchOutcome {
    /// Total number of titles filed so far.
    pub fn len(&self) -> usize {
        self.valid.len() + self.redirected.len() + self.error.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inbound-link-count classification of a set of titles.
///
/// Six range buckets partition the counts at the configured bounds, and
/// `all` retains the raw count for every title regardless of bucket.
#[derive(Debug, Default)]
pub struct LinkBuckets {
    pub under_50: BTreeMap<String, u32>,
    pub under_100: BTreeMap<String, u32>,
    pub under_150: BTreeMap<String, u32>,
    pub under_250: BTreeMap<String, u32>,
    pub under_350: BTreeMap<String, u32>,
    pub over_350: BTreeMap<String, u32>,
    pub all: BTreeMap<String, u32>,
}

impl LinkBuckets {
    /// File a title's count into `all` and exactly one range bucket.
    pub fn record(&mut self, title: &str, count: u32, bounds: &[u32; 5]) {
        self.all.insert(title.to_string(), count);
        let bucket = if count < bounds[0] {
            &mut self.under_50
        } else if count < bounds[1] {
            &mut self.under_100
        } else if count < bounds[2] {
            &mut self.under_150
        } else if count < bounds[3] {
            &mut self.under_250
        } else if count < bounds[4] {
            &mut self.under_350
        } else {
            &mut self.over_350
        };
        bucket.insert(title.to_string(), count);
    }

    /// Sum of the six range-bucket sizes. Always equals `all.len()` when
    /// every title was recorded through [`LinkBuckets::record`].
    pub fn range_total(&self) -> usize {
        self.under_50.len()
            + self.under_100.len()
            + self.under_150.len()
            + self.under_250.len()
            + self.under_350.len()
            + self.over_350.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: [u32; 5] = [50, 100, 150, 250, 350];

    #[test]
    fn test_record_is_a_total_partition() {
        let mut buckets = LinkBuckets::default();
        for (i, count) in [0, 49, 50, 99, 100, 149, 150, 249, 250, 349, 350, 500]
            .into_iter()
            .enumerate()
        {
            buckets.record(&format!("/Article_{i}"), count, &BOUNDS);
        }
        assert_eq!(buckets.range_total(), buckets.all.len());
        assert_eq!(buckets.all.len(), 12);
    }

    #[test]
    fn test_boundary_counts() {
        let mut buckets = LinkBuckets::default();
        buckets.record("/A", 49, &BOUNDS);
        buckets.record("/B", 50, &BOUNDS);
        buckets.record("/C", 500, &BOUNDS);
        assert_eq!(buckets.under_50.get("/A"), Some(&49));
        assert_eq!(buckets.under_100.get("/B"), Some(&50));
        assert_eq!(buckets.over_350.get("/C"), Some(&500));
        assert!(buckets.under_50.get("/B").is_none());
    }

    #[test]
    fn test_record_same_title_twice_keeps_latest() {
        let mut buckets = LinkBuckets::default();
        buckets.record("/A", 10, &BOUNDS);
        buckets.record("/A", 10, &BOUNDS);
        assert_eq!(buckets.range_total(), buckets.all.len());
    }

    #[test]
    fn test_batch_outcome_len() {
        let mut outcome = BatchOutcome::default();
        assert!(outcome.is_empty());
        outcome.valid.push("/A".to_string());
        outcome.error.push("/B".to_string());
        assert_eq!(outcome.len(), 2);
    }
}
