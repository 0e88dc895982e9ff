//! Batch runners over full title collections.
//!
//! Each runner walks its input sequentially, one network call at a time, and
//! returns an explicit result struct. The validation runner takes a
//! checkpoint callback so partial results survive a crash without the runner
//! knowing anything about file paths.

use crate::config::CuratorConfig;
use crate::models::{BatchOutcome, LinkBuckets};
use crate::wiki::fetch::{PageFetcher, PageSource};
use crate::wiki::redirect::{resolve_redirect, Browser};
use std::collections::BTreeMap;
use std::error::Error;
use tracing::{info, instrument, warn};

/// Notice the wiki renders on pages reached via a redirect.
const REDIRECT_MARKER: &str = "Redirected from";

/// Partition titles into valid / redirected / error by fetching each page.
///
/// A page carrying the redirect notice is resolved to its canonical title
/// through the browser session. A missing page files the title under
/// `error`. Any other failure (transport, unexpected status, navigation)
/// aborts the batch; the checkpoint writes bound what is lost.
///
/// `checkpoint` is invoked after every `checkpoint_interval` valid titles
/// and once more at completion. An interval of zero disables the
/// intermediate checkpoints; the completion write still happens.
#[instrument(level = "info", skip_all, fields(total = titles.len()))]
pub async fn run_validation(
    fetcher: &impl PageSource,
    browser: &impl Browser,
    titles: &[String],
    config: &CuratorConfig,
    mut checkpoint: impl FnMut(&BatchOutcome) -> Result<(), Box<dyn Error>>,
) -> Result<BatchOutcome, Box<dyn Error>> {
    let mut outcome = BatchOutcome::default();

    for (index, title) in titles.iter().enumerate() {
        info!(index = index + 1, total = titles.len(), %title, "Checking title");

        match fetcher.fetch_page(title).await {
            Ok(body) if body.contains(REDIRECT_MARKER) => {
                info!(%title, "Possible redirect");
                let canonical = resolve_redirect(browser, fetcher.base_url(), title).await?;
                outcome.redirected.push(canonical);
            }
            Ok(_) => {
                outcome.valid.push(title.clone());
                if config.checkpoint_interval > 0
                    && outcome.valid.len() % config.checkpoint_interval == 0
                {
                    info!(valid = outcome.valid.len(), "Checkpointing batch");
                    checkpoint(&outcome)?;
                }
            }
            Err(e) if e.is_not_found() => {
                warn!(%title, "Page not found");
                outcome.error.push(title.clone());
            }
            Err(e) => return Err(e.into()),
        }
    }

    checkpoint(&outcome)?;
    info!(
        valid = outcome.valid.len(),
        redirected = outcome.redirected.len(),
        error = outcome.error.len(),
        "Validation batch complete"
    );
    Ok(outcome)
}

/// Classify every title by its inbound-link count.
///
/// An unreachable or missing WhatLinksHere listing records a count of zero
/// rather than failing the batch; the failure is logged so "no data" stays
/// distinguishable from a genuine zero in the run output.
#[instrument(level = "info", skip_all, fields(total = titles.len()))]
pub async fn run_link_counts(
    fetcher: &PageFetcher,
    titles: &[String],
    config: &CuratorConfig,
) -> LinkBuckets {
    let mut buckets = LinkBuckets::default();

    for (index, title) in titles.iter().enumerate() {
        info!(index = index + 1, total = titles.len(), %title, "Counting inbound links");
        let count = match fetcher.inbound_link_count(title).await {
            Ok(count) => count,
            Err(e) if e.is_not_found() => {
                warn!(%title, "No inbound link listing; recording zero");
                0
            }
            Err(e) => {
                warn!(%title, error = %e, "Link count fetch failed; recording zero");
                0
            }
        };
        buckets.record(title, count, &config.bucket_bounds);
    }

    info!(
        classified = buckets.all.len(),
        under_50 = buckets.under_50.len(),
        over_350 = buckets.over_350.len(),
        "Link count batch complete"
    );
    buckets
}

/// Collect every title whose page carries the disambiguation notice.
///
/// Fail-open: an unreachable page is treated as not-disambiguation so a
/// flaky fetch never drops a legitimate article from the pool.
#[instrument(level = "info", skip_all, fields(total = titles.len()))]
pub async fn run_disambiguation(fetcher: &PageFetcher, titles: &[String]) -> Vec<String> {
    let mut flagged = Vec::new();

    for (index, title) in titles.iter().enumerate() {
        info!(index = index + 1, total = titles.len(), %title, "Checking for disambiguation");
        match fetcher.is_disambiguation_page(title).await {
            Ok(true) => {
                info!(%title, "Disambiguation page");
                flagged.push(title.clone());
            }
            Ok(false) => {}
            Err(e) => warn!(%title, error = %e, "Fetch failed; treating as non-disambiguation"),
        }
    }

    info!(flagged = flagged.len(), "Disambiguation batch complete");
    flagged
}

/// Collect every title whose page looks like a biography.
///
/// Same fail-open policy as the disambiguation batch: an unreachable page
/// is treated as not-a-person.
#[instrument(level = "info", skip_all, fields(total = titles.len()))]
pub async fn run_people(fetcher: &PageFetcher, titles: &[String]) -> Vec<String> {
    let mut flagged = Vec::new();

    for (index, title) in titles.iter().enumerate() {
        info!(index = index + 1, total = titles.len(), %title, "Checking for biography");
        match fetcher.is_person_article(title).await {
            Ok(true) => {
                info!(%title, "Person article");
                flagged.push(title.clone());
            }
            Ok(false) => {}
            Err(e) => warn!(%title, error = %e, "Fetch failed; treating as non-person"),
        }
    }

    info!(flagged = flagged.len(), "Person batch complete");
    flagged
}

/// Drop titles whose recorded inbound-link count is below the retain
/// threshold. Titles at or above the threshold are kept and reported;
/// titles absent from the mapping are untouched.
#[instrument(level = "info", skip_all, fields(input = titles.len()))]
pub fn remove_articles(
    counts: &BTreeMap<String, u32>,
    titles: Vec<String>,
    config: &CuratorConfig,
) -> Vec<String> {
    let mut kept = Vec::with_capacity(titles.len());
    for title in titles {
        match counts.get(&title) {
            Some(count) if *count < config.retain_threshold => {
                warn!(%title, count, "Pruning low-link title");
            }
            Some(count) => {
                info!(%title, count, "Retaining title");
                kept.push(title);
            }
            None => kept.push(title),
        }
    }
    info!(kept = kept.len(), "Prune complete");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::fetch::FetchError;
    use crate::wiki::redirect::Browser;
    use reqwest::StatusCode;
    use std::collections::HashMap;
    use url::Url;

    fn config() -> CuratorConfig {
        CuratorConfig::default()
    }

    enum Page {
        Body(&'static str),
        Missing,
        ServerError,
    }

    struct ScriptedPages {
        pages: HashMap<String, Page>,
    }

    impl ScriptedPages {
        fn new(pages: impl IntoIterator<Item = (&'static str, Page)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(title, page)| (title.to_string(), page))
                    .collect(),
            }
        }
    }

    impl PageSource for ScriptedPages {
        fn base_url(&self) -> &str {
            "https://wiki.test"
        }

        async fn fetch_page(&self, title: &str) -> Result<String, FetchError> {
            match self.pages.get(title) {
                Some(Page::Body(body)) => Ok((*body).to_string()),
                Some(Page::ServerError) => Err(FetchError::Status(
                    title.to_string(),
                    StatusCode::INTERNAL_SERVER_ERROR,
                )),
                Some(Page::Missing) | None => Err(FetchError::NotFound(title.to_string())),
            }
        }
    }

    struct CanonicalBrowser;

    impl Browser for CanonicalBrowser {
        async fn open(&self, _url: &str) -> Result<Url, Box<dyn Error>> {
            Ok(Url::parse("https://wiki.test/wiki/Apple_Inc.").unwrap())
        }
    }

    const PLAIN: &str = "<p>An ordinary article.</p>";
    const REDIRECTED: &str = "<p>(Redirected from Apple)</p>";

    #[tokio::test]
    async fn test_validation_partitions_and_checkpoints_every_interval() {
        let pages = ScriptedPages::new([
            ("/Alpha", Page::Body(PLAIN)),
            ("/Beta", Page::Body(PLAIN)),
            ("/Apple", Page::Body(REDIRECTED)),
            ("/Gamma", Page::Body(PLAIN)),
            ("/Ghost", Page::Missing),
            ("/Delta", Page::Body(PLAIN)),
            ("/Epsilon", Page::Body(PLAIN)),
        ]);
        let titles: Vec<String> =
            ["/Alpha", "/Beta", "/Apple", "/Gamma", "/Ghost", "/Delta", "/Epsilon"]
                .into_iter()
                .map(String::from)
                .collect();
        let config = CuratorConfig {
            checkpoint_interval: 2,
            ..CuratorConfig::default()
        };

        let mut checkpoints = Vec::new();
        let outcome = run_validation(&pages, &CanonicalBrowser, &titles, &config, |outcome| {
            checkpoints.push(outcome.valid.len());
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(
            outcome.valid,
            vec!["/Alpha", "/Beta", "/Gamma", "/Delta", "/Epsilon"]
        );
        assert_eq!(outcome.redirected, vec!["/Apple_Inc."]);
        assert_eq!(outcome.error, vec!["/Ghost"]);
        // Every second valid title, plus once at completion.
        assert_eq!(checkpoints, vec![2, 4, 5]);
    }

    #[tokio::test]
    async fn test_validation_zero_interval_only_checkpoints_at_completion() {
        let pages = ScriptedPages::new([
            ("/Alpha", Page::Body(PLAIN)),
            ("/Beta", Page::Body(PLAIN)),
        ]);
        let titles = vec!["/Alpha".to_string(), "/Beta".to_string()];
        let config = CuratorConfig {
            checkpoint_interval: 0,
            ..CuratorConfig::default()
        };

        let mut calls = 0usize;
        let outcome = run_validation(&pages, &CanonicalBrowser, &titles, &config, |_| {
            calls += 1;
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(outcome.valid.len(), 2);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_validation_aborts_on_non_recoverable_fetch_failure() {
        let pages = ScriptedPages::new([
            ("/Alpha", Page::Body(PLAIN)),
            ("/Broken", Page::ServerError),
        ]);
        let titles = vec!["/Alpha".to_string(), "/Broken".to_string()];

        let result =
            run_validation(&pages, &CanonicalBrowser, &titles, &config(), |_| Ok(())).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_remove_articles_scenario() {
        let mut counts = BTreeMap::new();
        counts.insert("/Foo".to_string(), 30u32);
        counts.insert("/Bar".to_string(), 150u32);
        let titles = vec!["/Foo".to_string(), "/Bar".to_string(), "/Baz".to_string()];

        let kept = remove_articles(&counts, titles, &config());
        assert_eq!(kept, vec!["/Bar".to_string(), "/Baz".to_string()]);
    }

    #[test]
    fn test_remove_articles_threshold_is_inclusive() {
        let mut counts = BTreeMap::new();
        counts.insert("/Edge".to_string(), 100u32);
        counts.insert("/Below".to_string(), 99u32);
        let titles = vec!["/Edge".to_string(), "/Below".to_string()];

        let kept = remove_articles(&counts, titles, &config());
        assert_eq!(kept, vec!["/Edge".to_string()]);
    }
}
