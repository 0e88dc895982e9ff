//! Outbound article-link extraction.
//!
//! Parses a page's anchors, keeps hrefs in the article namespace
//! (`/wiki/...`), strips the prefix back to the title convention, validates
//! each candidate, and returns an exact-deduplicated list sorted
//! case-insensitively. Rejected candidates are logged, not silently dropped.

use crate::config::CuratorConfig;
use crate::filters::is_valid_link;
use crate::wiki::fetch::{FetchError, PageFetcher};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use tracing::{info, instrument, warn};

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static selector"));

/// Article-namespace hrefs: `/wiki/` followed by the title.
static ARTICLE_HREF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/wiki(/.+)$").expect("static regex"));

/// Fetch a page and extract its valid outbound article links.
#[instrument(level = "info", skip_all, fields(%title))]
pub async fn extract_page_links(
    fetcher: &PageFetcher,
    title: &str,
    config: &CuratorConfig,
) -> Result<Vec<String>, FetchError> {
    let body = fetcher.fetch_page(title).await?;
    let links = links_from_html(&body, config);
    info!(count = links.len(), "Extracted outbound article links");
    Ok(links)
}

/// Pure extraction half of [`extract_page_links`].
pub fn links_from_html(html: &str, config: &CuratorConfig) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut candidates = BTreeSet::new();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(captures) = ARTICLE_HREF.captures(href) else {
            continue;
        };
        let candidate = &captures[1];
        if is_valid_link(candidate, config) {
            candidates.insert(candidate.to_string());
        } else {
            warn!(%href, "Skipping invalid link candidate");
        }
    }

    let mut links: Vec<String> = candidates.into_iter().collect();
    links.sort_by_key(|t| t.to_lowercase());
    links
}
