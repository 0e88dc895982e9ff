//! Page fetching and content classification against the live wiki.
//!
//! [`PageFetcher`] wraps a shared `reqwest::Client` and exposes the handful
//! of queries the pipeline needs: raw page HTML, the WhatLinksHere inbound
//! link count, and the disambiguation / person-article content checks.
//!
//! # Error taxonomy
//!
//! [`FetchError`] distinguishes a missing page ([`FetchError::NotFound`])
//! from transport failures and other HTTP statuses. Only `NotFound` is
//! recoverable by the batch runners; everything else aborts the batch.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use std::error::Error;
use std::fmt;
use tracing::{debug, instrument};

/// Marker phrase the wiki renders on disambiguation listing pages.
const DISAMBIGUATION_MARKER: &str = " page lists articles associated with the title ";

static INFOBOX_HEADER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th").expect("static selector"));

static BORN_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bBorn\b").expect("static regex"));

/// Failure modes of a page fetch.
#[derive(Debug)]
pub enum FetchError {
    /// The page does not exist (HTTP 404). Recoverable: the batch runners
    /// file the title into an error/skip bucket.
    NotFound(String),
    /// Any other non-success HTTP status.
    Status(String, StatusCode),
    /// The request never produced a response (DNS, connect, timeout, ...).
    Transport(String, reqwest::Error),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NotFound(url) => write!(f, "page not found: {url}"),
            FetchError::Status(url, status) => write!(f, "unexpected status {status} for {url}"),
            FetchError::Transport(url, e) => write!(f, "transport failure for {url}: {e}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FetchError::Transport(_, e) => Some(e),
            _ => None,
        }
    }
}

/// Read access to article pages on one wiki host.
///
/// Seam for the batch runners: production uses [`PageFetcher`], tests drive
/// the runners through canned pages.
pub trait PageSource {
    /// Base URL of the host, without a trailing slash.
    fn base_url(&self) -> &str;

    /// Fetch the raw HTML of an article page.
    async fn fetch_page(&self, title: &str) -> Result<String, FetchError>;
}

/// Shared HTTP access to one wiki host.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl PageFetcher {
    /// Create a fetcher for the given base URL (no trailing slash).
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of an article page for a slash-prefixed title.
    pub fn page_url(&self, title: &str) -> String {
        format!("{}/wiki{title}", self.base_url)
    }

    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(url.to_string(), e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(url.to_string())),
            status if !status.is_success() => Err(FetchError::Status(url.to_string(), status)),
            _ => response
                .text()
                .await
                .map_err(|e| FetchError::Transport(url.to_string(), e)),
        }
    }

    /// Fetch the raw HTML of an article page.
    #[instrument(level = "debug", skip_all, fields(%title))]
    pub async fn fetch_page(&self, title: &str) -> Result<String, FetchError> {
        let url = self.page_url(title);
        let body = self.get(&url).await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }

    /// Count how many article-namespace pages link to the given title.
    ///
    /// Queries the WhatLinksHere listing (`namespace=0`, `limit=500`,
    /// transclusions hidden) and counts `/wiki/` link markers in the raw
    /// response. The count saturates at the listing limit.
    #[instrument(level = "debug", skip_all, fields(%title))]
    pub async fn inbound_link_count(&self, title: &str) -> Result<u32, FetchError> {
        let encoded = urlencoding::encode(title.trim_start_matches('/'));
        let url = format!(
            "{}/w/index.php?title=Special:WhatLinksHere/{encoded}&namespace=0&limit=500&hidetrans=1",
            self.base_url
        );
        let body = self.get(&url).await?;
        let count = body.matches("/wiki/").count() as u32;
        debug!(count, "Counted inbound links");
        Ok(count)
    }

    /// True iff the page carries the disambiguation notice.
    #[instrument(level = "debug", skip_all, fields(%title))]
    pub async fn is_disambiguation_page(&self, title: &str) -> Result<bool, FetchError> {
        let body = self.fetch_page(title).await?;
        Ok(body.contains(DISAMBIGUATION_MARKER))
    }

    /// True iff the page looks like a biography: its infobox has a header
    /// row containing "Born".
    #[instrument(level = "debug", skip_all, fields(%title))]
    pub async fn is_person_article(&self, title: &str) -> Result<bool, FetchError> {
        let body = self.fetch_page(title).await?;
        Ok(has_born_header(&body))
    }
}

impl PageSource for PageFetcher {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_page(&self, title: &str) -> Result<String, FetchError> {
        PageFetcher::fetch_page(self, title).await
    }
}

fn has_born_header(html: &str) -> bool {
    let document = Html::parse_document(html);
    document
        .select(&INFOBOX_HEADER_SELECTOR)
        .any(|th| BORN_ROW.is_match(&th.text().collect::<String>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_keeps_slash_convention() {
        let fetcher = PageFetcher::new("https://en.m.wikipedia.org/");
        assert_eq!(
            fetcher.page_url("/Apple_Inc."),
            "https://en.m.wikipedia.org/wiki/Apple_Inc."
        );
    }

    #[test]
    fn test_born_header_detection() {
        let person = r#"<table class="infobox"><tr><th>Born</th><td>1955</td></tr></table>"#;
        let place = r#"<table class="infobox"><tr><th>Population</th><td>1000</td></tr></table>"#;
        assert!(has_born_header(person));
        assert!(!has_born_header(place));
    }

    #[test]
    fn test_born_must_be_a_whole_word() {
        let html = r#"<table><tr><th>Airborne units</th></tr></table>"#;
        assert!(!has_born_header(html));
    }

    #[test]
    fn test_disambiguation_marker_matching() {
        let body = format!("<p>This{DISAMBIGUATION_MARKER}<b>Mercury</b>.</p>");
        assert!(body.contains(DISAMBIGUATION_MARKER));
        assert!(!"<p>An ordinary article.</p>".contains(DISAMBIGUATION_MARKER));
    }
}
