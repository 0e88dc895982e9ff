//! Redirect resolution through a browser-style session.
//!
//! Some redirects only materialize after client-side navigation, so the
//! resolver loads the page through a [`Browser`], waits a settle interval,
//! and derives the canonical title from the final URL's last path segment.
//!
//! The trait seam keeps the session swappable: production uses
//! [`HttpBrowser`] (a redirect-following `reqwest` client), tests substitute
//! a canned session. Session teardown is tied to ownership, so it happens on
//! every exit path including errors.

use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument};
use url::Url;

/// A navigable session that reports where navigation ended up.
pub trait Browser {
    /// Navigate to `url`, let navigation settle, and return the final URL.
    async fn open(&self, url: &str) -> Result<Url, Box<dyn Error>>;
}

/// Redirect-following HTTP session standing in for a driven browser.
#[derive(Debug)]
pub struct HttpBrowser {
    client: reqwest::Client,
    settle_delay: Duration,
}

impl HttpBrowser {
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            settle_delay,
        }
    }
}

impl Browser for HttpBrowser {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn open(&self, url: &str) -> Result<Url, Box<dyn Error>> {
        let response = self.client.get(url).send().await?;
        sleep(self.settle_delay).await;
        Ok(response.url().clone())
    }
}

/// Resolve a title to its canonical form by following redirects.
///
/// Returns the title unchanged when no redirect occurred. Navigation
/// failures propagate; the batch driver treats them as fatal.
#[instrument(level = "info", skip_all, fields(%title))]
pub async fn resolve_redirect(
    browser: &impl Browser,
    base_url: &str,
    title: &str,
) -> Result<String, Box<dyn Error>> {
    let url = format!("{base_url}/wiki{title}");
    let final_url = browser.open(&url).await?;
    let canonical = canonical_title(&final_url);

    if canonical != title {
        info!(%canonical, "Redirect resolved");
    } else {
        info!("No redirect");
    }
    Ok(canonical)
}

/// Last path segment of a URL, in the leading-slash title convention.
fn canonical_title(url: &Url) -> String {
    let last = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    format!("/{last}")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBrowser {
        final_url: Url,
    }

    impl Browser for FixedBrowser {
        async fn open(&self, _url: &str) -> Result<Url, Box<dyn Error>> {
            Ok(self.final_url.clone())
        }
    }

    #[test]
    fn test_canonical_title_is_last_path_segment() {
        let url = Url::parse("https://en.m.wikipedia.org/wiki/Apple_Inc.").unwrap();
        assert_eq!(canonical_title(&url), "/Apple_Inc.");
    }

    #[tokio::test]
    async fn test_resolve_reports_redirected_title() {
        let browser = FixedBrowser {
            final_url: Url::parse("https://en.m.wikipedia.org/wiki/Apple_Inc.").unwrap(),
        };
        let canonical = resolve_redirect(&browser, "https://en.m.wikipedia.org", "/Apple")
            .await
            .unwrap();
        assert_eq!(canonical, "/Apple_Inc.");
    }

    #[tokio::test]
    async fn test_resolve_returns_input_when_unredirected() {
        let browser = FixedBrowser {
            final_url: Url::parse("https://en.m.wikipedia.org/wiki/Banana").unwrap(),
        };
        let canonical = resolve_redirect(&browser, "https://en.m.wikipedia.org", "/Banana")
            .await
            .unwrap();
        assert_eq!(canonical, "/Banana");
    }
}
