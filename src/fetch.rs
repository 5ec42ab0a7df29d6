//! Fetching pages, audio streams and cover art.
//!
//! Every network read in the crate goes through the [`Fetcher`] trait so the
//! extraction and download logic can be driven by canned responses in tests.

use crate::headers::{add_get_headers, DEFAULT_USER_AGENT};
use crate::{BandcampError, Result};
use async_trait::async_trait;
use http_client::{HttpClient, Request, Response};
use http_types::{Method, Url};

/// Upper bound on `Location` hops for a single fetch.
const MAX_REDIRECTS: u32 = 5;

/// Retrieves the bytes behind a URL.
///
/// A single best-effort attempt is made; there is no retry or backoff.
///
/// # Mocking Support
///
/// When the `mock` feature is enabled, this crate provides `MockFetcher`
/// that implements this trait using the `mockall` library.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch raw bytes, failing with [`BandcampError::FetchFailed`] on
    /// network errors and non-success statuses.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;

    /// Fetch a document as text. Invalid UTF-8 is replaced, not rejected.
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch(url).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// [`Fetcher`] backed by any [`HttpClient`] implementation.
///
/// # Examples
///
/// ```rust,no_run
/// use bandcamp_link_scraper::HttpFetcher;
///
/// let fetcher = HttpFetcher::new(Box::new(http_client::native::NativeClient::new()));
/// ```
#[derive(Debug)]
pub struct HttpFetcher {
    client: Box<dyn HttpClient>,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(client: Box<dyn HttpClient>) -> Self {
        Self::with_user_agent(client, DEFAULT_USER_AGENT.to_string())
    }

    pub fn with_user_agent(client: Box<dyn HttpClient>, user_agent: String) -> Self {
        Self { client, user_agent }
    }

    async fn get_with_redirects(&self, url: &str) -> Result<Response> {
        let mut current = url.to_string();
        let mut referer: Option<String> = None;

        for _ in 0..=MAX_REDIRECTS {
            let parsed = current
                .parse::<Url>()
                .map_err(|e| BandcampError::FetchFailed(format!("Invalid URL '{current}': {e}")))?;

            let mut request = Request::new(Method::Get, parsed);
            add_get_headers(&mut request, &self.user_agent, referer.as_deref());

            let response = self
                .client
                .send(request)
                .await
                .map_err(|e| BandcampError::FetchFailed(format!("{current}: {e}")))?;

            let status = response.status();
            if status.is_redirection() {
                let location = response
                    .header("location")
                    .and_then(|values| values.get(0))
                    .map(|value| value.as_str().to_string())
                    .ok_or_else(|| {
                        BandcampError::FetchFailed(format!(
                            "{current}: redirect {status} without location"
                        ))
                    })?;

                let next = resolve_location(&current, &location);
                log::debug!("Following redirect from {current} to {next}");
                referer = Some(current);
                current = next;
                continue;
            }

            if !status.is_success() {
                return Err(BandcampError::FetchFailed(format!(
                    "{current}: HTTP {status}"
                )));
            }

            return Ok(response);
        }

        Err(BandcampError::FetchFailed(format!(
            "{url}: too many redirects"
        )))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("GET {url}");
        let mut response = self.get_with_redirects(url).await?;
        response
            .body_bytes()
            .await
            .map_err(|e| BandcampError::FetchFailed(format!("{url}: {e}")))
    }
}

/// Resolve a `Location` header against the URL that produced it.
pub fn resolve_location(current: &str, location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.to_string();
    }

    match current.parse::<Url>().and_then(|base| base.join(location)) {
        Ok(joined) => joined.to_string(),
        Err(_) => location.to_string(),
    }
}
