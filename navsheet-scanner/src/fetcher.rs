use crate::error::{Result, ScanError};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

/// Sequential HTML page fetcher.
///
/// Every call is awaited to completion by the caller before the next one is
/// issued; there is no retry and no caching.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(30)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("navsheet/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs / 2))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch `url` and return the decoded body. Any non-2xx status is an error.
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        info!(
            "Fetched {} ({} bytes in {:?})",
            url,
            body.len(),
            start.elapsed()
        );
        Ok(body)
    }

    /// Parse `url` and fetch it.
    pub async fn fetch_str(&self, url: &str) -> Result<String> {
        let parsed = parse_url(url)?;
        self.fetch(&parsed).await
    }
}

/// Parse an operator-supplied URL, mapping failures to [`ScanError::InvalidUrl`].
pub fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))
}
