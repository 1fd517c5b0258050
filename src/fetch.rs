//! Subscription download
//!
//! Fetching lives behind [`SubscriptionFetcher`] so the conversion core stays
//! free of I/O. The `fetch` feature provides a blocking reqwest client.

use crate::error::Result;

/// Resolves a subscription URL to its raw text.
pub trait SubscriptionFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String>;
}

impl<F> SubscriptionFetcher for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn fetch(&self, url: &str) -> Result<String> {
        self(url)
    }
}

#[cfg(feature = "fetch")]
pub use http::HttpFetcher;

#[cfg(feature = "fetch")]
mod http {
    use std::time::Duration;

    use log::{debug, warn};
    use reqwest::blocking::Client;
    use reqwest::StatusCode;

    use super::SubscriptionFetcher;
    use crate::error::{ConvertError, Result};

    /// Default timeout for HTTP requests in seconds
    const DEFAULT_TIMEOUT: u64 = 15;

    const USER_AGENT: &str = concat!("proxyconv/", env!("CARGO_PKG_VERSION"));

    /// Blocking HTTP(S) fetcher with a fixed timeout.
    pub struct HttpFetcher {
        client: Client,
    }

    impl HttpFetcher {
        pub fn new(timeout: Duration) -> Result<Self> {
            let client = Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()
                .map_err(|e| ConvertError::Fetch(format!("Failed to build HTTP client: {}", e)))?;
            Ok(HttpFetcher { client })
        }

        pub fn with_timeout_secs(secs: u64) -> Result<Self> {
            let secs = if secs == 0 { DEFAULT_TIMEOUT } else { secs };
            Self::new(Duration::from_secs(secs))
        }
    }

    impl SubscriptionFetcher for HttpFetcher {
        fn fetch(&self, url: &str) -> Result<String> {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConvertError::Fetch(format!("Not an HTTP(S) URL: {}", url)));
            }

            debug!("Fetching subscription {}", url);
            let response = self
                .client
                .get(url)
                .send()
                .map_err(|e| ConvertError::Fetch(format!("Failed to send request: {}", e)))?;

            if response.status() != StatusCode::OK {
                warn!("Subscription {} answered {}", url, response.status());
                return Err(ConvertError::Fetch(format!("HTTP error: {}", response.status())));
            }

            response
                .text()
                .map_err(|e| ConvertError::Fetch(format!("Failed to read response body: {}", e)))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_rejects_non_http_url() {
            let fetcher = HttpFetcher::with_timeout_secs(1).unwrap();
            assert!(matches!(
                fetcher.fetch("ftp://example.com/sub"),
                Err(ConvertError::Fetch(_))
            ));
        }
    }
}
