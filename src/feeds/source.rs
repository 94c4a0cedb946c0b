//! Transport for the remote feeds.
//!
//! Pipelines fetch through the [`FeedSource`] trait. [`HttpFeedSource`] talks to
//! the JMA servers; [`StaticFeedSource`] serves byte buffers registered up front,
//! for replaying captured feeds and for tests.

use crate::feeds::error::FeedError;
use log::{info, warn};
use reqwest::Client;
use std::collections::HashMap;
use std::future::Future;

/// Something that can return the raw body of a feed URL.
pub trait FeedSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FeedError>> + Send;
}

/// Fetches feeds with a single `GET` each. Non-2xx responses are errors.
#[derive(Debug, Clone, Default)]
pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        info!("Downloading feed from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    FeedError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    FeedError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| FeedError::NetworkRequest(url.to_string(), e))?;
        info!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

/// Serves fixed bodies keyed by URL. Unregistered URLs fail with
/// [`FeedError::UnknownUrl`].
#[derive(Debug, Clone, Default)]
pub struct StaticFeedSource {
    feeds: HashMap<String, Vec<u8>>,
}

impl StaticFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `body` as the response for `url`, replacing any earlier one.
    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> &mut Self {
        self.feeds.insert(url.into(), body.into());
        self
    }
}

impl FeedSource for StaticFeedSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        self.feeds
            .get(url)
            .cloned()
            .ok_or_else(|| FeedError::UnknownUrl(url.to_string()))
    }
}
