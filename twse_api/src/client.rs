//! HTTP client for the exchange open-data API.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use url::Url;

use crate::{Error, Feed};

/// Production base URL of the exchange open-data API.
pub const DEFAULT_BASE_URL: &str = "https://openapi.twse.com.tw/v1";

/// A date far in the past, so any conditional cache in between answers in full.
const IF_MODIFIED_SINCE: &str = "Mon, 26 Jul 1997 05:00:00 GMT";

/// Transport settings for [`Client`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL for the API. Defaults to [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Upper bound for one request, body included.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("twse-board/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the three daily feeds.
///
/// Every request carries cache-defeating headers so the caller always sees the
/// live upstream snapshot. Each request builds a fresh `reqwest::Client` with
/// the configured timeout; there is no process-wide transport.
pub struct Client {
    config: ClientConfig,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production API.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            config: ClientConfig::default().with_base_url(base_url),
        }
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    fn get_url(&self, feed: Feed) -> Result<Url, Error> {
        let raw = format!("{}{}", self.config.base_url.trim_end_matches('/'), feed.path());
        Url::parse(&raw).map_err(|e| {
            tracing::error!("Invalid URL constructed for {}: {}", feed, e);
            Error::RequestFailed {
                feed,
                reason: format!("invalid url {}: {}", raw, e),
            }
        })
    }

    /// Issues exactly one GET for `feed` and hands back its body as a stream.
    ///
    /// A non-2xx answer is reported with its status and a body snippet. A 2xx
    /// answer without payload is [`Error::EmptyBody`]. No retries.
    pub async fn fetch(&self, feed: Feed) -> Result<FeedBody, Error> {
        let url = self.get_url(feed)?;
        let client = reqwest::Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::from_reqwest(feed, e)
            })?;
        let resp = client
            .get(url)
            .header("accept", "application/json")
            .header("if-modified-since", IF_MODIFIED_SINCE)
            .header("cache-control", "no-cache")
            .header("pragma", "no-cache")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get {}: {}", feed, e);
                Error::from_reqwest(feed, e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let snippet = truncate_body(&body);
            tracing::error!("{} failed with status {}: {}", feed, status, snippet);
            return Err(Error::HttpStatus {
                feed,
                status: status.as_u16(),
                body: snippet,
            });
        }

        let mut chunks = resp.bytes_stream();
        let first = loop {
            match chunks.next().await {
                Some(Ok(chunk)) if chunk.is_empty() => continue,
                Some(Ok(chunk)) => break chunk,
                Some(Err(e)) => {
                    tracing::error!("Failed to read {} body: {}", feed, e);
                    return Err(Error::from_reqwest(feed, e));
                }
                None => {
                    tracing::error!("{} answered {} without a body", feed, status);
                    return Err(Error::EmptyBody { feed });
                }
            }
        };

        let rest = chunks.map(move |chunk| chunk.map_err(|e| Error::from_reqwest(feed, e)));
        Ok(FeedBody::from_stream(
            feed,
            stream::once(async move { Ok(first) }).chain(rest),
        ))
    }
}

/// Response body of a feed, consumed chunk by chunk.
pub struct FeedBody {
    feed: Feed,
    chunks: BoxStream<'static, Result<Bytes, Error>>,
}

impl FeedBody {
    pub fn from_stream<S>(feed: Feed, chunks: S) -> Self
    where
        S: Stream<Item = Result<Bytes, Error>> + Send + 'static,
    {
        Self {
            feed,
            chunks: chunks.boxed(),
        }
    }

    /// A body made of a single in-memory chunk.
    pub fn from_bytes(feed: Feed, bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self::from_stream(feed, stream::once(async move { Ok(bytes) }))
    }

    pub fn feed(&self) -> Feed {
        self.feed
    }

    /// Next chunk of the body, `None` once the body is exhausted.
    pub async fn next_chunk(&mut self) -> Option<Result<Bytes, Error>> {
        self.chunks.next().await
    }

    /// Drains the remaining body into memory.
    pub async fn into_bytes(mut self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        while let Some(chunk) = self.next_chunk().await {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }
}

impl fmt::Debug for FeedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedBody").field("feed", &self.feed).finish()
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
