//! The seam between the sync orchestrator and the network.

use async_trait::async_trait;
use twse_api::{Client, FeedBody, Feed};

/// Anything that can produce the body of a feed.
///
/// Implemented for [`twse_api::Client`]; tests plug in canned bodies and
/// scripted failures instead.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Issues a single request for `feed`.
    async fn fetch(&self, feed: Feed) -> Result<FeedBody, twse_api::Error>;
}

#[async_trait]
impl FeedFetcher for Client {
    async fn fetch(&self, feed: Feed) -> Result<FeedBody, twse_api::Error> {
        Client::fetch(self, feed).await
    }
}
