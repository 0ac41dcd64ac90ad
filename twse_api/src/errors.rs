//! Error types for the feed client.

use crate::Feed;

/// Errors that can occur when fetching a feed.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never produced a response (connection, TLS, or body read failure).
    #[error("Request for {feed} failed: {reason}")]
    RequestFailed { feed: Feed, reason: String },
    /// The request exceeded the configured timeout.
    #[error("Request for {feed} timed out")]
    Timeout { feed: Feed },
    /// The API returned a non-success status with a body snippet.
    #[error("Request for {feed} failed with status {status}")]
    HttpStatus { feed: Feed, status: u16, body: String },
    /// The API answered 2xx but sent no payload.
    #[error("Response for {feed} has an empty body")]
    EmptyBody { feed: Feed },
}

impl Error {
    /// The feed the failed request was made for.
    pub fn feed(&self) -> Feed {
        match self {
            Self::RequestFailed { feed, .. }
            | Self::Timeout { feed }
            | Self::HttpStatus { feed, .. }
            | Self::EmptyBody { feed } => *feed,
        }
    }

    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_reqwest(feed: Feed, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { feed }
        } else {
            Self::RequestFailed {
                feed,
                reason: err.to_string(),
            }
        }
    }
}
