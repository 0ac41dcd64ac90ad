//! Error types for the library layer.

use std::fmt;

use crate::sync::FeedFailure;

/// Errors produced by the library layer: the sync verdict plus input and
/// state validation failures.
#[derive(Debug)]
pub enum StockDataError {
    /// Every feed of a sync failed; one entry per feed.
    AllFeedsFailed(Vec<FeedFailure>),
    /// User-provided input failed validation.
    InvalidInput(String),
    /// The requested transition is not allowed from the current load state.
    InvalidState(String),
}

impl fmt::Display for StockDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllFeedsFailed(failures) => {
                write!(f, "All feeds failed")?;
                for (i, failure) in failures.iter().enumerate() {
                    let sep = if i == 0 { ": " } else { "; " };
                    write!(f, "{}{}", sep, failure)?;
                }
                Ok(())
            }
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for StockDataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AllFeedsFailed(failures) => failures
                .last()
                .map(|f| &f.error as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}
