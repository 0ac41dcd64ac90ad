//! Library layer for the TWSE daily board: snapshot store, concurrent sync,
//! record merging and sorting.
//!
//! Wraps the `twse_api` feed client with an on-disk snapshot per feed, merges
//! the three feeds into one row per security and exposes a [`Board`] that
//! tracks whether data has been loaded.

pub mod board;
pub mod config;
pub mod error;
pub mod fetch;
pub mod merge;
pub mod sort;
pub mod stock;
pub mod store;
pub mod sync;

pub use twse_api;
pub use twse_api::types;
pub use twse_api::Feed;

pub use board::{Board, LoadState, RefreshOutcome};
pub use config::Config;
pub use error::StockDataError;
pub use fetch::FeedFetcher;
pub use merge::{load_merged, merge};
pub use sort::{sort_stocks, SortField};
pub use stock::{ChangeDirection, MergedStock, PriceTrend};
pub use store::{SnapshotError, SnapshotInfo, SnapshotStore};
pub use sync::{FeedError, FeedFailure, SyncOrchestrator, SyncSummary};
