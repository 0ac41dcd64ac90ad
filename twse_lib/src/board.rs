//! Consumer-facing facade: sync, load, sort and a guarded refresh.
//!
//! Whether the board holds data is tracked by an explicit [`LoadState`]
//! instead of loose flags, so a second refresh after a successful one never
//! goes back to the network.

use std::fmt;

use crate::error::StockDataError;
use crate::fetch::FeedFetcher;
use crate::merge;
use crate::sort::{sort_stocks, SortField};
use crate::stock::MergedStock;
use crate::store::SnapshotStore;
use crate::sync::{SyncOrchestrator, SyncSummary};

/// Reason recorded when a sync landed but the info feed had no rows.
pub const NO_INFO_DATA: &str = "no info-feed data available";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loading,
    Loaded {
        count: usize,
    },
    Failed {
        reason: String,
    },
}

impl LoadState {
    fn begin(&mut self) -> Result<(), StockDataError> {
        match self {
            LoadState::NotLoaded | LoadState::Failed { .. } => {
                *self = LoadState::Loading;
                Ok(())
            }
            LoadState::Loading => Err(StockDataError::InvalidState(
                "a refresh is already in progress".to_string(),
            )),
            LoadState::Loaded { .. } => Err(StockDataError::InvalidState(
                "board is already loaded".to_string(),
            )),
        }
    }

    fn finish(&mut self, count: usize) {
        *self = if count == 0 {
            LoadState::Failed {
                reason: NO_INFO_DATA.to_string(),
            }
        } else {
            LoadState::Loaded { count }
        };
    }

    fn fail(&mut self, reason: impl Into<String>) {
        *self = LoadState::Failed {
            reason: reason.into(),
        };
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded { .. })
    }

    /// One-line human description of the state.
    pub fn message(&self) -> String {
        match self {
            LoadState::NotLoaded => "Waiting to download...".to_string(),
            LoadState::Loading => "Downloading...".to_string(),
            LoadState::Loaded { count } => format!("Loaded {} stocks", count),
            LoadState::Failed { reason } => format!("Error: {}", reason),
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// What a call to [`Board::refresh`] did.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The board already held data; nothing was fetched.
    AlreadyLoaded,
    /// A sync ran. `count` is the number of merged rows, `0` when the info
    /// feed was empty (the board is then `Failed` and may be refreshed again).
    Refreshed { summary: SyncSummary, count: usize },
}

/// Holds the merged list in info-feed order and hands out sorted views of it.
pub struct Board<F> {
    orchestrator: SyncOrchestrator<F>,
    state: LoadState,
    stocks: Vec<MergedStock>,
}

impl<F: FeedFetcher> Board<F> {
    pub fn new(orchestrator: SyncOrchestrator<F>) -> Self {
        Self {
            orchestrator,
            state: LoadState::NotLoaded,
            stocks: Vec::new(),
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn status_message(&self) -> String {
        self.state.message()
    }

    /// The merged list in info-feed order.
    pub fn stocks(&self) -> &[MergedStock] {
        &self.stocks
    }

    pub fn store(&self) -> &SnapshotStore {
        self.orchestrator.store()
    }

    /// Fetches all feeds into the store without touching the board's state.
    pub async fn sync(&self) -> Result<SyncSummary, StockDataError> {
        self.orchestrator.sync().await
    }

    /// Merges whatever snapshots are on disk.
    pub async fn load_merged(&self) -> Vec<MergedStock> {
        merge::load_merged(self.orchestrator.store()).await
    }

    /// The board's list ordered by `field`. The stored order is left untouched.
    pub fn sort(&self, field: SortField, ascending: bool) -> Vec<MergedStock> {
        sort_stocks(&self.stocks, field, ascending)
    }

    /// Populates the board from existing snapshots only.
    ///
    /// Returns the row count. An empty result leaves the state unchanged.
    pub async fn load_cached(&mut self) -> usize {
        let stocks = self.load_merged().await;
        let count = stocks.len();
        if count > 0 {
            self.stocks = stocks;
            self.state = LoadState::Loaded { count };
        }
        count
    }

    /// Syncs and loads unless the board already holds data.
    ///
    /// A sync in which every feed failed moves the board to `Failed` and
    /// returns the error; the board can be refreshed again afterwards.
    pub async fn refresh(&mut self) -> Result<RefreshOutcome, StockDataError> {
        if self.state.is_loaded() {
            tracing::debug!("Board already loaded, skipping refresh");
            return Ok(RefreshOutcome::AlreadyLoaded);
        }
        self.state.begin()?;

        let summary = match self.orchestrator.sync().await {
            Ok(summary) => summary,
            Err(e) => {
                self.state.fail(e.to_string());
                return Err(e);
            }
        };

        self.stocks = self.load_merged().await;
        let count = self.stocks.len();
        self.state.finish(count);
        if count == 0 {
            tracing::warn!("Sync finished but the info snapshot holds no rows");
        }
        Ok(RefreshOutcome::Refreshed { summary, count })
    }

    /// Drops the loaded list and returns to `NotLoaded`.
    pub fn reset(&mut self) {
        self.stocks.clear();
        self.state = LoadState::NotLoaded;
    }
}
