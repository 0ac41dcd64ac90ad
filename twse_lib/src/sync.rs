//! Concurrent fetch of all feeds into the snapshot store.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use twse_api::Feed;

use crate::error::StockDataError;
use crate::fetch::FeedFetcher;
use crate::store::{SnapshotError, SnapshotStore};

/// Default bound on one fetch-and-store, body included.
pub const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(60);

/// Why a single feed did not land on disk.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] twse_api::Error),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("did not finish within {}s", .0.as_secs())]
    TimedOut(Duration),
}

/// A feed that failed during a sync, with the reason.
#[derive(Debug)]
pub struct FeedFailure {
    pub feed: Feed,
    pub error: FeedError,
}

impl fmt::Display for FeedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.feed, self.error)
    }
}

/// Outcome of a sync in which at least one feed landed.
#[derive(Debug)]
pub struct SyncSummary {
    /// Snapshot of the first feed (in [`Feed::ALL`] order) that landed.
    pub location: PathBuf,
    pub cache_dir: PathBuf,
    pub succeeded: Vec<(Feed, PathBuf)>,
    pub failed: Vec<FeedFailure>,
}

impl SyncSummary {
    pub fn succeeded_feeds(&self) -> Vec<Feed> {
        self.succeeded.iter().map(|(feed, _)| *feed).collect()
    }

    /// True when every feed landed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetches every feed concurrently and stores each body as a snapshot.
///
/// The sync as a whole succeeds as long as one feed landed; the merger can
/// work with whatever subset is on disk. Callers must not run a sync and a
/// load against the same store at the same time.
pub struct SyncOrchestrator<F> {
    fetcher: F,
    store: SnapshotStore,
    feed_timeout: Duration,
}

impl<F: FeedFetcher> SyncOrchestrator<F> {
    pub fn new(fetcher: F, store: SnapshotStore) -> Self {
        Self {
            fetcher,
            store,
            feed_timeout: DEFAULT_FEED_TIMEOUT,
        }
    }

    pub fn with_feed_timeout(mut self, feed_timeout: Duration) -> Self {
        self.feed_timeout = feed_timeout;
        self
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Runs the three fetch-and-store jobs concurrently and waits for all of them.
    ///
    /// Returns [`StockDataError::AllFeedsFailed`] with every failure when no
    /// feed landed.
    pub async fn sync(&self) -> Result<SyncSummary, StockDataError> {
        let (info, average, day_all) = tokio::join!(
            self.sync_feed(Feed::Info),
            self.sync_feed(Feed::DayAverage),
            self.sync_feed(Feed::DayAll),
        );

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (feed, outcome) in Feed::ALL.into_iter().zip([info, average, day_all]) {
            match outcome {
                Ok(path) => succeeded.push((feed, path)),
                Err(error) => failed.push(FeedFailure { feed, error }),
            }
        }

        let Some((_, location)) = succeeded.first() else {
            tracing::error!("Sync failed: no feed could be fetched");
            return Err(StockDataError::AllFeedsFailed(failed));
        };

        tracing::info!(
            "Sync finished: {}/{} feeds stored in {}",
            succeeded.len(),
            Feed::ALL.len(),
            self.store.dir().display()
        );
        Ok(SyncSummary {
            location: location.clone(),
            cache_dir: self.store.dir().to_path_buf(),
            succeeded,
            failed,
        })
    }

    async fn sync_feed(&self, feed: Feed) -> Result<PathBuf, FeedError> {
        let job = async {
            let body = self.fetcher.fetch(feed).await?;
            Ok::<_, FeedError>(self.store.write(body).await?)
        };
        let outcome = match tokio::time::timeout(self.feed_timeout, job).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FeedError::TimedOut(self.feed_timeout)),
        };
        match &outcome {
            Ok(path) => tracing::info!("Stored {} snapshot at {}", feed, path.display()),
            Err(e) => tracing::warn!("Failed to sync {}: {}", feed, e),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use twse_api::FeedBody;

    /// Scripted fetcher: feeds with a body succeed, the rest answer 500.
    struct Scripted {
        bodies: HashMap<Feed, &'static str>,
    }

    #[async_trait]
    impl FeedFetcher for Scripted {
        async fn fetch(&self, feed: Feed) -> Result<FeedBody, twse_api::Error> {
            match self.bodies.get(&feed) {
                Some(body) => Ok(FeedBody::from_bytes(feed, *body)),
                None => Err(twse_api::Error::HttpStatus {
                    feed,
                    status: 500,
                    body: "boom".to_string(),
                }),
            }
        }
    }

    fn orchestrator(
        dir: &Path,
        bodies: &[(Feed, &'static str)],
    ) -> SyncOrchestrator<Scripted> {
        let fetcher = Scripted {
            bodies: bodies.iter().copied().collect(),
        };
        SyncOrchestrator::new(fetcher, SnapshotStore::new(dir))
    }

    #[tokio::test]
    async fn partial_failure_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let sync = orchestrator(dir.path(), &[(Feed::DayAverage, "[]"), (Feed::DayAll, "[]")]);

        let summary = sync.sync().await.unwrap();
        assert_eq!(summary.succeeded_feeds(), vec![Feed::DayAverage, Feed::DayAll]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].feed, Feed::Info);
        assert_eq!(summary.location, dir.path().join("STOCK_DAY_AVG_ALL.json"));
        assert!(!summary.is_complete());
    }

    #[tokio::test]
    async fn all_failures_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let sync = orchestrator(dir.path(), &[]);

        let err = sync.sync().await.unwrap_err();
        match err {
            StockDataError::AllFeedsFailed(failures) => {
                let feeds: Vec<Feed> = failures.iter().map(|f| f.feed).collect();
                assert_eq!(feeds, Feed::ALL.to_vec());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn complete_sync_writes_every_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let sync = orchestrator(
            dir.path(),
            &[(Feed::Info, "[]"), (Feed::DayAverage, "[]"), (Feed::DayAll, "[]")],
        );

        let summary = sync.sync().await.unwrap();
        assert!(summary.is_complete());
        assert_eq!(summary.location, dir.path().join("BWIBBU_ALL.json"));
        for feed in Feed::ALL {
            assert!(sync.store().path_for(feed).exists());
        }
    }

    struct Stalled;

    #[async_trait]
    impl FeedFetcher for Stalled {
        async fn fetch(&self, feed: Feed) -> Result<FeedBody, twse_api::Error> {
            if feed == Feed::DayAll {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            Ok(FeedBody::from_bytes(feed, "[]"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_feed_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let sync = SyncOrchestrator::new(Stalled, SnapshotStore::new(dir.path()))
            .with_feed_timeout(Duration::from_secs(60));

        let summary = sync.sync().await.unwrap();
        assert_eq!(summary.succeeded_feeds(), vec![Feed::Info, Feed::DayAverage]);
        assert!(matches!(summary.failed[0].error, FeedError::TimedOut(_)));
        assert_eq!(summary.failed[0].feed, Feed::DayAll);
    }

    #[test]
    fn failure_display_names_feed() {
        let failure = FeedFailure {
            feed: Feed::DayAverage,
            error: FeedError::TimedOut(Duration::from_secs(60)),
        };
        assert_eq!(failure.to_string(), "day-average: did not finish within 60s");
    }
}
