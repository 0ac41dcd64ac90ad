//! On-disk snapshots of the last successful response of each feed.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use twse_api::{Feed, FeedBody};

/// Errors from snapshot reads and writes.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed snapshot {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Body of {feed} broke off while writing: {source}")]
    Stream {
        feed: Feed,
        #[source]
        source: twse_api::Error,
    },
}

impl SnapshotError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> SnapshotError {
        let path = path.to_path_buf();
        move |source| SnapshotError::Io { path, source }
    }
}

/// File metadata of a stored snapshot.
#[derive(Clone, Debug)]
pub struct SnapshotInfo {
    pub feed: Feed,
    pub path: PathBuf,
    pub bytes: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Directory holding one JSON file per feed.
///
/// Writes go to a `.part` sibling first and are renamed into place once the
/// whole body has landed, so an interrupted sync keeps the previous snapshot.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the snapshot of `feed` lives.
    pub fn path_for(&self, feed: Feed) -> PathBuf {
        self.dir.join(feed.file_name())
    }

    fn part_path(&self, feed: Feed) -> PathBuf {
        self.dir.join(format!("{}.part", feed.file_name()))
    }

    /// Streams `body` into the snapshot of its feed, replacing any prior content.
    pub async fn write(&self, mut body: FeedBody) -> Result<PathBuf, SnapshotError> {
        let feed = body.feed();
        let path = self.path_for(feed);
        let part = self.part_path(feed);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(SnapshotError::io(&self.dir))?;

        let written = match stream_to_file(&part, &mut body).await {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&part).await;
                return Err(e);
            }
        };

        if let Err(source) = tokio::fs::rename(&part, &path).await {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(SnapshotError::Io { path, source });
        }

        tracing::debug!("Wrote {} bytes to {}", written, path.display());
        Ok(path)
    }

    /// Parses the snapshot of `feed` as an array of `T`.
    ///
    /// A snapshot that was never written reads as an empty collection.
    pub async fn read<T: DeserializeOwned>(&self, feed: Feed) -> Result<Vec<T>, SnapshotError> {
        let path = self.path_for(feed);
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No {} snapshot at {}", feed, path.display());
                return Ok(Vec::new());
            }
            Err(source) => return Err(SnapshotError::Io { path, source }),
        };
        serde_json::from_slice(&raw).map_err(|source| SnapshotError::Parse { path, source })
    }

    /// Like [`read`](Self::read), but an unreadable snapshot is logged and
    /// treated as empty.
    pub async fn read_or_empty<T: DeserializeOwned>(&self, feed: Feed) -> Vec<T> {
        match self.read(feed).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Ignoring unreadable {} snapshot: {}", feed, e);
                Vec::new()
            }
        }
    }

    /// Metadata of the snapshot of `feed`, `None` if it was never written.
    pub async fn info(&self, feed: Feed) -> Option<SnapshotInfo> {
        let path = self.path_for(feed);
        let meta = tokio::fs::metadata(&path).await.ok()?;
        Some(SnapshotInfo {
            feed,
            bytes: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
            path,
        })
    }
}

async fn stream_to_file(part: &Path, body: &mut FeedBody) -> Result<u64, SnapshotError> {
    let feed = body.feed();
    let mut file = tokio::fs::File::create(part)
        .await
        .map_err(SnapshotError::io(part))?;
    let mut written = 0u64;
    while let Some(chunk) = body.next_chunk().await {
        let chunk = chunk.map_err(|source| SnapshotError::Stream { feed, source })?;
        file.write_all(&chunk).await.map_err(SnapshotError::io(part))?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(SnapshotError::io(part))?;
    file.sync_all().await.map_err(SnapshotError::io(part))?;
    Ok(written)
}
