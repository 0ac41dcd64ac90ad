//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use twse_api::{Client, ClientConfig, DEFAULT_BASE_URL};

use crate::board::Board;
use crate::store::SnapshotStore;
use crate::sync::{SyncOrchestrator, DEFAULT_FEED_TIMEOUT};

pub const ENV_CACHE_DIR: &str = "TWSE_CACHE_DIR";
pub const ENV_BASE_URL: &str = "TWSE_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "TWSE_REQUEST_TIMEOUT_SECS";
pub const ENV_FEED_TIMEOUT_SECS: &str = "TWSE_FEED_TIMEOUT_SECS";

/// Where snapshots live and how feeds are fetched.
#[derive(Clone, Debug)]
pub struct Config {
    pub cache_dir: PathBuf,
    pub base_url: String,
    /// Bound on a single HTTP request.
    pub request_timeout: Duration,
    /// Bound on fetching and storing one feed.
    pub feed_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Reads `TWSE_*` variables, falling back to defaults for anything unset
    /// or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let cache_dir = lookup(ENV_CACHE_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_cache_dir(lookup("XDG_CACHE_HOME"), lookup("HOME")));
        let base_url = lookup(ENV_BASE_URL)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let request_timeout = secs(&lookup, ENV_REQUEST_TIMEOUT_SECS)
            .unwrap_or_else(|| ClientConfig::default().timeout);
        let feed_timeout = secs(&lookup, ENV_FEED_TIMEOUT_SECS).unwrap_or(DEFAULT_FEED_TIMEOUT);
        Self {
            cache_dir,
            base_url,
            request_timeout,
            feed_timeout,
        }
    }

    /// Bounds both a single request and the whole fetch of a feed by `timeout`.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self.feed_timeout = timeout;
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(&self.base_url)
            .with_timeout(self.request_timeout)
    }

    pub fn store(&self) -> SnapshotStore {
        SnapshotStore::new(&self.cache_dir)
    }

    /// An orchestrator wired to the real HTTP client.
    pub fn orchestrator(&self) -> SyncOrchestrator<Client> {
        SyncOrchestrator::new(Client::with_config(self.client_config()), self.store())
            .with_feed_timeout(self.feed_timeout)
    }

    pub fn board(&self) -> Board<Client> {
        Board::new(self.orchestrator())
    }
}

fn secs<L>(lookup: &L, key: &str) -> Option<Duration>
where
    L: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|val| val.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

fn default_cache_dir(xdg_cache_home: Option<String>, home: Option<String>) -> PathBuf {
    if let Some(xdg) = xdg_cache_home.filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join("twse");
    }
    if let Some(home) = home.filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".cache").join("twse");
    }
    PathBuf::from(".twse-cache")
}
