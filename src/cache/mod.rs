//! In-memory response cache with a fixed time-to-live
//!
//! Entries are keyed by the operation and its parameters. An entry is live
//! while `now - stored_at < ttl`; once that no longer holds it is dropped on
//! the next lookup. Only successful results are ever stored. The clock is
//! injected so expiry can be driven by tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::github::{GitHubDiscussion, GitHubIssue, GitHubRepoInfo, IssueStateFilter};

/// Default lifetime of a cached response: 5 minutes
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Operation plus parameters identifying one cached response
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    RepoInfo { repo: String },
    Discussions { repo: String, limit: usize },
    Issues {
        repo: String,
        limit: usize,
        state: IssueStateFilter,
    },
    DiscussionsEnabled { repo: String },
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::RepoInfo { repo } => write!(f, "repo-{}", repo),
            CacheKey::Discussions { repo, limit } => write!(f, "discussions-{}-{}", repo, limit),
            CacheKey::Issues { repo, limit, state } => {
                write!(f, "issues-{}-{}-{}", repo, limit, state.as_str())
            }
            CacheKey::DiscussionsEnabled { repo } => write!(f, "has-discussions-{}", repo),
        }
    }
}

/// A normalized response held by the cache
#[derive(Debug, Clone, PartialEq)]
pub enum CachedPayload {
    RepoInfo(GitHubRepoInfo),
    Discussions(Vec<GitHubDiscussion>),
    Issues(Vec<GitHubIssue>),
    DiscussionsEnabled(bool),
}

/// Values that can be stored in a [`ResponseCache`]
pub trait Cacheable: Clone {
    fn into_payload(self) -> CachedPayload;
    fn from_payload(payload: &CachedPayload) -> Option<Self>;
}

impl Cacheable for GitHubRepoInfo {
    fn into_payload(self) -> CachedPayload {
        CachedPayload::RepoInfo(self)
    }

    fn from_payload(payload: &CachedPayload) -> Option<Self> {
        match payload {
            CachedPayload::RepoInfo(info) => Some(info.clone()),
            _ => None,
        }
    }
}

impl Cacheable for Vec<GitHubDiscussion> {
    fn into_payload(self) -> CachedPayload {
        CachedPayload::Discussions(self)
    }

    fn from_payload(payload: &CachedPayload) -> Option<Self> {
        match payload {
            CachedPayload::Discussions(items) => Some(items.clone()),
            _ => None,
        }
    }
}

impl Cacheable for Vec<GitHubIssue> {
    fn into_payload(self) -> CachedPayload {
        CachedPayload::Issues(self)
    }

    fn from_payload(payload: &CachedPayload) -> Option<Self> {
        match payload {
            CachedPayload::Issues(items) => Some(items.clone()),
            _ => None,
        }
    }
}

impl Cacheable for bool {
    fn into_payload(self) -> CachedPayload {
        CachedPayload::DiscussionsEnabled(self)
    }

    fn from_payload(payload: &CachedPayload) -> Option<Self> {
        match payload {
            CachedPayload::DiscussionsEnabled(enabled) => Some(*enabled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: CachedPayload,
    stored_at: Instant,
}

/// Process-wide cache of GitHub responses, shared by `Arc`
pub struct ResponseCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl ResponseCache {
    /// Cache on the system clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Live value for `key`, if any
    pub fn get<T: Cacheable>(&self, key: &CacheKey) -> Option<T> {
        let now = self.clock.now();
        let mut entries = self.entries();

        let entry = entries.get(key)?;
        if now.saturating_duration_since(entry.stored_at) < self.ttl {
            return T::from_payload(&entry.payload);
        }

        tracing::debug!("Cache entry {} expired", key);
        entries.remove(key);
        None
    }

    /// Store `value` under `key`, replacing whatever was there
    pub fn insert<T: Cacheable>(&self, key: CacheKey, value: T) {
        let entry = CacheEntry {
            payload: value.into_payload(),
            stored_at: self.clock.now(),
        };
        self.entries().insert(key, entry);
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_key() -> CacheKey {
        CacheKey::RepoInfo {
            repo: "x/y".to_string(),
        }
    }

    fn manual_cache() -> (Arc<ManualClock>, ResponseCache) {
        let clock = Arc::new(ManualClock::new());
        let cache = ResponseCache::with_clock(DEFAULT_TTL, clock.clone());
        (clock, cache)
    }

    #[test]
    fn test_key_strings() {
        assert_eq!(repo_key().to_string(), "repo-x/y");
        let key = CacheKey::Issues {
            repo: "x/y".to_string(),
            limit: 10,
            state: IssueStateFilter::All,
        };
        assert_eq!(key.to_string(), "issues-x/y-10-all");
        let key = CacheKey::Discussions {
            repo: "x/y".to_string(),
            limit: 5,
        };
        assert_eq!(key.to_string(), "discussions-x/y-5");
    }

    #[test]
    fn test_entry_live_until_ttl() {
        let (clock, cache) = manual_cache();
        cache.insert(repo_key(), true);

        clock.advance(DEFAULT_TTL - Duration::from_millis(1));
        assert_eq!(cache.get::<bool>(&repo_key()), Some(true));

        // exactly ttl old is already stale
        clock.advance(Duration::from_millis(1));
        assert_eq!(cache.get::<bool>(&repo_key()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_overwrites_and_refreshes() {
        let (clock, cache) = manual_cache();
        cache.insert(repo_key(), false);
        clock.advance(Duration::from_secs(200));
        cache.insert(repo_key(), true);
        clock.advance(Duration::from_secs(200));
        assert_eq!(cache.get::<bool>(&repo_key()), Some(true));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_payload_type_mismatch_is_a_miss() {
        let (_clock, cache) = manual_cache();
        cache.insert(repo_key(), true);
        assert_eq!(cache.get::<Vec<GitHubIssue>>(&repo_key()), None);
    }

    #[test]
    fn test_clear() {
        let (_clock, cache) = manual_cache();
        cache.insert(repo_key(), true);
        cache.insert(
            CacheKey::DiscussionsEnabled {
                repo: "x/y".to_string(),
            },
            false,
        );
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}
