//! Outcome of a GitHub read

use crate::error::GitHubError;

/// Result of a cached GitHub read.
///
/// Reads never fail outright; the site renders `NotFound` and `Failed` the
/// same as an empty result, but callers and tests can tell them apart.
#[derive(Debug)]
pub enum Fetch<T> {
    /// Served from a live cache entry without a request
    Cached(T),
    /// Fetched from GitHub just now and stored in the cache
    Fresh(T),
    /// GitHub answered 404
    NotFound,
    /// Transport error, unexpected status or undecodable body
    Failed(GitHubError),
}

impl<T> Fetch<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Fetch::Cached(v) | Fetch::Fresh(v) => Some(v),
            Fetch::NotFound | Fetch::Failed(_) => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Fetch::Cached(v) | Fetch::Fresh(v) => Some(v),
            Fetch::NotFound | Fetch::Failed(_) => None,
        }
    }

    /// The value, or the neutral value the site shows when GitHub is unavailable
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.into_option().unwrap_or_default()
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Fetch::Cached(_))
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Fetch::Fresh(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Fetch::Failed(_))
    }

    /// No value is available, for whatever reason
    pub fn is_degraded(&self) -> bool {
        matches!(self, Fetch::NotFound | Fetch::Failed(_))
    }

    pub fn error(&self) -> Option<&GitHubError> {
        match self {
            Fetch::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetch<U> {
        match self {
            Fetch::Cached(v) => Fetch::Cached(f(v)),
            Fetch::Fresh(v) => Fetch::Fresh(f(v)),
            Fetch::NotFound => Fetch::NotFound,
            Fetch::Failed(e) => Fetch::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_outcomes_read_as_empty() {
        let not_found: Fetch<Vec<u32>> = Fetch::NotFound;
        assert!(not_found.is_degraded());
        assert!(!not_found.is_failed());
        assert_eq!(not_found.unwrap_or_default(), Vec::<u32>::new());

        let failed: Fetch<bool> = Fetch::Failed(GitHubError::InvalidHeader("Authorization"));
        assert!(failed.is_failed());
        assert!(failed.error().is_some());
        assert!(!failed.unwrap_or_default());
    }

    #[test]
    fn test_values_and_map() {
        let cached = Fetch::Cached(2);
        assert!(cached.is_cached());
        assert_eq!(cached.value(), Some(&2));
        assert_eq!(cached.map(|v| v * 10).into_option(), Some(20));

        let fresh = Fetch::Fresh("x");
        assert!(fresh.is_fresh());
        assert!(!fresh.is_degraded());
    }
}
