//! GitHub REST client with a shared response cache.
//!
//! Every read checks the cache first, and only successful results are stored.
//! Upstream trouble never surfaces as an `Err`: it becomes [`Fetch::NotFound`]
//! or [`Fetch::Failed`] plus a log line.

use std::future::Future;
use std::sync::Arc;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT},
    Client, StatusCode,
};
use serde::de::DeserializeOwned;

use super::types::{sort_newest_first, DiscussionResponse, IssueResponse, RepoResponse};
use super::{Fetch, GitHubDiscussion, GitHubIssue, GitHubRepoInfo, IssueStateFilter};
use crate::cache::{CacheKey, Cacheable, ResponseCache};
use crate::config::GitHubConfig;
use crate::error::GitHubError;

const GITHUB_API_VERSION: &str = "2022-11-28";

/// Environment variable holding the optional access token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Everything a project page shows about its repository
#[derive(Debug)]
pub struct RepoOverview {
    pub info: Fetch<GitHubRepoInfo>,
    pub discussions: Fetch<Vec<GitHubDiscussion>>,
    pub issues: Fetch<Vec<GitHubIssue>>,
    pub discussions_enabled: Fetch<bool>,
}

/// GitHub API client backed by a [`ResponseCache`]
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    discussions_limit: usize,
    issues_limit: usize,
    cache: Arc<ResponseCache>,
}

impl GitHubClient {
    /// Create a client; without a token requests go out unauthenticated.
    pub fn new(
        config: &GitHubConfig,
        token: Option<&str>,
        cache: Arc<ResponseCache>,
    ) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| GitHubError::InvalidHeader("User-Agent"))?;
        headers.insert(USER_AGENT, user_agent);

        match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| GitHubError::InvalidHeader("Authorization"))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            None => {
                tracing::debug!("No GitHub token configured, using unauthenticated requests");
            }
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            discussions_limit: config.discussions_limit,
            issues_limit: config.issues_limit,
            cache,
        })
    }

    /// Create a client with the token from the `GITHUB_TOKEN` environment variable, if set.
    pub fn from_env(config: &GitHubConfig, cache: Arc<ResponseCache>) -> Result<Self, GitHubError> {
        let token = std::env::var(TOKEN_ENV).ok();
        Self::new(config, token.as_deref(), cache)
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Repository summary
    pub async fn repo_info(&self, repo: &str) -> Fetch<GitHubRepoInfo> {
        let key = CacheKey::RepoInfo {
            repo: repo.to_string(),
        };
        self.cached(key, move || async move {
            let response: Option<RepoResponse> = self.get_json(repo, "", &[]).await?;
            Ok::<_, GitHubError>(response.map(GitHubRepoInfo::from))
        })
        .await
    }

    /// Newest discussions, at most `limit`
    pub async fn discussions(&self, repo: &str, limit: usize) -> Fetch<Vec<GitHubDiscussion>> {
        let key = CacheKey::Discussions {
            repo: repo.to_string(),
            limit,
        };
        self.cached(key, move || async move {
            let query = [
                ("per_page", limit.to_string()),
                ("sort", "created".to_string()),
                ("direction", "desc".to_string()),
            ];
            let items: Option<Vec<DiscussionResponse>> =
                self.get_json(repo, "/discussions", &query).await?;

            Ok::<_, GitHubError>(items.map(|items| {
                let mut discussions: Vec<GitHubDiscussion> =
                    items.into_iter().map(GitHubDiscussion::from).collect();
                sort_newest_first(&mut discussions);
                discussions.truncate(limit);
                discussions
            }))
        })
        .await
    }

    /// Newest issues in `state`, at most `limit`, pull requests excluded
    pub async fn issues(
        &self,
        repo: &str,
        limit: usize,
        state: IssueStateFilter,
    ) -> Fetch<Vec<GitHubIssue>> {
        let key = CacheKey::Issues {
            repo: repo.to_string(),
            limit,
            state,
        };
        self.cached(key, move || async move {
            let query = [
                ("per_page", limit.to_string()),
                ("sort", "created".to_string()),
                ("direction", "desc".to_string()),
                ("state", state.as_str().to_string()),
            ];
            let items: Option<Vec<IssueResponse>> =
                self.get_json(repo, "/issues", &query).await?;

            Ok::<_, GitHubError>(items.map(|items| {
                items
                    .into_iter()
                    .filter(|item| !item.is_pull_request())
                    .map(GitHubIssue::from)
                    .take(limit)
                    .collect()
            }))
        })
        .await
    }

    /// Whether the repository has Discussions turned on
    pub async fn has_discussions_enabled(&self, repo: &str) -> Fetch<bool> {
        let key = CacheKey::DiscussionsEnabled {
            repo: repo.to_string(),
        };
        self.cached(key, move || async move {
            let response: Option<RepoResponse> = self.get_json(repo, "", &[]).await?;
            Ok::<_, GitHubError>(response.map(|r| r.has_discussions == Some(true)))
        })
        .await
    }

    /// Fetch everything a project page needs at once, using the configured
    /// discussion and issue limits
    pub async fn overview(&self, repo: &str) -> RepoOverview {
        let (info, discussions, issues, discussions_enabled) = tokio::join!(
            self.repo_info(repo),
            self.discussions(repo, self.discussions_limit),
            self.issues(repo, self.issues_limit, IssueStateFilter::Open),
            self.has_discussions_enabled(repo),
        );

        RepoOverview {
            info,
            discussions,
            issues,
            discussions_enabled,
        }
    }

    /// Forget every cached response
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    async fn cached<T, F, Fut>(&self, key: CacheKey, fetch: F) -> Fetch<T>
    where
        T: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, GitHubError>>,
    {
        if let Some(value) = self.cache.get::<T>(&key) {
            tracing::debug!("Cache hit: {}", key);
            return Fetch::Cached(value);
        }

        tracing::debug!("Cache miss: {}", key);
        match fetch().await {
            Ok(Some(value)) => {
                self.cache.insert(key, value.clone());
                Fetch::Fresh(value)
            }
            Ok(None) => {
                tracing::warn!("GitHub resource not found: {}", key);
                Fetch::NotFound
            }
            Err(e) => {
                tracing::error!("GitHub request for {} failed: {}", key, e);
                Fetch::Failed(e)
            }
        }
    }

    /// GET `/repos/{repo}{suffix}`; `Ok(None)` on 404
    async fn get_json<R: DeserializeOwned>(
        &self,
        repo: &str,
        suffix: &str,
        query: &[(&str, String)],
    ) -> Result<Option<R>, GitHubError> {
        let url = format!(
            "{}/repos/{}{}",
            self.api_base,
            repo.trim_matches('/'),
            suffix
        );
        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(GitHubError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|source| GitHubError::Decode { url, source })
    }
}
