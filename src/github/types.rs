//! GitHub API response types.
//!
//! `*Response` structs mirror the REST payloads with every field optional, so
//! a partially populated document still normalizes. The public records are
//! what the site consumes.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::emoji::category_emoji;

/// Repository summary shown on project pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubRepoInfo {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub url: String,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussions_count: Option<u64>,
}

/// Author of a discussion or issue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubAuthor {
    pub login: String,
    pub avatar_url: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCount {
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionCategory {
    pub name: String,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubDiscussion {
    pub id: String,
    pub title: String,
    pub body: String,
    pub url: String,
    pub author: GitHubAuthor,
    pub created_at: String,
    pub updated_at: String,
    pub upvote_count: u64,
    pub comments: CommentCount,
    pub category: DiscussionCategory,
}

/// State of a single issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// State filter for issue listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStateFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl IssueStateFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueStateFilter::Open => "open",
            IssueStateFilter::Closed => "closed",
            IssueStateFilter::All => "all",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLabel {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubIssue {
    pub id: String,
    pub title: String,
    pub body: String,
    pub url: String,
    pub number: u64,
    pub state: IssueState,
    pub author: GitHubAuthor,
    pub created_at: String,
    pub updated_at: String,
    pub comments: CommentCount,
    pub labels: Vec<IssueLabel>,
}

/// `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RepoResponse {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub html_url: Option<String>,
    pub stargazers_count: Option<u64>,
    pub forks_count: Option<u64>,
    pub open_issues_count: Option<u64>,
    pub has_discussions: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UserResponse {
    pub login: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ReactionsResponse {
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CategoryResponse {
    pub name: Option<String>,
    pub emoji: Option<String>,
}

/// One element of `GET /repos/{owner}/{repo}/discussions`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DiscussionResponse {
    pub id: Option<serde_json::Value>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub html_url: Option<String>,
    pub user: Option<UserResponse>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub reactions: Option<ReactionsResponse>,
    pub comments: Option<u64>,
    pub category: Option<CategoryResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LabelResponse {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// One element of `GET /repos/{owner}/{repo}/issues`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct IssueResponse {
    pub id: Option<serde_json::Value>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub html_url: Option<String>,
    pub number: Option<u64>,
    pub state: Option<String>,
    pub user: Option<UserResponse>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub comments: Option<u64>,
    pub labels: Option<Vec<LabelResponse>>,
    /// Present (non-null) when the "issue" is really a pull request
    pub pull_request: Option<serde_json::Value>,
}

impl IssueResponse {
    pub fn is_pull_request(&self) -> bool {
        matches!(&self.pull_request, Some(v) if !v.is_null())
    }
}

/// Ids come back as numbers from REST and as strings from some proxies
fn id_string(id: Option<serde_json::Value>) -> String {
    match id {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

impl From<UserResponse> for GitHubAuthor {
    fn from(user: UserResponse) -> Self {
        Self {
            login: user.login.unwrap_or_default(),
            avatar_url: user.avatar_url.unwrap_or_default(),
            url: user.html_url.unwrap_or_default(),
        }
    }
}

impl From<RepoResponse> for GitHubRepoInfo {
    fn from(repo: RepoResponse) -> Self {
        Self {
            name: repo.name.unwrap_or_default(),
            full_name: repo.full_name.unwrap_or_default(),
            description: repo.description,
            url: repo.html_url.unwrap_or_default(),
            stargazers_count: repo.stargazers_count.unwrap_or(0),
            forks_count: repo.forks_count.unwrap_or(0),
            open_issues_count: repo.open_issues_count.unwrap_or(0),
            discussions_count: None,
        }
    }
}

impl From<DiscussionResponse> for GitHubDiscussion {
    fn from(item: DiscussionResponse) -> Self {
        let category = item.category.unwrap_or_default();
        let emoji = category_emoji(category.emoji.as_deref(), category.name.as_deref());

        Self {
            id: id_string(item.id),
            title: item.title.unwrap_or_default(),
            body: item.body.unwrap_or_default(),
            url: item.html_url.unwrap_or_default(),
            author: item.user.map(GitHubAuthor::from).unwrap_or_default(),
            created_at: item.created_at.unwrap_or_default(),
            updated_at: item.updated_at.unwrap_or_default(),
            upvote_count: item.reactions.and_then(|r| r.total_count).unwrap_or(0),
            comments: CommentCount {
                total_count: item.comments.unwrap_or(0),
            },
            category: DiscussionCategory {
                name: category.name.unwrap_or_else(|| "General".to_string()),
                emoji: emoji.to_string(),
            },
        }
    }
}

impl From<IssueResponse> for GitHubIssue {
    fn from(item: IssueResponse) -> Self {
        let state = match item.state.as_deref() {
            Some("closed") => IssueState::Closed,
            _ => IssueState::Open,
        };

        Self {
            id: id_string(item.id),
            title: item.title.unwrap_or_default(),
            body: item.body.unwrap_or_default(),
            url: item.html_url.unwrap_or_default(),
            number: item.number.unwrap_or(0),
            state,
            author: item.user.map(GitHubAuthor::from).unwrap_or_default(),
            created_at: item.created_at.unwrap_or_default(),
            updated_at: item.updated_at.unwrap_or_default(),
            comments: CommentCount {
                total_count: item.comments.unwrap_or(0),
            },
            labels: item
                .labels
                .unwrap_or_default()
                .into_iter()
                .map(|label| IssueLabel {
                    name: label.name.unwrap_or_default(),
                    color: label.color.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

/// Newest first by `created_at`; unparseable timestamps go last
pub(crate) fn sort_newest_first(discussions: &mut [GitHubDiscussion]) {
    discussions.sort_by_cached_key(|d| {
        std::cmp::Reverse(DateTime::parse_from_rfc3339(&d.created_at).ok())
    });
}
