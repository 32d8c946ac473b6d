//! GitHub repository metadata: repo info, discussions and issues.

mod client;
mod emoji;
mod fetch;
mod types;

pub use client::{GitHubClient, RepoOverview, TOKEN_ENV};
pub use emoji::{category_emoji, DEFAULT_EMOJI};
pub use fetch::Fetch;
pub use types::{
    CommentCount, DiscussionCategory, GitHubAuthor, GitHubDiscussion, GitHubIssue,
    GitHubRepoInfo, IssueLabel, IssueState, IssueStateFilter,
};

use crate::helpers::encode_component;

/// Link that opens GitHub's "new issue" form for `repo` with `title` filled in
pub fn new_issue_url(repo: &str, title: &str) -> String {
    format!(
        "https://github.com/{}/issues/new?title={}",
        repo.trim_matches('/'),
        encode_component(title)
    )
}
