//! Error types for content resolution and the GitHub client

use std::path::PathBuf;

use thiserror::Error;

use crate::content::ContentKind;

/// Errors raised while reading content from disk
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no {kind} entry for slug: {slug}")]
    NotFound { slug: String, kind: ContentKind },

    #[error("invalid front-matter in {path:?}: {message}")]
    FrontMatter { path: PathBuf, message: String },
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while talking to the GitHub REST API.
///
/// These never escape the read operations of [`crate::github::GitHubClient`];
/// they are carried inside [`crate::github::Fetch::Failed`] instead.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("unexpected GitHub response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} header contains characters not allowed in HTTP headers")]
    InvalidHeader(&'static str),
}

pub type ContentResult<T> = std::result::Result<T, ContentError>;
