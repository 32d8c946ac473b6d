//! folio: the data layer of a personal static site
//!
//! Resolves Markdown content (projects and blog posts) from the content
//! directory and fetches live GitHub repository metadata through a cached
//! REST client. The two halves share nothing; the presentation layer uses
//! them independently.

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod github;
pub mod helpers;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use cache::ResponseCache;
pub use content::{BlogItem, ContentItem, ContentKind, ContentLoader, ProjectItem};
pub use error::{ContentError, GitHubError};
pub use github::{Fetch, GitHubClient};

/// A site rooted at a directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory (holds `projects/` and `blogs/`)
    pub content_dir: PathBuf,
}

impl Site {
    /// Open a site directory, reading `_config.yml` when it exists
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
        })
    }

    /// Loader for this site's content
    pub fn content(&self) -> ContentLoader {
        let renderer = content::MarkdownRenderer::from_config(&self.config.highlight);
        ContentLoader::with_renderer(&self.content_dir, renderer)
    }

    /// A cache with the configured time-to-live
    pub fn response_cache(&self) -> Arc<ResponseCache> {
        Arc::new(ResponseCache::new(self.config.github.cache_ttl()))
    }

    /// GitHub client sharing `cache`, authenticated from `GITHUB_TOKEN` when set
    pub fn github(&self, cache: Arc<ResponseCache>) -> Result<GitHubClient> {
        Ok(GitHubClient::from_env(&self.config.github, cache)?)
    }
}
