//! Content item models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use super::FrontMatter;

/// The content collections a site keeps under its content directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Projects,
    Blogs,
}

impl ContentKind {
    /// Subdirectory name under the content root
    pub fn dir_name(self) -> &'static str {
        match self {
            ContentKind::Projects => "projects",
            ContentKind::Blogs => "blogs",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "projects" => Ok(ContentKind::Projects),
            "blogs" => Ok(ContentKind::Blogs),
            other => Err(format!(
                "Unknown content kind: {}. Available: projects, blogs",
                other
            )),
        }
    }
}

/// A Markdown content file resolved from disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Lookup key, as passed by the caller or derived from the filename
    pub slug: String,

    /// Front-matter title, falling back to the decoded slug
    pub title: String,

    pub date: Option<String>,

    pub description: Option<String>,

    pub tags: Vec<String>,

    /// Raw Markdown body without the front-matter block
    pub content: String,

    /// Display string such as "3 min read"
    pub reading_time: String,

    pub frontmatter: FrontMatter,
}

/// Whether a project is the author's own or one they follow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    #[default]
    Personal,
    Starred,
}

impl ProjectType {
    fn from_frontmatter(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("starred") => ProjectType::Starred,
            Some("personal") | None => ProjectType::Personal,
            Some(other) => {
                tracing::debug!("Unknown project type {:?}, using personal", other);
                ProjectType::Personal
            }
        }
    }
}

/// A project page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
    #[serde(flatten)]
    pub item: ContentItem,

    #[serde(rename = "type")]
    pub project_type: ProjectType,

    /// External project URL
    pub link: Option<String>,

    /// Cover image URL
    pub image: Option<String>,

    /// `owner/name` of the repository whose metadata the page shows
    pub github_repo: Option<String>,
}

impl From<ContentItem> for ProjectItem {
    fn from(item: ContentItem) -> Self {
        let fm = &item.frontmatter;
        let project_type = ProjectType::from_frontmatter(fm.project_type.as_deref());
        let link = fm.link.clone();
        let image = fm.image.clone();
        let github_repo = fm.github_repo.clone();
        Self {
            item,
            project_type,
            link,
            image,
            github_repo,
        }
    }
}

impl Deref for ProjectItem {
    type Target = ContentItem;

    fn deref(&self) -> &ContentItem {
        &self.item
    }
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogItem {
    #[serde(flatten)]
    pub item: ContentItem,

    pub category: Option<String>,
}

impl From<ContentItem> for BlogItem {
    fn from(item: ContentItem) -> Self {
        let category = item.frontmatter.category.clone();
        Self { item, category }
    }
}

impl Deref for BlogItem {
    type Target = ContentItem;

    fn deref(&self) -> &ContentItem {
        &self.item
    }
}

/// A content file with its body rendered to HTML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedContent {
    pub slug: String,
    pub html: String,
    pub frontmatter: FrontMatter,
    pub reading_time: String,
}
