//! Content loader - resolves slugs to Markdown files under the content directory

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{
    BlogItem, ContentItem, ContentKind, FrontMatter, MarkdownRenderer, ProjectItem,
    RenderedContent,
};
use crate::error::{ContentError, ContentResult};
use crate::helpers::{decode_component, decode_component_twice, reading_time};

const MARKDOWN_EXT: &str = ".md";

/// Loads content from `<content_dir>/{projects,blogs}/*.md`
pub struct ContentLoader {
    content_dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl ContentLoader {
    /// Create a new content loader rooted at `content_dir`
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self::with_renderer(content_dir, MarkdownRenderer::new())
    }

    pub fn with_renderer(content_dir: impl Into<PathBuf>, renderer: MarkdownRenderer) -> Self {
        Self {
            content_dir: content_dir.into(),
            renderer,
        }
    }

    /// Directory holding the files of one content kind
    pub fn kind_dir(&self, kind: ContentKind) -> PathBuf {
        self.content_dir.join(kind.dir_name())
    }

    /// Slugs of every Markdown file of a kind, in filename order
    pub fn list_slugs(&self, kind: ContentKind) -> ContentResult<Vec<String>> {
        Ok(markdown_files(&self.kind_dir(kind))
            .into_iter()
            .map(|(slug, _)| slug)
            .collect())
    }

    /// Resolve a (possibly percent-encoded) slug to its content item.
    ///
    /// Returns `Ok(None)` when no file matches.
    pub fn resolve_by_slug(
        &self,
        slug: &str,
        kind: ContentKind,
    ) -> ContentResult<Option<ContentItem>> {
        let decoded = decode_component(slug);
        match self.locate(&decoded, kind) {
            Some(path) => self.load_item(&path, slug, &decoded).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`resolve_by_slug`](Self::resolve_by_slug), but a missing file is an error
    pub fn require_by_slug(&self, slug: &str, kind: ContentKind) -> ContentResult<ContentItem> {
        self.resolve_by_slug(slug, kind)?
            .ok_or_else(|| ContentError::NotFound {
                slug: slug.to_string(),
                kind,
            })
    }

    /// Resolve a slug and render its body to HTML.
    ///
    /// The slug is decoded twice when the first pass still leaves escapes,
    /// since nested routing layers can encode it twice.
    pub fn resolve_markup(
        &self,
        slug: &str,
        kind: ContentKind,
    ) -> ContentResult<Option<RenderedContent>> {
        let decoded = decode_component_twice(slug);
        let Some(path) = self.locate(&decoded, kind) else {
            return Ok(None);
        };

        let (frontmatter, body) = read_content_file(&path)?;
        Ok(Some(RenderedContent {
            slug: slug.to_string(),
            html: self.renderer.render(&body),
            reading_time: reading_time(&body),
            frontmatter,
        }))
    }

    /// Load every item of a kind, newest first, optionally truncated to `limit`
    pub fn list_all(
        &self,
        kind: ContentKind,
        limit: Option<usize>,
    ) -> ContentResult<Vec<ContentItem>> {
        let mut items = Vec::new();
        for (slug, path) in markdown_files(&self.kind_dir(kind)) {
            items.push(self.load_item(&path, &slug, &slug)?);
        }

        let mut items = sort_by_date_desc(items);
        if let Some(limit) = limit {
            items.truncate(limit);
        }

        Ok(items)
    }

    /// All projects, newest first
    pub fn list_all_projects(&self) -> ContentResult<Vec<ProjectItem>> {
        Ok(self
            .list_all(ContentKind::Projects, None)?
            .into_iter()
            .map(ProjectItem::from)
            .collect())
    }

    /// All blog posts, newest first
    pub fn list_all_blogs(&self) -> ContentResult<Vec<BlogItem>> {
        Ok(self
            .list_all(ContentKind::Blogs, None)?
            .into_iter()
            .map(BlogItem::from)
            .collect())
    }

    /// Find the file for an already-decoded slug
    fn locate(&self, decoded: &str, kind: ContentKind) -> Option<PathBuf> {
        if !is_safe_slug(decoded) {
            tracing::debug!("Rejecting slug {:?}", decoded);
            return None;
        }

        let dir = self.kind_dir(kind);
        let exact = dir.join(format!("{}{}", decoded, MARKDOWN_EXT));
        if exact.is_file() {
            return Some(exact);
        }

        // Filenames may not round-trip through the exact path (e.g. non-ASCII
        // names on some filesystems), so compare directory entries directly
        let found = markdown_files(&dir)
            .into_iter()
            .find(|(stem, _)| stem == decoded)
            .map(|(_, path)| path);
        if found.is_some() {
            tracing::debug!("Resolved {:?} in {} by directory scan", decoded, kind);
        }
        found
    }

    /// Load a single item from a file
    fn load_item(&self, path: &Path, slug: &str, decoded: &str) -> ContentResult<ContentItem> {
        let (frontmatter, body) = read_content_file(path)?;

        Ok(ContentItem {
            slug: slug.to_string(),
            title: frontmatter
                .title
                .clone()
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| decoded.to_string()),
            date: frontmatter.date.clone(),
            description: frontmatter.description.clone(),
            tags: frontmatter.tags.clone(),
            reading_time: reading_time(&body),
            content: body,
            frontmatter,
        })
    }
}

/// Read a file and split it into front-matter and body
fn read_content_file(path: &Path) -> ContentResult<(FrontMatter, String)> {
    let text = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
    let (fm, body) = FrontMatter::parse(&text).map_err(|e| ContentError::FrontMatter {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok((fm, body.to_string()))
}

/// `(stem, path)` of each Markdown file directly inside `dir`, sorted by name.
/// A missing directory has no files.
fn markdown_files(dir: &Path) -> Vec<(String, PathBuf)> {
    if !dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let stem = e.file_name().to_str()?.strip_suffix(MARKDOWN_EXT)?.to_string();
            Some((stem, e.into_path()))
        })
        .collect()
}

/// A slug must name a file inside its kind directory
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}

/// Order items newest first.
///
/// Dated items are sorted among themselves; undated items (or ones whose
/// date does not parse) stay in the slots they were found in.
fn sort_by_date_desc(items: Vec<ContentItem>) -> Vec<ContentItem> {
    let mut slots: Vec<Option<ContentItem>> = items.into_iter().map(Some).collect();
    let mut positions = Vec::new();
    let mut dated = Vec::new();

    for (i, slot) in slots.iter_mut().enumerate() {
        let date = slot.as_ref().and_then(|item| item.frontmatter.parse_date());
        if let Some(date) = date {
            if let Some(item) = slot.take() {
                positions.push(i);
                dated.push((date, item));
            }
        }
    }

    // stable, so equal dates keep filename order
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    for (pos, (_, item)) in positions.into_iter().zip(dated) {
        slots[pos] = Some(item);
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(slug: &str, date: Option<&str>) -> ContentItem {
        ContentItem {
            slug: slug.to_string(),
            title: slug.to_string(),
            date: date.map(str::to_string),
            description: None,
            tags: Vec::new(),
            content: String::new(),
            reading_time: "0 min read".to_string(),
            frontmatter: FrontMatter {
                date: date.map(str::to_string),
                ..FrontMatter::default()
            },
        }
    }

    fn slugs(items: &[ContentItem]) -> Vec<&str> {
        items.iter().map(|i| i.slug.as_str()).collect()
    }

    #[test]
    fn test_sort_dated_descending() {
        let sorted = sort_by_date_desc(vec![
            item("old", Some("2023-01-01")),
            item("new", Some("2024-06-01")),
            item("mid", Some("2024/01/15")),
        ]);
        assert_eq!(slugs(&sorted), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_sort_keeps_undated_in_place() {
        let sorted = sort_by_date_desc(vec![
            item("a", Some("2020-01-01")),
            item("undated-1", None),
            item("b", Some("2024-01-01")),
            item("garbled", Some("not a date")),
            item("c", Some("2022-01-01")),
        ]);
        assert_eq!(
            slugs(&sorted),
            vec!["b", "undated-1", "c", "garbled", "a"]
        );
    }

    #[test]
    fn test_is_safe_slug() {
        assert!(is_safe_slug("hello-world"));
        assert!(is_safe_slug("中文标题"));
        assert!(!is_safe_slug(""));
        assert!(!is_safe_slug(".."));
        assert!(!is_safe_slug("../secrets"));
        assert!(!is_safe_slug("a\\b"));
    }
}
