//! Content module - resolves Markdown files with front-matter into typed items

mod frontmatter;
mod item;
pub mod loader;
mod markdown;

pub use frontmatter::FrontMatter;
pub use item::{BlogItem, ContentItem, ContentKind, ProjectItem, ProjectType, RenderedContent};
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
