//! Content resolution against a real directory tree

use std::fs;
use std::path::Path;

use folio::content::{ContentKind, ContentLoader, ProjectType};
use folio::{ContentError, Site};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn site() -> (TempDir, ContentLoader) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        root,
        "blogs/hello-world.md",
        "---\ntitle: Hello\ndate: 2024-01-01\ntags: [a, b]\n---\n# Hi",
    );
    write(
        root,
        "blogs/later.md",
        "---\ntitle: Later\ndate: 2024-03-10\ncategory: notes\n---\nLater post.\n",
    );
    write(root, "blogs/untitled.md", "No front-matter here.\n");
    write(
        root,
        "blogs/earliest.md",
        "---\ntitle: Earliest\ndate: 2023/12/31\n---\nOld.\n",
    );
    write(
        root,
        "blogs/中文标题.md",
        "---\ndate: 2024-02-01\n---\n你好，世界\n",
    );
    write(root, "blogs/notes.txt", "not markdown");
    write(root, "blogs/drafts/hidden.md", "---\ntitle: Hidden\n---\n");

    write(
        root,
        "projects/tool.md",
        "---\ntitle: Tool\ntype: starred\nlink: https://example.com/tool\nimage: /img/tool.png\ngithubRepo: me/tool\n---\nA tool.\n",
    );
    write(
        root,
        "projects/mine.md",
        "---\ntitle: Mine\ndate: 2024-05-05\n---\nMine.\n",
    );

    let loader = ContentLoader::new(root);
    (dir, loader)
}

#[test]
fn test_resolve_hello_world_example() {
    let (_dir, loader) = site();
    let item = loader
        .resolve_by_slug("hello-world", ContentKind::Blogs)
        .unwrap()
        .unwrap();

    assert_eq!(item.slug, "hello-world");
    assert_eq!(item.title, "Hello");
    assert_eq!(item.date.as_deref(), Some("2024-01-01"));
    assert_eq!(item.tags, vec!["a", "b"]);
    assert_eq!(item.content, "# Hi");
    assert_eq!(item.reading_time, "1 min read");
    assert_eq!(item.frontmatter.title.as_deref(), Some("Hello"));
}

#[test]
fn test_title_defaults_to_slug() {
    let (_dir, loader) = site();
    let item = loader
        .resolve_by_slug("untitled", ContentKind::Blogs)
        .unwrap()
        .unwrap();
    assert_eq!(item.title, "untitled");
    assert!(item.tags.is_empty());
    assert_eq!(item.content, "No front-matter here.\n");
}

#[test]
fn test_empty_title_defaults_to_slug() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "blogs/blank.md", "---\ntitle: \"\"\n---\nBody\n");
    let loader = ContentLoader::new(dir.path());

    let item = loader
        .resolve_by_slug("blank", ContentKind::Blogs)
        .unwrap()
        .unwrap();
    assert_eq!(item.title, "blank");

    let listed = loader.list_all(ContentKind::Blogs, None).unwrap();
    assert_eq!(listed[0].title, "blank");
}

#[test]
fn test_percent_encoded_non_ascii_slug() {
    let (_dir, loader) = site();
    let encoded = "%E4%B8%AD%E6%96%87%E6%A0%87%E9%A2%98";
    let item = loader
        .resolve_by_slug(encoded, ContentKind::Blogs)
        .unwrap()
        .unwrap();

    // slug is echoed back as given, title falls back to the decoded form
    assert_eq!(item.slug, encoded);
    assert_eq!(item.title, "中文标题");
    assert_eq!(item.date.as_deref(), Some("2024-02-01"));
}

#[test]
fn test_missing_slug() {
    let (_dir, loader) = site();
    assert!(loader
        .resolve_by_slug("nope", ContentKind::Blogs)
        .unwrap()
        .is_none());

    let err = loader
        .require_by_slug("nope", ContentKind::Blogs)
        .unwrap_err();
    assert!(matches!(
        err,
        ContentError::NotFound { ref slug, kind: ContentKind::Blogs } if slug == "nope"
    ));
}

#[test]
fn test_slug_cannot_leave_kind_directory() {
    let (_dir, loader) = site();
    assert!(loader
        .resolve_by_slug("..%2Fprojects%2Ftool", ContentKind::Blogs)
        .unwrap()
        .is_none());
    assert!(loader
        .resolve_by_slug("drafts/hidden", ContentKind::Blogs)
        .unwrap()
        .is_none());
}

#[test]
fn test_list_slugs() {
    let (_dir, loader) = site();
    let slugs = loader.list_slugs(ContentKind::Blogs).unwrap();
    assert_eq!(
        slugs,
        vec!["earliest", "hello-world", "later", "untitled", "中文标题"]
    );
}

#[test]
fn test_missing_directory_lists_nothing() {
    let dir = TempDir::new().unwrap();
    let loader = ContentLoader::new(dir.path());

    assert!(loader.list_slugs(ContentKind::Projects).unwrap().is_empty());
    assert!(loader.list_all(ContentKind::Blogs, None).unwrap().is_empty());
    assert!(loader.list_all_projects().unwrap().is_empty());
    assert!(loader
        .resolve_by_slug("anything", ContentKind::Blogs)
        .unwrap()
        .is_none());
}

#[test]
fn test_list_all_sorted_newest_first() {
    let (_dir, loader) = site();
    let items = loader.list_all(ContentKind::Blogs, None).unwrap();
    let slugs: Vec<&str> = items.iter().map(|i| i.slug.as_str()).collect();

    // "untitled" has no date and keeps its filename position
    assert_eq!(
        slugs,
        vec!["later", "中文标题", "hello-world", "untitled", "earliest"]
    );
}

#[test]
fn test_list_all_limit() {
    let (_dir, loader) = site();
    let items = loader.list_all(ContentKind::Blogs, Some(2)).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].slug, "later");

    let all = loader.list_all(ContentKind::Blogs, Some(50)).unwrap();
    assert_eq!(all.len(), 5);
}

#[test]
fn test_list_all_zero_limit_is_empty() {
    let (_dir, loader) = site();
    assert!(loader.list_all(ContentKind::Blogs, Some(0)).unwrap().is_empty());
    assert_eq!(loader.list_all(ContentKind::Blogs, None).unwrap().len(), 5);
}

#[test]
fn test_list_all_projects() {
    let (_dir, loader) = site();
    let projects = loader.list_all_projects().unwrap();
    assert_eq!(projects.len(), 2);

    let tool = projects.iter().find(|p| p.slug == "tool").unwrap();
    assert_eq!(tool.project_type, ProjectType::Starred);
    assert_eq!(tool.link.as_deref(), Some("https://example.com/tool"));
    assert_eq!(tool.image.as_deref(), Some("/img/tool.png"));
    assert_eq!(tool.github_repo.as_deref(), Some("me/tool"));

    let mine = projects.iter().find(|p| p.slug == "mine").unwrap();
    assert_eq!(mine.project_type, ProjectType::Personal);
    assert_eq!(mine.link, None);
}

#[test]
fn test_list_all_blogs_category() {
    let (_dir, loader) = site();
    let blogs = loader.list_all_blogs().unwrap();
    let later = blogs.iter().find(|b| b.slug == "later").unwrap();
    assert_eq!(later.category.as_deref(), Some("notes"));
    let hello = blogs.iter().find(|b| b.slug == "hello-world").unwrap();
    assert_eq!(hello.category, None);
}

#[test]
fn test_resolve_markup_double_encoded() {
    let (_dir, loader) = site();
    // "中文标题" encoded twice
    let twice = "%25E4%25B8%25AD%25E6%2596%2587%25E6%25A0%2587%25E9%25A2%2598";
    let rendered = loader
        .resolve_markup(twice, ContentKind::Blogs)
        .unwrap()
        .unwrap();

    assert_eq!(rendered.slug, twice);
    assert!(rendered.html.contains("<p>你好，世界</p>"));
    assert_eq!(rendered.frontmatter.date.as_deref(), Some("2024-02-01"));
    assert_eq!(rendered.reading_time, "1 min read");
}

#[test]
fn test_resolve_markup_missing_is_none() {
    let (_dir, loader) = site();
    assert!(loader
        .resolve_markup("nope", ContentKind::Projects)
        .unwrap()
        .is_none());

    let rendered = loader
        .resolve_markup("hello-world", ContentKind::Blogs)
        .unwrap()
        .unwrap();
    assert!(rendered.html.contains("<h1>Hi</h1>"));
}

#[test]
fn test_broken_json_frontmatter_is_reported() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "blogs/broken.md", "{\"title\": }\nbody\n");
    let loader = ContentLoader::new(dir.path());

    let err = loader
        .resolve_by_slug("broken", ContentKind::Blogs)
        .unwrap_err();
    assert!(matches!(err, ContentError::FrontMatter { .. }));
}

#[test]
fn test_site_reads_content_dir_from_config() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "_config.yml", "content_dir: pages\n");
    write(dir.path(), "pages/projects/demo.md", "---\ntitle: Demo\n---\n");

    let site = Site::new(dir.path()).unwrap();
    assert_eq!(site.content_dir, dir.path().join("pages"));

    let slugs = site.content().list_slugs(ContentKind::Projects).unwrap();
    assert_eq!(slugs, vec!["demo"]);
}
