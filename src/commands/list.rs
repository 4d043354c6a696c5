//! List site content

use anyhow::Result;
use std::collections::BTreeMap;

use crate::content::{PostLoader, Render};
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let loader = blog.loader()?;
    for line in listing(&loader, content_type)? {
        println!("{}", line);
    }
    Ok(())
}

/// Build the listing lines for one content type
pub fn listing<R: Render>(loader: &PostLoader<R>, content_type: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_all_posts()?;
            lines.push(format!("Posts ({}):", posts.len()));
            for post in posts {
                lines.push(format!(
                    "  {} - {} [{}]",
                    post.meta_data.created_at, post.meta_data.title, post.slug
                ));
            }
        }
        "tag" | "tags" => {
            let tags = loader.all_tags()?;
            lines.push(format!("Tags ({}):", tags.len()));
            for tag in tags {
                lines.push(format!("  {} ({})", tag, loader.posts_by_tag(tag)?.len()));
            }
        }
        "author" | "authors" => {
            let mut authors: BTreeMap<&str, usize> = BTreeMap::new();
            for post in loader.load_all_posts()? {
                *authors.entry(post.meta_data.author.as_str()).or_insert(0) += 1;
            }
            lines.push(format!("Authors ({}):", authors.len()));
            for (author, count) in authors {
                lines.push(format!("  {} ({})", author, count));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, author",
                content_type
            );
        }
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MarkdownRenderer;
    use std::fs;

    fn loader() -> (tempfile::TempDir, PostLoader) {
        let dir = tempfile::tempdir().unwrap();
        for (slug, author, date, tags) in [
            ("one", "sakito", "2021-01-01", "[a, b]"),
            ("two", "BaHo", "2021-02-01", "[b]"),
        ] {
            fs::write(
                dir.path().join(format!("{}.md", slug)),
                format!(
                    "---\ntitle: {slug}\nauthor: {author}\ncreatedAt: {date}\ntags: {tags}\nsummary: s\n---\n"
                ),
            )
            .unwrap();
        }
        let loader = PostLoader::new(dir.path(), MarkdownRenderer::new().unwrap());
        (dir, loader)
    }

    #[test]
    fn test_list_posts() {
        let (_dir, loader) = loader();
        assert_eq!(
            listing(&loader, "post").unwrap(),
            vec![
                "Posts (2):",
                "  2021-02-01 - two [two]",
                "  2021-01-01 - one [one]"
            ]
        );
    }

    #[test]
    fn test_list_tags() {
        let (_dir, loader) = loader();
        assert_eq!(
            listing(&loader, "tags").unwrap(),
            vec!["Tags (2):", "  a (1)", "  b (2)"]
        );
    }

    #[test]
    fn test_list_authors() {
        let (_dir, loader) = loader();
        assert_eq!(
            listing(&loader, "author").unwrap(),
            vec!["Authors (2):", "  BaHo (1)", "  sakito (1)"]
        );
    }

    #[test]
    fn test_unknown_type() {
        let (_dir, loader) = loader();
        assert!(listing(&loader, "category").is_err());
    }
}
