//! Post loader - reads the posts directory into a cached, sorted collection

use once_cell::sync::OnceCell;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::markdown::{MarkdownRenderer, Render};
use super::{FrontMatter, PostData, PostError};

/// Derive a slug from a post file name by dropping a trailing `.md`.
/// Names without the suffix come back unchanged.
pub fn slug_from_filename(name: &str) -> &str {
    name.strip_suffix(".md").unwrap_or(name)
}

/// Loads posts from one directory and caches the full collection.
///
/// The collection is read at most once per loader: the first call that
/// needs it populates the cache, concurrent callers wait for that load,
/// and later calls never touch the filesystem.
pub struct PostLoader<R = MarkdownRenderer> {
    posts_dir: PathBuf,
    renderer: R,
    posts: OnceCell<Vec<PostData>>,
}

impl<R: Render> PostLoader<R> {
    /// Create a new loader over `posts_dir`
    pub fn new<P: AsRef<Path>>(posts_dir: P, renderer: R) -> Self {
        Self {
            posts_dir: posts_dir.as_ref().to_path_buf(),
            renderer,
            posts: OnceCell::new(),
        }
    }

    /// List post file names, sorted by name
    pub fn list_slugs(&self) -> Result<Vec<String>, PostError> {
        let read_dir_error = |source: std::io::Error| PostError::ReadDir {
            path: self.posts_dir.clone(),
            source,
        };

        fs::read_dir(&self.posts_dir).map_err(read_dir_error)?;

        let mut slugs = Vec::new();
        for entry in WalkDir::new(&self.posts_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| read_dir_error(e.into()))?;
            if !entry.file_type().is_file() || !is_markdown_file(entry.path()) {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) if name.starts_with('.') => {}
                Some(name) => slugs.push(name.to_string()),
                None => tracing::warn!("Skipping non UTF-8 file name {:?}", entry.path()),
            }
        }

        Ok(slugs)
    }

    /// Load a single post; `slug` may carry the `.md` suffix
    pub fn load_post(&self, slug: &str) -> Result<PostData, PostError> {
        let slug = slug_from_filename(slug);
        let path = self.posts_dir.join(format!("{}.md", slug));

        let content = fs::read_to_string(&path).map_err(|source| PostError::NotFound {
            slug: slug.to_string(),
            source,
        })?;

        let (fm, body) =
            FrontMatter::parse(&content).map_err(|e| PostError::InvalidFrontMatter {
                slug: slug.to_string(),
                message: e.to_string(),
            })?;

        let meta_data = fm
            .into_metadata()
            .map_err(|missing| PostError::MissingMetadata {
                slug: slug.to_string(),
                missing,
            })?;

        let content = self
            .renderer
            .render(body)
            .map_err(|source| PostError::Render {
                slug: slug.to_string(),
                source,
            })?;

        tracing::debug!("Loaded post {}", slug);

        Ok(PostData {
            slug: slug.to_string(),
            content,
            meta_data,
        })
    }

    /// All posts, newest `createdAt` first
    pub fn load_all_posts(&self) -> Result<&[PostData], PostError> {
        self.posts
            .get_or_try_init(|| self.read_all_posts())
            .map(Vec::as_slice)
    }

    fn read_all_posts(&self) -> Result<Vec<PostData>, PostError> {
        let slugs = self.list_slugs()?;

        let mut posts = slugs
            .par_iter()
            .map(|slug| self.load_post(slug))
            .collect::<Result<Vec<_>, _>>()?;

        // Stable: equal dates keep file name order
        posts.sort_by(|a, b| b.meta_data.created_at.cmp(&a.meta_data.created_at));

        tracing::info!("Loaded {} posts from {:?}", posts.len(), self.posts_dir);
        Ok(posts)
    }

    /// Posts written by `author`
    pub fn posts_by_author(&self, author: &str) -> Result<Vec<&PostData>, PostError> {
        Ok(self
            .load_all_posts()?
            .iter()
            .filter(|post| post.is_by(author))
            .collect())
    }

    /// Posts carrying `tag`
    pub fn posts_by_tag(&self, tag: &str) -> Result<Vec<&PostData>, PostError> {
        Ok(self
            .load_all_posts()?
            .iter()
            .filter(|post| post.has_tag(tag))
            .collect())
    }

    /// Every distinct tag across all posts
    pub fn all_tags(&self) -> Result<BTreeSet<&str>, PostError> {
        Ok(self
            .load_all_posts()?
            .iter()
            .flat_map(|post| post.meta_data.tags.iter().map(String::as_str))
            .collect())
    }

    /// Look up a loaded post by slug
    pub fn post(&self, slug: &str) -> Result<Option<&PostData>, PostError> {
        let slug = slug_from_filename(slug);
        Ok(self.load_all_posts()?.iter().find(|post| post.slug == slug))
    }
}

/// Check if a file is a markdown post
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}
