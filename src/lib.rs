//! teamblog: a static site generator for a small team blog
//!
//! Posts are Markdown files with YAML front-matter. They are loaded once per
//! build into a validated, sorted collection and rendered with embedded Tera
//! templates into post, member and tag pages.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod members;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{MarkdownRenderer, PostLoader};
use members::MemberDirectory;

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding one Markdown file per post
    pub posts_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Static assets copied verbatim into the output
    pub static_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let posts_dir = base_dir.join(&config.posts_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Ok(Self {
            config,
            base_dir,
            posts_dir,
            public_dir,
            static_dir,
        })
    }

    /// A fresh post loader with an empty cache
    pub fn loader(&self) -> Result<PostLoader> {
        let renderer = MarkdownRenderer::with_options(&self.config.highlight)?;
        Ok(PostLoader::new(&self.posts_dir, renderer))
    }

    /// The configured member directory
    pub fn members(&self) -> MemberDirectory {
        MemberDirectory::new(self.config.members.clone())
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
