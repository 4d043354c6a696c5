//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::members::Member;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub posts_dir: String,
    pub public_dir: String,
    pub static_dir: String,
    pub post_dir: String,
    pub tag_dir: String,
    pub member_dir: String,

    // Writing
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Members
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Team Blog".to_string(),
            description: String::new(),
            language: "ja".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            posts_dir: "data/posts".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),
            post_dir: "posts".to_string(),
            tag_dir: "tags".to_string(),
            member_dir: "members".to_string(),

            highlight: HighlightConfig::default(),

            members: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Name of a syntect built-in theme
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "InspiredGitHub".to_string(),
            line_number: false,
        }
    }
}
