//! Errors raised while loading posts

use std::path::PathBuf;
use thiserror::Error;

use super::markdown::RenderError;

/// Post loading errors
#[derive(Error, Debug)]
pub enum PostError {
    #[error("Cannot read posts directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read post {slug}: {source}")]
    NotFound {
        slug: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid front-matter in {slug}: {message}")]
    InvalidFrontMatter { slug: String, message: String },

    #[error("Missing meta data in {slug}: {}", missing.join(", "))]
    MissingMetadata {
        slug: String,
        missing: Vec<&'static str>,
    },

    #[error("Failed to render {slug}: {source}")]
    Render {
        slug: String,
        #[source]
        source: RenderError,
    },
}

impl PostError {
    /// Slug of the post that failed, if the error concerns a single post
    pub fn slug(&self) -> Option<&str> {
        match self {
            PostError::ReadDir { .. } => None,
            PostError::NotFound { slug, .. }
            | PostError::InvalidFrontMatter { slug, .. }
            | PostError::MissingMetadata { slug, .. }
            | PostError::Render { slug, .. } => Some(slug),
        }
    }
}
