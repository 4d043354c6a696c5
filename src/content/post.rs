//! Post models

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Editor field: a single name or an ordered list of names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Editor {
    One(String),
    Many(Vec<String>),
}

impl Editor {
    /// Editor names in source order
    pub fn names(&self) -> Vec<&str> {
        match self {
            Editor::One(name) => vec![name.as_str()],
            Editor::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// Validated post metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetaData {
    /// Post title (never blank)
    pub title: String,

    /// Member name of the author
    pub author: String,

    /// Optional editor(s)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<Editor>,

    /// Creation date as written in the source; also the sort key
    pub created_at: String,

    /// Last update date, `created_at` when the source has none
    pub updated_at: String,

    /// Distinct tags
    pub tags: BTreeSet<String>,

    /// Short description (never blank)
    pub summary: String,
}

/// A loaded post, ready to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    /// File name without the `.md` suffix
    pub slug: String,

    /// Rendered HTML body
    pub content: String,

    pub meta_data: PostMetaData,
}

impl PostData {
    /// Whether the post carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.meta_data.tags.contains(tag)
    }

    /// Whether the post was written by the given member
    pub fn is_by(&self, author: &str) -> bool {
        self.meta_data.author == author
    }
}
