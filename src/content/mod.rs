//! Content module - turns the posts directory into rendered posts

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use error::PostError;
pub use frontmatter::{FrontMatter, FrontMatterError};
pub use loader::{slug_from_filename, PostLoader};
pub use markdown::{MarkdownRenderer, Render, RenderError};
pub use post::{Editor, PostData, PostMetaData};
