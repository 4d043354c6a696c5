//! Helper functions for building links in generated pages

mod url;

pub use url::*;
