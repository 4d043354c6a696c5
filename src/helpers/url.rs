//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside one path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/blog/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    format!(
        "{}{}",
        config.url.trim_end_matches('/'),
        url_for(config, path)
    )
}

/// Percent-encode a single path segment (tag names, member names, slugs)
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Directory name a tag, member or slug is written under.
///
/// `%`, `/` and `\` are percent-escaped, as is every dot of an all-dot name,
/// so any non-empty name maps to exactly one plain directory. Other
/// characters are kept as they are.
pub fn page_segment(name: &str) -> String {
    if name.chars().all(|c| c == '.') {
        return "%2E".repeat(name.len());
    }

    let mut segment = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '%' => segment.push_str("%25"),
            '/' => segment.push_str("%2F"),
            '\\' => segment.push_str("%5C"),
            _ => segment.push(c),
        }
    }
    segment
}

/// Link to `<dir>/<name>/` under the site root, matching the directory
/// [`page_segment`] names
///
/// # Examples
/// ```ignore
/// section_url(&config, "tags", "型システム") // -> "/tags/%E5%9E%8B.../"
/// ```
pub fn section_url(config: &SiteConfig, dir: &str, name: &str) -> String {
    url_for(
        config,
        &format!("{}/{}/", dir.trim_matches('/'), encode_segment(&page_segment(name))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/blog/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/blog/css/style.css");
        assert_eq!(url_for(&config, "about/"), "/blog/about/");
        assert_eq!(url_for(&config, ""), "/blog/");
        assert_eq!(url_for(&SiteConfig::default(), "/"), "/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/about/"),
            "https://example.com/blog/about/"
        );
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("rust"), "rust");
        assert_eq!(encode_segment("a b/c"), "a%20b%2Fc");
        assert_eq!(encode_segment("型"), "%E5%9E%8B");
    }

    #[test]
    fn test_page_segment() {
        assert_eq!(page_segment("rust"), "rust");
        assert_eq!(page_segment("型"), "型");
        assert_eq!(page_segment("CI/CD"), "CI%2FCD");
        assert_eq!(page_segment("100%"), "100%25");
        assert_eq!(page_segment("a\\b"), "a%5Cb");
        assert_eq!(page_segment(".."), "%2E%2E");
        assert_eq!(page_segment(".net"), ".net");
    }

    #[test]
    fn test_section_url() {
        let config = SiteConfig::default();
        assert_eq!(section_url(&config, "tags", "C#"), "/tags/C%23/");
        assert_eq!(section_url(&config, "/members/", "BaHo"), "/members/BaHo/");
        // The server decodes once, landing on the `CI%2FCD` directory
        assert_eq!(section_url(&config, "tags", "CI/CD"), "/tags/CI%252FCD/");
    }
}
