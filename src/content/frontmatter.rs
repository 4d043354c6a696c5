//! Front-matter parsing and metadata validation

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use super::post::{Editor, PostMetaData};

/// A `---` line, optionally followed by whitespace
fn is_fence(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Malformed front-matter block
#[derive(Error, Debug)]
#[error("{0}")]
pub struct FrontMatterError(String);

/// Accepts any scalar and keeps its textual form, so unquoted dates and
/// numbers decode into string fields
struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string or a scalar value")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ScalarVisitor)
}

/// A single tag entry
struct Tag(String);

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer
            .deserialize_any(ScalarVisitor)?
            .map(Tag)
            .ok_or_else(|| de::Error::custom("tag must not be null"))
    }
}

/// Custom deserializer that handles both a single tag and a list of tags.
/// `null` means the field is absent.
fn tag_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TagList;

    impl<'de> Visitor<'de> for TagList {
        type Value = Option<Vec<String>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a tag or a list of tags")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(vec![value.to_string()]))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(vec![value]))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(ScalarVisitor.visit_i64(value)?.map(|tag| vec![tag]))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(ScalarVisitor.visit_u64(value)?.map(|tag| vec![tag]))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(ScalarVisitor.visit_f64(value)?.map(|tag| vec![tag]))
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(ScalarVisitor.visit_bool(value)?.map(|tag| vec![tag]))
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut tags = Vec::new();
            while let Some(Tag(tag)) = seq.next_element::<Tag>()? {
                tags.push(tag);
            }
            Ok(Some(tags))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(TagList)
}

/// Front-matter exactly as written in the source file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub author: Option<String>,
    pub editor: Option<Editor>,
    #[serde(rename = "createdAt", deserialize_with = "scalar_string")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", deserialize_with = "scalar_string")]
    pub updated_at: Option<String>,
    #[serde(deserialize_with = "tag_list")]
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "scalar_string")]
    pub summary: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}');

        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        // No front-matter found
        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml(content: &str) -> Result<(Self, &str), FrontMatterError> {
        // The opening fence must stand on its own line
        let Some((first, rest)) = content.split_once('\n') else {
            return Ok((FrontMatter::default(), content));
        };
        if !is_fence(first) {
            return Ok((FrontMatter::default(), content));
        }

        let mut end = None;
        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if is_fence(line) {
                end = Some((offset, offset + line.len()));
                break;
            }
            offset += line.len();
        }
        let Some((yaml_end, body_start)) = end else {
            return Err(FrontMatterError(
                "unterminated front-matter block".to_string(),
            ));
        };

        let (yaml, remaining) = (&rest[..yaml_end], &rest[body_start..]);
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml)
            .map_err(|e| FrontMatterError(format!("invalid YAML: {}", e)))?;
        Ok((fm, remaining))
    }

    fn parse_json(content: &str) -> Result<(Self, &str), FrontMatterError> {
        // JSON front-matter fenced by ;;;
        if let Some(rest) = content.strip_prefix(";;;") {
            let end_pos = rest.find(";;;").ok_or_else(|| {
                FrontMatterError("unterminated JSON front-matter block".to_string())
            })?;
            let json = rest[..end_pos].trim();
            let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);
            return Self::decode_json(json, remaining);
        }

        // A bare JSON object at the start of the file
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        for (i, c) in content.char_indices() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let remaining = content[i + 1..].trim_start_matches(['\n', '\r']);
                        return Self::decode_json(&content[..=i], remaining);
                    }
                }
                _ => {}
            }
        }

        Err(FrontMatterError("unterminated JSON front-matter".to_string()))
    }

    fn decode_json<'a>(json: &str, remaining: &'a str) -> Result<(Self, &'a str), FrontMatterError> {
        if json.is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }
        let fm = serde_json::from_str::<FrontMatter>(json)
            .map_err(|e| FrontMatterError(format!("invalid JSON: {}", e)))?;
        Ok((fm, remaining))
    }

    /// Normalize and validate into typed metadata.
    ///
    /// A missing `updatedAt` falls back to `createdAt` and missing tags become
    /// an empty set. On failure every absent required field is returned,
    /// in declaration order.
    pub fn into_metadata(self) -> Result<PostMetaData, Vec<&'static str>> {
        let FrontMatter {
            title,
            author,
            editor,
            created_at,
            updated_at,
            tags,
            summary,
        } = self;

        let updated_at = updated_at
            .filter(|s| !s.is_empty())
            .or_else(|| created_at.clone());
        let tags: BTreeSet<String> = tags.unwrap_or_default().into_iter().collect();
        let title = title.filter(|s| !s.trim().is_empty());
        let summary = summary.filter(|s| !s.trim().is_empty());

        let mut missing = Vec::new();
        if title.is_none() {
            missing.push("title");
        }
        if author.is_none() {
            missing.push("author");
        }
        if created_at.is_none() {
            missing.push("createdAt");
        }
        if updated_at.is_none() {
            missing.push("updatedAt");
        }
        if summary.is_none() {
            missing.push("summary");
        }

        match (title, author, created_at, updated_at, summary) {
            (Some(title), Some(author), Some(created_at), Some(updated_at), Some(summary)) => {
                Ok(PostMetaData {
                    title,
                    author,
                    editor,
                    created_at,
                    updated_at,
                    tags,
                    summary,
                })
            }
            _ => Err(missing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"---
title: Hello World
author: sakito
editor:
  - BaHo
  - sosukesuzuki
createdAt: 2021-04-01
updatedAt: "2021-04-03"
tags:
  - rust
  - rust
  - blog
summary: First post
---

This is the content.
"#;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let (fm, remaining) = FrontMatter::parse(FULL).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.created_at.as_deref(), Some("2021-04-01"));
        assert_eq!(fm.updated_at.as_deref(), Some("2021-04-03"));
        assert_eq!(
            fm.tags,
            Some(vec!["rust".to_string(), "rust".to_string(), "blog".to_string()])
        );
        assert_eq!(
            fm.editor,
            Some(Editor::Many(vec![
                "BaHo".to_string(),
                "sosukesuzuki".to_string()
            ]))
        );
        assert_eq!(remaining, "This is the content.\n");
    }

    #[test]
    fn test_into_metadata_dedupes_tags() {
        let (fm, _) = FrontMatter::parse(FULL).unwrap();
        let meta = fm.into_metadata().unwrap();
        let tags: Vec<&str> = meta.tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["blog", "rust"]);
    }

    #[test]
    fn test_updated_at_defaults_to_created_at() {
        let content = "---\ntitle: t\nauthor: a\ncreatedAt: 2020-01-01\nsummary: s\n---\nbody";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        let meta = fm.into_metadata().unwrap();
        assert_eq!(meta.updated_at, "2020-01-01");
        assert!(meta.tags.is_empty());
        assert_eq!(meta.editor, None);
    }

    #[test]
    fn test_empty_updated_at_defaults_to_created_at() {
        let content =
            "---\ntitle: t\nauthor: a\ncreatedAt: 2020-01-01\nupdatedAt: \"\"\nsummary: s\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.into_metadata().unwrap().updated_at, "2020-01-01");
    }

    #[test]
    fn test_null_tags_are_empty() {
        let content = "---\ntitle: t\nauthor: a\ncreatedAt: 2020-01-01\ntags:\nsummary: s\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, None);
        assert!(fm.into_metadata().unwrap().tags.is_empty());
    }

    #[test]
    fn test_single_string_tag_and_editor() {
        let content =
            "---\ntitle: t\nauthor: a\neditor: BaHo\ncreatedAt: 2020-01-01\ntags: Notes\nsummary: s\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        let meta = fm.into_metadata().unwrap();
        assert!(meta.tags.contains("Notes"));
        assert_eq!(meta.editor, Some(Editor::One("BaHo".to_string())));
    }

    #[test]
    fn test_numeric_tags_kept_as_text() {
        let content = "---\ntags: [2021, rust]\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, Some(vec!["2021".to_string(), "rust".to_string()]));
    }

    #[test]
    fn test_single_scalar_tag_kept_as_text() {
        let (fm, _) = FrontMatter::parse("---\ntags: 2021\n---\n").unwrap();
        assert_eq!(fm.tags, Some(vec!["2021".to_string()]));

        let (fm, _) = FrontMatter::parse(r#"{"tags": true}"#).unwrap();
        assert_eq!(fm.tags, Some(vec!["true".to_string()]));
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let content = "---\nauthor: a\ncreatedAt: 2020-01-01\n---\nbody";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.into_metadata().unwrap_err(), vec!["title", "summary"]);
    }

    #[test]
    fn test_missing_created_at_leaves_updated_at_missing() {
        let content = "---\ntitle: t\nauthor: a\nsummary: s\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(
            fm.into_metadata().unwrap_err(),
            vec!["createdAt", "updatedAt"]
        );
    }

    #[test]
    fn test_blank_title_counts_as_missing() {
        let content = "---\ntitle: \"  \"\nauthor: a\ncreatedAt: 2020-01-01\nsummary: s\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.into_metadata().unwrap_err(), vec!["title"]);
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, remaining) = FrontMatter::parse("# Just markdown\n").unwrap();
        assert!(fm.title.is_none());
        assert_eq!(remaining, "# Just markdown\n");
        assert_eq!(
            fm.into_metadata().unwrap_err(),
            vec!["title", "author", "createdAt", "updatedAt", "summary"]
        );
    }

    #[test]
    fn test_thematic_break_is_not_frontmatter() {
        let content = "---- \nSome text\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert!(fm.title.is_none());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_closing_fence_must_be_a_whole_line() {
        let (fm, remaining) = FrontMatter::parse("---\r\ntitle: t\r\n--- \r\nBody\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("t"));
        assert_eq!(remaining, "Body\n");

        assert!(FrontMatter::parse("---\ntitle: t\n---foo\n").is_err());
        assert!(FrontMatter::parse("---\ntitle: t\n----\nBody\n").is_err());
    }

    #[test]
    fn test_unterminated_yaml_is_an_error() {
        assert!(FrontMatter::parse("---\ntitle: t\n").is_err());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let err = FrontMatter::parse("---\ntags: [unclosed\n---\n").unwrap_err();
        assert!(err.to_string().starts_with("invalid YAML"));
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"{"title": "Test {Post}", "tags": ["a", "b"]}

This is content.
"#;
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Test {Post}"));
        assert_eq!(fm.tags, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(remaining, "This is content.\n");
    }

    #[test]
    fn test_parse_fenced_json_frontmatter() {
        let content = ";;;\n\"title\": \"Fenced\"\n;;;\nbody";
        // Fenced content must still be a complete JSON object
        assert!(FrontMatter::parse(content).is_err());

        let content = ";;;\n{\"title\": \"Fenced\", \"createdAt\": \"2020-01-01\"}\n;;;\nbody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Fenced"));
        assert_eq!(remaining, "body");
    }
}
