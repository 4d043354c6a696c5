//! Built-in templates using the Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescaping would mangle URLs; text fields use the `escape` filter
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("macros.html", include_str!("theme/macros.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("members.html", include_str!("theme/members.html")),
            ("member.html", include_str!("theme/member.html")),
            ("tags.html", include_str!("theme/tags.html")),
            ("tag.html", include_str!("theme/tag.html")),
            (
                "partials/header.html",
                include_str!("theme/partials/header.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: reformat a `createdAt`-style date string.
/// Strings that are not recognizable dates are passed through untouched.
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "%Y/%m/%d".to_string(),
    };

    Ok(tera::Value::String(format_date(&s, &format)))
}

/// Format a date string, falling back to the input when it does not parse
pub fn format_date(s: &str, format: &str) -> String {
    let s = s.trim();
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()));

    match date {
        Some(date) => date.format(format).to_string(),
        None => s.to_string(),
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub root: String,
    pub members_url: String,
    pub tags_url: String,
    pub year: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagLink {
    pub name: String,
    pub url: String,
}

/// A post as shown in lists and on its own page
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub author: String,
    pub author_url: String,
    pub editors: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub summary: String,
    pub tags: Vec<TagLink>,
    pub url: String,
    pub permalink: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorData {
    pub name: String,
    pub url: String,
    pub icon_url: String,
    pub twitter_id: Option<String>,
    pub twitter_url: Option<String>,
    pub github_username: Option<String>,
    pub github_url: Option<String>,
    pub post_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagData {
    pub name: String,
    pub url: String,
    pub count: usize,
}
