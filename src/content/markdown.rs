//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;
use thiserror::Error;

use crate::config::HighlightConfig;

/// Markdown conversion failure
#[derive(Error, Debug)]
#[error("{0}")]
pub struct RenderError(pub String);

/// Converts a Markdown body into HTML
pub trait Render: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}

/// pulldown-cmark renderer with syntect highlighting of fenced code blocks
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a renderer with the default highlight settings
    pub fn new() -> Result<Self, RenderError> {
        Self::with_options(&HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(config: &HighlightConfig) -> Result<Self, RenderError> {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set.themes.remove(&config.theme).ok_or_else(|| {
            RenderError(format!("unknown highlight theme: {}", config.theme))
        })?;

        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            line_numbers: config.line_number,
        })
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> Result<String, RenderError> {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme)
            .map_err(|e| RenderError(format!("failed to highlight {} block: {}", lang, e)))?;

        if self.line_numbers {
            Ok(add_line_numbers(&highlighted, code.lines().count(), lang))
        } else {
            Ok(format!(
                r#"<div class="highlight language-{}">{}</div>"#,
                lang, highlighted
            ))
        }
    }
}

impl Render for MarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        // Front-matter is split off before the body gets here
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        // `lang:filename` and `lang {attrs}` forms both name the language first
                        CodeBlockKind::Fenced(info) => info
                            .split(|c: char| c.is_whitespace() || c == ':' || c == '{')
                            .next()
                            .filter(|lang| !lang.is_empty())
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref())?;
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) => match code_block.as_mut() {
                    Some((_, code)) => code.push_str(&text),
                    None => events.push(Event::Text(text)),
                },
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }
}

/// Put a line-number gutter beside highlighted code
fn add_line_numbers(highlighted: &str, line_count: usize, lang: &str) -> String {
    let gutter = (1..=line_count)
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang, gutter, highlighted
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new().unwrap();
        let html = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new().unwrap();
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains(r#"class="highlight language-rust""#));
        assert!(html.contains("main"));
        assert!(!html.contains("```"));
    }

    #[test]
    fn test_render_code_block_with_line_numbers() {
        let config = HighlightConfig {
            line_number: true,
            ..Default::default()
        };
        let renderer = MarkdownRenderer::with_options(&config).unwrap();
        let html = renderer
            .render("```js:index.js\nconst a = 1;\nconst b = 2;\n```")
            .unwrap();
        assert!(html.contains(r#"<figure class="highlight js">"#));
        assert!(html.contains(r#"<span class="line-number">2</span>"#));
    }

    #[test]
    fn test_text_after_code_block_is_kept() {
        let renderer = MarkdownRenderer::new().unwrap();
        let html = renderer
            .render("    indented code\n\nA paragraph after.")
            .unwrap();
        assert!(html.contains("indented code"));
        assert!(html.contains("<p>A paragraph after.</p>"));
    }

    #[test]
    fn test_unknown_theme_is_rejected() {
        let config = HighlightConfig {
            theme: "no-such-theme".to_string(),
            ..Default::default()
        };
        let err = MarkdownRenderer::with_options(&config).err().unwrap();
        assert!(err.to_string().contains("no-such-theme"));
    }

    #[test]
    fn test_render_tables() {
        let renderer = MarkdownRenderer::new().unwrap();
        let html = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |").unwrap();
        assert!(html.contains("<table>"));
    }
}
