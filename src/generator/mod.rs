//! Generator module - generates static HTML files using built-in Tera templates

use anyhow::{bail, Result};
use chrono::{Datelike, Local};
use std::fs;
use std::path::PathBuf;
use tera::Context;
use walkdir::WalkDir;

use crate::content::{PostData, PostLoader, Render};
use crate::helpers::{full_url_for, page_segment, section_url, url_for};
use crate::members::MemberDirectory;
use crate::templates::{
    AuthorData, NavPost, PostSummary, SiteData, TagData, TagLink, TemplateRenderer,
};
use crate::Blog;

/// What a generation run produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub posts: usize,
    pub members: usize,
    pub tags: usize,
    pub assets: usize,
}

/// Static site generator using Tera templates
pub struct Generator<'a> {
    blog: &'a Blog,
    renderer: TemplateRenderer,
    members: MemberDirectory,
    site: SiteData,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(blog: &'a Blog) -> Result<Self> {
        let config = &blog.config;
        let site = SiteData {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            root: url_for(config, "/"),
            members_url: url_for(config, &format!("{}/", config.member_dir)),
            tags_url: url_for(config, &format!("{}/", config.tag_dir)),
            year: Local::now().year().to_string(),
        };

        Ok(Self {
            blog,
            renderer: TemplateRenderer::new()?,
            members: blog.members(),
            site,
        })
    }

    /// Generate the entire site
    pub fn generate<R: Render>(&self, loader: &PostLoader<R>) -> Result<GenerateStats> {
        // Load everything first so a broken post aborts before any output
        let posts = loader.load_all_posts()?;
        if let Some(post) = posts.iter().find(|p| p.meta_data.author.is_empty()) {
            bail!("Post {} has an empty author", post.slug);
        }

        fs::create_dir_all(&self.blog.public_dir)?;

        let mut stats = GenerateStats {
            assets: self.copy_static_assets()?,
            ..Default::default()
        };

        let summaries: Vec<PostSummary> = posts.iter().map(|p| self.summarize(p)).collect();

        self.generate_index_page(&summaries)?;
        stats.posts = self.generate_post_pages(posts, &summaries)?;
        stats.members = self.generate_member_pages(loader)?;
        stats.tags = self.generate_tag_pages(loader)?;

        Ok(stats)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context
    }

    fn summarize(&self, post: &PostData) -> PostSummary {
        let config = &self.blog.config;
        let meta = &post.meta_data;
        let url = section_url(config, &config.post_dir, &post.slug);

        PostSummary {
            slug: post.slug.clone(),
            title: meta.title.clone(),
            author: meta.author.clone(),
            author_url: section_url(config, &config.member_dir, &meta.author),
            editors: meta
                .editor
                .as_ref()
                .map(|e| e.names().into_iter().map(str::to_string).collect())
                .unwrap_or_default(),
            created_at: meta.created_at.clone(),
            updated_at: meta.updated_at.clone(),
            summary: meta.summary.clone(),
            tags: meta
                .tags
                .iter()
                .map(|tag| TagLink {
                    name: tag.clone(),
                    url: section_url(config, &config.tag_dir, tag),
                })
                .collect(),
            permalink: full_url_for(config, &url),
            url,
        }
    }

    fn author_data(&self, name: &str, post_count: usize) -> AuthorData {
        let url = section_url(&self.blog.config, &self.blog.config.member_dir, name);
        match self.members.get(name) {
            Some(member) => AuthorData {
                name: member.name.clone(),
                url,
                icon_url: member.icon_url.clone(),
                twitter_id: member.twitter_id.clone(),
                twitter_url: member.twitter_url(),
                github_username: member.github_username.clone(),
                github_url: member.github_url(),
                post_count,
            },
            None => AuthorData {
                name: name.to_string(),
                url,
                icon_url: String::new(),
                twitter_id: None,
                twitter_url: None,
                github_username: None,
                github_url: None,
                post_count,
            },
        }
    }

    /// Generate the top page listing every post
    fn generate_index_page(&self, summaries: &[PostSummary]) -> Result<()> {
        let mut context = self.base_context();
        context.insert("posts", summaries);
        let html = self.renderer.render("index.html", &context)?;
        self.write_page("", None, &html)
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, posts: &[PostData], summaries: &[PostSummary]) -> Result<usize> {
        for (i, (post, summary)) in posts.iter().zip(summaries).enumerate() {
            // Posts are newest first
            let newer = i.checked_sub(1).map(|j| nav_post(&summaries[j]));
            let older = summaries.get(i + 1).map(nav_post);

            if self.members.get(&post.meta_data.author).is_none() {
                tracing::warn!(
                    "Author {} of post {} is not a known member",
                    post.meta_data.author,
                    post.slug
                );
            }

            let mut context = self.base_context();
            context.insert("post", summary);
            context.insert("content", &post.content);
            context.insert("author", &self.author_data(&post.meta_data.author, 0));
            context.insert("newer", &newer);
            context.insert("older", &older);

            let html = self.renderer.render("post.html", &context)?;
            self.write_page(&self.blog.config.post_dir, Some(post.slug.as_str()), &html)?;
        }

        tracing::info!("Generated {} post pages", posts.len());
        Ok(posts.len())
    }

    /// Generate the member listing and one page per member
    fn generate_member_pages<R: Render>(&self, loader: &PostLoader<R>) -> Result<usize> {
        // Authors missing from the directory still get a page
        let mut names: Vec<&str> = self.members.iter().map(|m| m.name.as_str()).collect();
        for post in loader.load_all_posts()? {
            let author = post.meta_data.author.as_str();
            if !names.contains(&author) {
                names.push(author);
            }
        }

        let mut members = Vec::with_capacity(names.len());
        for &name in &names {
            let posts = loader.posts_by_author(name)?;
            let member = self.author_data(name, posts.len());
            let summaries: Vec<PostSummary> = posts.into_iter().map(|p| self.summarize(p)).collect();

            let mut context = self.base_context();
            context.insert("member", &member);
            context.insert("posts", &summaries);
            let html = self.renderer.render("member.html", &context)?;
            self.write_page(&self.blog.config.member_dir, Some(name), &html)?;

            members.push(member);
        }

        let mut context = self.base_context();
        context.insert("members", &members);
        let html = self.renderer.render("members.html", &context)?;
        self.write_page(&self.blog.config.member_dir, None, &html)?;

        tracing::info!("Generated {} member pages", members.len());
        Ok(members.len())
    }

    /// Generate the tag listing and one page per tag
    fn generate_tag_pages<R: Render>(&self, loader: &PostLoader<R>) -> Result<usize> {
        let config = &self.blog.config;
        let mut tags = Vec::new();

        for tag in loader.all_tags()? {
            if tag.trim().is_empty() {
                continue;
            }
            let posts = loader.posts_by_tag(tag)?;
            let data = TagData {
                name: tag.to_string(),
                url: section_url(config, &config.tag_dir, tag),
                count: posts.len(),
            };
            let summaries: Vec<PostSummary> = posts.into_iter().map(|p| self.summarize(p)).collect();

            let mut context = self.base_context();
            context.insert("tag", &data);
            context.insert("posts", &summaries);
            let html = self.renderer.render("tag.html", &context)?;
            self.write_page(&config.tag_dir, Some(tag), &html)?;

            tags.push(data);
        }

        let mut context = self.base_context();
        context.insert("tags", &tags);
        let html = self.renderer.render("tags.html", &context)?;
        self.write_page(&config.tag_dir, None, &html)?;

        tracing::info!("Generated {} tag pages", tags.len());
        Ok(tags.len())
    }

    /// Write `<public>/<dir>/<name>/index.html`
    fn write_page(&self, dir: &str, name: Option<&str>, html: &str) -> Result<()> {
        let mut output_path = self.blog.public_dir.clone();
        let dir = dir.trim_matches('/');
        if !dir.is_empty() {
            output_path.push(dir);
        }
        if let Some(name) = name {
            output_path.push(page_segment(name));
        }
        output_path.push("index.html");

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Copy static assets (icons, css, ...) to the public directory
    fn copy_static_assets(&self) -> Result<usize> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.is_dir() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(static_dir)?;
            let dest: PathBuf = self.blog.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            copied += 1;
        }

        tracing::debug!("Copied {} static files from {:?}", copied, static_dir);
        Ok(copied)
    }
}

fn nav_post(summary: &PostSummary) -> NavPost {
    NavPost {
        title: summary.title.clone(),
        url: summary.url.clone(),
    }
}
