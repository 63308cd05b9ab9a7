use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use paperpress_content::{generate_excerpt, ContentPipeline, DEFAULT_EXCERPT_LENGTH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type PostId = u64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("markdown content must not be empty")]
    EmptyContent,
    #[error("status must be draft or published, got {0:?}")]
    UnknownStatus(String),
    #[error("recommendation strategy must be tag or author, got {0:?}")]
    UnknownStrategy(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStatus::Draft => write!(f, "draft"),
            PostStatus::Published => write!(f, "published"),
        }
    }
}

impl FromStr for PostStatus {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(PostError::UnknownStatus(other.to_string())),
        }
    }
}

/// The derived fields that must always be refreshed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent {
    pub html: String,
    pub reading_time_minutes: u32,
    pub excerpt: String,
}

/// Runs the content pipeline and the excerpt generator as one unit.
pub struct ContentProcessor {
    pipeline: ContentPipeline,
    excerpt_length: usize,
}

impl ContentProcessor {
    pub fn new(pipeline: ContentPipeline, excerpt_length: usize) -> Self {
        Self {
            pipeline,
            excerpt_length,
        }
    }

    pub fn process(&self, markdown_source: &str) -> PostContent {
        let processed = self.pipeline.process(markdown_source);
        PostContent {
            html: processed.html,
            reading_time_minutes: processed.reading_time_minutes,
            excerpt: generate_excerpt(markdown_source, self.excerpt_length),
        }
    }
}

impl Default for ContentProcessor {
    fn default() -> Self {
        Self::new(ContentPipeline::new(), DEFAULT_EXCERPT_LENGTH)
    }
}

/// Author input for a new post.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewPost {
    pub title: String,
    pub markdown_source: String,
    pub author: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: PostId,
    title: String,
    slug: String,
    author: String,
    #[serde(default)]
    tags: Vec<String>,
    status: PostStatus,
    markdown_source: String,
    html: String,
    reading_time_minutes: u32,
    excerpt: String,
    #[serde(default)]
    view_count: u64,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    comment_count: u64,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Post {
    pub fn create(
        id: PostId,
        slug: String,
        new_post: NewPost,
        processor: &ContentProcessor,
        now: DateTime<Utc>,
    ) -> Result<Self, PostError> {
        let title = new_post.title.trim().to_string();
        if title.is_empty() {
            return Err(PostError::EmptyTitle);
        }
        if new_post.markdown_source.trim().is_empty() {
            return Err(PostError::EmptyContent);
        }

        let content = processor.process(&new_post.markdown_source);
        let published_at = (new_post.status == PostStatus::Published).then_some(now);
        Ok(Self {
            id,
            title,
            slug,
            author: new_post.author,
            tags: new_post.tags,
            status: new_post.status,
            markdown_source: new_post.markdown_source,
            html: content.html,
            reading_time_minutes: content.reading_time_minutes,
            excerpt: content.excerpt,
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            published_at,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the Markdown source and refreshes every derived field with it.
    pub fn edit_markdown(
        &mut self,
        markdown_source: String,
        processor: &ContentProcessor,
        now: DateTime<Utc>,
    ) -> Result<(), PostError> {
        if markdown_source.trim().is_empty() {
            return Err(PostError::EmptyContent);
        }
        let content = processor.process(&markdown_source);
        self.markdown_source = markdown_source;
        self.apply_content(content);
        self.updated_at = now;
        Ok(())
    }

    /// Re-runs processing on the current source, e.g. after a pipeline change.
    pub fn reprocess(&mut self, processor: &ContentProcessor) {
        let content = processor.process(&self.markdown_source);
        self.apply_content(content);
    }

    pub fn retitle(&mut self, title: &str, slug: String, now: DateTime<Utc>) -> Result<(), PostError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PostError::EmptyTitle);
        }
        self.title = title.to_string();
        self.slug = slug;
        self.updated_at = now;
        Ok(())
    }

    pub fn set_tags(&mut self, tags: Vec<String>, now: DateTime<Utc>) {
        self.tags = tags;
        self.updated_at = now;
    }

    /// `published_at` is stamped on the first transition into published and
    /// kept from then on.
    pub fn set_status(&mut self, status: PostStatus, now: DateTime<Utc>) {
        if status == PostStatus::Published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.status = status;
        self.updated_at = now;
    }

    pub fn record_view(&mut self) -> u64 {
        self.view_count = self.view_count.saturating_add(1);
        self.view_count
    }

    pub fn record_like(&mut self) -> u64 {
        self.like_count = self.like_count.saturating_add(1);
        self.like_count
    }

    pub fn record_comment(&mut self) -> u64 {
        self.comment_count = self.comment_count.saturating_add(1);
        self.comment_count
    }

    fn apply_content(&mut self, content: PostContent) {
        self.html = content.html;
        self.reading_time_minutes = content.reading_time_minutes;
        self.excerpt = content.excerpt;
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn status(&self) -> PostStatus {
        self.status
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    pub fn markdown_source(&self) -> &str {
        &self.markdown_source
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn reading_time_minutes(&self) -> u32 {
        self.reading_time_minutes
    }

    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }

    pub fn view_count(&self) -> u64 {
        self.view_count
    }

    pub fn like_count(&self) -> u64 {
        self.like_count
    }

    pub fn comment_count(&self) -> u64 {
        self.comment_count
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
