use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use paperpress_content::{generate_excerpt, ContentPipeline};
use paperpress_core::{
    ContentProcessor, NewPost, Post, PostStatus, RecommendationStrategy, TrendingMode,
    TrendingStrategy,
};
use paperpress_logging::{press_debug, press_info};
use serde::Serialize;

use crate::cli::Command;
use crate::config::PressConfig;
use crate::store::{load_store, save_store, PostEdit, PostStore};

/// Derived content of a rendered Markdown file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderOutput {
    html: String,
    reading_time_minutes: u32,
    excerpt: String,
}

/// What listings print for each post.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostSummary<'a> {
    id: u64,
    slug: &'a str,
    title: &'a str,
    author: &'a str,
    tags: &'a [String],
    status: PostStatus,
    excerpt: &'a str,
    reading_time_minutes: u32,
    view_count: u64,
    like_count: u64,
    comment_count: u64,
    published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
}

impl<'a> PostSummary<'a> {
    fn new(post: &'a Post) -> Self {
        Self {
            id: post.id(),
            slug: post.slug(),
            title: post.title(),
            author: post.author(),
            tags: post.tags(),
            status: post.status(),
            excerpt: post.excerpt(),
            reading_time_minutes: post.reading_time_minutes(),
            view_count: post.view_count(),
            like_count: post.like_count(),
            comment_count: post.comment_count(),
            published_at: post.published_at(),
            score: None,
        }
    }

    fn scored(post: &'a Post, score: f64) -> Self {
        Self {
            score: Some(score),
            ..Self::new(post)
        }
    }
}

#[derive(Debug, Serialize)]
struct TrendingOutput<'a> {
    mode: TrendingMode,
    posts: Vec<PostSummary<'a>>,
}

pub struct App {
    config: PressConfig,
    processor: ContentProcessor,
}

impl App {
    pub fn new(config: PressConfig) -> Self {
        let pipeline = ContentPipeline::with_words_per_minute(config.content.words_per_minute);
        let processor = ContentProcessor::new(pipeline, config.content.excerpt_max_length);
        Self { config, processor }
    }

    pub fn run(&self, command: Command, out: &mut impl Write) -> Result<()> {
        self.run_at(command, out, Utc::now())
    }

    pub fn run_at(&self, command: Command, out: &mut impl Write, now: DateTime<Utc>) -> Result<()> {
        match command {
            Command::Render { file } => {
                let markdown = read_markdown(&file)?;
                let content = self.processor.process(&markdown);
                let output = RenderOutput {
                    html: content.html,
                    reading_time_minutes: content.reading_time_minutes,
                    excerpt: content.excerpt,
                };
                write_json(out, &output)
            }
            Command::Excerpt { file, max_length } => {
                let markdown = read_markdown(&file)?;
                let limit = max_length.unwrap_or(self.config.content.excerpt_max_length);
                writeln!(out, "{}", generate_excerpt(&markdown, limit))?;
                Ok(())
            }
            Command::New {
                file,
                title,
                tags,
                author,
                publish,
            } => {
                let markdown_source = read_markdown(&file)?;
                let status = if publish {
                    PostStatus::Published
                } else {
                    PostStatus::Draft
                };
                let new_post = NewPost {
                    title,
                    markdown_source,
                    author,
                    tags,
                    status,
                };
                self.update_store(|store| {
                    let post = store.create(new_post, &self.processor, now)?;
                    press_info!("Created {} post {:?}", post.status(), post.slug());
                    writeln!(out, "{}", post.slug())?;
                    Ok(())
                })
            }
            Command::Edit {
                slug,
                file,
                title,
                tags,
                clear_tags,
            } => {
                let markdown_source = file.as_deref().map(read_markdown).transpose()?;
                let tags = if clear_tags {
                    Some(Vec::new())
                } else {
                    (!tags.is_empty()).then_some(tags)
                };
                let edit = PostEdit {
                    markdown_source,
                    title,
                    tags,
                };
                self.update_store(|store| {
                    let new_slug = store.edit(&slug, edit, &self.processor, now)?;
                    press_info!("Edited post {:?}", new_slug);
                    writeln!(out, "{new_slug}")?;
                    Ok(())
                })
            }
            Command::Status { slug, status } => self.update_store(|store| {
                let post = store.set_status(&slug, status, now)?;
                writeln!(out, "{}: {}", post.slug(), post.status())?;
                Ok(())
            }),
            Command::View { slug } => self.update_store(|store| {
                let views = store.record_view(&slug)?;
                writeln!(out, "{slug}: {views} views")?;
                Ok(())
            }),
            Command::Like { slug } => self.update_store(|store| {
                let likes = store.record_like(&slug)?;
                writeln!(out, "{slug}: {likes} likes")?;
                Ok(())
            }),
            Command::Comment { slug } => self.update_store(|store| {
                let comments = store.record_comment(&slug)?;
                writeln!(out, "{slug}: {comments} comments")?;
                Ok(())
            }),
            Command::List { all } => {
                let store = self.load()?;
                let mut posts: Vec<&Post> = store
                    .posts()
                    .iter()
                    .filter(|post| all || post.is_published())
                    .collect();
                posts.sort_by_key(|post| {
                    std::cmp::Reverse(post.published_at().unwrap_or_else(|| post.created_at()))
                });
                let summaries: Vec<PostSummary<'_>> =
                    posts.into_iter().map(PostSummary::new).collect();
                write_json(out, &summaries)
            }
            Command::Trending { mode, limit } => {
                let mode = match mode {
                    Some(name) => TrendingMode::parse_or_default(&name),
                    None => self.config.trending.default_mode,
                };
                let limit = limit.unwrap_or(self.config.trending.limit);
                let strategy = TrendingStrategy::for_mode(mode, self.config.trending.weights);

                let store = self.load()?;
                let published = store.published();
                press_debug!("Ranking {} published posts by {}", published.len(), mode);
                let posts = strategy
                    .rank_scored(&published, limit, now)
                    .into_iter()
                    .map(|scored| PostSummary::scored(scored.candidate, scored.score))
                    .collect();
                write_json(out, &TrendingOutput { mode, posts })
            }
            Command::Related { slug, by, limit } => {
                let strategy = match by {
                    Some(name) => name.parse::<RecommendationStrategy>()?,
                    None => self.config.recommendations.strategy,
                };
                let limit = limit.unwrap_or(self.config.recommendations.limit);

                let store = self.load()?;
                let source = store.find(&slug)?;
                let related: Vec<PostSummary<'_>> = strategy
                    .recommend(source, store.posts(), limit)
                    .into_iter()
                    .map(PostSummary::new)
                    .collect();
                write_json(out, &related)
            }
            Command::Rebuild => self.update_store(|store| {
                let changed = store.reprocess_all(&self.processor);
                press_info!("Rebuilt {} posts, {} changed", store.posts().len(), changed);
                writeln!(
                    out,
                    "rebuilt {} posts ({} changed)",
                    store.posts().len(),
                    changed
                )?;
                Ok(())
            }),
        }
    }

    fn load(&self) -> Result<PostStore> {
        let path = &self.config.store_path;
        load_store(path).with_context(|| format!("loading post store {}", path.display()))
    }

    /// Loads the store, applies `change` and saves only if it succeeded.
    fn update_store<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut PostStore) -> Result<()>,
    {
        let mut store = self.load()?;
        change(&mut store)?;
        let path = &self.config.store_path;
        save_store(path, &store).with_context(|| format!("saving post store {}", path.display()))
    }
}

fn read_markdown(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
