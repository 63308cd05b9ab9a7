//! File-backed post store standing in for the document database.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use paperpress_core::{
    make_unique_slug, slugify, ContentProcessor, NewPost, Post, PostError, PostId, PostStatus,
};
use paperpress_logging::{press_debug, press_error, press_info, press_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persist::{write_atomically, PersistError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no post with slug {0:?}")]
    NotFound(String),
    #[error(transparent)]
    Post(#[from] PostError),
    #[error("failed to read store {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to parse store {path}: {message}")]
    Parse { path: String, message: String },
    #[error("failed to serialize store: {0}")]
    Serialize(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Fields to change on an existing post. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostEdit {
    pub markdown_source: Option<String>,
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostStore {
    #[serde(default)]
    last_id: PostId,
    #[serde(default)]
    posts: Vec<Post>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn published(&self) -> Vec<Post> {
        self.posts
            .iter()
            .filter(|post| post.is_published())
            .cloned()
            .collect()
    }

    pub fn find(&self, slug: &str) -> Result<&Post, StoreError> {
        self.posts
            .iter()
            .find(|post| post.slug() == slug)
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))
    }

    fn find_mut(&mut self, slug: &str) -> Result<&mut Post, StoreError> {
        self.posts
            .iter_mut()
            .find(|post| post.slug() == slug)
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))
    }

    fn unique_slug(&self, title: &str, owner: Option<PostId>) -> String {
        make_unique_slug(&slugify(title), |candidate| {
            self.posts
                .iter()
                .any(|post| post.slug() == candidate && Some(post.id()) != owner)
        })
    }

    pub fn create(
        &mut self,
        new_post: NewPost,
        processor: &ContentProcessor,
        now: DateTime<Utc>,
    ) -> Result<&Post, StoreError> {
        let id = self.last_id + 1;
        let slug = self.unique_slug(&new_post.title, None);
        let post = Post::create(id, slug, new_post, processor, now)?;
        press_debug!("Created post {} ({})", post.slug(), post.status());
        self.last_id = id;
        self.posts.push(post);
        Ok(&self.posts[self.posts.len() - 1])
    }

    /// Applies an edit. Returns the (possibly new) slug.
    ///
    /// Inputs are validated before anything changes, so a rejected edit
    /// leaves the post untouched.
    pub fn edit(
        &mut self,
        slug: &str,
        edit: PostEdit,
        processor: &ContentProcessor,
        now: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        if edit.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
            return Err(PostError::EmptyTitle.into());
        }
        if edit
            .markdown_source
            .as_deref()
            .is_some_and(|source| source.trim().is_empty())
        {
            return Err(PostError::EmptyContent.into());
        }

        let owner = self.find(slug)?.id();
        let new_slug = edit
            .title
            .as_deref()
            .map(|title| self.unique_slug(title, Some(owner)));

        let post = self.find_mut(slug)?;
        if let Some(markdown_source) = edit.markdown_source {
            post.edit_markdown(markdown_source, processor, now)?;
        }
        if let (Some(title), Some(new_slug)) = (edit.title, new_slug) {
            post.retitle(&title, new_slug, now)?;
        }
        if let Some(tags) = edit.tags {
            post.set_tags(tags, now);
        }
        Ok(post.slug().to_string())
    }

    pub fn set_status(
        &mut self,
        slug: &str,
        status: PostStatus,
        now: DateTime<Utc>,
    ) -> Result<&Post, StoreError> {
        let post = self.find_mut(slug)?;
        post.set_status(status, now);
        Ok(post)
    }

    pub fn record_view(&mut self, slug: &str) -> Result<u64, StoreError> {
        Ok(self.find_mut(slug)?.record_view())
    }

    pub fn record_like(&mut self, slug: &str) -> Result<u64, StoreError> {
        Ok(self.find_mut(slug)?.record_like())
    }

    pub fn record_comment(&mut self, slug: &str) -> Result<u64, StoreError> {
        Ok(self.find_mut(slug)?.record_comment())
    }

    /// Re-runs content processing for every post. Returns how many changed.
    pub fn reprocess_all(&mut self, processor: &ContentProcessor) -> usize {
        let mut changed = 0;
        for post in &mut self.posts {
            let before = (
                post.html().to_string(),
                post.reading_time_minutes(),
                post.excerpt().to_string(),
            );
            post.reprocess(processor);
            let after = (
                post.html().to_string(),
                post.reading_time_minutes(),
                post.excerpt().to_string(),
            );
            if before != after {
                changed += 1;
            }
        }
        changed
    }
}

/// Loads the store. A missing file is an empty store; an unreadable or
/// malformed one is an error.
pub fn load_store(path: &Path) -> Result<PostStore, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            press_info!("No store at {:?}, starting empty", path);
            return Ok(PostStore::new());
        }
        Err(source) => {
            press_warn!("Failed to read store from {:?}: {}", path, source);
            return Err(StoreError::Read {
                path: path.display().to_string(),
                source,
            });
        }
    };

    let store: PostStore = ron::from_str(&content).map_err(|err| {
        press_warn!("Failed to parse store from {:?}: {}", path, err);
        StoreError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    })?;
    press_info!("Loaded {} posts from {:?}", store.posts.len(), path);
    Ok(store)
}

pub fn save_store(path: &Path, store: &PostStore) -> Result<(), StoreError> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(store, pretty).map_err(|err| {
        press_error!("Failed to serialize store: {}", err);
        StoreError::Serialize(err.to_string())
    })?;
    if let Err(err) = write_atomically(path, &content) {
        press_error!("Failed to write store to {:?}: {}", path, err);
        return Err(err.into());
    }
    press_info!("Saved {} posts to {:?}", store.posts.len(), path);
    Ok(())
}
