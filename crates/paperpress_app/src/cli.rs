use std::path::PathBuf;

use clap::{Parser, Subcommand};
use paperpress_core::PostStatus;

use crate::config::DEFAULT_CONFIG_PATH;

/// Markdown publishing pipeline and post store.
///
/// Content is rendered, sanitized and highlighted on write; reading time and
/// excerpts are derived from the Markdown source.
#[derive(Debug, Parser)]
#[command(name = "paperpress", version)]
pub struct Cli {
    /// Path to the RON configuration file.
    #[arg(
        long,
        global = true,
        env = "PAPERPRESS_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process a Markdown file and print the derived content as JSON.
    Render {
        file: PathBuf,
    },

    /// Print the plain-text excerpt of a Markdown file.
    Excerpt {
        file: PathBuf,

        /// Maximum excerpt length in characters, ellipsis excluded.
        #[arg(long)]
        max_length: Option<usize>,
    },

    /// Create a post from a Markdown file.
    New {
        file: PathBuf,

        #[arg(long)]
        title: String,

        /// Repeat for several tags.
        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long, default_value = "anonymous")]
        author: String,

        /// Publish immediately instead of saving a draft.
        #[arg(long)]
        publish: bool,
    },

    /// Replace a post's content and/or title.
    Edit {
        slug: String,

        /// New Markdown source.
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long)]
        title: Option<String>,

        /// Replace the tag list. Repeat for several tags.
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Remove every tag.
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
    },

    /// Move a post between draft and published.
    Status {
        slug: String,

        #[arg(value_parser = parse_status)]
        status: PostStatus,
    },

    /// Record one view of a post.
    View {
        slug: String,
    },

    /// Record one like of a post.
    Like {
        slug: String,
    },

    /// Record one comment on a post.
    Comment {
        slug: String,
    },

    /// List published posts, newest first.
    List {
        /// Include drafts.
        #[arg(long)]
        all: bool,
    },

    /// Rank published posts.
    Trending {
        /// `views`, `velocity` or `weighted`. Unknown names rank by views.
        #[arg(long)]
        mode: Option<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Find published posts related to a post.
    Related {
        slug: String,

        /// `tag` or `author`.
        #[arg(long)]
        by: Option<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Re-run content processing over every stored post.
    Rebuild,
}

fn parse_status(value: &str) -> Result<PostStatus, String> {
    value.parse::<PostStatus>().map_err(|err| err.to_string())
}
