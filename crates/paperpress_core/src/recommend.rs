use std::cmp::Reverse;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Post, PostError};

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// How related posts are picked for a post being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecommendationStrategy {
    /// Posts sharing at least one tag.
    #[default]
    #[serde(rename = "tag")]
    ByTag,
    /// Other posts by the same author.
    #[serde(rename = "author")]
    ByAuthor,
}

impl RecommendationStrategy {
    /// Published posts other than `source` that match the strategy, newest first.
    pub fn recommend<'a>(&self, source: &Post, candidates: &'a [Post], limit: usize) -> Vec<&'a Post> {
        if *self == RecommendationStrategy::ByTag && source.tags().is_empty() {
            return Vec::new();
        }

        let mut related: Vec<&'a Post> = candidates
            .iter()
            .filter(|post| post.id() != source.id() && post.is_published())
            .filter(|post| self.matches(source, post))
            .collect();
        related.sort_by_key(|post| Reverse(post.published_at()));
        related.truncate(limit);
        related
    }

    fn matches(&self, source: &Post, candidate: &Post) -> bool {
        match self {
            RecommendationStrategy::ByTag => candidate
                .tags()
                .iter()
                .any(|tag| source.tags().contains(tag)),
            RecommendationStrategy::ByAuthor => candidate.author() == source.author(),
        }
    }
}

impl FromStr for RecommendationStrategy {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tag" | "tags" => Ok(RecommendationStrategy::ByTag),
            "author" => Ok(RecommendationStrategy::ByAuthor),
            other => Err(PostError::UnknownStrategy(other.to_string())),
        }
    }
}
