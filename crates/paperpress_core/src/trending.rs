use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use paperpress_logging::{press_debug, press_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Post;

pub const DEFAULT_TRENDING_LIMIT: usize = 10;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RankError {
    /// The caller never selected a strategy. This is a wiring bug.
    #[error("no trending strategy has been set")]
    StrategyNotSet,
    #[error("unknown trending mode {0:?} (expected views, velocity or weighted)")]
    UnknownMode(String),
}

/// The fields a ranking strategy reads from a candidate.
pub trait Rankable {
    fn view_count(&self) -> u64;
    fn like_count(&self) -> u64;
    fn comment_count(&self) -> u64;
    fn published_at(&self) -> Option<DateTime<Utc>>;
    fn created_at(&self) -> DateTime<Utc>;

    fn ranked_since(&self) -> DateTime<Utc> {
        self.published_at().unwrap_or_else(|| self.created_at())
    }
}

impl Rankable for Post {
    fn view_count(&self) -> u64 {
        Post::view_count(self)
    }

    fn like_count(&self) -> u64 {
        Post::like_count(self)
    }

    fn comment_count(&self) -> u64 {
        Post::comment_count(self)
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        Post::published_at(self)
    }

    fn created_at(&self) -> DateTime<Utc> {
        Post::created_at(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingMode {
    #[default]
    Views,
    Velocity,
    Weighted,
}

impl TrendingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingMode::Views => "views",
            TrendingMode::Velocity => "velocity",
            TrendingMode::Weighted => "weighted",
        }
    }

    /// Lenient lookup used by request handling: unknown names rank by views.
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            press_warn!("Unknown trending mode {:?}, falling back to views", name);
            TrendingMode::Views
        })
    }
}

impl fmt::Display for TrendingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendingMode {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "views" => Ok(TrendingMode::Views),
            "velocity" => Ok(TrendingMode::Velocity),
            "weighted" => Ok(TrendingMode::Weighted),
            other => Err(RankError::UnknownMode(other.to_string())),
        }
    }
}

/// Multipliers for the weighted-engagement score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementWeights {
    pub views: f64,
    pub likes: f64,
    pub comments: f64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            views: 1.0,
            likes: 5.0,
            comments: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrendingStrategy {
    /// Raw view count.
    ByViews,
    /// Views per hour since publication (or creation), with age floored at one hour.
    ByVelocity,
    ByWeightedEngagement(EngagementWeights),
}

/// A candidate paired with the score it was sorted by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate<'a, T> {
    pub candidate: &'a T,
    pub score: f64,
}

impl TrendingStrategy {
    pub fn for_mode(mode: TrendingMode, weights: EngagementWeights) -> Self {
        match mode {
            TrendingMode::Views => TrendingStrategy::ByViews,
            TrendingMode::Velocity => TrendingStrategy::ByVelocity,
            TrendingMode::Weighted => TrendingStrategy::ByWeightedEngagement(weights),
        }
    }

    pub fn mode(&self) -> TrendingMode {
        match self {
            TrendingStrategy::ByViews => TrendingMode::Views,
            TrendingStrategy::ByVelocity => TrendingMode::Velocity,
            TrendingStrategy::ByWeightedEngagement(_) => TrendingMode::Weighted,
        }
    }

    pub fn score<T: Rankable>(&self, candidate: &T, now: DateTime<Utc>) -> f64 {
        match self {
            TrendingStrategy::ByViews => candidate.view_count() as f64,
            TrendingStrategy::ByVelocity => {
                let age = now.signed_duration_since(candidate.ranked_since());
                let age_hours = age.num_milliseconds() as f64 / MILLIS_PER_HOUR;
                candidate.view_count() as f64 / age_hours.max(1.0)
            }
            TrendingStrategy::ByWeightedEngagement(weights) => {
                candidate.view_count() as f64 * weights.views
                    + candidate.like_count() as f64 * weights.likes
                    + candidate.comment_count() as f64 * weights.comments
            }
        }
    }

    /// Scores every candidate, sorts descending (ties keep input order) and
    /// keeps the first `limit`.
    pub fn rank_scored<'a, T: Rankable>(
        &self,
        candidates: &'a [T],
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<ScoredCandidate<'a, T>> {
        let mut scored: Vec<ScoredCandidate<'a, T>> = candidates
            .iter()
            .map(|candidate| ScoredCandidate {
                candidate,
                score: self.score(candidate, now),
            })
            .collect();
        // `sort_by` is stable.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit);
        scored
    }

    pub fn rank<'a, T: Rankable>(
        &self,
        candidates: &'a [T],
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<&'a T> {
        self.rank_scored(candidates, limit, now)
            .into_iter()
            .map(|scored| scored.candidate)
            .collect()
    }
}

/// Holds the currently selected strategy between calls.
#[derive(Debug, Clone, Default)]
pub struct TrendingContext {
    strategy: Option<TrendingStrategy>,
}

impl TrendingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(strategy: TrendingStrategy) -> Self {
        Self {
            strategy: Some(strategy),
        }
    }

    pub fn set_strategy(&mut self, strategy: TrendingStrategy) {
        self.strategy = Some(strategy);
    }

    pub fn strategy(&self) -> Option<TrendingStrategy> {
        self.strategy
    }

    pub fn get_trending<'a, T: Rankable>(
        &self,
        candidates: &'a [T],
        limit: usize,
    ) -> Result<Vec<&'a T>, RankError> {
        self.get_trending_at(candidates, limit, Utc::now())
    }

    pub fn get_trending_at<'a, T: Rankable>(
        &self,
        candidates: &'a [T],
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<&'a T>, RankError> {
        let strategy = self.strategy.ok_or(RankError::StrategyNotSet)?;
        press_debug!(
            "Ranking {} candidates by {} (limit {})",
            candidates.len(),
            strategy.mode(),
            limit
        );
        Ok(strategy.rank(candidates, limit, now))
    }
}

/// Selects a strategy by mode name (unknown names rank by views, default
/// weights) and returns the top `limit` candidates.
pub fn rank_trending<'a, T: Rankable>(candidates: &'a [T], mode: &str, limit: usize) -> Vec<&'a T> {
    let mode = TrendingMode::parse_or_default(mode);
    TrendingStrategy::for_mode(mode, EngagementWeights::default()).rank(candidates, limit, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::{EngagementWeights, TrendingMode};

    #[test]
    fn mode_names_round_trip_through_display() {
        for mode in [TrendingMode::Views, TrendingMode::Velocity, TrendingMode::Weighted] {
            assert_eq!(mode.to_string().parse::<TrendingMode>(), Ok(mode));
        }
    }

    #[test]
    fn unknown_mode_is_lenient_only_when_asked() {
        assert!("hot".parse::<TrendingMode>().is_err());
        assert_eq!(TrendingMode::parse_or_default("hot"), TrendingMode::Views);
        assert_eq!(TrendingMode::parse_or_default(""), TrendingMode::Views);
    }

    #[test]
    fn default_weights_favour_likes_then_comments() {
        let weights = EngagementWeights::default();
        assert_eq!((weights.views, weights.likes, weights.comments), (1.0, 5.0, 3.0));
    }
}
