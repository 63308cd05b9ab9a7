//! PaperPress core: the post entity, slugs, trending ranking and recommendations.
mod post;
mod recommend;
mod slug;
mod trending;

pub use post::{ContentProcessor, NewPost, Post, PostContent, PostError, PostId, PostStatus};
pub use recommend::{RecommendationStrategy, DEFAULT_RECOMMENDATION_LIMIT};
pub use slug::{make_unique_slug, slugify, MAX_SLUG_LEN};
pub use trending::{
    rank_trending, EngagementWeights, RankError, Rankable, ScoredCandidate, TrendingContext,
    TrendingMode, TrendingStrategy, DEFAULT_TRENDING_LIMIT,
};
