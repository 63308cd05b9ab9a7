use crate::strip::strip_for_word_count;
use crate::{ContentDraft, ContentStage, StageKind};

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

pub trait WordCounter: Send + Sync {
    fn count(&self, markdown: &str) -> usize;
}

/// Counts whitespace-separated words after removing Markdown syntax noise.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownWordCounter;

impl WordCounter for MarkdownWordCounter {
    fn count(&self, markdown: &str) -> usize {
        strip_for_word_count(markdown).split_whitespace().count()
    }
}

/// Minutes-to-read estimate, rounded up and never below one.
pub struct ReadingTimeEstimator {
    words_per_minute: u32,
    counter: Box<dyn WordCounter>,
}

impl ReadingTimeEstimator {
    /// A rate of zero is treated as one word per minute.
    pub fn new(words_per_minute: u32) -> Self {
        Self::with_counter(words_per_minute, Box::new(MarkdownWordCounter))
    }

    pub fn with_counter(words_per_minute: u32, counter: Box<dyn WordCounter>) -> Self {
        Self {
            words_per_minute: words_per_minute.max(1),
            counter,
        }
    }

    pub fn words_per_minute(&self) -> u32 {
        self.words_per_minute
    }

    pub fn estimate(&self, markdown: &str) -> u32 {
        let words = self.counter.count(markdown);
        let minutes = words.div_ceil(self.words_per_minute as usize);
        u32::try_from(minutes).unwrap_or(u32::MAX).max(1)
    }
}

impl Default for ReadingTimeEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS_PER_MINUTE)
    }
}

impl ContentStage for ReadingTimeEstimator {
    fn kind(&self) -> StageKind {
        StageKind::ReadingTime
    }

    fn apply(&self, mut draft: ContentDraft) -> ContentDraft {
        draft.reading_time_minutes = Some(self.estimate(draft.markdown_source()));
        draft
    }
}
