use std::sync::LazyLock;

use paperpress_logging::press_trace;

use crate::{
    CodeHighlighter, ContentDraft, ContentStage, HtmlSanitizer, MarkdownRenderer,
    ProcessedContent, ReadingTimeEstimator, StageKind, DEFAULT_WORDS_PER_MINUTE,
};

static DEFAULT_PIPELINE: LazyLock<ContentPipeline> = LazyLock::new(ContentPipeline::new);

/// Ordered content stages: render → sanitize → highlight → reading time.
///
/// Sanitizing happens exactly once, on renderer output. The highlighter runs
/// after it so its `hljs-*` markup is never subject to the allow-list.
pub struct ContentPipeline {
    stages: Vec<Box<dyn ContentStage>>,
}

impl ContentPipeline {
    pub fn new() -> Self {
        Self::with_words_per_minute(DEFAULT_WORDS_PER_MINUTE)
    }

    pub fn with_words_per_minute(words_per_minute: u32) -> Self {
        Self {
            stages: vec![
                Box::new(MarkdownRenderer),
                Box::new(HtmlSanitizer::new()),
                Box::new(CodeHighlighter::new()),
                Box::new(ReadingTimeEstimator::new(words_per_minute)),
            ],
        }
    }

    pub fn stage_order(&self) -> Vec<StageKind> {
        self.stages.iter().map(|stage| stage.kind()).collect()
    }

    pub fn run(&self, draft: ContentDraft) -> ContentDraft {
        self.stages.iter().fold(draft, |draft, stage| {
            press_trace!("Running content stage {}", stage.kind());
            stage.apply(draft)
        })
    }

    pub fn process(&self, markdown_source: &str) -> ProcessedContent {
        let draft = self.run(ContentDraft::new(markdown_source));
        ProcessedContent {
            html: draft.html.unwrap_or_default(),
            reading_time_minutes: draft.reading_time_minutes.unwrap_or(1),
        }
    }
}

impl Default for ContentPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the default pipeline (200 words per minute).
pub fn process_content(markdown_source: &str) -> ProcessedContent {
    DEFAULT_PIPELINE.process(markdown_source)
}
