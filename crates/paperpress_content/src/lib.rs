//! PaperPress content: Markdown → sanitized, highlighted HTML plus reading time and excerpts.
mod draft;
mod excerpt;
mod highlight;
mod pipeline;
mod reading_time;
mod render;
mod sanitize;
mod stage;
mod strip;

pub use draft::{ContentDraft, ProcessedContent, StageKind};
pub use excerpt::{generate_excerpt, DEFAULT_EXCERPT_LENGTH, ELLIPSIS};
pub use highlight::{decode_html_entities, CodeHighlighter, HighlightError, HIGHLIGHT_CLASS_PREFIX};
pub use pipeline::{process_content, ContentPipeline};
pub use reading_time::{
    MarkdownWordCounter, ReadingTimeEstimator, WordCounter, DEFAULT_WORDS_PER_MINUTE,
};
pub use render::{render_markdown, MarkdownRenderer};
pub use sanitize::HtmlSanitizer;
pub use stage::ContentStage;
