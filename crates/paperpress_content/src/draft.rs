use std::fmt;

use serde::Serialize;

/// Working record threaded through the pipeline stages.
///
/// The Markdown source is fixed at construction; stages only fill in or
/// overwrite the derived fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDraft {
    markdown_source: String,
    pub html: Option<String>,
    pub reading_time_minutes: Option<u32>,
}

impl ContentDraft {
    pub fn new(markdown_source: impl Into<String>) -> Self {
        Self {
            markdown_source: markdown_source.into(),
            html: None,
            reading_time_minutes: None,
        }
    }

    pub fn markdown_source(&self) -> &str {
        &self.markdown_source
    }
}

/// Output of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedContent {
    pub html: String,
    pub reading_time_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Render,
    Sanitize,
    Highlight,
    ReadingTime,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Render => write!(f, "render"),
            StageKind::Sanitize => write!(f, "sanitize"),
            StageKind::Highlight => write!(f, "highlight"),
            StageKind::ReadingTime => write!(f, "reading-time"),
        }
    }
}
