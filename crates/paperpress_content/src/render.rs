use pulldown_cmark::{html, Event, Options, Parser};

use crate::{ContentDraft, ContentStage, StageKind};

/// GitHub-flavoured Markdown to HTML, with single newlines rendered as `<br />`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

impl ContentStage for MarkdownRenderer {
    fn kind(&self) -> StageKind {
        StageKind::Render
    }

    fn apply(&self, mut draft: ContentDraft) -> ContentDraft {
        draft.html = Some(render_markdown(draft.markdown_source()));
        draft
    }
}

pub fn render_markdown(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let parser = Parser::new_ext(markdown, markdown_options()).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut output = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut output, parser);
    output
}

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}
