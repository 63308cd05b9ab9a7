use std::sync::LazyLock;

use paperpress_logging::press_debug;
use regex::{Captures, Regex};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use thiserror::Error;

use crate::{ContentDraft, ContentStage, StageKind};

/// Prefix put on every scope class emitted by the highlighter.
pub const HIGHLIGHT_CLASS_PREFIX: &str = "hljs-";

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<pre><code class="language-([\w+#.\-]+)">([\s\S]*?)</code></pre>"#)
        .expect("valid regex")
});

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<code>([^<]*)</code>").expect("valid regex"));

static PRE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<pre(?:\s[^>]*)?>$").expect("valid regex"));
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(amp|lt|gt|quot|#39|#x27|nbsp);").expect("valid regex")
});

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("unsupported language: {0}")]
    UnknownLanguage(String),
    #[error("syntax highlighting failed: {0}")]
    Syntax(#[from] syntect::Error),
}

/// Highlights fenced code blocks and tags inline code spans.
///
/// Runs on sanitized HTML. Everything it adds is structural markup
/// (`<span class="hljs-...">`) around escaped code text.
pub struct CodeHighlighter {
    syntaxes: &'static SyntaxSet,
}

impl CodeHighlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: &SYNTAXES,
        }
    }

    pub fn highlight_html(&self, html: &str) -> String {
        let with_blocks = FENCED_BLOCK.replace_all(html, |caps: &Captures| {
            let lang = &caps[1];
            let code = &caps[2];
            match self.highlight_block(code, lang) {
                Ok(highlighted) => {
                    format!(r#"<pre><code class="hljs language-{lang}">{highlighted}</code></pre>"#)
                }
                Err(err) => {
                    press_debug!("Leaving {} block unhighlighted: {}", lang, err);
                    caps[0].to_string()
                }
            }
        });
        mark_inline_code(&with_blocks)
    }

    /// Highlights one block of entity-encoded code.
    pub fn highlight_block(&self, encoded: &str, lang: &str) -> Result<String, HighlightError> {
        let syntax = self
            .syntaxes
            .find_syntax_by_token(lang)
            .or_else(|| self.syntaxes.find_syntax_by_extension(lang))
            .ok_or_else(|| HighlightError::UnknownLanguage(lang.to_string()))?;

        let code = decode_html_entities(encoded);
        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            self.syntaxes,
            ClassStyle::SpacedPrefixed {
                prefix: HIGHLIGHT_CLASS_PREFIX,
            },
        );
        for line in LinesWithEndings::from(&code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStage for CodeHighlighter {
    fn kind(&self) -> StageKind {
        StageKind::Highlight
    }

    fn apply(&self, mut draft: ContentDraft) -> ContentDraft {
        if let Some(html) = draft.html.take() {
            draft.html = Some(self.highlight_html(&html));
        }
        draft
    }
}

/// Decodes the entities an HTML serializer produces for code text.
pub fn decode_html_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            "nbsp" => "\u{a0}",
            _ => "'",
        })
        .into_owned()
}

fn follows_pre_open(before: &str) -> bool {
    before
        .rfind('<')
        .is_some_and(|open| PRE_OPEN.is_match(&before[open..]))
}

// A bare `<code>` directly inside `<pre ...>` is a fenced block without a language.
fn mark_inline_code(html: &str) -> String {
    let mut output = String::with_capacity(html.len());
    let mut last = 0;
    for caps in INLINE_CODE.captures_iter(html) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if follows_pre_open(&html[..whole.start()]) {
            continue;
        }
        output.push_str(&html[last..whole.start()]);
        output.push_str(r#"<code class="inline-code">"#);
        output.push_str(&caps[1]);
        output.push_str("</code>");
        last = whole.end();
    }
    output.push_str(&html[last..]);
    output
}

#[cfg(test)]
mod tests {
    use super::{decode_html_entities, mark_inline_code};

    #[test]
    fn entities_decode_without_double_unescaping() {
        assert_eq!(decode_html_entities("a &lt;b&gt; &amp;lt;"), "a <b> &lt;");
        assert_eq!(decode_html_entities("&quot;x&quot; &#39;y&#39;"), "\"x\" 'y'");
        assert_eq!(decode_html_entities("&copy;"), "&copy;");
    }

    #[test]
    fn inline_code_gets_marker_class() {
        assert_eq!(
            mark_inline_code("<p>use <code>let</code> here</p>"),
            r#"<p>use <code class="inline-code">let</code> here</p>"#
        );
    }

    #[test]
    fn bare_fenced_block_is_not_inline() {
        let html = "<pre><code>plain\n</code></pre>";
        assert_eq!(mark_inline_code(html), html);
    }

    #[test]
    fn pre_with_attributes_still_counts_as_a_block() {
        let html = r#"<pre class="x"><code>plain</code></pre>"#;
        assert_eq!(mark_inline_code(html), html);

        let html = r#"<p><code>a</code></p><pre class="x"><code>b</code></pre>"#;
        assert_eq!(
            mark_inline_code(html),
            r#"<p><code class="inline-code">a</code></p><pre class="x"><code>b</code></pre>"#
        );
    }

    #[test]
    fn preformatted_lookalike_tags_do_not_count() {
        assert_eq!(
            mark_inline_code("<prefix><code>x</code>"),
            r#"<prefix><code class="inline-code">x</code>"#
        );
    }
}
