//! Markdown syntax stripping shared by the word counter and the excerpt generator.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).expect("valid regex"));
    };
}

pattern!(FENCED_CODE, r"(?s)```.*?```|~~~.*?~~~");
pattern!(INLINE_CODE, r"`[^`]*`");
pattern!(IMAGE, r"!\[[^\]]*\]\([^)]*\)");
pattern!(LINK, r"\[([^\]]+)\]\([^)]*\)");
pattern!(HEADING, r"(?m)^[ \t]{0,3}#{1,6}(?:[ \t]+|$)");
pattern!(EMPHASIS, r"[*_~`]");
pattern!(BLOCKQUOTE, r"(?m)^[ \t]*(?:>[ \t]?)+");
pattern!(
    HORIZONTAL_RULE,
    r"(?m)^[ \t]*(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$"
);
pattern!(LIST_MARKER, r"(?m)^[ \t]*(?:[-+*]|\d{1,9}[.)])[ \t]+");
pattern!(HTML_TAG, r"</?[A-Za-z][A-Za-z0-9-]*(?:\s[^<>]*)?/?>");

/// Removes code, heading markers, emphasis, and link/image syntax.
///
/// Images go before links so the `!` of an image never survives as a word.
pub(crate) fn strip_for_word_count(markdown: &str) -> String {
    let text = FENCED_CODE.replace_all(markdown, "");
    let text = replace(text, &INLINE_CODE, "");
    let text = replace(text, &IMAGE, "");
    let text = replace(text, &LINK, "$1");
    let text = replace(text, &HEADING, "");
    replace(text, &EMPHASIS, "").into_owned()
}

/// Plain text for excerpts: word-count stripping plus quotes, rules, list
/// markers and inline HTML.
pub(crate) fn strip_to_plain_text(markdown: &str) -> String {
    let text = FENCED_CODE.replace_all(markdown, "");
    let text = replace(text, &INLINE_CODE, "");
    let text = replace(text, &IMAGE, "");
    let text = replace(text, &LINK, "$1");
    let text = replace(text, &HTML_TAG, " ");
    let text = replace(text, &HEADING, "");
    let text = replace(text, &BLOCKQUOTE, "");
    let text = replace(text, &HORIZONTAL_RULE, "");
    let text = replace(text, &LIST_MARKER, "");
    replace(text, &EMPHASIS, "").into_owned()
}

fn replace<'t>(text: Cow<'t, str>, re: &Regex, rep: &str) -> Cow<'t, str> {
    if !re.is_match(&text) {
        return text;
    }
    Cow::Owned(re.replace_all(&text, rep).into_owned())
}
