use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use ammonia::Builder;
use regex::Regex;

use crate::{ContentDraft, ContentStage, StageKind};

const ALLOWED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "hr", "strong", "em", "u", "del", "code",
    "pre", "blockquote", "ul", "ol", "li", "a", "img", "table", "thead", "tbody", "tr", "th",
    "td", "div", "span",
];

/// Removed together with everything inside them.
const CONTENT_STRIPPED_TAGS: &[&str] = &["script", "style", "noscript", "iframe"];

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

const ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "title", "target", "rel"]),
    ("img", &["src", "alt", "title", "width", "height"]),
    ("code", &["class"]),
    ("pre", &["class"]),
    ("div", &["class"]),
    ("span", &["class"]),
];

// An HTML parser drops one newline right after `<pre>`; the serializer does not
// put it back.
static PRE_LEADING_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<pre(?:\s[^>]*)?>)\n").expect("valid regex"));

/// Allow-list HTML sanitizer. This is the XSS boundary for rendered posts.
pub struct HtmlSanitizer {
    builder: Builder<'static>,
}

impl HtmlSanitizer {
    pub fn new() -> Self {
        let tag_attributes: HashMap<&'static str, HashSet<&'static str>> = ALLOWED_ATTRIBUTES
            .iter()
            .map(|(tag, attrs)| (*tag, attrs.iter().copied().collect()))
            .collect();

        let mut builder = Builder::default();
        builder
            .tags(ALLOWED_TAGS.iter().copied().collect())
            .clean_content_tags(CONTENT_STRIPPED_TAGS.iter().copied().collect())
            .tag_attributes(tag_attributes)
            .generic_attributes(HashSet::new())
            .url_schemes(ALLOWED_SCHEMES.iter().copied().collect())
            .link_rel(None)
            .attribute_filter(filter_attribute);

        Self { builder }
    }

    /// Output is stable under a second pass.
    pub fn sanitize(&self, html: &str) -> String {
        let cleaned = self.builder.clean(html).to_string();
        PRE_LEADING_NEWLINE
            .replace_all(&cleaned, "$1\n\n")
            .into_owned()
    }
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStage for HtmlSanitizer {
    fn kind(&self) -> StageKind {
        StageKind::Sanitize
    }

    fn apply(&self, mut draft: ContentDraft) -> ContentDraft {
        if let Some(html) = draft.html.take() {
            draft.html = Some(self.sanitize(&html));
        }
        draft
    }
}

fn filter_attribute<'u>(element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
    if attribute != "class" {
        return Some(Cow::Borrowed(value));
    }

    let kept: Vec<&str> = value
        .split_ascii_whitespace()
        .filter(|class| class_allowed(element, class))
        .collect();

    if kept.is_empty() {
        None
    } else {
        let joined = kept.join(" ");
        if joined == value {
            Some(Cow::Borrowed(value))
        } else {
            Some(Cow::Owned(joined))
        }
    }
}

fn class_allowed(element: &str, class: &str) -> bool {
    match element {
        "code" => {
            has_suffix_after(class, "language-") || class == "hljs" || class == "inline-code"
        }
        "pre" => true,
        "div" => matches!(class, "highlight" | "code-block"),
        "span" => has_suffix_after(class, "hljs-"),
        _ => false,
    }
}

fn has_suffix_after(class: &str, prefix: &str) -> bool {
    class
        .strip_prefix(prefix)
        .is_some_and(|rest| !rest.is_empty())
}
