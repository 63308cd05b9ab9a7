use crate::strip::strip_to_plain_text;

pub const DEFAULT_EXCERPT_LENGTH: usize = 200;
pub const ELLIPSIS: &str = "...";

/// Plain-text summary of a Markdown document, at most `max_length` characters
/// plus [`ELLIPSIS`] when shortened.
///
/// Truncation happens at the last space at or before the limit. A first word
/// longer than the limit is cut mid-word.
pub fn generate_excerpt(markdown: &str, max_length: usize) -> String {
    let plain = strip_to_plain_text(markdown);
    let collapsed = plain.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_at_word(&collapsed, max_length)
}

fn truncate_at_word(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let boundary = if text[cut..].starts_with(' ') {
        cut
    } else {
        text[..cut].rfind(' ').unwrap_or(cut)
    };

    let kept = text[..boundary].trim_end();
    format!("{kept}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
    use super::{truncate_at_word, ELLIPSIS};

    #[test]
    fn short_text_kept_as_is() {
        assert_eq!(truncate_at_word("short text", 20), "short text");
        assert_eq!(truncate_at_word("exactly", 7), "exactly");
    }

    #[test]
    fn cut_lands_on_word_boundary() {
        assert_eq!(truncate_at_word("alpha beta gamma", 8), "alpha...");
        assert_eq!(truncate_at_word("alpha beta gamma", 10), "alpha beta...");
    }

    #[test]
    fn oversized_single_word_is_hard_cut() {
        assert_eq!(truncate_at_word("supercalifragilistic word", 5), "super...");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "Xin chào thế giới";
        let excerpt = truncate_at_word(text, 12);
        assert_eq!(excerpt, "Xin chào thế...");
        assert!(excerpt.chars().count() <= 12 + ELLIPSIS.len());
    }
}
