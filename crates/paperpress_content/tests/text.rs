use paperpress_content::{
    generate_excerpt, MarkdownWordCounter, ReadingTimeEstimator, WordCounter,
    DEFAULT_EXCERPT_LENGTH, ELLIPSIS,
};
use pretty_assertions::assert_eq;

#[test]
fn reading_time_is_never_below_one() {
    let estimator = ReadingTimeEstimator::default();
    for md in ["", "Short text", "```\ncode only\n```", "![img](x.png)", "# \n\n**"] {
        assert_eq!(estimator.estimate(md), 1, "input {md:?}");
    }
}

#[test]
fn reading_time_rounds_up() {
    let estimator = ReadingTimeEstimator::default();
    let words = |n: usize| vec!["word"; n].join(" ");
    assert_eq!(estimator.estimate(&words(200)), 1);
    assert_eq!(estimator.estimate(&words(201)), 2);
    assert_eq!(estimator.estimate(&words(250)), 2);
    assert_eq!(estimator.estimate(&words(401)), 3);
}

#[test]
fn zero_rate_is_clamped() {
    let estimator = ReadingTimeEstimator::new(0);
    assert_eq!(estimator.words_per_minute(), 1);
    assert_eq!(estimator.estimate("one two three"), 3);
}

#[test]
fn word_count_ignores_markdown_noise() {
    let md = "## Heading\n\nA [link text](https://x.dev) and ![alt](a.png)\n\n```js\nlet a = 1;\n```\n\n`inline` *end*";
    assert_eq!(MarkdownWordCounter.count(md), 6);
}

#[test]
fn excerpt_strips_markdown() {
    let md = "# Title\n\n> A **quoted** [link](https://x.dev)\n\n- item\n\n---\n\n`code` after";
    assert_eq!(
        generate_excerpt(md, DEFAULT_EXCERPT_LENGTH),
        "Title A quoted link item after"
    );
}

#[test]
fn excerpt_keeps_comparisons_and_drops_inline_html() {
    assert_eq!(
        generate_excerpt("Use it when a < b and c > d holds.", 200),
        "Use it when a < b and c > d holds."
    );
    assert_eq!(
        generate_excerpt("Press <kbd>Ctrl</kbd> then <br/>go <span class=\"x\">on</span>", 200),
        "Press Ctrl then go on"
    );
}

#[test]
fn excerpt_respects_bound_and_word_boundaries() {
    let md = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod";
    for limit in 0..md.len() + 5 {
        let excerpt = generate_excerpt(md, limit);
        assert!(excerpt.chars().count() <= limit + ELLIPSIS.len());
        if limit < "lorem".len() {
            // the first word alone exceeds the limit
            continue;
        }
        let body = excerpt.strip_suffix(ELLIPSIS).unwrap_or(&excerpt);
        for word in body.split_whitespace() {
            assert!(md.split_whitespace().any(|w| w == word), "cut mid-word at {limit}: {excerpt:?}");
        }
    }
}

#[test]
fn excerpt_of_empty_markdown_is_empty() {
    assert_eq!(generate_excerpt("", 200), "");
    assert_eq!(generate_excerpt("```\nonly code\n```", 200), "");
}
