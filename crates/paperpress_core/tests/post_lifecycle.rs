use chrono::{DateTime, Duration, TimeZone, Utc};
use paperpress_content::{generate_excerpt, process_content, ContentPipeline};
use paperpress_core::{ContentProcessor, NewPost, Post, PostError, PostStatus};
use pretty_assertions::assert_eq;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()
}

fn new_post(status: PostStatus) -> NewPost {
    NewPost {
        title: "  Hello Rust  ".to_string(),
        markdown_source: "# Intro\n\nSome `code` and **bold** words.".to_string(),
        author: "ana".to_string(),
        tags: vec!["rust".to_string()],
        status,
    }
}

fn create(status: PostStatus) -> Post {
    Post::create(1, "hello-rust".to_string(), new_post(status), &ContentProcessor::default(), t0())
        .unwrap()
}

#[test]
fn create_fills_derived_fields_together() {
    let post = create(PostStatus::Draft);
    let md = post.markdown_source();

    assert_eq!(post.title(), "Hello Rust");
    assert_eq!(post.html(), process_content(md).html);
    assert_eq!(post.reading_time_minutes(), 1);
    assert_eq!(post.excerpt(), generate_excerpt(md, 200));
    assert_eq!(post.excerpt(), "Intro Some and bold words.");
    assert_eq!(post.published_at(), None);
    assert_eq!(post.created_at(), t0());
}

#[test]
fn create_rejects_missing_title_or_content() {
    let processor = ContentProcessor::default();
    let mut input = new_post(PostStatus::Draft);
    input.title = "   ".to_string();
    assert_eq!(
        Post::create(1, "x".into(), input, &processor, t0()).unwrap_err(),
        PostError::EmptyTitle
    );

    let mut input = new_post(PostStatus::Draft);
    input.markdown_source = "\n".to_string();
    assert_eq!(
        Post::create(1, "x".into(), input, &processor, t0()).unwrap_err(),
        PostError::EmptyContent
    );
}

#[test]
fn publishing_on_create_stamps_published_at() {
    let post = create(PostStatus::Published);
    assert_eq!(post.published_at(), Some(t0()));
}

#[test]
fn published_at_is_set_once_and_never_cleared() {
    let mut post = create(PostStatus::Draft);
    let first = t0() + Duration::hours(1);
    post.set_status(PostStatus::Published, first);
    assert_eq!(post.published_at(), Some(first));

    post.set_status(PostStatus::Draft, first + Duration::hours(1));
    assert_eq!(post.status(), PostStatus::Draft);
    assert_eq!(post.published_at(), Some(first));

    post.set_status(PostStatus::Published, first + Duration::hours(2));
    assert_eq!(post.published_at(), Some(first));
}

#[test]
fn editing_markdown_refreshes_every_derived_field() {
    let mut post = create(PostStatus::Draft);
    let words = vec!["word"; 450].join(" ");
    let later = t0() + Duration::days(1);
    post.edit_markdown(words.clone(), &ContentProcessor::default(), later).unwrap();

    assert_eq!(post.markdown_source(), words);
    assert_eq!(post.reading_time_minutes(), 3);
    assert_eq!(post.html(), process_content(&words).html);
    assert_eq!(post.excerpt(), generate_excerpt(&words, 200));
    assert_eq!(post.updated_at(), later);
}

#[test]
fn rejected_edit_leaves_post_unchanged() {
    let mut post = create(PostStatus::Draft);
    let before = post.clone();
    assert_eq!(
        post.edit_markdown("  ".to_string(), &ContentProcessor::default(), t0()),
        Err(PostError::EmptyContent)
    );
    assert_eq!(post, before);
}

#[test]
fn reprocess_uses_processor_settings() {
    let mut post = create(PostStatus::Draft);
    let words = vec!["word"; 30].join(" ");
    post.edit_markdown(words, &ContentProcessor::default(), t0()).unwrap();

    let slow = ContentProcessor::new(ContentPipeline::with_words_per_minute(10), 9);
    post.reprocess(&slow);
    assert_eq!(post.reading_time_minutes(), 3);
    assert_eq!(post.excerpt(), "word word...");
}

#[test]
fn counters_increment() {
    let mut post = create(PostStatus::Published);
    assert_eq!(post.record_view(), 1);
    assert_eq!(post.record_view(), 2);
    assert_eq!(post.record_like(), 1);
    assert_eq!(post.record_comment(), 1);
    assert_eq!((post.view_count(), post.like_count(), post.comment_count()), (2, 1, 1));
}

#[test]
fn retitle_replaces_title_and_slug() {
    let mut post = create(PostStatus::Draft);
    post.retitle("New Title", "new-title".to_string(), t0()).unwrap();
    assert_eq!((post.title(), post.slug()), ("New Title", "new-title"));
    assert_eq!(
        post.retitle(" ", "x".to_string(), t0()),
        Err(PostError::EmptyTitle)
    );
}

#[test]
fn status_parses_from_names() {
    assert_eq!("published".parse::<PostStatus>(), Ok(PostStatus::Published));
    assert_eq!("draft".parse::<PostStatus>(), Ok(PostStatus::Draft));
    assert_eq!(
        "archived".parse::<PostStatus>(),
        Err(PostError::UnknownStatus("archived".to_string()))
    );
}

#[test]
fn post_serializes_with_camel_case_fields() {
    let post = create(PostStatus::Published);
    let value = serde_json::to_value(&post).unwrap();
    assert_eq!(value["readingTimeMinutes"], 1);
    assert_eq!(value["status"], "published");
    assert!(value["publishedAt"].is_string());
    let back: Post = serde_json::from_value(value).unwrap();
    assert_eq!(back, post);
}
