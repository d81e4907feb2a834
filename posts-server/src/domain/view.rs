use chrono::DateTime;
use serde::Serialize;

const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y. %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PostView {
    pub(crate) id: i64,
    pub(crate) description: String,
    pub(crate) date: String,
    pub(crate) timestamp: i64,
    pub(crate) image: String,
    pub(crate) username: String,
    pub(crate) liked: bool,
    pub(crate) disliked: bool,
    pub(crate) favorited: bool,
    pub(crate) likes: u64,
    pub(crate) dislikes: u64,
    pub(crate) comments: Vec<CommentView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CommentView {
    pub(crate) text: String,
    pub(crate) date: String,
    pub(crate) username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ModerationReport {
    pub(crate) post_id: i64,
    pub(crate) description: String,
    pub(crate) author_email: String,
    pub(crate) image: String,
}

/// Formats epoch seconds as `dd.mm.yyyy. HH:MM` (UTC, 24h).
pub(crate) fn format_display_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_default()
}
