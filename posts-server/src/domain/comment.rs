use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::identity::normalize_email;
use super::post::validate_post_id;

const MAX_COMMENT_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author_email: String,
    pub(crate) text: String,
    pub(crate) created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PostCommentRequest {
    pub(crate) post_id: i64,
    pub(crate) author_email: String,
    pub(crate) text: String,
}

impl PostCommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        validate_post_id(self.post_id)?;
        Ok(Self {
            post_id: self.post_id,
            author_email: normalize_email("author_email", &self.author_email)?,
            text: normalize_text(&self.text)?,
        })
    }
}

fn normalize_text(text: &str) -> Result<String, DomainError> {
    let text = text.trim();
    if text.is_empty() || text.chars().count() > MAX_COMMENT_CHARS {
        return Err(DomainError::Validation {
            field: "text",
            message: "must be 1..1000 chars",
        });
    }
    Ok(text.to_string())
}
