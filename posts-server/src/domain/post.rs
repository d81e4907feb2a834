use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::identity::normalize_email;

const MAX_DESCRIPTION_CHARS: usize = 2200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) description: String,
    pub(crate) author_email: String,
    /// Seconds since the unix epoch.
    pub(crate) created_at: i64,
    pub(crate) media_id: i64,
    pub(crate) marked_inappropriate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) description: String,
    pub(crate) author_email: String,
    pub(crate) image_base64: String,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            description: normalize_description(&self.description)?,
            author_email: normalize_email("author_email", &self.author_email)?,
            image_base64: normalize_image(self.image_base64)?,
        })
    }
}

pub(crate) fn validate_post_id(post_id: i64) -> Result<(), DomainError> {
    validate_positive_i64("post_id", post_id)
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

fn normalize_description(description: &str) -> Result<String, DomainError> {
    let description = description.trim();
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(DomainError::Validation {
            field: "description",
            message: "must be at most 2200 chars",
        });
    }
    Ok(description.to_string())
}

fn normalize_image(image_base64: String) -> Result<String, DomainError> {
    if image_base64.trim().is_empty() {
        return Err(DomainError::Validation {
            field: "image",
            message: "must not be empty",
        });
    }
    Ok(image_base64)
}
