use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Category fields a post carries for the visibility check and for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PostCategory {
    pub(crate) id: i64,
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) author_id: i64,
    pub(crate) author_username: String,
    pub(crate) category: Option<PostCategory>,
    pub(crate) is_published: bool,
    pub(crate) comment_count: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: Option<DateTime<Utc>>,
    pub(crate) category_id: Option<i64>,
    pub(crate) is_published: bool,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if let Some(category_id) = self.category_id {
            validate_positive_i64("category_id", category_id)?;
        }
        Ok(Self {
            title: normalize_title(&self.title)?,
            text: normalize_text(&self.text)?,
            ..self
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) category_id: Option<i64>,
    pub(crate) is_published: bool,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if let Some(category_id) = self.category_id {
            validate_positive_i64("category_id", category_id)?;
        }
        Ok(Self {
            title: normalize_title(&self.title)?,
            text: normalize_text(&self.text)?,
            ..self
        })
    }
}

impl Post {
    /// Checks the invariants of a post read back from storage.
    pub(crate) fn validated(self) -> Result<Self, DomainError> {
        validate_positive_i64("id", self.id)?;
        validate_positive_i64("author_id", self.author_id)?;

        if self.updated_at < self.created_at {
            return Err(DomainError::Validation {
                field: "updated_at",
                message: "must be >= created_at",
            });
        }
        if self.comment_count < 0 {
            return Err(DomainError::Validation {
                field: "comment_count",
                message: "must be >= 0",
            });
        }

        Ok(self)
    }

    /// Published, in a published category, and not scheduled for later.
    pub(crate) fn is_public_at(&self, now: DateTime<Utc>) -> bool {
        self.is_published
            && self.pub_date <= now
            && self
                .category
                .as_ref()
                .is_some_and(|category| category.is_published)
    }

    pub(crate) fn is_visible_to(&self, viewer_id: Option<i64>, now: DateTime<Utc>) -> bool {
        viewer_id == Some(self.author_id) || self.is_public_at(now)
    }
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

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..256 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_text(text: &str) -> Result<String, DomainError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::Validation {
            field: "text",
            message: "must not be empty",
        });
    }
    Ok(text.to_string())
}
