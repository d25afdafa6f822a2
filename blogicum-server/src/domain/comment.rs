use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) author_username: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CommentRequest {
    pub(crate) text: String,
}

impl CommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(DomainError::Validation {
                field: "text",
                message: "must not be empty",
            });
        }
        Ok(Self {
            text: text.to_string(),
        })
    }
}

impl Comment {
    pub(crate) fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::{CommentRequest, DomainError};

    #[test]
    fn comment_request_rejects_blank_text() {
        let err = CommentRequest {
            text: " \n ".to_string(),
        }
        .validate()
        .expect_err("blank text must be rejected");
        assert!(matches!(err, DomainError::Validation { field: "text", .. }));
    }

    #[test]
    fn comment_request_trims_text() {
        let req = CommentRequest {
            text: "  nice post  ".to_string(),
        }
        .validate()
        .expect("must validate");
        assert_eq!(req.text, "nice post");
    }
}
