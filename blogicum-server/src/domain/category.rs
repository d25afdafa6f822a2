use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Category {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) slug: String,
    pub(crate) is_published: bool,
    pub(crate) created_at: DateTime<Utc>,
}

impl Category {
    pub(crate) fn new(
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        slug: impl Into<String>,
        is_published: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }
        let slug = slug.into();
        if !is_valid_slug(&slug) {
            return Err(DomainError::Validation {
                field: "slug",
                message: "may contain only latin letters, digits, '-' and '_'",
            });
        }

        Ok(Self {
            id,
            title: title.into(),
            description: description.into(),
            slug,
            is_published,
            created_at,
        })
    }
}

pub(crate) fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{Category, is_valid_slug};

    #[test]
    fn slug_accepts_url_safe_chars_only() {
        assert!(is_valid_slug("travel-2024_notes"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug("путешествия"));
    }

    #[test]
    fn category_new_rejects_bad_slug() {
        let result = Category::new(1, "Travel", "", "bad slug", true, Utc::now());
        assert!(result.is_err());
    }
}
