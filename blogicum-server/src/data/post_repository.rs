use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::Pagination;
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) author_id: i64,
    pub(crate) category_id: Option<i64>,
    pub(crate) is_published: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) category_id: Option<i64>,
    pub(crate) is_published: bool,
}

/// Which posts a listing selects. Every `None`/`false` field disables that condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PostFilter {
    pub(crate) author_id: Option<i64>,
    pub(crate) category_id: Option<i64>,
    pub(crate) only_published: bool,
    pub(crate) published_before: Option<DateTime<Utc>>,
    pub(crate) require_published_category: bool,
}

impl PostFilter {
    pub(crate) fn public(now: DateTime<Utc>) -> Self {
        Self {
            only_published: true,
            published_before: Some(now),
            require_published_category: true,
            ..Self::default()
        }
    }

    /// The category itself is checked by the caller.
    pub(crate) fn public_in_category(category_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            category_id: Some(category_id),
            only_published: true,
            published_before: Some(now),
            ..Self::default()
        }
    }

    pub(crate) fn by_author(author_id: i64, include_unpublished: bool) -> Self {
        Self {
            author_id: Some(author_id),
            only_published: !include_unpublished,
            ..Self::default()
        }
    }
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;
    async fn list_posts(
        &self,
        filter: PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError>;
    async fn count_posts(&self, filter: PostFilter) -> Result<i64, DomainError>;
}
