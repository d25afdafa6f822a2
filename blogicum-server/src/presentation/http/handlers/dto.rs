use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::category::Category;
use crate::domain::comment::Comment;
use crate::domain::pagination::Page;
use crate::domain::post::{Post, PostCategory};
use crate::domain::user::User;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct PageQuery {
    /// Page number, 1-based. Invalid values fall back to the first page,
    /// out-of-range values to the last one.
    pub(crate) page: Option<String>,
}

impl PageQuery {
    pub(crate) fn raw(&self) -> Option<&str> {
        self.page.as_deref()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostCategoryDto {
    pub(crate) id: i64,
    pub(crate) slug: String,
    pub(crate) title: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) author_id: i64,
    pub(crate) author_username: String,
    pub(crate) category: Option<PostCategoryDto>,
    pub(crate) is_published: bool,
    pub(crate) comment_count: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<PostCategory> for PostCategoryDto {
    fn from(category: PostCategory) -> Self {
        Self {
            id: category.id,
            slug: category.slug,
            title: category.title,
        }
    }
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            text: post.text,
            pub_date: post.pub_date,
            author_id: post.author_id,
            author_username: post.author_username,
            category: post.category.map(PostCategoryDto::from),
            is_published: post.is_published,
            comment_count: post.comment_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostPageDto {
    pub(crate) posts: Vec<PostDto>,
    pub(crate) page: u32,
    pub(crate) num_pages: u32,
    pub(crate) per_page: u32,
    pub(crate) total: i64,
    pub(crate) has_next: bool,
    pub(crate) has_previous: bool,
}

impl From<Page<Post>> for PostPageDto {
    fn from(page: Page<Post>) -> Self {
        let window = page.window;
        Self {
            posts: page.items.into_iter().map(PostDto::from).collect(),
            page: window.number,
            num_pages: window.num_pages,
            per_page: window.per_page,
            total: window.total,
            has_next: window.has_next(),
            has_previous: window.has_previous(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) slug: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            title: category.title,
            description: category.description,
            slug: category.slug,
            created_at: category.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) author_username: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author_username: comment.author_username,
            created_at: comment.created_at,
        }
    }
}

/// Full account data, only ever returned to the account owner.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PublicUserDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) full_name: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<User> for PublicUserDto {
    fn from(user: User) -> Self {
        Self {
            full_name: user.full_name(),
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}
