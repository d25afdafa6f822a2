use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::data::Pagination;
use crate::data::category_repository::CategoryRepository;
use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
use crate::data::user_repository::{NewUser, ProfilePatch, UserCredentials, UserRepository};
use crate::domain::category::Category;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostCategory};
use crate::domain::user::User;

#[derive(Clone, Default)]
pub(crate) struct FakePostRepo {
    pub(crate) posts: Arc<Mutex<Vec<Post>>>,
    pub(crate) categories: Arc<Mutex<Vec<Category>>>,
    pub(crate) update_calls: Arc<Mutex<Vec<(i64, i64, PostPatch)>>>,
}

impl FakePostRepo {
    pub(crate) fn with_posts(posts: Vec<Post>) -> Self {
        let repo = Self::default();
        *repo.posts.lock().expect("posts mutex poisoned") = posts;
        repo
    }

    pub(crate) fn ids(&self) -> Vec<i64> {
        self.posts
            .lock()
            .expect("posts mutex poisoned")
            .iter()
            .map(|post| post.id)
            .collect()
    }

    fn category_summary(&self, category_id: Option<i64>) -> Option<PostCategory> {
        let categories = self.categories.lock().expect("categories mutex poisoned");
        category_id.and_then(|id| {
            categories
                .iter()
                .find(|category| category.id == id)
                .map(|category| PostCategory {
                    id: category.id,
                    slug: category.slug.clone(),
                    title: category.title.clone(),
                    is_published: category.is_published,
                })
        })
    }
}

fn matches(filter: &PostFilter, post: &Post) -> bool {
    filter.author_id.is_none_or(|id| post.author_id == id)
        && filter
            .category_id
            .is_none_or(|id| post.category.as_ref().is_some_and(|c| c.id == id))
        && (!filter.only_published || post.is_published)
        && filter.published_before.is_none_or(|now| post.pub_date <= now)
        && (!filter.require_published_category
            || post.category.as_ref().is_some_and(|c| c.is_published))
}

#[async_trait]
impl PostRepository for FakePostRepo {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let category = self.category_summary(input.category_id);
        let mut posts = self.posts.lock().expect("posts mutex poisoned");
        let id = posts.iter().map(|post| post.id).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let post = Post {
            id,
            title: input.title,
            text: input.text,
            pub_date: input.pub_date,
            author_id: input.author_id,
            author_username: format!("user_{}", input.author_id),
            category,
            is_published: input.is_published,
            comment_count: 0,
            created_at: now,
            updated_at: now,
        };
        posts.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self
            .posts
            .lock()
            .expect("posts mutex poisoned")
            .iter()
            .find(|post| post.id == id)
            .cloned())
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        self.update_calls
            .lock()
            .expect("update_calls mutex poisoned")
            .push((post_id, owner_id, patch.clone()));

        let category = self.category_summary(patch.category_id);
        let mut posts = self.posts.lock().expect("posts mutex poisoned");
        let Some(post) = posts
            .iter_mut()
            .find(|post| post.id == post_id && post.author_id == owner_id)
        else {
            return Ok(None);
        };

        post.title = patch.title;
        post.text = patch.text;
        post.pub_date = patch.pub_date;
        post.category = category;
        post.is_published = patch.is_published;
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut posts = self.posts.lock().expect("posts mutex poisoned");
        let before = posts.len();
        posts.retain(|post| post.id != id);
        Ok(posts.len() != before)
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .expect("posts mutex poisoned")
            .iter()
            .filter(|post| matches(&filter, post))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));

        Ok(posts
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect())
    }

    async fn count_posts(&self, filter: PostFilter) -> Result<i64, DomainError> {
        Ok(self
            .posts
            .lock()
            .expect("posts mutex poisoned")
            .iter()
            .filter(|post| matches(&filter, post))
            .count() as i64)
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeCategoryRepo {
    pub(crate) categories: Arc<Mutex<Vec<Category>>>,
}

impl FakeCategoryRepo {
    pub(crate) fn with_categories(categories: Vec<Category>) -> Self {
        let repo = Self::default();
        *repo.categories.lock().expect("categories mutex poisoned") = categories;
        repo
    }
}

#[async_trait]
impl CategoryRepository for FakeCategoryRepo {
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>, DomainError> {
        Ok(self
            .categories
            .lock()
            .expect("categories mutex poisoned")
            .iter()
            .find(|category| category.id == id)
            .cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        Ok(self
            .categories
            .lock()
            .expect("categories mutex poisoned")
            .iter()
            .find(|category| category.slug == slug)
            .cloned())
    }

    async fn list_published(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self
            .categories
            .lock()
            .expect("categories mutex poisoned")
            .iter()
            .filter(|category| category.is_published)
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeCommentRepo {
    pub(crate) comments: Arc<Mutex<Vec<Comment>>>,
}

impl FakeCommentRepo {
    pub(crate) fn with_comments(comments: Vec<Comment>) -> Self {
        let repo = Self::default();
        *repo.comments.lock().expect("comments mutex poisoned") = comments;
        repo
    }

    pub(crate) fn text_of(&self, comment_id: i64) -> Option<String> {
        self.comments
            .lock()
            .expect("comments mutex poisoned")
            .iter()
            .find(|comment| comment.id == comment_id)
            .map(|comment| comment.text.clone())
    }
}

#[async_trait]
impl CommentRepository for FakeCommentRepo {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let mut comments = self.comments.lock().expect("comments mutex poisoned");
        let id = comments.iter().map(|comment| comment.id).max().unwrap_or(0) + 1;
        let comment = Comment {
            id,
            text: input.text,
            post_id: input.post_id,
            author_id: input.author_id,
            author_username: format!("user_{}", input.author_id),
            created_at: Utc::now(),
        };
        comments.push(comment.clone());
        Ok(comment)
    }

    async fn get_comment(
        &self,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Option<Comment>, DomainError> {
        Ok(self
            .comments
            .lock()
            .expect("comments mutex poisoned")
            .iter()
            .find(|comment| comment.id == comment_id && comment.post_id == post_id)
            .cloned())
    }

    async fn update_comment_text(
        &self,
        comment_id: i64,
        text: String,
    ) -> Result<Option<Comment>, DomainError> {
        let mut comments = self.comments.lock().expect("comments mutex poisoned");
        Ok(comments
            .iter_mut()
            .find(|comment| comment.id == comment_id)
            .map(|comment| {
                comment.text = text;
                comment.clone()
            }))
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<bool, DomainError> {
        let mut comments = self.comments.lock().expect("comments mutex poisoned");
        let before = comments.len();
        comments.retain(|comment| comment.id != comment_id);
        Ok(comments.len() != before)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .expect("comments mutex poisoned")
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeUserRepo {
    pub(crate) users: Arc<Mutex<Vec<UserCredentials>>>,
    pub(crate) created_input: Arc<Mutex<Option<NewUser>>>,
}

impl FakeUserRepo {
    pub(crate) fn with_users(users: Vec<User>) -> Self {
        let repo = Self::default();
        *repo.users.lock().expect("users mutex poisoned") = users
            .into_iter()
            .map(|user| UserCredentials {
                user,
                password_hash: String::new(),
            })
            .collect();
        repo
    }

    pub(crate) fn set_credentials(&self, creds: UserCredentials) {
        let mut users = self.users.lock().expect("users mutex poisoned");
        users.retain(|entry| entry.user.id != creds.user.id);
        users.push(creds);
    }

    pub(crate) fn take_created_input(&self) -> Option<NewUser> {
        self.created_input
            .lock()
            .expect("created input mutex poisoned")
            .take()
    }
}

#[async_trait]
impl UserRepository for FakeUserRepo {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.lock().expect("users mutex poisoned");
        if users.iter().any(|entry| entry.user.username == input.username) {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }
        let id = users.iter().map(|entry| entry.user.id).max().unwrap_or(0) + 1;
        let user = User::new(id, input.username.clone(), input.email.clone(), Utc::now())?
            .with_names(input.first_name.clone(), input.last_name.clone());
        users.push(UserCredentials {
            user: user.clone(),
            password_hash: input.password_hash.clone(),
        });
        *self
            .created_input
            .lock()
            .expect("created input mutex poisoned") = Some(input);
        Ok(user)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .users
            .lock()
            .expect("users mutex poisoned")
            .iter()
            .find(|entry| entry.user.username == username)
            .cloned())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .expect("users mutex poisoned")
            .iter()
            .find(|entry| entry.user.id == id)
            .map(|entry| entry.user.clone()))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .find_by_username(username)
            .await?
            .map(|entry| entry.user))
    }

    async fn update_profile(
        &self,
        id: i64,
        patch: ProfilePatch,
    ) -> Result<Option<User>, DomainError> {
        let mut users = self.users.lock().expect("users mutex poisoned");
        if users
            .iter()
            .any(|entry| entry.user.id != id && entry.user.username == patch.username)
        {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }
        Ok(users
            .iter_mut()
            .find(|entry| entry.user.id == id)
            .map(|entry| {
                entry.user.username = patch.username;
                entry.user.email = patch.email;
                entry.user.first_name = patch.first_name;
                entry.user.last_name = patch.last_name;
                entry.user.clone()
            }))
    }
}

pub(crate) fn sample_user(id: i64, username: &str) -> User {
    User::new(id, username, format!("{username}@example.com"), Utc::now())
        .expect("sample user must be valid")
}

pub(crate) fn sample_category(id: i64, slug: &str, is_published: bool) -> Category {
    Category::new(id, slug.to_uppercase(), "", slug, is_published, Utc::now())
        .expect("sample category must be valid")
}

pub(crate) fn sample_comment(id: i64, post_id: i64, author_id: i64) -> Comment {
    Comment {
        id,
        text: format!("comment {id}"),
        post_id,
        author_id,
        author_username: format!("user_{author_id}"),
        created_at: Utc::now(),
    }
}
