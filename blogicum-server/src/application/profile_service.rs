use tracing::info;

use super::listing::load_page;
use crate::data::post_repository::{PostFilter, PostRepository};
use crate::data::user_repository::{ProfilePatch, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::pagination::{Page, Paginator};
use crate::domain::post::Post;
use crate::domain::user::{UpdateProfileRequest, User};

#[derive(Debug, Clone)]
pub(crate) struct ProfilePage {
    pub(crate) user: User,
    pub(crate) is_owner: bool,
    pub(crate) page: Page<Post>,
}

pub(crate) struct ProfileService<U: UserRepository, P: PostRepository> {
    users: U,
    posts: P,
    paginator: Paginator,
}

impl<U: UserRepository, P: PostRepository> ProfileService<U, P> {
    pub(crate) fn new(users: U, posts: P) -> Self {
        Self {
            users,
            posts,
            paginator: Paginator::default(),
        }
    }

    /// The owner sees every own post. Other viewers get the owner's posts
    /// filtered by the publish flag only: pub_date and category are not checked.
    pub(crate) async fn profile(
        &self,
        viewer_id: Option<i64>,
        username: &str,
        raw_page: Option<&str>,
    ) -> Result<ProfilePage, DomainError> {
        let user = self
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user: {username}")))?;

        let is_owner = viewer_id == Some(user.id);
        let page = load_page(
            &self.posts,
            self.paginator,
            PostFilter::by_author(user.id, is_owner),
            raw_page,
        )
        .await?;

        Ok(ProfilePage {
            user,
            is_owner,
            page,
        })
    }

    pub(crate) async fn own_profile(&self, actor_user_id: i64) -> Result<User, DomainError> {
        self.users
            .get_by_id(actor_user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {actor_user_id}")))
    }

    pub(crate) async fn update_profile(
        &self,
        actor_user_id: i64,
        req: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        let req = req.validate()?;
        let patch = ProfilePatch {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
        };

        let user = self
            .users
            .update_profile(actor_user_id, patch)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {actor_user_id}")))?;
        info!(user_id = user.id, username = %user.username, "profile updated");
        Ok(user)
    }
}
