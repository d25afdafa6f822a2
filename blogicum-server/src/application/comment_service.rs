use tracing::{info, warn};

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, CommentRequest};
use crate::domain::error::DomainError;

pub(crate) struct CommentService<M: CommentRepository, P: PostRepository> {
    comments: M,
    posts: P,
}

impl<M: CommentRepository, P: PostRepository> CommentService<M, P> {
    pub(crate) fn new(comments: M, posts: P) -> Self {
        Self { comments, posts }
    }

    pub(crate) async fn add_comment(
        &self,
        author_id: i64,
        post_id: i64,
        req: CommentRequest,
    ) -> Result<Comment, DomainError> {
        self.ensure_post_exists(post_id).await?;
        let req = req.validate()?;

        let comment = self
            .comments
            .create_comment(NewComment {
                text: req.text,
                post_id,
                author_id,
            })
            .await?;
        info!(comment_id = comment.id, post_id, author_id, "comment added");
        Ok(comment)
    }

    /// Both edit and delete send a non-author back to the post.
    pub(crate) async fn own_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Comment, DomainError> {
        self.ensure_post_exists(post_id).await?;

        let comment = self
            .comments
            .get_comment(post_id, comment_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {comment_id}")))?;

        if !comment.is_authored_by(actor_user_id) {
            warn!(comment_id, actor_user_id, "change of someone else's comment refused");
            return Err(DomainError::NotAuthor { post_id });
        }
        Ok(comment)
    }

    pub(crate) async fn edit_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        comment_id: i64,
        req: CommentRequest,
    ) -> Result<Comment, DomainError> {
        self.own_comment(actor_user_id, post_id, comment_id).await?;
        let req = req.validate()?;

        let comment = self
            .comments
            .update_comment_text(comment_id, req.text)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {comment_id}")))?;
        info!(comment_id, "comment edited");
        Ok(comment)
    }

    pub(crate) async fn delete_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        comment_id: i64,
    ) -> Result<(), DomainError> {
        self.own_comment(actor_user_id, post_id, comment_id).await?;

        if !self.comments.delete_comment(comment_id).await? {
            return Err(DomainError::NotFound(format!("comment id: {comment_id}")));
        }
        info!(comment_id, "comment deleted");
        Ok(())
    }

    async fn ensure_post_exists(&self, post_id: i64) -> Result<(), DomainError> {
        match self.posts.get_post(post_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound(format!("post id: {post_id}"))),
        }
    }
}
