use chrono::Utc;
use tracing::{info, warn};

use super::listing::load_page;
use crate::data::category_repository::CategoryRepository;
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
use crate::domain::category::Category;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::pagination::{Page, Paginator};
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};

#[derive(Debug, Clone)]
pub(crate) struct PostDetail {
    pub(crate) post: Post,
    pub(crate) comments: Vec<Comment>,
}

#[derive(Debug, Clone)]
pub(crate) struct CategoryPosts {
    pub(crate) category: Category,
    pub(crate) page: Page<Post>,
}

pub(crate) struct BlogService<P, C, M>
where
    P: PostRepository,
    C: CategoryRepository,
    M: CommentRepository,
{
    posts: P,
    categories: C,
    comments: M,
    paginator: Paginator,
}

impl<P, C, M> BlogService<P, C, M>
where
    P: PostRepository,
    C: CategoryRepository,
    M: CommentRepository,
{
    pub(crate) fn new(posts: P, categories: C, comments: M) -> Self {
        Self {
            posts,
            categories,
            comments,
            paginator: Paginator::default(),
        }
    }

    pub(crate) async fn index(&self, raw_page: Option<&str>) -> Result<Page<Post>, DomainError> {
        load_page(
            &self.posts,
            self.paginator,
            PostFilter::public(Utc::now()),
            raw_page,
        )
        .await
    }

    pub(crate) async fn post_detail(
        &self,
        viewer_id: Option<i64>,
        post_id: i64,
    ) -> Result<PostDetail, DomainError> {
        let post = self.find_post(post_id).await?;
        if !post.is_visible_to(viewer_id, Utc::now()) {
            return Err(not_found(post_id));
        }

        let comments = self.comments.list_for_post(post.id).await?;
        Ok(PostDetail { post, comments })
    }

    pub(crate) async fn category_posts(
        &self,
        slug: &str,
        raw_page: Option<&str>,
    ) -> Result<CategoryPosts, DomainError> {
        let category = self
            .categories
            .get_by_slug(slug)
            .await?
            .filter(|category| category.is_published)
            .ok_or_else(|| DomainError::NotFound(format!("category slug: {slug}")))?;

        let page = load_page(
            &self.posts,
            self.paginator,
            PostFilter::public_in_category(category.id, Utc::now()),
            raw_page,
        )
        .await?;

        Ok(CategoryPosts { category, page })
    }

    pub(crate) async fn published_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.categories.list_published().await
    }

    pub(crate) async fn create_post(
        &self,
        author_id: i64,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;
        self.ensure_category_exists(req.category_id).await?;

        let new_post = NewPost {
            title: req.title,
            text: req.text,
            pub_date: req.pub_date.unwrap_or_else(Utc::now),
            author_id,
            category_id: req.category_id,
            is_published: req.is_published,
        };
        let post = self.posts.create_post(new_post).await?;
        info!(post_id = post.id, author_id, "post created");
        Ok(post)
    }

    /// Non-authors are sent back to the post instead of getting an error.
    pub(crate) async fn post_for_edit(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<Post, DomainError> {
        let post = self.find_post(post_id).await?;
        if post.author_id != actor_user_id {
            warn!(post_id, actor_user_id, "edit of someone else's post refused");
            return Err(DomainError::NotAuthor { post_id });
        }
        Ok(post)
    }

    pub(crate) async fn update_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        self.post_for_edit(actor_user_id, post_id).await?;

        let req = req.validate()?;
        self.ensure_category_exists(req.category_id).await?;

        let patch = PostPatch {
            title: req.title,
            text: req.text,
            pub_date: req.pub_date,
            category_id: req.category_id,
            is_published: req.is_published,
        };
        let post = self
            .posts
            .update_post_owned(post_id, actor_user_id, patch)
            .await?
            .ok_or_else(|| not_found(post_id))?;
        info!(post_id, "post updated");
        Ok(post)
    }

    /// Unlike editing, deleting someone else's post is a hard `Forbidden`.
    pub(crate) async fn post_for_delete(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<Post, DomainError> {
        let post = self.find_post(post_id).await?;
        if post.author_id != actor_user_id {
            warn!(post_id, actor_user_id, "delete of someone else's post refused");
            return Err(DomainError::Forbidden);
        }
        Ok(post)
    }

    pub(crate) async fn delete_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        self.post_for_delete(actor_user_id, post_id).await?;

        let deleted = self.posts.delete_post(post_id).await?;
        if !deleted {
            return Err(not_found(post_id));
        }
        info!(post_id, "post deleted");
        Ok(())
    }

    async fn find_post(&self, post_id: i64) -> Result<Post, DomainError> {
        self.posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| not_found(post_id))
    }

    async fn ensure_category_exists(&self, category_id: Option<i64>) -> Result<(), DomainError> {
        let Some(category_id) = category_id else {
            return Ok(());
        };
        if self.categories.get_by_id(category_id).await?.is_none() {
            return Err(DomainError::Validation {
                field: "category_id",
                message: "unknown category",
            });
        }
        Ok(())
    }
}

fn not_found(post_id: i64) -> DomainError {
    DomainError::NotFound(format!("post id: {post_id}"))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::BlogService;
    use crate::application::fakes::{
        FakeCategoryRepo, FakeCommentRepo, FakePostRepo, sample_category, sample_comment,
    };
    use crate::domain::error::DomainError;
    use crate::domain::post::tests::sample_post;
    use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};

    type TestService = BlogService<FakePostRepo, FakeCategoryRepo, FakeCommentRepo>;

    fn service_with(posts: Vec<Post>) -> (TestService, FakePostRepo) {
        let post_repo = FakePostRepo::with_posts(posts);
        let categories = vec![
            sample_category(1, "travel", true),
            sample_category(2, "drafts", false),
        ];
        *post_repo
            .categories
            .lock()
            .expect("categories mutex poisoned") = categories.clone();
        let service = BlogService::new(
            post_repo.clone(),
            FakeCategoryRepo::with_categories(categories),
            FakeCommentRepo::with_comments(vec![
                sample_comment(1, 1, 20),
                sample_comment(2, 1, 30),
                sample_comment(3, 2, 20),
            ]),
        );
        (service, post_repo)
    }

    fn hidden_category(mut post: Post) -> Post {
        if let Some(category) = post.category.as_mut() {
            category.id = 2;
            category.slug = "drafts".to_string();
            category.is_published = false;
        }
        post
    }

    #[tokio::test]
    async fn index_lists_only_public_posts_newest_first() {
        let mut unpublished = sample_post(2, 10);
        unpublished.is_published = false;
        let mut scheduled = sample_post(3, 10);
        scheduled.pub_date = Utc::now() + Duration::days(1);
        let in_hidden_category = hidden_category(sample_post(4, 10));
        let mut older = sample_post(5, 10);
        older.pub_date = Utc::now() - Duration::days(3);

        let (service, _) = service_with(vec![
            older,
            sample_post(1, 10),
            unpublished,
            scheduled,
            in_hidden_category,
        ]);

        let page = service.index(None).await.expect("index must succeed");
        let ids: Vec<i64> = page.items.iter().map(|post| post.id).collect();
        assert_eq!(ids, vec![1, 5]);
        assert_eq!(page.window.total, 2);
    }

    #[tokio::test]
    async fn index_pages_by_ten_and_clamps_page_number() {
        let posts = (1..=23)
            .map(|id| {
                let mut post = sample_post(id, 10);
                post.pub_date = Utc::now() - Duration::minutes(id);
                post
            })
            .collect();
        let (service, _) = service_with(posts);

        let first = service.index(Some("1")).await.expect("index must succeed");
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.items[0].id, 1);
        assert_eq!(first.window.num_pages, 3);

        let clamped = service.index(Some("42")).await.expect("index must succeed");
        assert_eq!(clamped.window.number, 3);
        assert_eq!(clamped.items.len(), 3);
        assert_eq!(clamped.items[0].id, 21);
    }

    #[tokio::test]
    async fn detail_hides_unpublished_post_from_other_users() {
        let mut post = sample_post(1, 10);
        post.is_published = false;
        let (service, _) = service_with(vec![post]);

        let err = service
            .post_detail(Some(11), 1)
            .await
            .expect_err("must be hidden");
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = service
            .post_detail(None, 1)
            .await
            .expect_err("must be hidden");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn detail_shows_hidden_post_to_author_with_comments() {
        let mut post = hidden_category(sample_post(1, 10));
        post.pub_date = Utc::now() + Duration::days(7);
        let (service, _) = service_with(vec![post]);

        let detail = service
            .post_detail(Some(10), 1)
            .await
            .expect("author must see own post");
        assert_eq!(detail.post.id, 1);
        let comment_ids: Vec<i64> = detail.comments.iter().map(|c| c.id).collect();
        assert_eq!(comment_ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn detail_returns_not_found_for_missing_post() {
        let (service, _) = service_with(vec![]);
        let err = service
            .post_detail(None, 42)
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn category_listing_requires_published_category() {
        let (service, _) = service_with(vec![sample_post(1, 10)]);

        let err = service
            .category_posts("drafts", None)
            .await
            .expect_err("hidden category must 404");
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = service
            .category_posts("missing", None)
            .await
            .expect_err("missing category must 404");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn category_listing_skips_unpublished_posts() {
        let mut unpublished = sample_post(2, 10);
        unpublished.is_published = false;
        let (service, _) = service_with(vec![sample_post(1, 10), unpublished]);

        let result = service
            .category_posts("travel", Some("1"))
            .await
            .expect("category listing must succeed");
        assert_eq!(result.category.slug, "travel");
        let ids: Vec<i64> = result.page.items.iter().map(|post| post.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn create_post_sets_author_and_defaults_pub_date() {
        let (service, repo) = service_with(vec![]);

        let req = CreatePostRequest {
            title: "  title  ".to_string(),
            text: "  text  ".to_string(),
            pub_date: None,
            category_id: Some(1),
            is_published: true,
        };

        let created = service
            .create_post(10, req)
            .await
            .expect("create_post must succeed");

        assert_eq!(created.title, "title");
        assert_eq!(created.text, "text");
        assert_eq!(created.author_id, 10);
        assert!(created.pub_date <= Utc::now());
        assert_eq!(created.category.map(|c| c.slug).as_deref(), Some("travel"));
        assert_eq!(repo.ids(), vec![created.id]);
    }

    #[tokio::test]
    async fn create_post_rejects_unknown_category() {
        let (service, _) = service_with(vec![]);

        let req = CreatePostRequest {
            title: "title".to_string(),
            text: "text".to_string(),
            pub_date: None,
            category_id: Some(99),
            is_published: true,
        };

        let err = service
            .create_post(10, req)
            .await
            .expect_err("unknown category must fail");
        assert!(matches!(
            err,
            DomainError::Validation {
                field: "category_id",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn update_post_by_non_author_redirects_to_post() {
        let (service, repo) = service_with(vec![sample_post(7, 99)]);

        let req = UpdatePostRequest {
            title: "new".to_string(),
            text: "body".to_string(),
            pub_date: Utc::now(),
            category_id: None,
            is_published: true,
        };

        let err = service
            .update_post(10, 7, req)
            .await
            .expect_err("must be refused");
        assert!(matches!(err, DomainError::NotAuthor { post_id: 7 }));
        assert!(
            repo.update_calls
                .lock()
                .expect("update_calls mutex poisoned")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn update_post_uses_update_post_owned_contract() {
        let (service, repo) = service_with(vec![sample_post(7, 10)]);

        let req = UpdatePostRequest {
            title: "  new  ".to_string(),
            text: "  body  ".to_string(),
            pub_date: Utc::now(),
            category_id: None,
            is_published: false,
        };

        let updated = service
            .update_post(10, 7, req)
            .await
            .expect("update must succeed");
        assert_eq!(updated.id, 7);
        assert!(!updated.is_published);
        assert!(updated.category.is_none());

        let calls = repo
            .update_calls
            .lock()
            .expect("update_calls mutex poisoned")
            .clone();
        assert_eq!(calls.len(), 1);
        let (post_id, owner_id, patch) = &calls[0];
        assert_eq!(*post_id, 7);
        assert_eq!(*owner_id, 10);
        assert_eq!(patch.title, "new");
        assert_eq!(patch.text, "body");
    }

    #[tokio::test]
    async fn delete_post_returns_forbidden_for_non_owner() {
        let (service, repo) = service_with(vec![sample_post(7, 99)]);

        let err = service
            .delete_post(10, 7)
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
        assert_eq!(repo.ids(), vec![7]);
    }

    #[tokio::test]
    async fn delete_post_removes_own_post() {
        let (service, repo) = service_with(vec![sample_post(7, 10), sample_post(8, 10)]);

        service
            .delete_post(10, 7)
            .await
            .expect("delete must succeed");
        assert_eq!(repo.ids(), vec![8]);
    }

    #[tokio::test]
    async fn published_categories_skip_hidden_ones() {
        let (service, _) = service_with(vec![]);
        let categories = service
            .published_categories()
            .await
            .expect("must list categories");
        let slugs: Vec<&str> = categories.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["travel"]);
    }
}
