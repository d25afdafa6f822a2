use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::data::Pagination;
use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostCategory};

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str = r#"
    p.id,
    p.title,
    p.text,
    p.pub_date,
    p.author_id,
    u.username AS author_username,
    p.category_id,
    c.slug AS category_slug,
    c.title AS category_title,
    c.is_published AS category_is_published,
    p.is_published,
    (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count,
    p.created_at,
    p.updated_at
"#;

const POST_FILTER: &str = r#"
    WHERE ($1::BIGINT IS NULL OR p.author_id = $1)
      AND ($2::BIGINT IS NULL OR p.category_id = $2)
      AND (NOT $3::BOOLEAN OR p.is_published)
      AND ($4::TIMESTAMPTZ IS NULL OR p.pub_date <= $4)
      AND (NOT $5::BOOLEAN OR COALESCE(c.is_published, FALSE))
"#;

fn select_posts_from(source: &str) -> String {
    format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM {source} p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN categories c ON c.id = p.category_id
        "#
    )
}

#[derive(FromRow)]
struct PostRow {
    id: i64,
    title: String,
    text: String,
    pub_date: DateTime<Utc>,
    author_id: i64,
    author_username: String,
    category_id: Option<i64>,
    category_slug: Option<String>,
    category_title: Option<String>,
    category_is_published: Option<bool>,
    is_published: bool,
    comment_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO posts (title, text, pub_date, author_id, category_id, is_published)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            {}
            "#,
            select_posts_from("inserted")
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(input.title)
            .bind(input.text)
            .bind(input.pub_date)
            .bind(input.author_id)
            .bind(input.category_id)
            .bind(input.is_published)
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let sql = format!("{} WHERE p.id = $1", select_posts_from("posts"));

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let sql = format!(
            r#"
            WITH updated AS (
                UPDATE posts
                SET title = $3,
                    text = $4,
                    pub_date = $5,
                    category_id = $6,
                    is_published = $7,
                    updated_at = NOW()
                WHERE id = $1 AND author_id = $2
                RETURNING *
            )
            {}
            "#,
            select_posts_from("updated")
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post_id)
            .bind(owner_id)
            .bind(patch.title)
            .bind(patch.text)
            .bind(patch.pub_date)
            .bind(patch.category_id)
            .bind(patch.is_published)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError> {
        let sql = format!(
            r#"
            {}
            {POST_FILTER}
            ORDER BY p.pub_date DESC, p.id DESC
            LIMIT $6
            OFFSET $7
            "#,
            select_posts_from("posts")
        );

        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(filter.author_id)
            .bind(filter.category_id)
            .bind(filter.only_published)
            .bind(filter.published_before)
            .bind(filter.require_published_category)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }

    async fn count_posts(&self, filter: PostFilter) -> Result<i64, DomainError> {
        let sql = format!(
            r#"
            SELECT COUNT(*)
            FROM posts p
            LEFT JOIN categories c ON c.id = p.category_id
            {POST_FILTER}
            "#
        );

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(filter.author_id)
            .bind(filter.category_id)
            .bind(filter.only_published)
            .bind(filter.published_before)
            .bind(filter.require_published_category)
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        Ok(count)
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    let category = match (
        row.category_id,
        row.category_slug,
        row.category_title,
        row.category_is_published,
    ) {
        (Some(id), Some(slug), Some(title), Some(is_published)) => Some(PostCategory {
            id,
            slug,
            title,
            is_published,
        }),
        _ => None,
    };

    Post {
        id: row.id,
        title: row.title,
        text: row.text,
        pub_date: row.pub_date,
        author_id: row.author_id,
        author_username: row.author_username,
        category,
        is_published: row.is_published,
        comment_count: row.comment_count,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
    .validated()
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        let resource = match db_err.constraint() {
            Some("posts_category_id_fkey") => "category",
            _ => "author",
        };
        return DomainError::NotFound(resource.to_string());
    }
    DomainError::Unexpected(err.to_string())
}
