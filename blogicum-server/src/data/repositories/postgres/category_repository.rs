use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::data::category_repository::CategoryRepository;
use crate::domain::category::Category;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CategoryRow {
    id: i64,
    title: String,
    description: String,
    slug: String,
    is_published: bool,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, title, description, slug, is_published, created_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_category_db_error)?;

        row.map(map_row_to_category).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, title, description, slug, is_published, created_at
            FROM categories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_category_db_error)?;

        row.map(map_row_to_category).transpose()
    }

    async fn list_published(&self) -> Result<Vec<Category>, DomainError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, title, description, slug, is_published, created_at
            FROM categories
            WHERE is_published
            ORDER BY title, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_category_db_error)?;

        rows.into_iter().map(map_row_to_category).collect()
    }
}

fn map_row_to_category(row: CategoryRow) -> Result<Category, DomainError> {
    Category::new(
        row.id,
        row.title,
        row.description,
        row.slug,
        row.is_published,
        row.created_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_category_db_error(err: sqlx::Error) -> DomainError {
    DomainError::Unexpected(err.to_string())
}
