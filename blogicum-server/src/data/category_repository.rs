use async_trait::async_trait;

use crate::domain::category::Category;
use crate::domain::error::DomainError;

#[async_trait]
pub(crate) trait CategoryRepository: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>, DomainError>;
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError>;
    async fn list_published(&self) -> Result<Vec<Category>, DomainError>;
}
