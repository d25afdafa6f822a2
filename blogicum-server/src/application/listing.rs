use crate::data::post_repository::{PostFilter, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::pagination::{Page, Paginator};
use crate::domain::post::Post;

/// Counts the filtered posts first so the requested page can be clamped.
pub(crate) async fn load_page<R: PostRepository>(
    repo: &R,
    paginator: Paginator,
    filter: PostFilter,
    raw_page: Option<&str>,
) -> Result<Page<Post>, DomainError> {
    let total = repo.count_posts(filter).await?;
    let window = paginator.get_page(raw_page, total);
    let items = repo.list_posts(filter, window.pagination()).await?;

    Ok(Page { items, window })
}
