pub(crate) mod category_repository;
pub(crate) mod comment_repository;
pub(crate) mod post_repository;
pub(crate) mod repositories;
pub(crate) mod user_repository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pagination {
    pub(crate) page: u32,
    pub(crate) page_size: u32,
}

impl Pagination {
    pub(crate) fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub(crate) fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * self.limit()
    }
}
