use crate::data::Pagination;

pub(crate) const POSTS_PER_PAGE: u32 = 10;

/// Splits a listing into fixed-size pages.
///
/// Out-of-range page numbers are clamped instead of rejected: a missing or
/// non-numeric page gives the first page, anything below 1 or past the end
/// gives the last one.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Paginator {
    per_page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageWindow {
    pub(crate) number: u32,
    pub(crate) num_pages: u32,
    pub(crate) per_page: u32,
    pub(crate) total: i64,
}

impl Paginator {
    pub(crate) fn new(per_page: u32) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub(crate) fn num_pages(&self, total: i64) -> u32 {
        let total = total.max(0) as u64;
        let per_page = u64::from(self.per_page);
        let pages = total.div_ceil(per_page).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub(crate) fn get_page(&self, raw_page: Option<&str>, total: i64) -> PageWindow {
        let num_pages = self.num_pages(total);
        let number = match raw_page.map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) if n < 1 || n > i64::from(num_pages) => num_pages,
            Some(Ok(n)) => n as u32,
        };

        PageWindow {
            number,
            num_pages,
            per_page: self.per_page,
            total: total.max(0),
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

impl PageWindow {
    pub(crate) fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub(crate) fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub(crate) fn pagination(&self) -> Pagination {
        Pagination {
            page: self.number,
            page_size: self.per_page,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Page<T> {
    pub(crate) items: Vec<T>,
    pub(crate) window: PageWindow,
}

#[cfg(test)]
mod tests {
    use super::{POSTS_PER_PAGE, Paginator};

    #[test]
    fn empty_listing_has_one_empty_page() {
        let window = Paginator::default().get_page(None, 0);
        assert_eq!(window.number, 1);
        assert_eq!(window.num_pages, 1);
        assert!(!window.has_next());
        assert!(!window.has_previous());
    }

    #[test]
    fn num_pages_rounds_up() {
        let paginator = Paginator::new(POSTS_PER_PAGE);
        assert_eq!(paginator.num_pages(10), 1);
        assert_eq!(paginator.num_pages(11), 2);
        assert_eq!(paginator.num_pages(30), 3);
    }

    #[test]
    fn non_numeric_page_falls_back_to_first() {
        let paginator = Paginator::default();
        assert_eq!(paginator.get_page(Some("abc"), 35).number, 1);
        assert_eq!(paginator.get_page(Some(""), 35).number, 1);
        assert_eq!(paginator.get_page(Some("2.5"), 35).number, 1);
    }

    #[test]
    fn out_of_range_page_is_clamped_to_last() {
        let paginator = Paginator::default();
        assert_eq!(paginator.get_page(Some("99"), 35).number, 4);
        assert_eq!(paginator.get_page(Some("0"), 35).number, 4);
        assert_eq!(paginator.get_page(Some("-3"), 35).number, 4);
    }

    #[test]
    fn valid_page_is_kept_and_maps_to_offset_pagination() {
        let window = Paginator::default().get_page(Some(" 2 "), 35);
        assert_eq!(window.number, 2);
        assert!(window.has_next());
        assert!(window.has_previous());

        let pagination = window.pagination();
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.page_size, 10);
        assert_eq!(pagination.offset(), 10);
    }
}
