//! Page arithmetic for the newest-first post listing.

pub const PAGE_SIZE: i64 = 10;

/// Zero-indexed view of one listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub total: i64,
    pub current: i64,
}

impl Pagination {
    pub fn new(total: i64, current: i64) -> Self {
        Self {
            total: total.max(0),
            current,
        }
    }

    /// `ceil(total / PAGE_SIZE)`; zero posts means zero pages.
    pub fn page_count(&self) -> i64 {
        (self.total + PAGE_SIZE - 1) / PAGE_SIZE
    }

    /// Index of the trailing page. An empty listing still renders page 0.
    pub fn last_page(&self) -> i64 {
        self.page_count().max(1) - 1
    }

    pub fn is_valid_page(&self) -> bool {
        (0..=self.last_page()).contains(&self.current)
    }

    /// Rows to skip when fetching the current page.
    pub fn offset(&self) -> i64 {
        self.current.max(0) * PAGE_SIZE
    }

    pub fn previous(&self) -> Option<i64> {
        (self.current > 0).then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<i64> {
        (self.current < self.last_page()).then(|| self.current + 1)
    }
}
