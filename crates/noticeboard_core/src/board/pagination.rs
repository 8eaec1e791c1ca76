//! Table pagination.
//!
//! # Invariants
//! - `rows_per_page` is one of `ROWS_PER_PAGE_OPTIONS`.
//! - `page` is always a valid zero-based index (`page < page_count()`).

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::Range;

pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 20];
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedRowsPerPage(pub usize);

impl Display for UnsupportedRowsPerPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported page size {}; expected one of {:?}",
            self.0, ROWS_PER_PAGE_OPTIONS
        )
    }
}

impl Error for UnsupportedRowsPerPage {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    rows_per_page: usize,
    page: usize,
    total_rows: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            page: 0,
            total_rows: 0,
        }
    }
}

impl Pagination {
    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Zero-based current page.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Number of pages; an empty table still has one page.
    pub fn page_count(&self) -> usize {
        self.total_rows.div_ceil(self.rows_per_page).max(1)
    }

    /// Row index range of the current page, clamped to `total_rows`.
    pub fn range(&self) -> Range<usize> {
        let start = (self.page * self.rows_per_page).min(self.total_rows);
        let end = (start + self.rows_per_page).min(self.total_rows);
        start..end
    }

    /// Changes the page size, keeping the current first row visible.
    pub fn set_rows_per_page(&mut self, rows: usize) -> Result<(), UnsupportedRowsPerPage> {
        if !ROWS_PER_PAGE_OPTIONS.contains(&rows) {
            return Err(UnsupportedRowsPerPage(rows));
        }
        let first_row = self.page * self.rows_per_page;
        self.rows_per_page = rows;
        self.page = (first_row / rows).min(self.page_count() - 1);
        Ok(())
    }

    /// Replaces the row count and returns to the first page.
    pub fn reset(&mut self, total_rows: usize) {
        self.total_rows = total_rows;
        self.page = 0;
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{Pagination, UnsupportedRowsPerPage};

    #[test]
    fn defaults_to_ten_rows() {
        let pagination = Pagination::default();
        assert_eq!(pagination.rows_per_page(), 10);
        assert_eq!(pagination.page_count(), 1);
        assert_eq!(pagination.range(), 0..0);
    }

    #[test]
    fn navigation_clamps_to_existing_pages() {
        let mut pagination = Pagination::default();
        pagination.reset(23);
        assert_eq!(pagination.page_count(), 3);

        pagination.next_page();
        pagination.next_page();
        pagination.next_page();
        assert_eq!(pagination.page(), 2);
        assert_eq!(pagination.range(), 20..23);

        pagination.prev_page();
        assert_eq!(pagination.range(), 10..20);
    }

    #[test]
    fn resize_keeps_first_visible_row() {
        let mut pagination = Pagination::default();
        pagination.reset(40);
        pagination.go_to_page(2);
        pagination.set_rows_per_page(5).unwrap();
        assert_eq!(pagination.page(), 4);
        assert_eq!(pagination.range(), 20..25);
    }

    #[test]
    fn resize_rejects_unlisted_sizes() {
        let mut pagination = Pagination::default();
        assert_eq!(
            pagination.set_rows_per_page(7),
            Err(UnsupportedRowsPerPage(7))
        );
        assert_eq!(pagination.rows_per_page(), 10);
    }
}
