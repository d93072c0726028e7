//! Pagination window arithmetic.
//!
//! `(page_index, page_size)` maps to `offset = page_index * page_size`,
//! `limit = page_size`. Windows are stateless; nothing is kept between pages.

use crate::query::{QueryError, QueryResult};

/// Validated `(offset, limit)` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page_index: u32,
    page_size: u32,
    offset: i64,
}

impl PageWindow {
    /// Builds a window from zero-based page index and positive page size.
    ///
    /// # Errors
    /// - `InvalidPagination` when `page_index < 0`, `page_size < 1`, either
    ///   value exceeds `u32`, or the offset would overflow.
    pub fn new(page_index: i64, page_size: i64) -> QueryResult<Self> {
        if page_index < 0 {
            return Err(QueryError::InvalidPagination(format!(
                "page index must be >= 0, got {page_index}"
            )));
        }
        if page_size < 1 {
            return Err(QueryError::InvalidPagination(format!(
                "page size must be >= 1, got {page_size}"
            )));
        }
        let page_index = u32::try_from(page_index).map_err(|_| {
            QueryError::InvalidPagination(format!("page index {page_index} is too large"))
        })?;
        let page_size = u32::try_from(page_size).map_err(|_| {
            QueryError::InvalidPagination(format!("page size {page_size} is too large"))
        })?;
        // u32 * u32 always fits in i64.
        let offset = i64::from(page_index) * i64::from(page_size);

        Ok(Self {
            page_index,
            page_size,
            offset,
        })
    }

    /// Parses raw transport values; both must be base-10 integers.
    pub fn parse(page_index: &str, page_size: &str) -> QueryResult<Self> {
        let page_index = parse_integer("page index", page_index)?;
        let page_size = parse_integer("page size", page_size)?;
        Self::new(page_index, page_size)
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

fn parse_integer(label: &str, raw: &str) -> QueryResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| QueryError::InvalidPagination(format!("{label} must be an integer, got `{raw}`")))
}
