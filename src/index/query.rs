//! Pagination over filtered result sets

use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("page {page} is out of range for {total} result(s)")]
    PageNotFound { page: usize, total: usize },
}

/// Slices `items` into fixed-size pages and returns the requested one.
///
/// The page size defaults to [`DEFAULT_PAGE_SIZE`] and is clamped to
/// `1..=MAX_PAGE_SIZE`. Page numbering starts at zero; the first page of an
/// empty result set is empty rather than an error.
pub fn paginate<T>(
    items: Vec<T>,
    page_size: Option<usize>,
    page: Option<usize>,
) -> Result<Vec<T>, QueryError> {
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let page = page.unwrap_or(0);

    if page == 0 && items.is_empty() {
        return Ok(items);
    }

    // the offset can overflow usize for absurd page numbers; treat that
    // the same as any other page past the end
    let start = match page.checked_mul(page_size) {
        Some(start) if start < items.len() => start,
        _ => {
            return Err(QueryError::PageNotFound {
                page,
                total: items.len(),
            });
        }
    };

    Ok(items
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect())
}
