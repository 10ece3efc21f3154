//! Shared helpers for Diesel repository implementations.

use pagination::PageWindow;

/// Translate a page window into SQL `(OFFSET, LIMIT)` values.
///
/// Values beyond `i64::MAX` saturate; such a page is simply empty.
pub(crate) fn page_bounds(window: PageWindow) -> (i64, i64) {
    let offset = i64::try_from(window.skip()).unwrap_or(i64::MAX);
    let limit = i64::try_from(window.limit()).unwrap_or(i64::MAX);
    (offset, limit)
}

/// Convert a `COUNT(*)` result into the page total.
pub(crate) fn row_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}
