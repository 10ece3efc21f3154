//! Page/limit windows and list envelopes shared by every list endpoint.
//!
//! Callers supply a 1-based `page` and a `limit`; the crate turns them into
//! a [`PageWindow`] whose [`PageWindow::skip`] is `(page - 1) * limit`. Out of
//! range input is clamped rather than rejected: a page below one becomes the
//! first page, and a limit below one falls back to [`DEFAULT_LIMIT`]. No
//! upper bound is applied to `limit`.
//!
//! Responses are wrapped in a [`Page`], which serialises as
//! `{ "total", "page", "limit", <items key> }`. The items key is chosen by
//! the element type through [`ItemsKey`].
//!
//! # Examples
//!
//! ```
//! use pagination::{ItemsKey, Page, PageParams};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Faq {
//!     pregunta: String,
//! }
//!
//! impl ItemsKey for Faq {
//!     const ITEMS_KEY: &'static str = "faqs";
//! }
//!
//! let window = PageParams::new(Some(2), Some(5)).window();
//! assert_eq!(window.skip(), 5);
//!
//! let page = Page::new(window, 6, vec![Faq { pregunta: "?".into() }]);
//! let json = serde_json::to_value(&page).unwrap();
//! assert_eq!(json["faqs"].as_array().map(Vec::len), Some(1));
//! assert_eq!(json["total"], 6);
//! ```

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Page number used when the caller omits `page`.
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when the caller omits `limit` or supplies a value below one.
pub const DEFAULT_LIMIT: u64 = 10;

/// Raw pagination parameters as they arrive on a query string.
///
/// Values are signed so that `page=0` or `page=-3` parse and can be clamped
/// instead of failing extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageParams {
    /// Requested 1-based page number.
    #[serde(default)]
    pub page: Option<i64>,
    /// Requested page size.
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PageParams {
    /// Build parameters from optional raw values.
    #[must_use]
    pub const fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self { page, limit }
    }

    /// Normalise the parameters into a window.
    #[must_use]
    pub fn window(&self) -> PageWindow {
        let page = self
            .page
            .and_then(|raw| u64::try_from(raw).ok())
            .filter(|page| *page >= 1)
            .unwrap_or(DEFAULT_PAGE);
        let limit = self
            .limit
            .and_then(|raw| u64::try_from(raw).ok())
            .filter(|limit| *limit >= 1)
            .unwrap_or(DEFAULT_LIMIT);
        PageWindow { page, limit }
    }
}

/// A normalised page request: `page >= 1` and `limit >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u64,
    limit: u64,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageWindow {
    /// Construct a window directly, clamping zero values to the defaults.
    #[must_use]
    pub const fn new(page: u64, limit: u64) -> Self {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        Self { page, limit }
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// The maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of items excluded from the front of the ordered result.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Apply the window to an already ordered slice.
    ///
    /// Used by in-memory adapters; database adapters translate the window to
    /// `OFFSET`/`LIMIT` instead.
    #[must_use]
    pub fn slice<'a, T>(&self, ordered: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.skip())
            .unwrap_or(usize::MAX)
            .min(ordered.len());
        let len = usize::try_from(self.limit).unwrap_or(usize::MAX);
        let end = start.saturating_add(len).min(ordered.len());
        ordered.get(start..end).unwrap_or_default()
    }
}

/// Chooses the JSON key under which a [`Page`] lists its items.
pub trait ItemsKey {
    /// Key naming the items array, for example `"nurses"`.
    const ITEMS_KEY: &'static str;
}

/// One page of results plus the total count of the matching query.
///
/// `total` is computed by a count independent of the page fetch, so it does
/// not depend on `limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    total: u64,
    page: u64,
    limit: u64,
    items: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page for `window` holding `items` out of `total` matches.
    #[must_use]
    pub const fn new(window: PageWindow, total: u64, items: Vec<T>) -> Self {
        Self {
            total,
            page: window.page,
            limit: window.limit,
            items,
        }
    }

    /// Count of all matches, ignoring the window.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// The page size that was applied.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Convert every item, keeping counts and window unchanged.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            total: self.total,
            page: self.page,
            limit: self.limit,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

impl<T> Serialize for Page<T>
where
    T: Serialize + ItemsKey,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("total", &self.total)?;
        map.serialize_entry("page", &self.page)?;
        map.serialize_entry("limit", &self.limit)?;
        map.serialize_entry(T::ITEMS_KEY, &self.items)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    //! Window arithmetic and envelope shape.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Serialize)]
    struct Item(u32);

    impl ItemsKey for Item {
        const ITEMS_KEY: &'static str = "items";
    }

    #[rstest]
    #[case(None, None, 1, 10, 0)]
    #[case(Some(1), Some(10), 1, 10, 0)]
    #[case(Some(3), Some(4), 3, 4, 8)]
    #[case(Some(0), Some(5), 1, 5, 0)]
    #[case(Some(-2), Some(5), 1, 5, 0)]
    #[case(Some(2), Some(0), 2, 10, 10)]
    #[case(Some(2), Some(-1), 2, 10, 10)]
    fn params_normalise_into_windows(
        #[case] page: Option<i64>,
        #[case] limit: Option<i64>,
        #[case] expected_page: u64,
        #[case] expected_limit: u64,
        #[case] expected_skip: u64,
    ) {
        let window = PageParams::new(page, limit).window();
        assert_eq!(window.page(), expected_page);
        assert_eq!(window.limit(), expected_limit);
        assert_eq!(window.skip(), expected_skip);
    }

    #[rstest]
    #[case(1, 3, vec![0, 1, 2])]
    #[case(2, 3, vec![3, 4, 5])]
    #[case(4, 3, vec![9])]
    #[case(5, 3, vec![])]
    fn slice_excludes_skipped_prefix(
        #[case] page: u64,
        #[case] limit: u64,
        #[case] expected: Vec<u32>,
    ) {
        let ordered: Vec<u32> = (0..10).collect();
        let window = PageWindow::new(page, limit);
        assert_eq!(window.slice(&ordered), expected.as_slice());
    }

    #[rstest]
    fn huge_page_does_not_overflow() {
        let window = PageWindow::new(u64::MAX, u64::MAX);
        assert_eq!(window.skip(), u64::MAX);
        let ordered = [1_u32, 2, 3];
        assert!(window.slice(&ordered).is_empty());
    }

    #[rstest]
    fn envelope_uses_items_key() {
        let page = Page::new(PageWindow::new(2, 2), 5, vec![Item(3), Item(4)]);
        let value = serde_json::to_value(&page).expect("serialise page");
        assert_eq!(
            value,
            json!({ "total": 5, "page": 2, "limit": 2, "items": [3, 4] })
        );
    }

    #[rstest]
    fn map_preserves_counts() {
        let page = Page::new(PageWindow::new(1, 2), 7, vec![1_u32, 2]);
        let mapped = page.map(|value| value * 10);
        assert_eq!(mapped.total(), 7);
        assert_eq!(mapped.items(), &[10, 20]);
    }
}
