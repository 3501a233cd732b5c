//! List-response windowing.
//!
//! Pages are 1-based and 20 rows long. Responses carry the page's data plus
//! `first`/`last`/`prev`/`next` link URLs that preserve the caller's other
//! query parameters.
//!
//! The page count is `count / PER_PAGE` with integer division, which reports
//! one page fewer than exists when the row count is an exact multiple of the
//! page size. Kept as-is; see DESIGN.md.

use serde::Serialize;

/// Fixed page size.
pub const PER_PAGE: i64 = 20;

/// Computed offsets and neighbour pages for one requested page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Requested 1-based page.
    pub page: i64,
    /// Row offset of the page's first row.
    pub offset: i64,
    /// Maximum rows on the page.
    pub limit: i64,
    /// `count / PER_PAGE` (see module docs).
    pub total_pages: i64,
    /// Previous page, clamped to 1.
    pub prev_page: i64,
    /// Next page, clamped to the last page.
    pub next_page: i64,
}

impl PageWindow {
    /// Compute the window for a requested page over `count` total rows.
    ///
    /// Pages below 1 are treated as page 1.
    #[must_use]
    pub fn compute(page: i64, count: i64) -> Self {
        let page = page.max(1);
        let total_pages = count / PER_PAGE;
        let prev_page = if page == 1 { 1 } else { page - 1 };
        let next_page = if page == total_pages { page } else { page + 1 };
        let offset = (page - 1) * PER_PAGE;

        Self {
            page,
            offset,
            limit: PER_PAGE,
            total_pages,
            prev_page,
            next_page,
        }
    }
}

/// Link descriptors for one page of results.
#[derive(Debug, Clone, Serialize)]
pub struct PageLinks {
    /// URL of page 1.
    pub first: String,
    /// URL of the last page.
    pub last: String,
    /// URL of the previous page (clamped).
    pub prev: String,
    /// URL of the next page (clamped).
    pub next: String,
}

/// One page of results with its navigation links.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    /// Rows on this page.
    pub data: Vec<T>,
    /// Navigation links.
    pub links: PageLinks,
}

impl<T> Paginated<T> {
    /// Assemble a page response from the rows, the computed window, the
    /// request path, and the caller's other query parameters (preserved in
    /// every link).
    #[must_use]
    pub fn new(data: Vec<T>, window: PageWindow, path: &str, query: &[(&str, String)]) -> Self {
        let url_for = |page: i64| {
            let mut params: Vec<String> = query
                .iter()
                .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
                .collect();
            params.push(format!("page={page}"));
            format!("{path}?{}", params.join("&"))
        };

        Self {
            data,
            links: PageLinks {
                first: url_for(1),
                last: url_for(window.total_pages),
                prev: url_for(window.prev_page),
                next: url_for(window.next_page),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_clamps_prev() {
        let window = PageWindow::compute(1, 50);
        assert_eq!(window.offset, 0);
        assert_eq!(window.prev_page, 1);
        assert_eq!(window.next_page, 2);
        assert_eq!(window.total_pages, 2);
    }

    #[test]
    fn test_last_page_clamps_next() {
        let window = PageWindow::compute(2, 50);
        assert_eq!(window.offset, 20);
        assert_eq!(window.prev_page, 1);
        assert_eq!(window.next_page, 2);
    }

    #[test]
    fn test_exact_multiple_undercounts() {
        // 40 rows fill two pages but the count reports one (kept quirk)
        let window = PageWindow::compute(1, 40);
        assert_eq!(window.total_pages, 1);
    }

    #[test]
    fn test_page_below_one_treated_as_first() {
        let window = PageWindow::compute(0, 50);
        assert_eq!(window.page, 1);
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn test_links_preserve_query() {
        let window = PageWindow::compute(2, 50);
        let page = Paginated::new(
            vec![1, 2, 3],
            window,
            "/products",
            &[("title", "red chair".to_string())],
        );

        assert_eq!(page.links.first, "/products?title=red%20chair&page=1");
        assert_eq!(page.links.prev, "/products?title=red%20chair&page=1");
        assert_eq!(page.links.next, "/products?title=red%20chair&page=2");
        assert_eq!(page.links.last, "/products?title=red%20chair&page=2");
    }
}
