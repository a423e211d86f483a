//! Page slicing and page metadata.
//!
//! ```text
//! offset      = (page - 1) * limit
//! items       = filtered[offset .. offset + limit]   (empty past the end)
//! total_pages = ceil(total / limit)                  (0 when total == 0)
//! has_more    = page < total_pages
//! ```
//!
//! [`page_window`] computes the numbered-page strip shown under a discretely
//! paginated listing.

use serde::{Deserialize, Serialize};

/// A validated page request. Both fields are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageRequest {
    page: usize,
    limit: usize,
}

impl PageRequest {
    /// Clamp `page` and `limit` to at least 1.
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn first(limit: usize) -> Self {
        Self::new(1, limit)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn with_page(self, page: usize) -> Self {
        Self::new(page, self.limit)
    }

    pub fn next(self) -> Self {
        self.with_page(self.page.saturating_add(1))
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination metadata returned alongside every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_more: bool,
}

impl PageMeta {
    pub fn new(request: PageRequest, total: usize) -> Self {
        let total_pages = total.div_ceil(request.limit());
        Self {
            page: request.page(),
            limit: request.limit(),
            total,
            total_pages,
            has_more: request.page() < total_pages,
        }
    }

    /// 1-based index range of this page's items within the whole result,
    /// e.g. `7..=12` for page 2 of size 6. `None` when the page is empty.
    pub fn item_range(&self) -> Option<(usize, usize)> {
        let first = (self.page - 1).saturating_mul(self.limit).saturating_add(1);
        let last = self.page.saturating_mul(self.limit).min(self.total);
        (first <= last).then_some((first, last))
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// Slice `items` into the requested page.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let meta = PageMeta::new(request, items.len());
    let items = items
        .into_iter()
        .skip(request.offset())
        .take(request.limit())
        .collect();
    Page { items, meta }
}

/// An entry in the numbered-page strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Number(usize),
    Gap,
}

/// Pages shown on each side of the current one.
const WINDOW_DELTA: usize = 2;

/// The page-number strip for `current` out of `total_pages`.
///
/// Always shows the first and last page and up to two pages either side of
/// the current one, with [`PageLink::Gap`] standing in for skipped runs.
/// Returns nothing when there is at most one page.
pub fn page_window(current: usize, total_pages: usize) -> Vec<PageLink> {
    if total_pages <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);
    let start = current.saturating_sub(WINDOW_DELTA).max(2);
    let end = (current + WINDOW_DELTA).min(total_pages - 1);

    let mut links = vec![PageLink::Number(1)];
    if start > 2 {
        links.push(PageLink::Gap);
    }
    links.extend((start..=end).map(PageLink::Number));
    if end + 1 < total_pages {
        links.push(PageLink::Gap);
    }
    links.push(PageLink::Number(total_pages));
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLink::{Gap, Number};

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn request_clamps_to_one() {
        let req = PageRequest::new(0, 0);
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 1);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn request_next_advances_page_and_keeps_limit() {
        let req = PageRequest::new(2, 9).next();
        assert_eq!((req.page(), req.limit()), (3, 9));
    }

    #[test]
    fn offset_saturates_on_huge_pages() {
        let req = PageRequest::new(usize::MAX, usize::MAX);
        assert_eq!(req.offset(), usize::MAX);
        let page = paginate(numbers(5), req);
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total_pages, 1);
        assert!(!page.meta.has_more);
    }

    #[test]
    fn full_single_page() {
        let page = paginate(numbers(9), PageRequest::new(1, 9));
        assert_eq!(page.items.len(), 9);
        assert_eq!(page.meta.total, 9);
        assert_eq!(page.meta.total_pages, 1);
        assert!(!page.meta.has_more);
    }

    #[test]
    fn partial_last_page() {
        let page = paginate(numbers(10), PageRequest::new(2, 6));
        assert_eq!(page.items, vec![7, 8, 9, 10]);
        assert_eq!(page.meta.total_pages, 2);
        assert!(!page.meta.has_more);
    }

    #[test]
    fn middle_page_has_more() {
        let page = paginate(numbers(20), PageRequest::new(2, 6));
        assert_eq!(page.items, vec![7, 8, 9, 10, 11, 12]);
        assert_eq!(page.meta.total_pages, 4);
        assert!(page.meta.has_more);
    }

    #[test]
    fn page_past_the_end_is_empty_not_error() {
        let page = paginate(numbers(4), PageRequest::new(5, 2));
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total, 4);
        assert_eq!(page.meta.total_pages, 2);
        assert!(!page.meta.has_more);
    }

    #[test]
    fn empty_input_has_zero_pages() {
        let page = paginate(Vec::<u8>::new(), PageRequest::new(1, 9));
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total, 0);
        assert_eq!(page.meta.total_pages, 0);
        assert!(!page.meta.has_more);
    }

    #[test]
    fn page_length_formula_holds_over_a_grid() {
        for len in 0..=13 {
            for limit in 1..=5 {
                for page in 1..=6 {
                    let out = paginate(numbers(len), PageRequest::new(page, limit));
                    let expected = limit.min(len.saturating_sub((page - 1) * limit));
                    assert_eq!(out.items.len(), expected, "len={len} limit={limit} page={page}");
                    assert_eq!(out.meta.total_pages == 0, len == 0);
                    if len > 0 {
                        assert_eq!(out.meta.total_pages, len.div_ceil(limit));
                    }
                    assert_eq!(out.meta.has_more, page < out.meta.total_pages);
                }
            }
        }
    }

    #[test]
    fn pages_preserve_input_order_and_cover_everything_once() {
        let input = numbers(11);
        let mut seen = Vec::new();
        let mut req = PageRequest::first(4);
        loop {
            let page = paginate(input.clone(), req);
            seen.extend(page.items);
            if !page.meta.has_more {
                break;
            }
            req = req.next();
        }
        assert_eq!(seen, input);
    }

    #[test]
    fn meta_serialises_camel_case() {
        let meta = PageMeta::new(PageRequest::new(1, 6), 6);
        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["hasMore"], false);
    }

    #[test]
    fn item_range_for_pages() {
        assert_eq!(PageMeta::new(PageRequest::new(2, 6), 10).item_range(), Some((7, 10)));
        assert_eq!(PageMeta::new(PageRequest::new(1, 6), 6).item_range(), Some((1, 6)));
        assert_eq!(PageMeta::new(PageRequest::new(1, 6), 0).item_range(), None);
        assert_eq!(PageMeta::new(PageRequest::new(3, 6), 10).item_range(), None);
    }

    #[test]
    fn window_empty_for_single_page() {
        assert!(page_window(1, 0).is_empty());
        assert!(page_window(1, 1).is_empty());
    }

    #[test]
    fn window_small_totals_have_no_gaps() {
        assert_eq!(page_window(1, 2), vec![Number(1), Number(2)]);
        assert_eq!(
            page_window(3, 5),
            vec![Number(1), Number(2), Number(3), Number(4), Number(5)]
        );
    }

    #[test]
    fn window_gaps_on_both_sides() {
        assert_eq!(
            page_window(6, 12),
            vec![
                Number(1),
                Gap,
                Number(4),
                Number(5),
                Number(6),
                Number(7),
                Number(8),
                Gap,
                Number(12)
            ]
        );
    }

    #[test]
    fn window_at_edges() {
        assert_eq!(
            page_window(1, 10),
            vec![Number(1), Number(2), Number(3), Gap, Number(10)]
        );
        assert_eq!(
            page_window(10, 10),
            vec![Number(1), Gap, Number(8), Number(9), Number(10)]
        );
    }

    #[test]
    fn window_clamps_out_of_range_current() {
        assert_eq!(page_window(99, 3), vec![Number(1), Number(2), Number(3)]);
    }
}
