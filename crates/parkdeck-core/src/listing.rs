// ── Client-side filter / sort / paginate ──
//
// The composite views fetch their full dataset up front and window it
// in memory; the server is not re-queried per filter change. That holds
// up for a single partner's subscriber list and is a documented
// scalability boundary, not a pattern for platform-wide admin lists.

use std::cmp::Ordering;

/// Window parameters for an in-memory list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Case-insensitive substring match over a row's display fields.
    pub search: Option<String>,
    /// 0-indexed page.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 0,
            page_size: 10,
        }
    }
}

/// One page of windowed results plus the recomputed totals.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_elements: usize,
}

/// Comparator used for the optional sort step.
pub type Comparator<T> = dyn Fn(&T, &T) -> Ordering + Send + Sync;

/// Apply categorical filters, free-text search, an optional sort, and a
/// pagination window to an in-memory slice.
///
/// Pure function of its inputs: the source slice is never reordered or
/// mutated, so applying the same query twice yields identical output.
///
/// - `predicate`: exact-match categorical filters (status dropdowns).
/// - `haystack`: the row's fixed display fields for substring search.
pub fn select_page<T: Clone>(
    rows: &[T],
    query: &ListQuery,
    predicate: impl Fn(&T) -> bool,
    haystack: impl Fn(&T) -> Vec<String>,
    compare: Option<&Comparator<T>>,
) -> ListPage<T> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut filtered: Vec<&T> = rows
        .iter()
        .filter(|row| predicate(row))
        .filter(|row| match needle {
            Some(ref needle) => haystack(row)
                .iter()
                .any(|field| field.to_lowercase().contains(needle)),
            None => true,
        })
        .collect();

    if let Some(compare) = compare {
        filtered.sort_by(|a, b| compare(a, b));
    }

    let total_elements = filtered.len();
    let page_size = query.page_size.max(1);
    let total_pages = total_elements.div_ceil(page_size);

    let items = filtered
        .into_iter()
        .skip(query.page * page_size)
        .take(page_size)
        .cloned()
        .collect();

    ListPage {
        items,
        page: query.page,
        total_pages,
        total_elements,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rows() -> Vec<(i64, &'static str)> {
        vec![
            (1, "Alice Nguyen"),
            (2, "Bob Tran"),
            (3, "Carol Pham"),
            (4, "Dan Le"),
            (5, "alice-second"),
        ]
    }

    fn haystack(row: &(i64, &'static str)) -> Vec<String> {
        vec![row.1.to_owned()]
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let rows = rows();
        let query = ListQuery {
            search: Some("ALICE".into()),
            ..ListQuery::default()
        };
        let page = select_page(&rows, &query, |_| true, haystack, None);
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.items[0].0, 1);
        assert_eq!(page.items[1].0, 5);
    }

    #[test]
    fn applying_the_same_query_twice_is_idempotent() {
        let rows = rows();
        let query = ListQuery {
            search: Some("a".into()),
            page: 0,
            page_size: 2,
        };
        let first = select_page(&rows, &query, |_| true, haystack, None);
        let second = select_page(&rows, &query, |_| true, haystack, None);
        assert_eq!(first.total_elements, second.total_elements);
        assert_eq!(
            first.items.iter().map(|r| r.0).collect::<Vec<_>>(),
            second.items.iter().map(|r| r.0).collect::<Vec<_>>(),
        );
    }

    #[test]
    fn pagination_bounds() {
        let rows = rows();
        let query = ListQuery {
            page_size: 2,
            ..ListQuery::default()
        };
        // 5 rows, size 2 -> 3 pages; last page holds the remainder.
        let first = select_page(&rows, &query, |_| true, haystack, None);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items.len(), 2);

        let last = select_page(
            &rows,
            &ListQuery {
                page: 2,
                page_size: 2,
                ..ListQuery::default()
            },
            |_| true,
            haystack,
            None,
        );
        assert_eq!(last.items.len(), 1);
    }

    #[test]
    fn exact_multiple_fills_the_last_page() {
        let rows: Vec<(i64, &str)> = (0..6).map(|i| (i, "x")).collect();
        let last = select_page(
            &rows,
            &ListQuery {
                page: 2,
                page_size: 2,
                ..ListQuery::default()
            },
            |_| true,
            |r| vec![r.1.to_owned()],
            None,
        );
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.items.len(), 2);
    }

    #[test]
    fn out_of_range_page_is_empty_with_correct_totals() {
        let rows = rows();
        let page = select_page(
            &rows,
            &ListQuery {
                page: 9,
                page_size: 2,
                ..ListQuery::default()
            },
            |_| true,
            haystack,
            None,
        );
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_elements, 5);
    }

    #[test]
    fn categorical_filter_is_exact_match() {
        let rows = rows();
        let page = select_page(&rows, &ListQuery::default(), |r| r.0 % 2 == 0, haystack, None);
        assert_eq!(page.total_elements, 2);
    }

    #[test]
    fn sort_applies_after_filter_without_touching_the_source() {
        let rows = rows();
        let by_id_desc: Box<Comparator<(i64, &'static str)>> = Box::new(|a, b| b.0.cmp(&a.0));
        let page = select_page(&rows, &ListQuery::default(), |_| true, haystack, Some(&by_id_desc));
        assert_eq!(page.items.first().map(|r| r.0), Some(5));
        // Source order is untouched.
        assert_eq!(rows[0].0, 1);
    }
}
