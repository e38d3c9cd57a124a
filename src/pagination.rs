use serde::Serialize;

use crate::list_state::ListState;

/// Builds the elided pager: both edges, a window around the current page and
/// `None` wherever pages were skipped.
fn get_pages(
    page_count: usize,
    current: usize,
    left_edge: usize,
    left_window: usize,
    right_window: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    if page_count == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let head_end = (1 + left_edge).min(page_count + 1);
    pages.extend((1..head_end).map(Some));

    let window_start = head_end.max(current.saturating_sub(left_window));
    let window_end = current
        .saturating_add(right_window + 1)
        .min(page_count + 1);

    if window_start > head_end {
        pages.push(None);
    }
    pages.extend((window_start..window_end).map(Some));

    let tail_start = window_end.max(page_count.saturating_sub(right_edge) + 1);

    if tail_start > window_end {
        pages.push(None);
    }
    pages.extend((tail_start..=page_count).map(Some));

    pages
}

/// One page of a list response together with the state that produced it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub page_count: usize,
    pub pages: Vec<Option<usize>>,
    pub selected: Vec<i32>,
    /// Canonical query string of the list state.
    pub query: String,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>, total: usize, state: &ListState) -> Self {
        let page_count = total.div_ceil(state.per_page.max(1));
        let pages = get_pages(page_count, state.page, 2, 2, 4, 2);

        Self {
            items,
            total,
            page: state.page,
            per_page: state.per_page,
            page_count,
            pages,
            selected: state.selected.clone(),
            query: state.to_query_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lists_have_no_gaps() {
        assert_eq!(
            get_pages(3, 1, 2, 2, 4, 2),
            vec![Some(1), Some(2), Some(3)]
        );
        assert!(get_pages(0, 1, 2, 2, 4, 2).is_empty());
    }

    #[test]
    fn long_lists_are_elided_around_current_page() {
        assert_eq!(
            get_pages(20, 10, 2, 2, 4, 2),
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20),
            ]
        );
    }

    #[test]
    fn page_past_the_end_keeps_the_leading_pages() {
        let state = ListState::from_query("page=9223372036854775807");
        let page = ListPage::new(Vec::<&str>::new(), 25, &state);

        assert_eq!(page.page_count, 3);
        assert_eq!(&page.pages[..2], &[Some(1), Some(2)]);
    }

    #[test]
    fn list_page_reports_counts_and_query() {
        let state = ListState::from_query("page=2&selected=5");
        let page = ListPage::new(vec!["a"; 10], 25, &state);

        assert_eq!(page.page_count, 3);
        assert_eq!(page.page, 2);
        assert_eq!(page.selected, vec![5]);
        assert_eq!(page.query, "page=2&selected=5");
    }
}
