//! List view state carried in the URL query string.
//!
//! A [`ListState`] is parsed from the query of a list request and serialized
//! back into a canonical query string, so the same URL always yields the same
//! state. Every transition returns a new state; navigating to its
//! [`ListState::to_query_string`] is how a client applies it.

use std::collections::BTreeMap;

use serde::Serialize;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PER_PAGE: usize = 10;
pub const PER_PAGE_CHOICES: [usize; 5] = [10, 20, 30, 40, 50];

const SEARCH: &str = "search";
const SORT: &str = "sort";
const PAGE: &str = "page";
const PER_PAGE: &str = "perPage";
const SELECTED: &str = "selected";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub column: String,
    pub descending: bool,
}

impl SortState {
    /// Parses `column` or `-column`.
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (column, descending) = match raw.strip_prefix('-') {
            Some(column) => (column.trim(), true),
            None => (raw, false),
        };
        if column.is_empty() {
            return None;
        }
        Some(Self {
            column: column.to_string(),
            descending,
        })
    }

    fn to_param(&self) -> String {
        if self.descending {
            format!("-{}", self.column)
        } else {
            self.column.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListState {
    pub search: Option<String>,
    pub sort: Option<SortState>,
    pub page: usize,
    pub per_page: usize,
    pub selected: Vec<i32>,
    pub filters: BTreeMap<String, Vec<String>>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            search: None,
            sort: None,
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            selected: Vec::new(),
            filters: BTreeMap::new(),
        }
    }
}

fn normalize_search(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn normalize_per_page(value: usize) -> usize {
    if PER_PAGE_CHOICES.contains(&value) {
        value
    } else {
        DEFAULT_PER_PAGE
    }
}

fn parse_page(raw: &str) -> usize {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|page| *page >= 1)
        .and_then(|page| usize::try_from(page).ok())
        .unwrap_or(DEFAULT_PAGE)
}

fn parse_per_page(raw: &str) -> usize {
    raw.trim()
        .parse::<usize>()
        .map(normalize_per_page)
        .unwrap_or(DEFAULT_PER_PAGE)
}

impl ListState {
    /// Parses a raw query string (without the leading `?`).
    ///
    /// Malformed input never fails: unparsable values fall back to their
    /// defaults, and unparsable or non-positive ids are dropped from the
    /// selection.
    pub fn from_query(query: &str) -> Self {
        let pairs: Vec<(String, String)> =
            serde_html_form::from_str(query.trim_start_matches('?')).unwrap_or_else(|err| {
                log::debug!("ignoring malformed list query {query:?}: {err}");
                Vec::new()
            });

        let mut state = ListState::default();
        for (key, value) in pairs {
            match key.as_str() {
                SEARCH => state.search = normalize_search(&value),
                SORT => state.sort = SortState::parse(&value),
                PAGE => state.page = parse_page(&value),
                PER_PAGE => state.per_page = parse_per_page(&value),
                SELECTED => {
                    for id in value.split(',').filter_map(|id| id.trim().parse::<i32>().ok()) {
                        if id > 0 && !state.selected.contains(&id) {
                            state.selected.push(id);
                        }
                    }
                }
                _ => {
                    let value = value.trim();
                    if key.is_empty() || value.is_empty() {
                        continue;
                    }
                    let values = state.filters.entry(key).or_default();
                    if !values.iter().any(|existing| existing == value) {
                        values.push(value.to_string());
                    }
                }
            }
        }
        state
    }

    /// Serializes the state in a stable order, omitting defaults.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(search) = &self.search {
            pairs.push((SEARCH, search.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push((SORT, sort.to_param()));
        }
        if self.page != DEFAULT_PAGE {
            pairs.push((PAGE, self.page.to_string()));
        }
        if self.per_page != DEFAULT_PER_PAGE {
            pairs.push((PER_PAGE, self.per_page.to_string()));
        }
        for (key, values) in &self.filters {
            for value in values {
                pairs.push((key.as_str(), value.clone()));
            }
        }
        for id in &self.selected {
            pairs.push((SELECTED, id.to_string()));
        }

        serde_html_form::to_string(&pairs).unwrap_or_default()
    }

    pub fn with_search(mut self, term: &str) -> Self {
        self.search = normalize_search(term);
        self.page = DEFAULT_PAGE;
        self
    }

    /// Sorts by `column`; choosing the active column again flips the direction.
    pub fn with_sort(mut self, column: &str) -> Self {
        let column = column.trim();
        if column.is_empty() {
            self.sort = None;
            return self;
        }
        self.sort = match self.sort {
            Some(current) if current.column == column => Some(SortState {
                column: current.column,
                descending: !current.descending,
            }),
            _ => Some(SortState {
                column: column.to_string(),
                descending: false,
            }),
        };
        self
    }

    /// Drops the sort when `known` rejects its column, so the state matches
    /// the default ordering actually applied.
    pub fn with_known_sort(mut self, known: impl Fn(&str) -> bool) -> Self {
        if self.sort.as_ref().is_some_and(|sort| !known(&sort.column)) {
            self.sort = None;
        }
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(DEFAULT_PAGE);
        self
    }

    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = normalize_per_page(per_page);
        self.page = DEFAULT_PAGE;
        self
    }

    pub fn toggle_selected(mut self, id: i32) -> Self {
        if let Some(position) = self.selected.iter().position(|selected| *selected == id) {
            self.selected.remove(position);
        } else if id > 0 {
            self.selected.push(id);
        }
        self
    }

    pub fn clear_selection(mut self) -> Self {
        self.selected.clear();
        self
    }

    /// Replaces the values of filter `key` with `value`.
    pub fn with_filter(mut self, key: &str, value: &str) -> Self {
        let value = value.trim();
        if is_reserved(key) || key.is_empty() {
            return self;
        }
        if value.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters
                .insert(key.to_string(), vec![value.to_string()]);
        }
        self.page = DEFAULT_PAGE;
        self
    }

    pub fn without_filter(mut self, key: &str) -> Self {
        if self.filters.remove(key).is_some() {
            self.page = DEFAULT_PAGE;
        }
        self
    }

    /// First value of filter `key`.
    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

fn is_reserved(key: &str) -> bool {
    matches!(key, SEARCH | SORT | PAGE | PER_PAGE | SELECTED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_yields_defaults() {
        let state = ListState::from_query("");
        assert_eq!(state, ListState::default());
        assert_eq!(state.to_query_string(), "");
    }

    #[test]
    fn parses_every_parameter() {
        let state = ListState::from_query(
            "search=+acme+&sort=-name&page=3&perPage=20&selected=4&selected=2,9&status=ACTIVE",
        );
        assert_eq!(state.search.as_deref(), Some("acme"));
        assert_eq!(
            state.sort,
            Some(SortState {
                column: "name".into(),
                descending: true
            })
        );
        assert_eq!(state.page, 3);
        assert_eq!(state.per_page, 20);
        assert_eq!(state.selected, vec![4, 2, 9]);
        assert_eq!(state.filter("status"), Some("ACTIVE"));
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let state = ListState::from_query("page=0&perPage=15");
        assert_eq!(state.page, 1);
        assert_eq!(state.per_page, DEFAULT_PER_PAGE);

        let state = ListState::from_query("page=-7&perPage=abc");
        assert_eq!(state.page, 1);
        assert_eq!(state.per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn selection_drops_invalid_and_duplicate_ids() {
        let state = ListState::from_query("selected=3,x,3,-1,0&selected=5&selected=3");
        assert_eq!(state.selected, vec![3, 5]);
    }

    #[test]
    fn repeated_filter_keys_accumulate() {
        let state = ListState::from_query("tag=1&tag=2&tag=1");
        assert_eq!(state.filters["tag"], vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn unknown_sort_is_dropped_but_page_kept() {
        let state = ListState::from_query("sort=-password&page=3")
            .with_known_sort(|column| column == "name");
        assert_eq!(state.sort, None);
        assert_eq!(state.page, 3);
        assert_eq!(state.to_query_string(), "page=3");

        let state = ListState::from_query("sort=-name").with_known_sort(|column| column == "name");
        assert_eq!(state.to_query_string(), "sort=-name");
    }

    #[test]
    fn canonical_query_is_stable() {
        let state =
            ListState::from_query("status=ACTIVE&selected=7&perPage=30&sort=name&search=a b");
        assert_eq!(
            state.to_query_string(),
            "search=a+b&sort=name&perPage=30&status=ACTIVE&selected=7"
        );
        assert_eq!(ListState::from_query(&state.to_query_string()), state);
    }

    #[test]
    fn search_and_filters_reset_page() {
        let state = ListState::default().with_page(4).with_search("bob");
        assert_eq!(state.page, 1);

        let state = state.with_page(4).with_filter("status", "ARCHIVED");
        assert_eq!(state.page, 1);
        assert_eq!(state.filter("status"), Some("ARCHIVED"));

        let state = state.with_page(2).without_filter("status");
        assert_eq!(state.page, 1);
        assert!(state.filters.is_empty());
    }

    #[test]
    fn reselecting_sort_column_toggles_direction() {
        let state = ListState::default().with_sort("name");
        assert_eq!(state.to_query_string(), "sort=name");
        let state = state.with_sort("name");
        assert_eq!(state.to_query_string(), "sort=-name");
        let state = state.with_sort("createdAt");
        assert_eq!(state.to_query_string(), "sort=createdAt");
    }

    #[test]
    fn per_page_change_resets_page() {
        let state = ListState::default().with_page(3).with_per_page(50);
        assert_eq!(state.page, 1);
        assert_eq!(state.per_page, 50);
        assert_eq!(ListState::default().with_per_page(7).per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn toggling_selection_adds_then_removes() {
        let state = ListState::default().toggle_selected(3).toggle_selected(8);
        assert_eq!(state.selected, vec![3, 8]);
        let state = state.toggle_selected(3);
        assert_eq!(state.selected, vec![8]);
        assert!(state.clear_selection().selected.is_empty());
    }

    #[test]
    fn reserved_keys_cannot_be_filters() {
        let state = ListState::default().with_filter("page", "9");
        assert!(state.filters.is_empty());
    }
}
