pub(crate) mod widget;

use crate::models::{SearchResponse, UserOption};
use serde::de::DeserializeOwned;

pub(crate) use widget::UserSelect;

/// Terms shorter than this (in chars) never reach the network.
pub(crate) const MIN_INPUT_LENGTH: usize = 1;
/// Quiet period after the last keystroke before a search fires.
pub(crate) const SEARCH_DEBOUNCE_MS: i32 = 250;
const CACHE_CAPACITY: usize = 64;

/// Parameters of one search request; also the cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SearchQuery {
    pub q: String,
    pub page: u32,
}

impl SearchQuery {
    pub fn to_query_string(&self) -> String {
        format!("q={}&page={}", urlencoding::encode(&self.q), self.page)
    }
}

/// One page of results in the shape the widget renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SearchPage<T> {
    pub items: Vec<T>,
    pub more: bool,
    pub page: u32,
}

/// Remote-data adapter for a searchable, paginated dropdown.
pub(crate) trait RemoteSource {
    type Raw: DeserializeOwned;
    type Item: Clone;

    fn build_query(&self, term: &str, page: Option<u32>) -> SearchQuery;
    fn map_response(&self, raw: Self::Raw, page: Option<u32>) -> SearchPage<Self::Item>;
}

/// Source backing the "grant access" user picker.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct UserSearchSource;

impl RemoteSource for UserSearchSource {
    type Raw = SearchResponse;
    type Item = UserOption;

    fn build_query(&self, term: &str, page: Option<u32>) -> SearchQuery {
        SearchQuery {
            q: term.to_string(),
            page: page.unwrap_or(1),
        }
    }

    fn map_response(&self, raw: SearchResponse, page: Option<u32>) -> SearchPage<UserOption> {
        SearchPage {
            items: raw.results,
            more: raw.pagination.more,
            page: page.unwrap_or(1),
        }
    }
}

pub(crate) fn should_query(term: &str) -> bool {
    term.chars().count() >= MIN_INPUT_LENGTH
}

/// Fold a freshly fetched page into what is already shown.
///
/// Page 1 replaces the list; later pages append.
pub(crate) fn merge_page<T: Clone>(shown: &[T], page: &SearchPage<T>) -> Vec<T> {
    if page.page <= 1 {
        return page.items.clone();
    }
    let mut out = Vec::with_capacity(shown.len() + page.items.len());
    out.extend_from_slice(shown);
    out.extend(page.items.iter().cloned());
    out
}

/// Results to keep on screen after a failed request for `page`.
///
/// A failed first page clears the list; a failed later page keeps what is shown.
pub(crate) fn results_after_failure<T: Clone>(shown: &[T], page: u32) -> Vec<T> {
    if page <= 1 {
        Vec::new()
    } else {
        shown.to_vec()
    }
}

/// Page to request when the list is scrolled to its end, if any.
pub(crate) fn next_page_to_load(loading: bool, more: bool, current_page: u32) -> Option<u32> {
    if loading || !more {
        return None;
    }
    Some(current_page.saturating_add(1))
}

/// Monotonic request ids. Only a response carrying the latest id may be applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RequestGuard {
    latest: u64,
}

impl RequestGuard {
    /// Start a new request; every earlier id becomes stale.
    pub fn advance(&mut self) {
        self.latest += 1;
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn is_current(&self, id: u64) -> bool {
        self.latest == id
    }
}

/// Debounced search term.
///
/// Each `schedule` supersedes the previous one; a timer fires with the
/// generation it was scheduled under and only the newest one yields a term.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Debounce {
    generation: u64,
    pending: Option<String>,
}

impl Debounce {
    pub fn schedule(&mut self, term: String) -> u64 {
        self.generation += 1;
        self.pending = Some(term);
        self.generation
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    pub fn fire(&mut self, generation: u64) -> Option<String> {
        if generation != self.generation {
            return None;
        }
        self.pending.take()
    }
}

/// How a query will be answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FetchPlan<T> {
    Cached(SearchPage<T>),
    Network(SearchQuery),
}

pub(crate) fn plan_fetch<T: Clone>(cache: &SearchCache<T>, query: SearchQuery) -> FetchPlan<T> {
    match cache.get(&query) {
        Some(page) => FetchPlan::Cached(page),
        None => FetchPlan::Network(query),
    }
}

pub(crate) fn upsert_lru_by_key<T: Clone>(
    mut items: Vec<T>,
    item: T,
    same_key: impl Fn(&T, &T) -> bool,
    max: usize,
) -> Vec<T> {
    items.retain(|x| !same_key(x, &item));
    items.insert(0, item);
    if items.len() > max {
        items.truncate(max);
    }
    items
}

/// Client-side response cache keyed by query parameters.
#[derive(Clone, Debug)]
pub(crate) struct SearchCache<T> {
    entries: Vec<(SearchQuery, SearchPage<T>)>,
    capacity: usize,
}

impl<T: Clone> Default for SearchCache<T> {
    fn default() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }
}

impl<T: Clone> SearchCache<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, query: &SearchQuery) -> Option<SearchPage<T>> {
        self.entries
            .iter()
            .find(|(q, _)| q == query)
            .map(|(_, page)| page.clone())
    }

    pub fn insert(&mut self, query: SearchQuery, page: SearchPage<T>) {
        let entries = std::mem::take(&mut self.entries);
        self.entries = upsert_lru_by_key(entries, (query, page), |a, b| a.0 == b.0, self.capacity);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
