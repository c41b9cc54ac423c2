//! Result accumulator: merges successive pages of a paginated query into one
//! growing list and tracks the page cursor.
//!
//! The accumulator never performs I/O. Every user action returns a
//! [`FetchRequest`] describing the single fetch it needs, and the outcome is
//! fed back through [`ResultAccumulator::complete`]. Each request carries a
//! [`Ticket`]; only the most recently dispatched ticket may mutate state, so a
//! superseded fetch that resolves late is dropped instead of being merged.

use serde::Deserialize;

use crate::client::search_url;
use crate::error::BrowseError;
use crate::types::{Character, Page, PageInfo};

/// Why the cursor moved. Decides whether a page replaces or extends results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Initial,
    LoadMore,
    Search,
}

/// How a resolved page is merged into the accumulated results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MergeRule {
    /// Initial and Search replace, LoadMore appends.
    #[default]
    Reason,
    /// A page without a `prev` link replaces, anything else appends.
    PrevLink,
}

#[derive(Debug, Clone)]
pub struct AccumulatorConfig {
    pub endpoint: String,
    pub merge_rule: MergeRule,
}

impl AccumulatorConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            merge_rule: MergeRule::default(),
        }
    }

    pub fn with_merge_rule(mut self, merge_rule: MergeRule) -> Self {
        self.merge_rule = merge_rule;
        self
    }
}

/// Sequence number of a dispatched fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: Ticket,
    pub url: String,
    pub reason: Reason,
}

/// What was last requested and the pagination state that came back.
///
/// `info` is `None` between dispatching a search and its first page landing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub current: String,
    pub info: Option<PageInfo>,
}

impl PageCursor {
    pub fn next(&self) -> Option<&str> {
        self.info.as_ref().and_then(|i| i.next.as_deref())
    }

    pub fn prev(&self) -> Option<&str> {
        self.info.as_ref().and_then(|i| i.prev.as_deref())
    }

    pub fn count(&self) -> Option<u64> {
        self.info.as_ref().map(|i| i.count)
    }

    pub fn pages(&self) -> Option<u64> {
        self.info.as_ref().map(|i| i.pages)
    }
}

/// An action that was refused before any fetch was dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejected {
    NoNextPage,
    EmptyQuery,
    /// The configured endpoint is not an absolute URL a query can be added to.
    InvalidEndpoint(String),
}

impl From<Rejected> for BrowseError {
    fn from(rejected: Rejected) -> Self {
        match rejected {
            Rejected::NoNextPage => BrowseError::NoNextPage,
            Rejected::EmptyQuery => BrowseError::EmptyQuery,
            Rejected::InvalidEndpoint(endpoint) => BrowseError::InvalidUrl(endpoint),
        }
    }
}

/// Result of feeding a fetch outcome back into the accumulator.
#[derive(Debug)]
pub enum Completion {
    Replaced(usize),
    Appended(usize),
    /// The ticket was superseded; nothing changed.
    Stale,
    /// The fetch failed; results and cursor are as they were before it.
    Failed(BrowseError),
}

#[derive(Debug)]
pub struct ResultAccumulator {
    config: AccumulatorConfig,
    results: Vec<Character>,
    cursor: PageCursor,
    pending: Option<FetchRequest>,
    last_ticket: u64,
    last_error: Option<String>,
}

impl ResultAccumulator {
    /// Start from a first page fetched ahead of time.
    pub fn new(config: AccumulatorConfig, first_page: Page) -> Self {
        let cursor = PageCursor {
            current: config.endpoint.clone(),
            info: Some(first_page.info),
        };
        Self {
            config,
            results: first_page.results,
            cursor,
            pending: None,
            last_ticket: 0,
            last_error: None,
        }
    }

    /// Start with nothing loaded; follow with [`Self::initial_fetch`].
    pub fn empty(config: AccumulatorConfig) -> Self {
        let cursor = PageCursor {
            current: config.endpoint.clone(),
            info: None,
        };
        Self {
            config,
            results: Vec::new(),
            cursor,
            pending: None,
            last_ticket: 0,
            last_error: None,
        }
    }

    pub fn config(&self) -> &AccumulatorConfig {
        &self.config
    }

    pub fn results(&self) -> &[Character] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Cursor of the most recently applied page.
    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// URL of the in-flight fetch, or of the last applied page when idle.
    pub fn current(&self) -> &str {
        self.pending
            .as_ref()
            .map(|p| p.url.as_str())
            .unwrap_or(&self.cursor.current)
    }

    pub fn pending(&self) -> Option<&FetchRequest> {
        self.pending.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The `next` link load-more would follow right now.
    ///
    /// While a search is in flight the previous query's links no longer apply.
    pub fn next_link(&self) -> Option<&str> {
        match &self.pending {
            Some(p) if p.reason != Reason::LoadMore => None,
            _ => self.cursor.next(),
        }
    }

    pub fn can_load_more(&self) -> bool {
        self.next_link().is_some()
    }

    /// Request the default endpoint; used when no first page was supplied.
    pub fn initial_fetch(&mut self) -> FetchRequest {
        let url = self.config.endpoint.clone();
        self.dispatch(url, Reason::Initial)
    }

    pub fn load_more(&mut self) -> Result<FetchRequest, Rejected> {
        let next = self.next_link().ok_or(Rejected::NoNextPage)?.to_string();
        Ok(self.dispatch(next, Reason::LoadMore))
    }

    pub fn search(&mut self, query: &str) -> Result<FetchRequest, Rejected> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Rejected::EmptyQuery);
        }
        let url = search_url(&self.config.endpoint, query)
            .map_err(|_| Rejected::InvalidEndpoint(self.config.endpoint.clone()))?;
        Ok(self.dispatch(url, Reason::Search))
    }

    fn dispatch(&mut self, url: String, reason: Reason) -> FetchRequest {
        self.last_ticket += 1;
        let request = FetchRequest {
            ticket: Ticket(self.last_ticket),
            url,
            reason,
        };
        if let Some(superseded) = self.pending.replace(request.clone()) {
            log::debug!(
                "ticket {} ({:?}) superseded by {}",
                superseded.ticket.0,
                superseded.reason,
                request.ticket.0
            );
        }
        log::debug!(
            "dispatch ticket {} {:?} -> {}",
            request.ticket.0,
            reason,
            request.url
        );
        request
    }

    /// Apply the outcome of the fetch identified by `ticket`.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<Page, BrowseError>) -> Completion {
        let request = match self.pending.take() {
            Some(p) if p.ticket == ticket => p,
            other => {
                self.pending = other;
                log::debug!("dropping stale result for ticket {}", ticket.0);
                return Completion::Stale;
            }
        };

        let page = match outcome {
            Ok(page) => page,
            Err(e) => {
                log::warn!("fetch of {} failed: {e}", request.url);
                self.last_error = Some(e.to_string());
                return Completion::Failed(e);
            }
        };

        let replace = match self.config.merge_rule {
            MergeRule::Reason => request.reason != Reason::LoadMore,
            MergeRule::PrevLink => page.info.prev.is_none(),
        };
        let received = page.results.len();

        self.cursor = PageCursor {
            current: request.url,
            info: Some(page.info),
        };
        self.last_error = None;

        if replace {
            self.results = page.results;
            log::debug!("replaced results with {received} records");
            Completion::Replaced(received)
        } else {
            self.results.extend(page.results);
            log::debug!("appended {received} records, {} total", self.results.len());
            Completion::Appended(received)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    const BASE: &str = "https://example.com/api/character/";

    fn character(id: u64) -> Character {
        Character {
            id,
            name: format!("Character {id}"),
            image: format!("https://example.com/avatar/{id}.jpeg"),
            extra: Map::new(),
        }
    }

    fn page(ids: std::ops::RangeInclusive<u64>, next: Option<&str>, prev: Option<&str>) -> Page {
        let results: Vec<Character> = ids.map(character).collect();
        Page {
            info: PageInfo {
                count: 826,
                pages: 42,
                next: next.map(String::from),
                prev: prev.map(String::from),
            },
            results,
        }
    }

    fn page_url(n: u32) -> String {
        format!("{BASE}?page={n}")
    }

    fn browsing() -> ResultAccumulator {
        ResultAccumulator::new(
            AccumulatorConfig::new(BASE),
            page(1..=20, Some(&page_url(2)), None),
        )
    }

    fn ids(acc: &ResultAccumulator) -> Vec<u64> {
        acc.results().iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_initial_state_uses_first_page() {
        let acc = browsing();
        assert_eq!(acc.len(), 20);
        assert_eq!(acc.current(), BASE);
        assert_eq!(acc.cursor().next(), Some(page_url(2).as_str()));
        assert!(acc.can_load_more());
        assert!(!acc.is_loading());
    }

    #[test]
    fn test_load_more_follows_next_and_appends() {
        let mut acc = browsing();

        let req = acc.load_more().unwrap();
        assert_eq!(req.url, page_url(2));
        assert_eq!(req.reason, Reason::LoadMore);
        assert_eq!(acc.current(), page_url(2));
        // Cursor info is untouched until the fetch lands.
        assert_eq!(acc.cursor().prev(), None);

        let done = acc.complete(
            req.ticket,
            Ok(page(21..=40, Some(&page_url(3)), Some(&page_url(1)))),
        );
        assert!(matches!(done, Completion::Appended(20)));
        assert_eq!(ids(&acc), (1..=40).collect::<Vec<_>>());
        assert_eq!(acc.current(), page_url(2));
        assert_eq!(acc.cursor().next(), Some(page_url(3).as_str()));
    }

    #[test]
    fn test_n_load_mores_concatenate_in_order() {
        let mut acc = browsing();
        for n in 2..=5u64 {
            let req = acc.load_more().unwrap();
            let first = (n - 1) * 20 + 1;
            let next = page_url(n as u32 + 1);
            let prev = page_url(n as u32 - 1);
            acc.complete(req.ticket, Ok(page(first..=first + 19, Some(&next), Some(&prev))));
        }
        assert_eq!(acc.len(), 100);
        assert_eq!(ids(&acc), (1..=100).collect::<Vec<_>>());
    }

    #[test]
    fn test_load_more_without_next_is_rejected() {
        let mut acc = ResultAccumulator::new(AccumulatorConfig::new(BASE), page(1..=3, None, None));
        assert_eq!(acc.load_more(), Err(Rejected::NoNextPage));
        assert!(acc.pending().is_none());
        assert_eq!(acc.current(), BASE);
        assert_eq!(acc.len(), 3);
    }

    #[test]
    fn test_search_replaces_accumulated_results() {
        let mut acc = browsing();
        let req = acc.load_more().unwrap();
        acc.complete(
            req.ticket,
            Ok(page(21..=40, Some(&page_url(3)), Some(&page_url(1)))),
        );
        assert_eq!(acc.len(), 40);

        let req = acc.search("rick").unwrap();
        assert_eq!(req.url, format!("{BASE}?name=rick"));
        assert_eq!(req.reason, Reason::Search);
        assert!(!acc.can_load_more());

        let done = acc.complete(req.ticket, Ok(page(101..=105, None, None)));
        assert!(matches!(done, Completion::Replaced(5)));
        assert_eq!(ids(&acc), vec![101, 102, 103, 104, 105]);
        assert!(!acc.can_load_more());
    }

    #[test]
    fn test_blank_search_is_rejected() {
        let mut acc = browsing();
        assert_eq!(acc.search("   \t"), Err(Rejected::EmptyQuery));
        assert_eq!(acc.search(""), Err(Rejected::EmptyQuery));
        assert!(acc.pending().is_none());
        assert_eq!(acc.len(), 20);
    }

    #[test]
    fn test_search_against_relative_endpoint_is_rejected() {
        let mut acc = ResultAccumulator::new(
            AccumulatorConfig::new("api/character"),
            page(1..=3, None, None),
        );
        assert_eq!(
            acc.search("rick"),
            Err(Rejected::InvalidEndpoint("api/character".to_string()))
        );
        assert!(acc.pending().is_none());
        assert_eq!(acc.current(), "api/character");
        assert!(matches!(
            BrowseError::from(Rejected::InvalidEndpoint("api/character".to_string())),
            BrowseError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_search_trims_query() {
        let mut acc = browsing();
        let req = acc.search("  morty ").unwrap();
        assert_eq!(req.url, format!("{BASE}?name=morty"));
    }

    #[test]
    fn test_search_supersedes_in_flight_load_more() {
        let mut acc = browsing();
        let more = acc.load_more().unwrap();
        let search = acc.search("rick").unwrap();
        assert!(search.ticket > more.ticket);

        // Search lands first, then the stale load-more.
        let done = acc.complete(search.ticket, Ok(page(101..=105, None, None)));
        assert!(matches!(done, Completion::Replaced(5)));
        let done = acc.complete(
            more.ticket,
            Ok(page(21..=40, Some(&page_url(3)), Some(&page_url(1)))),
        );
        assert!(matches!(done, Completion::Stale));

        assert_eq!(ids(&acc), vec![101, 102, 103, 104, 105]);
        assert_eq!(acc.current(), format!("{BASE}?name=rick"));
    }

    #[test]
    fn test_stale_load_more_resolving_first_is_ignored() {
        let mut acc = browsing();
        let more = acc.load_more().unwrap();
        let search = acc.search("rick").unwrap();

        let done = acc.complete(
            more.ticket,
            Ok(page(21..=40, Some(&page_url(3)), Some(&page_url(1)))),
        );
        assert!(matches!(done, Completion::Stale));
        assert_eq!(acc.len(), 20);
        assert!(acc.is_loading());

        acc.complete(search.ticket, Ok(page(101..=105, None, None)));
        assert_eq!(ids(&acc), vec![101, 102, 103, 104, 105]);
        assert!(!acc.is_loading());
    }

    #[test]
    fn test_double_load_more_applies_page_once() {
        let mut acc = browsing();
        let first = acc.load_more().unwrap();
        let second = acc.load_more().unwrap();
        assert_eq!(first.url, second.url);

        let next = page(21..=40, Some(&page_url(3)), Some(&page_url(1)));
        assert!(matches!(acc.complete(first.ticket, Ok(next.clone())), Completion::Stale));
        assert!(matches!(acc.complete(second.ticket, Ok(next)), Completion::Appended(20)));
        assert_eq!(acc.len(), 40);
    }

    #[test]
    fn test_failed_fetch_leaves_state_unchanged() {
        let mut acc = browsing();
        let before_cursor = acc.cursor().clone();

        let req = acc.search("rick").unwrap();
        let done = acc.complete(
            req.ticket,
            Err(BrowseError::ApiError {
                status: 500,
                message: "boom".to_string(),
            }),
        );

        assert!(matches!(done, Completion::Failed(BrowseError::ApiError { status: 500, .. })));
        assert_eq!(acc.cursor(), &before_cursor);
        assert_eq!(acc.current(), BASE);
        assert_eq!(acc.len(), 20);
        assert!(acc.can_load_more());
        assert_eq!(acc.last_error(), Some("API error (status 500): boom"));

        let req = acc.load_more().unwrap();
        acc.complete(
            req.ticket,
            Ok(page(21..=40, Some(&page_url(3)), Some(&page_url(1)))),
        );
        assert_eq!(acc.last_error(), None);
    }

    #[test]
    fn test_empty_start_initial_fetch_replaces() {
        let mut acc = ResultAccumulator::empty(AccumulatorConfig::new(BASE));
        assert!(acc.is_empty());
        assert!(!acc.can_load_more());

        let req = acc.initial_fetch();
        assert_eq!(req.url, BASE);
        assert_eq!(req.reason, Reason::Initial);

        acc.complete(req.ticket, Ok(page(1..=20, Some(&page_url(2)), None)));
        assert_eq!(acc.len(), 20);
        assert_eq!(acc.current(), BASE);
        assert!(acc.can_load_more());
    }

    #[test]
    fn test_prev_link_rule_matches_legacy_behaviour() {
        let config = AccumulatorConfig::new(BASE).with_merge_rule(MergeRule::PrevLink);
        let mut acc = ResultAccumulator::new(config, page(1..=20, Some(&page_url(2)), None));

        let req = acc.load_more().unwrap();
        acc.complete(
            req.ticket,
            Ok(page(21..=40, Some(&page_url(3)), Some(&page_url(1)))),
        );
        assert_eq!(acc.len(), 40);

        // A continuation page of a search still appends under this rule.
        let req = acc.search("rick").unwrap();
        let rick_prev = format!("{BASE}?page=1&name=rick");
        let done = acc.complete(req.ticket, Ok(page(101..=105, None, Some(&rick_prev))));
        assert!(matches!(done, Completion::Appended(5)));
        assert_eq!(acc.len(), 45);

        let req = acc.search("morty").unwrap();
        let done = acc.complete(req.ticket, Ok(page(201..=202, None, None)));
        assert!(matches!(done, Completion::Replaced(2)));
        assert_eq!(ids(&acc), vec![201, 202]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut acc = browsing();
        let req = acc.load_more().unwrap();
        acc.complete(req.ticket, Ok(page(20..=21, None, Some(&page_url(1)))));
        assert_eq!(acc.len(), 22);
        assert_eq!(acc.results()[19].id, 20);
        assert_eq!(acc.results()[20].id, 20);
    }
}
