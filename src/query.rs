//! Query orchestration
//!
//! Owns the query/page/selection state and the fetch status machine.
//! Transitions are synchronous and never touch the network: they hand back
//! a [`FetchRequest`] that the effect runner executes, and the runner feeds
//! the [`FetchOutcome`] back through [`QueryOrchestrator::apply`].
//!
//! Every request carries a sequence number. Only the outcome of the most
//! recently issued request is committed; anything older is discarded.

use tracing::debug;

use crate::api::CatalogError;
use crate::models::{Movie, ResultPage};

// =============================================================================
// Fetch Status
// =============================================================================

/// Status of the current (query, page) pair
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchStatus {
    /// Empty query, nothing requested
    #[default]
    Idle,
    /// A request for the current pair is outstanding
    Loading,
    /// The latest request resolved (possibly with zero movies)
    Success,
    /// The latest request failed
    Error(String),
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FetchStatus::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            FetchStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Requests, Outcomes, Notices
// =============================================================================

/// A catalog call the effect runner must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub query: String,
    pub page: u32,
}

/// Result of a [`FetchRequest`], tagged with its sequence number
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub result: Result<ResultPage, CatalogError>,
}

/// One-shot user-facing notification produced by a committed outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A non-empty query matched nothing
    NoResults,
    /// The fetch failed; carries the message to show
    Failed(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::NoResults => "No movies found for your request.",
            Notice::Failed(msg) => msg,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Failed(_))
    }
}

/// What happened to an incoming outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Outcome was for the latest request and is now in state
    Committed(Option<Notice>),
    /// Outcome belonged to a superseded request and was dropped
    Discarded,
}

// =============================================================================
// Search State
// =============================================================================

/// Query, page, retained results, status and selection
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub query: String,
    /// 1-indexed page of the current (or in-flight) request
    pub page: u32,
    /// Last successful page for the current query
    pub retained: Option<ResultPage>,
    pub status: FetchStatus,
    pub selected: Option<Movie>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            retained: None,
            status: FetchStatus::Idle,
            selected: None,
        }
    }
}

/// Pagination metadata for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub total: u32,
}

/// Display model derived from [`SearchState`]
#[derive(Debug, Clone, PartialEq)]
pub struct SearchView<'a> {
    pub loading: bool,
    /// Movies to lay out in the grid; `None` when there is nothing to show
    pub movies: Option<&'a [Movie]>,
    /// Full error panel, shown only when there is no retained page to keep
    pub error: Option<&'a str>,
    pub pagination: Option<Pagination>,
    pub selected: Option<&'a Movie>,
}

// =============================================================================
// Orchestrator
// =============================================================================

#[derive(Debug, Default)]
pub struct QueryOrchestrator {
    state: SearchState,
    latest_seq: u64,
}

impl QueryOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Sequence number of the most recently issued request
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Commit a new query.
    ///
    /// A different query resets page, retained results and selection. The
    /// same query is a no-op unless the last fetch failed, in which case the
    /// current pair is requested again.
    pub fn submit_query(&mut self, raw: &str) -> Option<FetchRequest> {
        let query = raw.trim();

        if query == self.state.query {
            if !query.is_empty() && self.state.status.is_error() {
                debug!(query, page = self.state.page, "retrying failed query");
                return Some(self.begin_fetch());
            }
            return None;
        }

        self.state.query = query.to_string();
        self.state.page = 1;
        self.state.retained = None;
        self.state.selected = None;

        if query.is_empty() {
            // Drop whatever is still in flight for the old query
            self.latest_seq += 1;
            self.state.status = FetchStatus::Idle;
            debug!("query cleared");
            None
        } else {
            debug!(query, "query submitted");
            Some(self.begin_fetch())
        }
    }

    /// Move to another page of the current query.
    ///
    /// Ignored without a query, for pages outside the retained result's
    /// range, and for the current page unless the last fetch failed.
    pub fn change_page(&mut self, page: u32) -> Option<FetchRequest> {
        if self.state.query.is_empty() || page < 1 {
            return None;
        }

        let in_range = self
            .state
            .retained
            .as_ref()
            .is_some_and(|r| r.contains_page(page));
        let retry = page == self.state.page && self.state.status.is_error();

        if !in_range && !retry {
            return None;
        }
        if page == self.state.page && !retry {
            return None;
        }

        debug!(query = %self.state.query, from = self.state.page, to = page, "page change");
        self.state.page = page;
        Some(self.begin_fetch())
    }

    pub fn next_page(&mut self) -> Option<FetchRequest> {
        self.change_page(self.state.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<FetchRequest> {
        self.change_page(self.state.page.saturating_sub(1))
    }

    fn begin_fetch(&mut self) -> FetchRequest {
        self.latest_seq += 1;
        self.state.status = FetchStatus::Loading;
        FetchRequest {
            seq: self.latest_seq,
            query: self.state.query.clone(),
            page: self.state.page,
        }
    }

    fn is_current(&self, seq: u64) -> bool {
        seq == self.latest_seq && self.state.status.is_loading()
    }

    /// Commit a successful page if it answers the latest request
    pub fn fetch_resolved(&mut self, seq: u64, page: ResultPage) -> Completion {
        if !self.is_current(seq) {
            debug!(seq, latest = self.latest_seq, "discarding stale page");
            return Completion::Discarded;
        }

        let notice = (page.is_empty() && !self.state.query.is_empty()).then_some(Notice::NoResults);
        self.state.status = FetchStatus::Success;
        self.state.retained = Some(page);
        Completion::Committed(notice)
    }

    /// Record a failure if it answers the latest request. The retained page
    /// stays as it was.
    pub fn fetch_failed(&mut self, seq: u64, err: &CatalogError) -> Completion {
        if !self.is_current(seq) {
            debug!(seq, latest = self.latest_seq, error = %err, "discarding stale failure");
            return Completion::Discarded;
        }

        let message = err.user_message();
        self.state.status = FetchStatus::Error(message.clone());
        Completion::Committed(Some(Notice::Failed(message)))
    }

    /// Route an outcome from the effect runner
    pub fn apply(&mut self, outcome: FetchOutcome) -> Completion {
        match outcome.result {
            Ok(page) => self.fetch_resolved(outcome.seq, page),
            Err(err) => self.fetch_failed(outcome.seq, &err),
        }
    }

    /// Select a movie from the displayed page. Unknown ids are ignored.
    pub fn select_movie(&mut self, id: u64) -> Option<&Movie> {
        let movie = self.state.retained.as_ref()?.find(id)?.clone();
        self.state.selected = Some(movie);
        self.state.selected.as_ref()
    }

    /// Clear the selection, returning whether one was set
    pub fn clear_selection(&mut self) -> bool {
        self.state.selected.take().is_some()
    }

    pub fn selected(&self) -> Option<&Movie> {
        self.state.selected.as_ref()
    }

    /// Movies currently on screen (retained page)
    pub fn displayed(&self) -> &[Movie] {
        self.state
            .retained
            .as_ref()
            .map(|r| r.movies.as_slice())
            .unwrap_or(&[])
    }

    /// Derive what the presentational components should show
    pub fn view(&self) -> SearchView<'_> {
        let state = &self.state;
        let movies = state
            .retained
            .as_ref()
            .filter(|r| !r.is_empty())
            .map(|r| r.movies.as_slice());
        let error = match (&state.status, &state.retained) {
            (FetchStatus::Error(msg), None) => Some(msg.as_str()),
            _ => None,
        };
        let pagination = state
            .retained
            .as_ref()
            .filter(|r| r.total_pages > 1)
            .map(|r| Pagination {
                current: state.page,
                total: r.total_pages,
            });

        SearchView {
            loading: state.status.is_loading(),
            movies,
            error,
            pagination,
            selected: state.selected.as_ref(),
        }
    }
}
