pub mod route;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::pagination::{is_navigable, PaginationControls};
use crate::post::{Post, PAGE_SIZE};
use crate::runner::{ContentSource, FeedError, FetchedPage, Runner};

pub use route::{page_from_route, route_for_page};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    #[default]
    Fallback,
    Surface,
}

impl ErrorMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "fallback" => Some(Self::Fallback),
            "surface" | "error" => Some(Self::Surface),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_posts: u64,
    pub posts: Vec<Post>,
    pub loading: bool,
    pub error: Option<String>,
    pub source: Option<ContentSource>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_posts: 0,
            posts: Vec::new(),
            loading: false,
            error: None,
            source: None,
        }
    }
}

impl PageState {
    pub fn controls(&self) -> PaginationControls {
        PaginationControls::new(self.current_page, self.total_pages)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, Some(ContentSource::Fallback { .. }))
    }
}

#[derive(Clone, Debug)]
pub enum PageEvent {
    Started { page: u32 },
    Loaded(FetchedPage),
    Failed { page: u32, message: String },
}

pub fn reduce(state: &PageState, event: PageEvent) -> PageState {
    match event {
        PageEvent::Started { page } => PageState {
            current_page: page.max(1),
            loading: true,
            error: None,
            posts: Vec::new(),
            source: None,
            ..state.clone()
        },
        PageEvent::Loaded(fetched) => {
            let total_pages = fetched.totals.total_pages.max(1);
            let mut posts = fetched.posts;
            posts.truncate(PAGE_SIZE as usize);
            PageState {
                current_page: fetched.page.clamp(1, total_pages),
                total_pages,
                total_posts: fetched.totals.total_posts,
                posts,
                loading: false,
                error: None,
                source: Some(fetched.source),
            }
        }
        PageEvent::Failed { page, message } => PageState {
            current_page: page.max(1),
            loading: false,
            error: Some(message),
            posts: Vec::new(),
            source: None,
            ..state.clone()
        },
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    page: u32,
}

impl FetchTicket {
    pub fn page(&self) -> u32 {
        self.page
    }
}

#[derive(Debug)]
pub struct PageController {
    state: PageState,
    error_mode: ErrorMode,
    generation: u64,
    torn_down: bool,
}

impl PageController {
    pub fn new(error_mode: ErrorMode) -> Self {
        Self {
            state: PageState::default(),
            error_mode,
            generation: 0,
            torn_down: false,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn begin(&mut self, page: u32) -> Option<FetchTicket> {
        if self.torn_down {
            return None;
        }
        self.generation += 1;
        let page = page.max(1);
        self.state = reduce(&self.state, PageEvent::Started { page });
        Some(FetchTicket {
            generation: self.generation,
            page,
        })
    }

    pub fn request_page(&mut self, page: u32) -> Option<FetchTicket> {
        if !is_navigable(page, self.state.total_pages) {
            debug!(
                page,
                total_pages = self.state.total_pages,
                "ignoring out of range page"
            );
            return None;
        }
        self.begin(page)
    }

    pub fn retry(&mut self) -> Option<FetchTicket> {
        self.state.error.as_ref()?;
        self.begin(self.state.current_page)
    }

    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<FetchedPage, FeedError>,
    ) -> bool {
        if self.torn_down || ticket.generation != self.generation {
            debug!(page = ticket.page, "dropping stale fetch result");
            return false;
        }
        let event = match result {
            Ok(fetched) => PageEvent::Loaded(fetched),
            Err(e) => match self.error_mode {
                ErrorMode::Fallback => {
                    warn!(page = ticket.page, error = %e, "serving placeholder recipes");
                    PageEvent::Loaded(FetchedPage::fallback(ticket.page, e.to_string()))
                }
                ErrorMode::Surface => {
                    warn!(page = ticket.page, error = %e, "recipe feed unavailable");
                    PageEvent::Failed {
                        page: ticket.page,
                        message: e.to_string(),
                    }
                }
            },
        };
        self.state = reduce(&self.state, event);
        true
    }

    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.generation += 1;
    }

    pub async fn load(&mut self, runner: &Runner, page: u32) -> bool {
        let Some(ticket) = self.begin(page) else {
            return false;
        };
        if !self.run_cycle(runner, ticket).await {
            return false;
        }
        // Clamping only ever lowers the page, so this settles.
        let mut requested = ticket.page;
        loop {
            let resolved = self.state.current_page;
            if resolved == requested || self.state.error.is_some() {
                return true;
            }
            info!(requested, resolved, "requested page past end of listing");
            let Some(ticket) = self.begin(resolved) else {
                return false;
            };
            if !self.run_cycle(runner, ticket).await {
                return false;
            }
            requested = resolved;
        }
    }

    pub async fn navigate(&mut self, runner: &Runner, page: u32) -> bool {
        match self.request_page(page) {
            Some(ticket) => self.run_cycle(runner, ticket).await,
            None => false,
        }
    }

    pub async fn retry_load(&mut self, runner: &Runner) -> bool {
        match self.retry() {
            Some(ticket) => self.run_cycle(runner, ticket).await,
            None => false,
        }
    }

    async fn run_cycle(&mut self, runner: &Runner, ticket: FetchTicket) -> bool {
        let result = runner.fetch_page(ticket.page).await;
        self.complete(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::fallback_page;
    use crate::normalizer::FeedTotals;
    use crate::prober::ProbeError;

    fn live(page: u32, total_posts: u64, total_pages: u32) -> FetchedPage {
        FetchedPage {
            page,
            posts: fallback_page(1).into_iter().take(2).collect(),
            totals: FeedTotals {
                total_posts,
                total_pages,
            },
            source: ContentSource::Live {
                endpoint: "https://postmanoil.com/wp-json/wp/v2/posts".to_string(),
            },
        }
    }

    fn not_found() -> FeedError {
        FeedError::Probe(ProbeError::NotFound { attempted: 4 })
    }

    fn loaded(total_pages: u32) -> PageController {
        let mut c = PageController::new(ErrorMode::Fallback);
        let t = c.begin(1).unwrap();
        assert!(c.complete(t, Ok(live(1, u64::from(total_pages) * 9, total_pages))));
        c
    }

    #[test]
    fn begin_marks_loading_and_clears_posts() {
        let mut c = loaded(3);
        assert!(!c.state().posts.is_empty());
        c.begin(2).unwrap();
        assert!(c.state().loading);
        assert!(c.state().posts.is_empty());
        assert_eq!(c.state().current_page, 2);
    }

    #[test]
    fn success_populates_state() {
        let c = loaded(4);
        let s = c.state();
        assert!(!s.loading);
        assert_eq!(s.total_pages, 4);
        assert_eq!(s.total_posts, 36);
        assert_eq!(s.posts.len(), 2);
        assert!(!s.is_fallback());
    }

    #[test]
    fn out_of_range_requests_do_not_change_page() {
        let mut c = loaded(3);
        let before = c.state().clone();
        assert!(c.request_page(0).is_none());
        assert!(c.request_page(4).is_none());
        assert_eq!(c.state(), &before);
        assert!(c.request_page(3).is_some());
        assert_eq!(c.state().current_page, 3);
    }

    #[test]
    fn failure_in_fallback_mode_serves_placeholders() {
        let mut c = PageController::new(ErrorMode::Fallback);
        let t = c.begin(2).unwrap();
        assert!(c.complete(t, Err(not_found())));
        let s = c.state();
        assert!(s.is_fallback());
        assert!(s.error.is_none());
        assert_eq!(s.posts.len(), 3);
        assert_eq!(s.total_pages, 2);
    }

    #[test]
    fn failure_in_surface_mode_sets_error_and_allows_retry() {
        let mut c = PageController::new(ErrorMode::Surface);
        let t = c.begin(1).unwrap();
        assert!(c.complete(t, Err(not_found())));
        assert!(c.state().error.is_some());
        assert!(c.state().posts.is_empty());

        let retry = c.retry().unwrap();
        assert_eq!(retry.page(), 1);
        assert!(c.state().error.is_none());
        assert!(c.complete(retry, Ok(live(1, 9, 1))));
        assert_eq!(c.state().posts.len(), 2);
    }

    #[test]
    fn retry_without_error_is_noop() {
        let mut c = loaded(2);
        assert!(c.retry().is_none());
    }

    #[test]
    fn stale_ticket_is_dropped() {
        let mut c = loaded(5);
        let first = c.begin(2).unwrap();
        let second = c.begin(3).unwrap();
        assert!(!c.complete(first, Ok(live(2, 45, 5))));
        assert_eq!(c.state().current_page, 3);
        assert!(c.state().loading);
        assert!(c.complete(second, Ok(live(3, 45, 5))));
        assert_eq!(c.state().current_page, 3);
    }

    #[test]
    fn teardown_suppresses_in_flight_results() {
        let mut c = PageController::new(ErrorMode::Fallback);
        let t = c.begin(1).unwrap();
        let before = c.state().clone();
        c.teardown();
        assert!(!c.complete(t, Ok(live(1, 9, 1))));
        assert_eq!(c.state(), &before);
        assert!(c.begin(1).is_none());
    }

    #[test]
    fn resolved_page_is_clamped_to_total() {
        let state = reduce(&PageState::default(), PageEvent::Loaded(live(7, 12, 2)));
        assert_eq!(state.current_page, 2);
        assert_eq!(state.total_pages, 2);
    }

    #[test]
    fn error_mode_parses_aliases() {
        assert_eq!(ErrorMode::parse("Fallback"), Some(ErrorMode::Fallback));
        assert_eq!(ErrorMode::parse("error"), Some(ErrorMode::Surface));
        assert_eq!(ErrorMode::parse("loud"), None);
    }
}
