//! Client-side list controller.
//!
//! [`ListController`] tracks what a listing view has loaded and decides which
//! request to issue next. It does no I/O: every operation that needs data
//! returns a [`FetchRequest`], and the caller reports the outcome back with
//! [`ListController::on_success`] or [`ListController::on_failure`]. See
//! [`crate::client::drive`] for the async glue.
//!
//! ## Phases
//!
//! ```text
//!                 start / set_filter (from any phase)
//!                          │
//!                          ▼
//!                  ┌──────────────┐  failure   ┌───────┐
//!                  │InitialLoading│──────────▶│ Error │◀─┐
//!                  └──────┬───────┘            └───┬───┘  │
//!                 success │        retry ┌─────────┘      │ failure
//!                         ▼              ▼                │
//!   EndOfResults ◀──── ┌──────┐ load_more ┌───────────┐   │
//!  (has_more = false)  │ Idle │─────────▶│LoadingMore│───┘
//!                      └──────┘◀─────────└───────────┘
//!                                success
//! ```
//!
//! ## Modes
//!
//! - [`Mode::Accumulate`]: infinite scroll. Each page is appended; the next
//!   page is requested when the sentinel below the list becomes visible.
//! - [`Mode::Replace`]: numbered pages. Each page replaces the previous one
//!   and the page number lives in the URL, so [`ListController::sync_url`]
//!   applies browser navigation.
//!
//! ## Stale responses
//!
//! Every request carries a [`Ticket`]. Only the most recently issued ticket
//! is accepted; anything else is reported as [`Delivery::Stale`] and ignored,
//! so a slow response for an old filter can never overwrite newer results.

use crate::filter::Facets;
use crate::paginate::{PageMeta, PageRequest};
use crate::types::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Accumulate,
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InitialLoading,
    Idle,
    LoadingMore,
    Error,
    EndOfResults,
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First page after mount or a filter change; replaces everything.
    Reset,
    /// Next page in accumulate mode; appended.
    More,
    /// A specific page in replace mode; replaces the displayed set.
    Jump,
}

/// A request the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest<F> {
    pub ticket: Ticket,
    pub filter: F,
    pub page: PageRequest,
    pub kind: FetchKind,
}

/// A successfully fetched page, as seen by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// Whether a reported outcome changed the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    Stale,
}

/// What the rendering layer should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    /// Nothing to show yet; render placeholders.
    Loading,
    /// The request failed and there is nothing else to show.
    Failed { message: String },
    /// Loaded successfully, no matches.
    Empty,
    Items { footer: Footer },
}

/// What goes below a non-empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footer {
    /// The scroll sentinel; more pages exist.
    Sentinel,
    LoadingMore,
    /// Loading the next page failed; loaded items stay visible.
    RetryMore { message: String },
    /// Everything has been loaded.
    End { total: usize },
    /// Numbered page navigation.
    Pages { current: usize, total_pages: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    ticket: Ticket,
    page: usize,
    kind: FetchKind,
}

/// State for one listing view over records `T` filtered by `F`.
#[derive(Debug, Clone)]
pub struct ListController<T, F> {
    mode: Mode,
    filter: F,
    limit: usize,
    /// Last page applied; 0 before the first success.
    page: usize,
    items: Vec<T>,
    meta: Option<PageMeta>,
    has_more: bool,
    phase: Phase,
    error: Option<String>,
    in_flight: Option<Pending>,
    failed: Option<Pending>,
    last_ticket: u64,
}

impl<T, F: Clone + PartialEq> ListController<T, F> {
    pub fn new(mode: Mode, filter: F, limit: usize) -> Self {
        Self {
            mode,
            filter,
            limit: limit.max(1),
            page: 0,
            items: Vec::new(),
            meta: None,
            has_more: true,
            phase: Phase::InitialLoading,
            error: None,
            in_flight: None,
            failed: None,
            last_ticket: 0,
        }
    }

    /// Infinite-scroll controller (products listing).
    pub fn accumulating(filter: F, limit: usize) -> Self {
        Self::new(Mode::Accumulate, filter, limit)
    }

    /// Numbered-page controller (projects listing).
    pub fn paged(filter: F, limit: usize) -> Self {
        Self::new(Mode::Replace, filter, limit)
    }

    /// Mount: clear everything and request the first page.
    pub fn start(&mut self) -> FetchRequest<F> {
        self.start_at(1)
    }

    /// Mount at a given page, e.g. one taken from the URL.
    ///
    /// Accumulating lists always start from page 1.
    pub fn start_at(&mut self, page: usize) -> FetchRequest<F> {
        let page = match self.mode {
            Mode::Accumulate => 1,
            Mode::Replace => page.max(1),
        };
        self.items.clear();
        self.page = 0;
        self.meta = None;
        self.has_more = true;
        self.error = None;
        self.failed = None;
        self.phase = Phase::InitialLoading;
        self.issue(page, FetchKind::Reset)
    }

    /// Change the filter. A new filter resets the list and supersedes any
    /// request in flight; an identical one does nothing.
    pub fn set_filter(&mut self, filter: F) -> Option<FetchRequest<F>> {
        if filter == self.filter {
            return None;
        }
        self.filter = filter;
        Some(self.start())
    }

    /// Request the next page in accumulate mode.
    ///
    /// Refused while any request is in flight, after an unretried failure,
    /// and once everything has been loaded.
    pub fn load_more(&mut self) -> Option<FetchRequest<F>> {
        if self.mode != Mode::Accumulate
            || self.in_flight.is_some()
            || !self.has_more
            || self.phase != Phase::Idle
        {
            return None;
        }
        self.phase = Phase::LoadingMore;
        Some(self.issue(self.page + 1, FetchKind::More))
    }

    /// The sentinel under the list scrolled into view.
    pub fn sentinel_visible(&mut self) -> Option<FetchRequest<F>> {
        self.load_more()
    }

    /// Show a specific page in replace mode.
    pub fn go_to_page(&mut self, page: usize) -> Option<FetchRequest<F>> {
        if self.mode != Mode::Replace {
            return None;
        }
        let page = page.max(1);
        if page == self.target_page() && self.phase != Phase::Error {
            return None;
        }
        self.error = None;
        self.failed = None;
        self.phase = Phase::InitialLoading;
        Some(self.issue(page, FetchKind::Jump))
    }

    /// Apply filter and page carried by the URL (back/forward navigation).
    pub fn sync_url(&mut self, filter: F, page: usize) -> Option<FetchRequest<F>> {
        if filter != self.filter {
            self.filter = filter;
            return Some(self.start_at(page));
        }
        self.go_to_page(page)
    }

    /// Re-issue the request that failed, keeping whatever is loaded.
    pub fn retry(&mut self) -> Option<FetchRequest<F>> {
        if self.phase != Phase::Error {
            return None;
        }
        let failed = self.failed.take()?;
        self.error = None;
        self.phase = match failed.kind {
            FetchKind::More => Phase::LoadingMore,
            FetchKind::Reset | FetchKind::Jump => Phase::InitialLoading,
        };
        Some(self.issue(failed.page, failed.kind))
    }

    /// Report a successful response.
    pub fn on_success(&mut self, ticket: Ticket, response: PageResponse<T>) -> Delivery {
        let Some(pending) = self.take_pending(ticket) else {
            return Delivery::Stale;
        };
        match pending.kind {
            FetchKind::Reset | FetchKind::Jump => self.items = response.items,
            FetchKind::More => self.items.extend(response.items),
        }
        self.page = pending.page;
        self.has_more = response.meta.has_more;
        self.meta = Some(response.meta);
        self.error = None;
        self.failed = None;
        self.phase = if !self.has_more && !self.items.is_empty() {
            Phase::EndOfResults
        } else {
            Phase::Idle
        };
        Delivery::Applied
    }

    /// Report a failed request. Loaded items are kept.
    pub fn on_failure(&mut self, ticket: Ticket, message: impl Into<String>) -> Delivery {
        let Some(pending) = self.take_pending(ticket) else {
            return Delivery::Stale;
        };
        self.error = Some(message.into());
        self.failed = Some(pending);
        self.phase = Phase::Error;
        Delivery::Applied
    }

    pub fn status(&self) -> ListStatus {
        match (self.phase, self.mode) {
            (Phase::InitialLoading, _) => ListStatus::Loading,
            (Phase::Error, Mode::Replace) => ListStatus::Failed {
                message: self.error_message(),
            },
            (Phase::Error, Mode::Accumulate) if self.items.is_empty() => ListStatus::Failed {
                message: self.error_message(),
            },
            _ if self.items.is_empty() => ListStatus::Empty,
            (phase, Mode::Accumulate) => ListStatus::Items {
                footer: match phase {
                    Phase::LoadingMore => Footer::LoadingMore,
                    Phase::Error => Footer::RetryMore {
                        message: self.error_message(),
                    },
                    Phase::Idle if self.has_more => Footer::Sentinel,
                    _ => Footer::End {
                        total: self.total(),
                    },
                },
            },
            (_, Mode::Replace) => ListStatus::Items {
                footer: Footer::Pages {
                    current: self.page.max(1),
                    total_pages: self.meta.map_or(1, |m| m.total_pages),
                },
            },
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Last page successfully applied (0 before the first).
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn meta(&self) -> Option<&PageMeta> {
        self.meta.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Total matches reported by the last response, or the number loaded.
    pub fn total(&self) -> usize {
        self.meta.map_or(self.items.len(), |m| m.total)
    }

    fn target_page(&self) -> usize {
        self.in_flight.map_or(self.page, |p| p.page)
    }

    fn issue(&mut self, page: usize, kind: FetchKind) -> FetchRequest<F> {
        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);
        self.in_flight = Some(Pending { ticket, page, kind });
        FetchRequest {
            ticket,
            filter: self.filter.clone(),
            page: PageRequest::new(page, self.limit),
            kind,
        }
    }

    fn take_pending(&mut self, ticket: Ticket) -> Option<Pending> {
        match self.in_flight {
            Some(pending) if pending.ticket == ticket => self.in_flight.take(),
            _ => None,
        }
    }

    fn error_message(&self) -> String {
        self.error.clone().unwrap_or_default()
    }
}

impl<F: Clone + PartialEq> ListController<Product, F> {
    /// Category and type pickers, derived from what is currently loaded.
    pub fn facets(&self) -> Facets {
        Facets::from_products(&self.items)
    }
}
