//! Presentation state of a contacts listing: search text, sort column,
//! paging, and the last loaded page. Pure transitions only; issuing the
//! request described by `to_query` is up to the host.

use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::FetchError;
use crate::normalize::normalize_contacts;
use crate::query::{ContactsQuery, SortOrder};
use crate::types::{Contact, PageResult};

pub const DEFAULT_SORT: &str = "name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    pub q: String,
    pub sort: String,
    pub order: SortOrder,
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
    pub items: Vec<Contact>,
    pub total: u64,
    pub loading: bool,
    /// Message of the last non-cancellation failure, cleared on each load.
    pub error: Option<String>,
}

impl Default for ListingState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListingState {
    pub fn new(page_size: u32) -> Self {
        Self {
            q: String::new(),
            sort: DEFAULT_SORT.to_string(),
            order: SortOrder::Asc,
            page: 1,
            page_size: page_size.max(1),
            items: Vec::new(),
            total: 0,
            loading: false,
            error: None,
        }
    }

    /// Change the search text. Returns whether anything changed; a change
    /// sends the listing back to page 1.
    pub fn set_search(&mut self, q: impl Into<String>) -> bool {
        let q = q.into();
        if q == self.q {
            return false;
        }
        self.q = q;
        self.page = 1;
        true
    }

    /// Clicking the active column flips its order; another column becomes
    /// active in ascending order. Either way paging restarts.
    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort == field {
            self.order = self.order.flipped();
        } else {
            self.sort = field.to_string();
            self.order = SortOrder::Asc;
        }
        self.page = 1;
    }

    pub fn total_pages(&self) -> u32 {
        if self.total == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.page_size.max(1))).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn next_page(&mut self) -> bool {
        if self.loading || self.page >= self.total_pages() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.loading || self.page <= 1 {
            return false;
        }
        self.page -= 1;
        true
    }

    pub fn to_query(&self) -> ContactsQuery {
        ContactsQuery {
            q: self.q.clone(),
            sort: Some(self.sort.clone()),
            order: Some(self.order),
            page: Some(self.page),
            page_size: Some(self.page_size),
        }
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn apply_page(&mut self, page: &PageResult) {
        self.items = normalize_contacts(&page.items);
        self.total = page.total;
        self.loading = false;
        self.error = None;
    }

    /// Record a failed load. Cancellation leaves the state untouched.
    pub fn apply_error(&mut self, err: &FetchError) {
        if err.is_cancelled() {
            return;
        }
        self.error = Some(err.to_string());
        self.loading = false;
    }

    /// One-line status, e.g. `37 results · Page 2 of 2`.
    pub fn summary(&self) -> String {
        if self.loading {
            return "Loading…".to_string();
        }
        let plural = if self.total == 1 { "" } else { "s" };
        format!(
            "{} result{plural} · Page {} of {}",
            self.total,
            self.page,
            self.total_pages()
        )
    }
}
