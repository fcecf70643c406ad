//! Last-request-wins driver for a contacts listing.
//!
//! # Design
//! `QueryController` owns the only handle to the in-flight query. Issuing a
//! query cancels the previous token before anything else happens, and a
//! resolution is written into the `ListingState` only while its generation
//! is still the newest. A slower, older response therefore can never
//! overwrite the state produced by a newer one, whatever order the two
//! resolve in.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use contacts_core::{ContactsClient, ContactsQuery, ListingState};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::debounce::Debouncer;
use crate::fetch::fetch_contacts;
use crate::transport::Transport;

/// What happened to one issued query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The page was written into the listing state.
    Loaded,
    /// Every endpoint failed; the message is in `ListingState::error`.
    Failed,
    /// A newer query was issued first. Nothing was written.
    Superseded,
}

pub struct QueryController<T> {
    client: ContactsClient,
    transport: T,
    inflight: Mutex<Option<CancellationToken>>,
    generation: AtomicU64,
    state: Mutex<ListingState>,
}

impl<T: Transport> QueryController<T> {
    pub fn new(client: ContactsClient, transport: T) -> Self {
        let page_size = client.config().default_page_size;
        Self::with_state(client, transport, ListingState::new(page_size))
    }

    pub fn with_state(client: ContactsClient, transport: T, state: ListingState) -> Self {
        Self {
            client,
            transport,
            inflight: Mutex::new(None),
            generation: AtomicU64::new(0),
            state: Mutex::new(state),
        }
    }

    pub fn snapshot(&self) -> ListingState {
        self.state.lock().clone()
    }

    /// Mutate the listing (search text, sort, page) without issuing a query.
    pub fn update<R>(&self, f: impl FnOnce(&mut ListingState) -> R) -> R {
        f(&mut self.state.lock())
    }

    /// Issue the query described by the current listing state.
    pub async fn refresh(&self) -> QueryOutcome {
        let query = self.state.lock().to_query();
        self.issue(query).await
    }

    /// Cancel whatever is in flight and load `query`.
    pub async fn issue(&self, query: ContactsQuery) -> QueryOutcome {
        let token = CancellationToken::new();
        let generation = {
            let mut inflight = self.inflight.lock();
            if let Some(previous) = inflight.replace(token.clone()) {
                previous.cancel();
            }
            self.state.lock().begin_load();
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        let result = fetch_contacts(&self.client, &self.transport, query, &token).await;

        // Lock order is always `inflight` then `state`. The generation is only
        // bumped under `inflight`, so the slot cleared here is our own.
        let mut inflight = self.inflight.lock();
        if token.is_cancelled() || self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "dropping superseded contacts query");
            return QueryOutcome::Superseded;
        }
        *inflight = None;
        let mut state = self.state.lock();
        match result {
            Ok(page) => {
                state.apply_page(&page);
                QueryOutcome::Loaded
            }
            Err(err) if err.is_cancelled() => QueryOutcome::Superseded,
            Err(err) => {
                state.apply_error(&err);
                QueryOutcome::Failed
            }
        }
    }

    /// Abort the in-flight query, if any, without issuing another. The
    /// listing keeps its items and leaves the loading state.
    pub fn cancel(&self) {
        let mut inflight = self.inflight.lock();
        if let Some(token) = inflight.take() {
            token.cancel();
            self.state.lock().loading = false;
        }
    }
}

impl<T: Transport + 'static> QueryController<T> {
    /// Feed settled search text from `debouncer` into the listing, issuing a
    /// fresh query for every change. Ends when the search input is dropped.
    pub fn spawn_search_loop(self: Arc<Self>, mut debouncer: Debouncer) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(q) = debouncer.next().await {
                if !self.update(|state| state.set_search(q)) {
                    continue;
                }
                let controller = Arc::clone(&self);
                tokio::spawn(async move {
                    controller.refresh().await;
                });
            }
        })
    }
}
