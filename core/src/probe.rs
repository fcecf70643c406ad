//! Bookkeeping for walking the candidate endpoints of one query.
//!
//! The host loop is:
//!
//! ```text
//! while let Some(req) = probe.next_request() {
//!     match execute(&req) {
//!         Ok(resp) => if let Some(page) = probe.accept(resp) { return Ok(page) },
//!         Err(e) => probe.reject(e.to_string()),
//!     }
//! }
//! Err(probe.finish())
//! ```
//!
//! Cancellation is not modelled here; the host stops calling
//! `next_request` and reports `FetchError::Cancelled` itself.

use std::vec;

use crate::client::ContactsClient;
use crate::error::{ApiError, FetchError};
use crate::http::{HttpRequest, HttpResponse};
use crate::query::ContactsQuery;
use crate::types::PageResult;

#[derive(Debug)]
pub struct Probe {
    client: ContactsClient,
    query: ContactsQuery,
    pending: vec::IntoIter<HttpRequest>,
    current: Option<HttpRequest>,
    failures: Vec<ApiError>,
}

impl Probe {
    pub(crate) fn new(client: ContactsClient, query: ContactsQuery) -> Self {
        let pending = client.build_candidates(&query).into_iter();
        Self {
            client,
            query,
            pending,
            current: None,
            failures: Vec::new(),
        }
    }

    /// The next candidate to try, or `None` once all have been handed out.
    pub fn next_request(&mut self) -> Option<HttpRequest> {
        self.current = self.pending.next();
        self.current.clone()
    }

    /// Feed the response to the current candidate. `Some` ends the probe.
    pub fn accept(&mut self, response: HttpResponse) -> Option<PageResult> {
        let request = self.current.take()?;
        match self.client.parse_page(&request, &self.query, response) {
            Ok(page) => Some(page),
            Err(err) => {
                self.failures.push(err);
                None
            }
        }
    }

    /// Record that the current candidate produced no response at all.
    pub fn reject(&mut self, message: impl Into<String>) {
        if let Some(request) = self.current.take() {
            self.failures.push(ApiError::Transport {
                url: request.url,
                message: message.into(),
            });
        }
    }

    pub fn last_failure(&self) -> Option<&ApiError> {
        self.failures.last()
    }

    pub fn failures(&self) -> &[ApiError] {
        &self.failures
    }

    /// Aggregate failure once every candidate has been tried.
    pub fn finish(self) -> FetchError {
        FetchError::Exhausted {
            attempts: self.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn probe() -> Probe {
        ContactsClient::with_base_url("http://h").probe(ContactsQuery::default())
    }

    #[test]
    fn third_candidate_success_hides_earlier_failures() {
        let mut probe = probe();
        let first = probe.next_request().unwrap();
        assert!(first.url.starts_with("http://h/api/contacts?"));
        assert!(probe.accept(HttpResponse::new(404, "")).is_none());

        probe.next_request().unwrap();
        probe.reject("connection refused");

        let third = probe.next_request().unwrap();
        assert!(third.url.starts_with("http://h/api/contacts/search?"));
        let page = probe.accept(HttpResponse::new(200, r#"[{"id":"a"}]"#)).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(probe.failures().len(), 2);
    }

    #[test]
    fn exhausted_probe_surfaces_last_failure() {
        let mut probe = probe();
        let mut statuses = [404, 404, 500, 502].into_iter();
        while let Some(_req) = probe.next_request() {
            let status = statuses.next().unwrap();
            assert!(probe.accept(HttpResponse::new(status, "")).is_none());
        }
        let err = probe.finish();
        assert_eq!(err.attempts().len(), 4);
        assert_eq!(
            err.to_string(),
            "request failed (502) at http://h/contacts/search?page_size=20&pageSize=20"
        );
    }

    #[test]
    fn accept_without_request_is_ignored() {
        let mut probe = probe();
        assert!(probe.accept(HttpResponse::new(200, "[]")).is_none());
        probe.reject("nothing in flight");
        assert!(probe.failures().is_empty());
    }

    #[test]
    fn empty_endpoint_list_fails_generically() {
        let client = ContactsClient::new(ClientConfig::default().endpoints(Vec::<String>::new()));
        let mut probe = client.probe(ContactsQuery::default());
        assert!(probe.next_request().is_none());
        assert_eq!(probe.finish().to_string(), "failed to fetch contacts");
    }
}
