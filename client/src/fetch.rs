//! `fetch_contacts`: walk the candidate endpoints for one query, racing each
//! attempt against the caller's cancellation token.

use contacts_core::{ContactsClient, ContactsQuery, FetchError, PageResult};
use tokio_util::sync::CancellationToken;

use crate::transport::Transport;

/// Resolve `query` against the first candidate endpoint that answers with a
/// usable JSON payload.
///
/// Cancellation wins over everything else: it is checked before each attempt
/// and raced against the attempt in flight, and it ends the probe at once
/// with `FetchError::Cancelled`.
#[tracing::instrument(
    name = "contacts_fetch",
    skip_all,
    fields(q = %query.q, page = ?query.page, base = %client.base_url())
)]
pub async fn fetch_contacts<T>(
    client: &ContactsClient,
    transport: &T,
    query: ContactsQuery,
    cancel: &CancellationToken,
) -> Result<PageResult, FetchError>
where
    T: Transport + ?Sized,
{
    let mut probe = client.probe(query);
    while let Some(request) = probe.next_request() {
        if cancel.is_cancelled() {
            tracing::debug!("query cancelled");
            return Err(FetchError::Cancelled);
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(url = %request.url, "query cancelled in flight");
                return Err(FetchError::Cancelled);
            }
            outcome = transport.send(&request) => outcome,
        };

        match outcome {
            Ok(response) => {
                if let Some(page) = probe.accept(response) {
                    tracing::debug!(
                        url = %request.url,
                        items = page.items.len(),
                        total = page.total,
                        "contacts page loaded"
                    );
                    return Ok(page);
                }
            }
            Err(err) => probe.reject(err.to_string()),
        }

        if let Some(failure) = probe.last_failure() {
            tracing::debug!(url = failure.url(), error = %failure, "candidate endpoint failed");
        }
    }

    let err = probe.finish();
    tracing::warn!(
        attempts = err.attempts().len(),
        error = %err,
        "all candidate endpoints failed"
    );
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use contacts_core::{ApiError, HttpRequest, HttpResponse};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Replays canned responses in order and records every URL it was sent.
    /// `None` entries, and anything past the end, fail without a response.
    #[derive(Default)]
    struct Scripted {
        outcomes: Mutex<VecDeque<Option<HttpResponse>>>,
        seen: Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    impl Scripted {
        fn new(outcomes: Vec<Option<HttpResponse>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().push(request.url.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let next = self.outcomes.lock().pop_front().flatten();
            next.ok_or_else(refused)
        }
    }

    /// A genuine reqwest failure: the URL cannot be parsed.
    fn refused() -> TransportError {
        reqwest::Client::new()
            .get("http://[::1")
            .build()
            .unwrap_err()
            .into()
    }

    fn client() -> ContactsClient {
        ContactsClient::with_base_url("http://h")
    }

    #[tokio::test]
    async fn third_candidate_success_is_returned() {
        let transport = Scripted::new(vec![
            Some(HttpResponse::new(404, "")),
            Some(HttpResponse::new(500, "boom")),
            Some(HttpResponse::new(200, r#"{"data":[{"id":"z"}],"total":9}"#)),
        ]);
        let cancel = CancellationToken::new();
        let page = fetch_contacts(&client(), &transport, ContactsQuery::default(), &cancel)
            .await
            .unwrap();
        assert_eq!(page.total, 9);
        assert_eq!(transport.seen.lock().len(), 3);
    }

    #[tokio::test]
    async fn exhaustion_keeps_every_attempt_and_reports_the_last() {
        let transport = Scripted::new(vec![
            None,
            Some(HttpResponse::new(404, "")),
            Some(HttpResponse::new(200, "not json")),
            Some(HttpResponse::new(502, "bad gateway")),
        ]);
        let cancel = CancellationToken::new();
        let err = fetch_contacts(&client(), &transport, ContactsQuery::default(), &cancel)
            .await
            .unwrap_err();

        let attempts = err.attempts();
        assert_eq!(attempts.len(), 4);
        assert!(matches!(attempts[0], ApiError::Transport { .. }));
        assert!(matches!(attempts[2], ApiError::Deserialization { .. }));
        assert_eq!(
            err.to_string(),
            "request failed (502) at http://h/contacts/search?page_size=20&pageSize=20: bad gateway"
        );
    }

    #[tokio::test]
    async fn pre_cancelled_token_sends_nothing() {
        let transport = Scripted::new(vec![Some(HttpResponse::new(200, "[]"))]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = fetch_contacts(&client(), &transport, ContactsQuery::default(), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Cancelled);
        assert!(transport.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn cancellation_in_flight_stops_probing() {
        let transport = Scripted {
            delay: Some(Duration::from_millis(200)),
            ..Scripted::new(vec![
                Some(HttpResponse::new(404, "")),
                Some(HttpResponse::new(200, "[]")),
            ])
        };
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = fetch_contacts(&client(), &transport, ContactsQuery::default(), &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(transport.seen.lock().len(), 1);
    }
}
