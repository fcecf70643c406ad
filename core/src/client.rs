//! Stateless request builder and response parser for the contacts API.
//!
//! # Design
//! `ContactsClient` holds only its `ClientConfig`. `build_candidates` expands
//! a query into one GET per configured endpoint, and `parse_page` turns the
//! response to one of them into a `PageResult`. Walking the candidates in
//! order is `Probe`'s job; executing requests is the caller's.

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::normalize::normalize_page;
use crate::probe::Probe;
use crate::query::ContactsQuery;
use crate::types::PageResult;

#[derive(Debug, Clone)]
pub struct ContactsClient {
    base_url: String,
    config: ClientConfig,
}

impl ContactsClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
        }
    }

    /// Client for `base_url` with the default endpoints and page size.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::new(ClientConfig::with_base_url(base_url))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One request per candidate endpoint, in priority order.
    pub fn build_candidates(&self, query: &ContactsQuery) -> Vec<HttpRequest> {
        let query_string = query.to_query_string(self.config.default_page_size);
        self.config
            .endpoints
            .iter()
            .map(|path| HttpRequest {
                url: format!("{}{path}{query_string}", self.base_url),
                headers: vec![("accept".to_string(), "application/json".to_string())],
            })
            .collect()
    }

    /// Classify the response to `request`, normalizing it on success.
    pub fn parse_page(
        &self,
        request: &HttpRequest,
        query: &ContactsQuery,
        response: HttpResponse,
    ) -> Result<PageResult, ApiError> {
        if !response.is_success() {
            return Err(ApiError::Status {
                url: request.url.clone(),
                status: response.status,
                body: response.body.trim().to_string(),
            });
        }
        let payload: serde_json::Value =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization {
                url: request.url.clone(),
                message: e.to_string(),
            })?;
        Ok(normalize_page(payload, query, self.config.default_page_size))
    }

    /// Start walking the candidates for `query`.
    pub fn probe(&self, query: ContactsQuery) -> Probe {
        Probe::new(self.clone(), query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortOrder;

    fn client() -> ContactsClient {
        ContactsClient::with_base_url("http://localhost:3001")
    }

    fn request(url: &str) -> HttpRequest {
        HttpRequest {
            url: url.to_string(),
            headers: Vec::new(),
        }
    }

    #[test]
    fn build_candidates_in_priority_order() {
        let query = ContactsQuery::search("ann").sorted_by("name", SortOrder::Asc).page(1, 20);
        let urls: Vec<String> = client()
            .build_candidates(&query)
            .into_iter()
            .map(|r| r.url)
            .collect();
        let qs = "?q=ann&sort=name&order=asc&page=1&page_size=20&pageSize=20";
        assert_eq!(
            urls,
            vec![
                format!("http://localhost:3001/api/contacts{qs}"),
                format!("http://localhost:3001/contacts{qs}"),
                format!("http://localhost:3001/api/contacts/search{qs}"),
                format!("http://localhost:3001/contacts/search{qs}"),
            ]
        );
    }

    #[test]
    fn candidates_ask_for_json() {
        let req = &client().build_candidates(&ContactsQuery::default())[0];
        assert_eq!(
            req.headers,
            vec![("accept".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ContactsClient::with_base_url("http://localhost:3001/");
        let req = &client.build_candidates(&ContactsQuery::default())[1];
        assert_eq!(req.url, "http://localhost:3001/contacts?page_size=20&pageSize=20");
    }

    #[test]
    fn custom_endpoints_replace_defaults() {
        let config = ClientConfig::with_base_url("http://api").endpoints(["/v2/people"]);
        let reqs = ContactsClient::new(config).build_candidates(&ContactsQuery::default());
        assert_eq!(reqs.len(), 1);
        assert!(reqs[0].url.starts_with("http://api/v2/people?"));
    }

    #[test]
    fn parse_page_success() {
        let response = HttpResponse::new(200, r#"{"items":[{"name":"Ann"}],"total":7}"#);
        let page = client()
            .parse_page(&request("http://x"), &ContactsQuery::default(), response)
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 7);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 20);
    }

    #[test]
    fn parse_page_wrong_status() {
        let response = HttpResponse::new(503, "down\n");
        let err = client()
            .parse_page(&request("http://x/contacts"), &ContactsQuery::default(), response)
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                url: "http://x/contacts".to_string(),
                status: 503,
                body: "down".to_string(),
            }
        );
    }

    #[test]
    fn parse_page_bad_json() {
        let response = HttpResponse::new(200, "<html>");
        let err = client()
            .parse_page(&request("http://x"), &ContactsQuery::default(), response)
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization { .. }));
    }
}
