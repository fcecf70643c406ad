//! Sans-IO client core for a contacts directory API.
//!
//! # Overview
//! Expands a `ContactsQuery` into GET requests against an ordered list of
//! candidate endpoints and normalizes whichever response succeeds into a
//! uniform `PageResult`. The caller executes the HTTP round-trips, so the
//! core stays deterministic and testable.
//!
//! # Design
//! - `ContactsClient` is stateless; it holds only its `ClientConfig`.
//! - Candidate endpoints are configuration data, not code.
//! - `Probe` walks the candidates and keeps every failed attempt, so the
//!   aggregate `FetchError` can be diagnosed.
//! - Envelope and record aliases are resolved by ordered key tables in
//!   `normalize`.
//! - `ListingState` models the search/sort/paging state a UI keeps.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod listing;
pub mod normalize;
pub mod probe;
pub mod query;
pub mod types;

pub use client::ContactsClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_ENDPOINTS, DEFAULT_PAGE_SIZE};
pub use error::{ApiError, ConfigError, FetchError};
pub use http::{HttpRequest, HttpResponse};
pub use listing::ListingState;
pub use normalize::{normalize_contact, normalize_contacts, normalize_page, FieldSource};
pub use probe::Probe;
pub use query::{ContactsQuery, SortOrder};
pub use types::{Contact, ContactField, PageResult, PLACEHOLDER};
