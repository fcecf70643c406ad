//! Async host for `contacts-core`.
//!
//! # Overview
//! Executes the requests the core builds, over `reqwest`, and adds what a
//! sans-IO core cannot own: cooperative cancellation of superseded queries,
//! the last-request-wins `QueryController`, and debounced search input.
//!
//! # Design
//! - `Transport` is the single I/O seam; tests script it.
//! - `fetch_contacts` races every probe attempt against a
//!   `CancellationToken`; cancellation is never retried.
//! - `QueryController` is the only owner of the in-flight token.

pub mod controller;
pub mod debounce;
pub mod fetch;
pub mod render;
pub mod telemetry;
pub mod transport;

pub use controller::{QueryController, QueryOutcome};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use fetch::fetch_contacts;
pub use transport::{ReqwestTransport, Transport, TransportError};
