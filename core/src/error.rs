//! Error types for the contacts client.
//!
//! # Design
//! `ApiError` describes one failed probe attempt. `FetchError` is what a whole
//! `fetch_contacts` call surfaces: either the caller's cancellation, or the
//! exhaustion of every candidate endpoint. `Exhausted` keeps each attempt in
//! probe order for diagnostics, but its message is derived from the last one
//! only, so "404 everywhere" and "host unreachable" read the same way to a
//! user.

use thiserror::Error;

/// A single failed attempt against one candidate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a status outside 2xx.
    #[error("request failed ({status}) at {url}{}", body_suffix(.body))]
    Status { url: String, status: u16, body: String },

    /// The request never produced a response (connect, DNS, TLS, reset...).
    #[error("transport error at {url}: {message}")]
    Transport { url: String, message: String },

    /// A 2xx response whose body was not valid JSON.
    #[error("invalid JSON at {url}: {message}")]
    Deserialization { url: String, message: String },
}

impl ApiError {
    /// The candidate URL this attempt was made against.
    pub fn url(&self) -> &str {
        match self {
            ApiError::Status { url, .. }
            | ApiError::Transport { url, .. }
            | ApiError::Deserialization { url, .. } => url,
        }
    }
}

/// Failure of a whole contacts query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The query was superseded before it resolved. Never shown to users.
    #[error("request cancelled")]
    Cancelled,

    /// Every candidate endpoint failed.
    #[error("{}", exhausted_message(.attempts))]
    Exhausted { attempts: Vec<ApiError> },
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    /// The failure the aggregate message is built from.
    pub fn last_attempt(&self) -> Option<&ApiError> {
        match self {
            FetchError::Cancelled => None,
            FetchError::Exhausted { attempts } => attempts.last(),
        }
    }

    pub fn attempts(&self) -> &[ApiError] {
        match self {
            FetchError::Cancelled => &[],
            FetchError::Exhausted { attempts } => attempts,
        }
    }
}

/// Rejected `ClientConfig` values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("no candidate endpoints configured")]
    NoEndpoints,

    #[error("endpoint '{0}' must start with '/'")]
    InvalidEndpoint(String),

    #[error("page size must be at least 1")]
    ZeroPageSize,
}

const GENERIC_FAILURE: &str = "failed to fetch contacts";

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

fn exhausted_message(attempts: &[ApiError]) -> String {
    attempts
        .last()
        .map(ToString::to_string)
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}
