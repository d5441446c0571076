//! HTTP-specific error types for the HAL client.
//!
//! This module contains error types for transport operations: problem
//! responses from the remote API, request validation failures, and a
//! unified [`HttpError`] wrapper.
//!
//! # Error Handling
//!
//! - [`Problem`]: a non-2xx response, carrying the HTTP status the retry
//!   machinery uses to decide whether a failure is transient
//! - [`InvalidHttpRequestError`]: a request failed validation before sending
//! - [`HttpError`]: unified error type encompassing all transport errors
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_client::clients::HttpError;
//!
//! match client.get(&traversal).await {
//!     Ok((document, next)) => println!("fetched {}", next.as_str()),
//!     Err(HttpError::Problem(p)) => println!("API error {}: {}", p.status, p.title),
//!     Err(HttpError::InvalidRequest(e)) => println!("bad request: {e}"),
//!     Err(HttpError::Network(e)) => println!("network error: {e}"),
//! }
//! ```

use serde_json::Value;
use thiserror::Error;

/// A problem response from the remote API (non-2xx status).
///
/// The fields follow the RFC 7807 "Problem Details" shape HAL-style APIs
/// commonly return. Bodies that are not problem documents fall back to
/// the raw response text in `detail`.
///
/// # Example
///
/// ```rust
/// use hal_client::clients::Problem;
///
/// let problem = Problem {
///     status: 404,
///     title: "Not Found".to_string(),
///     detail: Some("no such product".to_string()),
///     request_id: Some("abc-123".to_string()),
/// };
///
/// assert!(problem.to_string().contains("Not Found"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{status} {title}")]
pub struct Problem {
    /// The HTTP status code of the response.
    pub status: u16,
    /// Short human-readable summary of the problem.
    pub title: String,
    /// Longer explanation specific to this occurrence, if present.
    pub detail: Option<String>,
    /// Reference ID for error reporting (from the X-Request-Id header).
    pub request_id: Option<String>,
}

impl Problem {
    /// Builds a `Problem` from a response status, parsed body, and request id.
    ///
    /// Recognizes RFC 7807 fields (`title`, `detail`) in object bodies and
    /// falls back to the HTTP reason phrase when absent.
    #[must_use]
    pub fn from_response(status: u16, body: &Value, request_id: Option<&str>) -> Self {
        let title = body
            .get("title")
            .and_then(Value::as_str)
            .map_or_else(|| default_title(status).to_string(), ToString::to_string);

        let detail = body
            .get("detail")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .or_else(|| {
                // Not a problem document; keep whatever the server said.
                match body {
                    Value::String(s) if !s.is_empty() => Some(s.clone()),
                    Value::Object(map) if !map.is_empty() && map.get("title").is_none() => {
                        Some(body.to_string())
                    }
                    _ => None,
                }
            });

        Self {
            status,
            title,
            detail,
            request_id: request_id.map(ToString::to_string),
        }
    }
}

/// Maps a status code to a default title when the body carries none.
const fn default_title(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "HTTP Error",
    }
}

/// Error returned when an HTTP request fails validation before sending.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The URL or link href could not be parsed or resolved.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The invalid URL or href that was provided.
        url: String,
        /// Why parsing or resolution failed.
        reason: String,
    },
}

/// Unified error type for all transport-related errors.
///
/// This enum provides a single error type for HTTP operations, making it
/// easier to handle errors at API boundaries. Use pattern matching to
/// handle specific error types.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A problem response (non-2xx status code).
    #[error(transparent)]
    Problem(#[from] Problem),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code associated with this error, if any.
    ///
    /// Used by the retry machinery to distinguish transient (500+)
    /// failures from permanent ones.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Problem(p) => Some(p.status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidRequest(_) => None,
        }
    }
}
