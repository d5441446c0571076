//! HTTP transport types for hypermedia API communication.
//!
//! This module provides the transport layer under the hypermedia core.
//! It fetches and writes whole JSON documents; interpreting those
//! documents (links, embedded resources, pagination) is the job of
//! [`crate::hal`].
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpResponse`]: A parsed response from the API
//! - [`Traversal`]: The continuation token used to issue requests
//!   relative to a previously fetched document
//! - [`Problem`]: A non-2xx response in RFC 7807 shape
//! - [`HttpError`]: Unified transport error type
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_client::{Config, ApiUrl};
//! use hal_client::clients::HttpClient;
//!
//! let config = Config::builder()
//!     .api_url(ApiUrl::new("https://api.example.com/rest").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let client = HttpClient::new(&config);
//! let (document, traversal) = client.get(&client.root()).await?;
//! ```
//!
//! # Retry Behavior
//!
//! The transport performs no retries. Bulk collection operations retry
//! transient failures with exponential backoff at the iteration layer
//! (see [`crate::hal::RetryPolicy`]); single requests fail fast.

mod errors;
mod http_client;
mod http_response;
mod traversal;

pub use errors::{HttpError, InvalidHttpRequestError, Problem};
pub use http_client::{HttpClient, HttpMethod, CLIENT_VERSION};
pub use http_response::HttpResponse;
pub use traversal::Traversal;
