//! HTTP transport for hypermedia API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests against a HAL API. The client fetches and writes whole
//! hypermedia documents; higher layers ([`crate::hal`]) interpret them.

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::errors::{HttpError, Problem};
use crate::clients::http_response::HttpResponse;
use crate::clients::traversal::Traversal;
use crate::config::Config;

/// Client version from Cargo.toml.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Supported HTTP methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET.
    Get,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// HTTP client for making requests against a hypermedia API.
///
/// The client handles:
/// - Base URI construction from the configured API URL
/// - Default headers including User-Agent, Accept, and bearer token
/// - Problem-document parsing for non-2xx responses
///
/// The transport performs no retries of its own; retry of bulk
/// operations is owned by the collection iteration machinery.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use hal_client::{Config, ApiUrl};
/// use hal_client::clients::HttpClient;
///
/// let config = Config::builder()
///     .api_url(ApiUrl::new("https://api.example.com/rest").unwrap())
///     .build()
///     .unwrap();
///
/// let client = HttpClient::new(&config);
/// let (document, traversal) = client.get(&client.root()).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Traversal pointing at the configured API entry point.
    root: Traversal,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization
    /// failure).
    #[must_use]
    pub fn new(config: &Config) -> Self {
        // Build User-Agent header
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}HAL Client Library v{CLIENT_VERSION} | Rust {rust_version}");

        // Build default headers
        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert(
            "Accept".to_string(),
            "application/hal+json, application/json".to_string(),
        );

        if let Some(token) = config.access_token() {
            default_headers.insert(
                "Authorization".to_string(),
                format!("Bearer {}", token.as_ref()),
            );
        }

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        // ApiUrl is validated as absolute on construction.
        let root = Traversal::new(config.api_url().as_ref())
            .expect("validated API URL must parse");

        Self {
            client,
            root,
            default_headers,
        }
    }

    /// Returns a traversal pointing at the configured API entry point.
    #[must_use]
    pub fn root(&self) -> Traversal {
        self.root.clone()
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Fetches the document at the traversal target.
    ///
    /// Returns the parsed body and the continuation for the fetched
    /// document.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Problem`] for non-2xx responses and
    /// [`HttpError::Network`] for connection failures.
    pub async fn get(&self, traversal: &Traversal) -> Result<(Value, Traversal), HttpError> {
        let response = self.request(HttpMethod::Get, traversal, None).await?;
        Ok((response.body, traversal.clone()))
    }

    /// Writes a document to the traversal target with PUT.
    ///
    /// Returns the server's representation of the written document and the
    /// continuation for it.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Problem`] for non-2xx responses and
    /// [`HttpError::Network`] for connection failures.
    pub async fn put(
        &self,
        traversal: &Traversal,
        body: &Value,
    ) -> Result<(Value, Traversal), HttpError> {
        let response = self.request(HttpMethod::Put, traversal, Some(body)).await?;
        Ok((response.body, traversal.clone()))
    }

    /// Deletes the entity at the traversal target.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Problem`] for non-2xx responses and
    /// [`HttpError::Network`] for connection failures.
    pub async fn delete(&self, traversal: &Traversal) -> Result<(), HttpError> {
        self.request(HttpMethod::Delete, traversal, None).await?;
        Ok(())
    }

    /// Sends one HTTP request and parses the response.
    async fn request(
        &self,
        method: HttpMethod,
        traversal: &Traversal,
        body: Option<&Value>,
    ) -> Result<HttpResponse, HttpError> {
        let url = traversal.url().clone();
        tracing::debug!(method = method.as_str(), url = %url, "dispatching request");

        let mut req_builder = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = body {
            req_builder = req_builder
                .header("Content-Type", "application/json")
                .body(body.to_string());
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await.unwrap_or_default();

        let body = if body_text.is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&body_text)
                .unwrap_or_else(|_| serde_json::Value::String(body_text))
        };

        let response = HttpResponse::new(code, res_headers, body);

        if response.is_ok() {
            return Ok(response);
        }

        let problem = Problem::from_response(response.code, &response.body, response.request_id());
        tracing::warn!(
            status = problem.status,
            title = %problem.title,
            url = traversal.as_str(),
            "problem response"
        );
        Err(HttpError::Problem(problem))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
