//! Schema validation capability for persisted documents.
//!
//! Saving a resource validates its serialized form against the entity's
//! JSON Schema before any network write. This module defines the
//! [`SchemaValidator`] capability consumed by the core, plus a
//! production implementation that fetches schemas over HTTP and caches
//! compiled validators by URL.
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_client::schema::{RemoteSchemaValidator, SchemaValidator};
//! use serde_json::json;
//!
//! let validator = RemoteSchemaValidator::new();
//! validator
//!     .validate(&json!({"name": "hoodie"}), "https://api.example.com/schema/product")
//!     .await?;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors produced by schema validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The schema document could not be fetched.
    #[error("failed to fetch schema {url}: {source}")]
    SchemaFetch {
        /// The schema URL that was requested.
        url: String,
        /// The underlying transport failure.
        #[source]
        source: reqwest::Error,
    },

    /// The fetched document is not a usable JSON Schema.
    #[error("invalid schema {url}: {message}")]
    InvalidSchema {
        /// The schema URL that was fetched.
        url: String,
        /// Description of the schema error.
        message: String,
    },

    /// The document does not conform to the schema.
    #[error("document rejected by schema {url}: {violations:?}")]
    Rejected {
        /// The schema URL the document was validated against.
        url: String,
        /// One entry per violation, with its JSON pointer location.
        violations: Vec<String>,
    },
}

/// Capability for validating a document against a schema by URL.
///
/// The core calls this before every PUT; implementations decide how
/// schemas are obtained (fetched, preloaded, or ignored).
#[async_trait]
pub trait SchemaValidator: Send + Sync {
    /// Validates `document` against the schema at `schema_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Rejected`] when the document does not
    /// conform, or a fetch/compile error when the schema itself is
    /// unusable.
    async fn validate(&self, document: &Value, schema_url: &str) -> Result<(), ValidationError>;
}

/// A [`SchemaValidator`] that fetches schemas over HTTP.
///
/// Compiled schemas are cached by URL, so repeated saves against the
/// same entity type fetch and compile the schema once.
pub struct RemoteSchemaValidator {
    http: reqwest::Client,
    cache: Mutex<HashMap<String, Arc<jsonschema::JSONSchema>>>,
}

impl RemoteSchemaValidator {
    /// Creates a validator with its own HTTP client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");
        Self {
            http,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the compiled schema for `url`, fetching it on first use.
    async fn compiled(&self, url: &str) -> Result<Arc<jsonschema::JSONSchema>, ValidationError> {
        if let Some(compiled) = self.cache.lock().expect("schema cache poisoned").get(url) {
            return Ok(Arc::clone(compiled));
        }

        tracing::debug!(url, "fetching schema");
        let schema: Value = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ValidationError::SchemaFetch {
                url: url.to_string(),
                source: e,
            })?
            .json()
            .await
            .map_err(|e| ValidationError::SchemaFetch {
                url: url.to_string(),
                source: e,
            })?;

        let compiled =
            jsonschema::JSONSchema::compile(&schema).map_err(|e| ValidationError::InvalidSchema {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let compiled = Arc::new(compiled);
        self.cache
            .lock()
            .expect("schema cache poisoned")
            .insert(url.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }
}

impl Default for RemoteSchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RemoteSchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self.cache.lock().map(|c| c.len()).unwrap_or(0);
        f.debug_struct("RemoteSchemaValidator")
            .field("cached_schemas", &cached)
            .finish()
    }
}

#[async_trait]
impl SchemaValidator for RemoteSchemaValidator {
    async fn validate(&self, document: &Value, schema_url: &str) -> Result<(), ValidationError> {
        let compiled = self.compiled(schema_url).await?;

        let violations: Vec<String> = match compiled.validate(document) {
            Ok(()) => return Ok(()),
            Err(errors) => errors
                .map(|e| format!("{}: {e}", e.instance_path))
                .collect(),
        };

        Err(ValidationError::Rejected {
            url: schema_url.to_string(),
            violations,
        })
    }
}
