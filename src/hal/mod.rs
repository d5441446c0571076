//! Hypermedia resource core.
//!
//! This module is the heart of the crate: it models API responses as
//! typed resources, tracks local mutation state, and walks paginated
//! collections with retrying bulk operations.
//!
//! # Overview
//!
//! - **[`LinkTable`] / [`EmbeddedTable`]**: a document's links and
//!   embedded sub-documents, parsed once at construction
//! - **[`Resource`]**: one hypermedia entity with property access,
//!   dirty tracking, link traversal, and `resolve`/`save`/`delete`
//! - **[`ListResource`]**: one page of a paginated collection with
//!   item materialization, page navigation, and the
//!   `map`/`filter`/`find` bulk operations
//! - **[`RetryPolicy`] / [`with_retry`]**: bounded exponential backoff
//!   for bulk operations
//! - **[`Environment`]**: the capability bundle (transport + schema
//!   validation) every resource operates in
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_client::{Config, ApiUrl};
//! use hal_client::hal::Environment;
//!
//! let config = Config::builder()
//!     .api_url(ApiUrl::new("https://api.example.com/rest").unwrap())
//!     .build()?;
//!
//! let env = Environment::from_config(&config);
//! let root = env.entry_point().await?;
//!
//! let products = root.follow_list_link("ec:products", None).await?;
//! let names = products
//!     .map(|p| async move { Ok(p.get_property("name")?.cloned()) }, false)
//!     .await?;
//! ```

mod document;
mod errors;
mod list;
mod pagination;
mod resource;
mod retry;

pub use document::{EmbeddedTable, Link, LinkTable};
pub use errors::ResourceError;
pub use list::{ListResource, ResourceFactory, FIRST_REL, NEXT_REL, PREV_REL};
pub use resource::{Resource, SELF_REL};
pub use retry::{is_transient, with_retry, RetryPolicy};

use std::sync::Arc;

use crate::clients::HttpClient;
use crate::config::Config;
use crate::schema::{RemoteSchemaValidator, SchemaValidator};

/// The capabilities a resource operates with: HTTP transport and schema
/// validation.
///
/// Cloning is cheap; all capability handles are shared. Custom
/// validators (e.g. preloaded schemas in tests) can be injected through
/// [`Environment::new`].
#[derive(Clone)]
pub struct Environment {
    client: Arc<HttpClient>,
    validator: Arc<dyn SchemaValidator>,
}

impl Environment {
    /// Bundles explicit capability handles.
    #[must_use]
    pub fn new(client: Arc<HttpClient>, validator: Arc<dyn SchemaValidator>) -> Self {
        Self { client, validator }
    }

    /// Builds the production capability set from a configuration:
    /// a [`HttpClient`] plus a [`RemoteSchemaValidator`].
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(HttpClient::new(config)),
            Arc::new(RemoteSchemaValidator::new()),
        )
    }

    /// Returns the HTTP transport.
    #[must_use]
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Returns the schema validator.
    #[must_use]
    pub fn validator(&self) -> &dyn SchemaValidator {
        self.validator.as_ref()
    }

    /// Fetches the API entry-point document and wraps it as the root
    /// resource, the usual first step of a hypermedia session.
    ///
    /// # Errors
    ///
    /// Propagates transport failures; returns
    /// [`ResourceError::InvalidArgument`] if the entry point is not a
    /// JSON object.
    pub async fn entry_point(&self) -> Result<Resource, ResourceError> {
        let root = self.client.root();
        let (document, traversal) = self.client.get(&root).await?;
        Resource::new(document, self.clone(), traversal)
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

// Verify Environment is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Environment>();
};
