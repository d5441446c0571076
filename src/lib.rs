//! # HAL Client
//!
//! A Rust client framework for HAL hypermedia REST APIs: typed
//! resources over hypermedia documents, local mutation tracking,
//! schema-validated persistence, and paginated collection traversal
//! with retrying bulk operations.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`Config`] and [`ConfigBuilder`]
//! - Validated newtypes for the API URL and bearer token
//! - An async HTTP transport speaking `application/hal+json`
//! - [`hal::Resource`]: one hypermedia entity with dirty tracking,
//!   link traversal, and `resolve`/`save`/`delete`
//! - [`hal::ListResource`]: paginated collections with
//!   `map`/`filter`/`find` bulk operations and bounded
//!   exponential-backoff retry
//! - A pluggable JSON Schema validation capability consulted before
//!   every save
//!
//! ## Quick Start
//!
//! ```rust
//! use hal_client::{Config, ApiUrl, AccessToken};
//!
//! // Create configuration using the builder pattern
//! let config = Config::builder()
//!     .api_url(ApiUrl::new("https://api.example.com/rest").unwrap())
//!     .access_token(AccessToken::new("your-token").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Navigating an API
//!
//! ```rust,ignore
//! use hal_client::hal::Environment;
//!
//! let env = Environment::from_config(&config);
//!
//! // Fetch the entry point and follow relations from there
//! let root = env.entry_point().await?;
//! let products = root.follow_list_link("ec:products", None).await?;
//!
//! // Walk the whole collection, page by page
//! let names = products
//!     .map(|p| async move { Ok(p.get_property("name")?.cloned()) }, false)
//!     .await?;
//! ```
//!
//! ## Mutating an Entity
//!
//! ```rust,ignore
//! use serde_json::json;
//!
//! let mut product = products.first_item()?;
//! product.resolve().await?; // upgrade the embedded stub to its full form
//!
//! product.set_property("name", json!("Hoodie, red"))?;
//! assert!(product.is_dirty());
//!
//! // Validated against the entity's schema before the PUT
//! product.save(None).await?;
//! assert!(!product.is_dirty());
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration and capabilities are
//!   instance-based and passed explicitly
//! - **Fail-fast validation**: newtypes and arguments validate on
//!   construction, before any network call
//! - **Sequential by design**: collection walks never process items or
//!   pages concurrently, so observable side-effect order matches
//!   document order even while the remote collection changes
//! - **Errors stay transparent**: remote failures propagate with their
//!   original status and message, unwrapped

pub mod clients;
pub mod config;
pub mod error;
pub mod hal;
pub mod schema;

// Re-export public types at crate root for convenience
pub use config::{AccessToken, ApiUrl, Config, ConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP transport types
pub use clients::{HttpClient, HttpError, HttpResponse, Problem, Traversal};

// Re-export core resource types
pub use hal::{
    Environment, ListResource, Resource, ResourceError, ResourceFactory, RetryPolicy,
};
