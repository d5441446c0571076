//! Configuration types for the HAL client.
//!
//! This module provides the core configuration types used to initialize
//! the client for communication with a hypermedia API.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`Config`]: The main configuration struct holding all client settings
//! - [`ConfigBuilder`]: A builder for constructing [`Config`] instances
//! - [`ApiUrl`]: A validated API base URL newtype
//! - [`AccessToken`]: A validated bearer token newtype with masked debug output
//!
//! # Example
//!
//! ```rust
//! use hal_client::{Config, ApiUrl, AccessToken};
//!
//! let config = Config::builder()
//!     .api_url(ApiUrl::new("https://api.example.com/rest").unwrap())
//!     .access_token(AccessToken::new("my-token").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{AccessToken, ApiUrl};

use crate::error::ConfigError;

/// Configuration for the HAL client.
///
/// This struct holds all configuration needed for client operations: the
/// API entry-point URL, an optional bearer token, and an optional
/// User-Agent prefix.
///
/// # Thread Safety
///
/// `Config` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use hal_client::{Config, ApiUrl};
///
/// let config = Config::builder()
///     .api_url(ApiUrl::new("https://api.example.com/rest").unwrap())
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.api_url().as_ref(), "https://api.example.com/rest");
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    api_url: ApiUrl,
    access_token: Option<AccessToken>,
    user_agent_prefix: Option<String>,
}

impl Config {
    /// Creates a new builder for constructing a `Config`.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn api_url(&self) -> &ApiUrl {
        &self.api_url
    }

    /// Returns the access token, if configured.
    #[must_use]
    pub const fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify Config is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Config>();
};

/// Builder for constructing [`Config`] instances.
///
/// The only required field is `api_url`. All other fields default to unset.
///
/// # Example
///
/// ```rust
/// use hal_client::{Config, ApiUrl, AccessToken};
///
/// let config = Config::builder()
///     .api_url(ApiUrl::new("https://api.example.com/rest").unwrap())
///     .access_token(AccessToken::new("token").unwrap())
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    api_url: Option<ApiUrl>,
    access_token: Option<AccessToken>,
    user_agent_prefix: Option<String>,
}

impl ConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL (required).
    #[must_use]
    pub fn api_url(mut self, url: ApiUrl) -> Self {
        self.api_url = Some(url);
        self
    }

    /// Sets the bearer access token.
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets a prefix for the User-Agent header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_url` was not set.
    pub fn build(self) -> Result<Config, ConfigError> {
        let api_url = self
            .api_url
            .ok_or(ConfigError::MissingRequiredField { field: "api_url" })?;

        Ok(Config {
            api_url,
            access_token: self.access_token,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_url() -> ApiUrl {
        ApiUrl::new("https://api.example.com/rest").unwrap()
    }

    #[test]
    fn test_builder_with_required_fields_only() {
        let config = Config::builder().api_url(api_url()).build().unwrap();

        assert_eq!(config.api_url().as_ref(), "https://api.example.com/rest");
        assert!(config.access_token().is_none());
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_builder_missing_api_url_fails() {
        let result = Config::builder().build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_url" })
        ));
    }

    #[test]
    fn test_builder_with_all_fields() {
        let config = Config::builder()
            .api_url(api_url())
            .access_token(AccessToken::new("token").unwrap())
            .user_agent_prefix("MyApp/2.0")
            .build()
            .unwrap();

        assert_eq!(config.access_token().unwrap().as_ref(), "token");
        assert_eq!(config.user_agent_prefix(), Some("MyApp/2.0"));
    }

    #[test]
    fn test_config_is_cloneable() {
        let config = Config::builder().api_url(api_url()).build().unwrap();
        let cloned = config.clone();
        assert_eq!(cloned.api_url(), config.api_url());
    }
}
