//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use std::fmt;

use crate::error::ConfigError;

/// A validated API base URL.
///
/// This newtype ensures the URL is an absolute http(s) URL and provides
/// type safety to prevent accidental misuse of raw strings. A trailing
/// slash is stripped so joined paths never produce double slashes.
///
/// # Example
///
/// ```rust
/// use hal_client::ApiUrl;
///
/// let url = ApiUrl::new("https://api.example.com/rest/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.example.com/rest");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiUrl(String);

impl ApiUrl {
    /// Creates a new validated API URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] if the value is not an
    /// absolute http(s) URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let parsed = reqwest::Url::parse(&url).map_err(|_| ConfigError::InvalidApiUrl {
            url: url.clone(),
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidApiUrl { url });
        }
        if parsed.host_str().is_none() {
            return Err(ConfigError::InvalidApiUrl { url });
        }

        Ok(Self(url.trim_end_matches('/').to_string()))
    }
}

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated bearer access token.
///
/// This newtype ensures the token is non-empty and masks its value in
/// debug output to prevent accidental exposure in logs.
///
/// # Security
///
/// The `Debug` implementation masks the token value, displaying only
/// `AccessToken(*****)` instead of the actual token.
///
/// # Example
///
/// ```rust
/// use hal_client::AccessToken;
///
/// let token = AccessToken::new("my-token").unwrap();
/// assert_eq!(token.as_ref(), "my-token");
/// assert_eq!(format!("{:?}", token), "AccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_accepts_https() {
        let url = ApiUrl::new("https://api.example.com/rest").unwrap();
        assert_eq!(url.as_ref(), "https://api.example.com/rest");
    }

    #[test]
    fn test_api_url_strips_trailing_slash() {
        let url = ApiUrl::new("https://api.example.com/rest/").unwrap();
        assert_eq!(url.as_ref(), "https://api.example.com/rest");
    }

    #[test]
    fn test_api_url_rejects_relative() {
        assert!(matches!(
            ApiUrl::new("/rest"),
            Err(ConfigError::InvalidApiUrl { .. })
        ));
    }

    #[test]
    fn test_api_url_rejects_non_http_scheme() {
        assert!(matches!(
            ApiUrl::new("ftp://api.example.com"),
            Err(ConfigError::InvalidApiUrl { .. })
        ));
    }

    #[test]
    fn test_api_url_rejects_garbage() {
        assert!(ApiUrl::new("not a url").is_err());
        assert!(ApiUrl::new("").is_err());
    }

    #[test]
    fn test_access_token_rejects_empty() {
        assert!(matches!(
            AccessToken::new(""),
            Err(ConfigError::EmptyAccessToken)
        ));
    }

    #[test]
    fn test_access_token_debug_is_masked() {
        let token = AccessToken::new("super-secret").unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains("super-secret"));
        assert_eq!(debug, "AccessToken(*****)");
    }
}
