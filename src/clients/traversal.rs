//! Request continuation state for hypermedia traversal.
//!
//! A [`Traversal`] captures the absolute URL a document was fetched from,
//! so that link hrefs found in that document can be resolved relative to
//! it for the next request.

use crate::clients::errors::InvalidHttpRequestError;

/// An opaque continuation token for issuing requests relative to a
/// previously fetched document.
///
/// Every transport call returns the `Traversal` of the document it
/// fetched; resolving a link `href` against that traversal produces the
/// traversal for the next request. Absolute hrefs replace the URL
/// entirely, absolute paths replace the path, and relative hrefs are
/// joined against the current URL.
///
/// # Example
///
/// ```rust
/// use hal_client::clients::Traversal;
///
/// let t = Traversal::new("https://api.example.com/rest/products").unwrap();
/// let next = t.resolve("/rest/products?page=2").unwrap();
/// assert_eq!(next.as_str(), "https://api.example.com/rest/products?page=2");
///
/// let absolute = t.resolve("https://other.example.com/x").unwrap();
/// assert_eq!(absolute.as_str(), "https://other.example.com/x");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Traversal {
    url: reqwest::Url,
}

impl Traversal {
    /// Creates a traversal from an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::InvalidUrl`] if `url` is not an
    /// absolute URL.
    pub fn new(url: &str) -> Result<Self, InvalidHttpRequestError> {
        let url = reqwest::Url::parse(url).map_err(|e| InvalidHttpRequestError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { url })
    }

    /// Resolves a link href against this traversal's URL.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::InvalidUrl`] if the href cannot
    /// be joined to the current URL.
    pub fn resolve(&self, href: &str) -> Result<Self, InvalidHttpRequestError> {
        let url = self
            .url
            .join(href)
            .map_err(|e| InvalidHttpRequestError::InvalidUrl {
                url: href.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { url })
    }

    /// Returns the absolute URL of this traversal.
    #[must_use]
    pub const fn url(&self) -> &reqwest::Url {
        &self.url
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl From<reqwest::Url> for Traversal {
    fn from(url: reqwest::Url) -> Self {
        Self { url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_relative_url() {
        assert!(matches!(
            Traversal::new("/rest/products"),
            Err(InvalidHttpRequestError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_resolve_relative_href() {
        let t = Traversal::new("https://api.example.com/rest/products/42").unwrap();
        let next = t.resolve("variants").unwrap();
        assert_eq!(next.as_str(), "https://api.example.com/rest/products/variants");
    }

    #[test]
    fn test_resolve_absolute_path() {
        let t = Traversal::new("https://api.example.com/rest/products/42").unwrap();
        let next = t.resolve("/rest/orders").unwrap();
        assert_eq!(next.as_str(), "https://api.example.com/rest/orders");
    }

    #[test]
    fn test_resolve_absolute_url_replaces_base() {
        let t = Traversal::new("https://api.example.com/rest").unwrap();
        let next = t.resolve("https://cdn.example.com/schema.json").unwrap();
        assert_eq!(next.as_str(), "https://cdn.example.com/schema.json");
    }

    #[test]
    fn test_resolve_keeps_query() {
        let t = Traversal::new("https://api.example.com/rest/items").unwrap();
        let next = t.resolve("/rest/items?page=2&size=20").unwrap();
        assert_eq!(next.as_str(), "https://api.example.com/rest/items?page=2&size=20");
    }
}
