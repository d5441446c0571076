//! Error types for resource operations.
//!
//! This module contains the error taxonomy for the hypermedia core,
//! covering argument validation, list construction, item access,
//! serialization guards, schema rejection, and remote failures.
//!
//! # Error Handling
//!
//! Argument and serialization errors are raised before any network call;
//! remote failures propagate as [`ResourceError::Http`] carrying the
//! original problem unchanged. The core adds no wrapping that would
//! obscure the root cause.
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_client::hal::ResourceError;
//!
//! match list.item(7) {
//!     Ok(item) => println!("got {:?}", item.get_property("id")),
//!     Err(ResourceError::IndexOutOfBounds { index, count }) => {
//!         println!("index {index} out of range for {count} items");
//!     }
//!     Err(e) => println!("other error: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::{HttpError, InvalidHttpRequestError};
use crate::schema::ValidationError;

/// Error type for resource and collection operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A required argument was missing or empty.
    #[error("Missing required argument '{name}'.")]
    MissingArgument {
        /// The name of the missing argument.
        name: &'static str,
    },

    /// An argument had the wrong shape.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Why the argument was rejected.
        reason: String,
    },

    /// A document without list markers was used as a collection.
    #[error("Document is not a list: {reason}")]
    NotAList {
        /// Why the document was rejected.
        reason: String,
    },

    /// Out-of-range or empty-page item access.
    #[error("Item index {index} out of bounds for page with {count} items")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The number of items on the page.
        count: usize,
    },

    /// Serialization found a property not present at construction time.
    ///
    /// Guards against silently persisting keys the server never handed
    /// out, which would be dropped or rejected on write.
    #[error("Unexpected property '{name}' was not present at construction time")]
    UnexpectedProperty {
        /// The offending property name.
        name: String,
    },

    /// No link with the requested relation exists on this document.
    #[error("No link with relation '{rel}'")]
    LinkNotFound {
        /// The requested relation.
        rel: String,
    },

    /// The document was rejected by its schema before the write.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A transport-layer failure.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ResourceError {
    /// Returns the HTTP status associated with this error, if any.
    ///
    /// Only remote failures carry a status; it decides retry
    /// eligibility for bulk operations.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

impl From<InvalidHttpRequestError> for ResourceError {
    fn from(error: InvalidHttpRequestError) -> Self {
        Self::Http(HttpError::InvalidRequest(error))
    }
}

impl From<crate::clients::Problem> for ResourceError {
    fn from(problem: crate::clients::Problem) -> Self {
        Self::Http(HttpError::Problem(problem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::Problem;

    #[test]
    fn test_status_for_remote_problem() {
        let error = ResourceError::from(Problem {
            status: 503,
            title: "Service Unavailable".to_string(),
            detail: None,
            request_id: None,
        });
        assert_eq!(error.status(), Some(503));
    }

    #[test]
    fn test_status_absent_for_local_errors() {
        let error = ResourceError::MissingArgument { name: "name" };
        assert_eq!(error.status(), None);

        let error = ResourceError::IndexOutOfBounds { index: 3, count: 2 };
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_index_out_of_bounds_message() {
        let error = ResourceError::IndexOutOfBounds { index: 5, count: 2 };
        let message = error.to_string();
        assert!(message.contains('5'));
        assert!(message.contains('2'));
    }

    #[test]
    fn test_unexpected_property_message() {
        let error = ResourceError::UnexpectedProperty {
            name: "bogus".to_string(),
        };
        assert!(error.to_string().contains("bogus"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ResourceError::LinkNotFound {
            rel: "next".to_string(),
        };
        let _: &dyn std::error::Error = &error;
    }
}
