//! Parsed hypermedia document structure.
//!
//! A HAL document carries plain JSON properties plus two reserved keys:
//! `_links` (relation name to one or many link objects) and `_embedded`
//! (relation name to one or many nested documents). This module parses
//! those reserved keys once, at construction time, into the explicit
//! value types [`LinkTable`] and [`EmbeddedTable`], so the rest of the
//! crate never reaches into the raw document for them.
//!
//! # Example
//!
//! ```rust
//! use hal_client::hal::LinkTable;
//! use serde_json::json;
//!
//! let links = LinkTable::from_value(Some(&json!({
//!     "self": { "href": "/products/42", "profile": "/schema/product" },
//!     "next": { "href": "/products?page=2" }
//! }))).unwrap();
//!
//! assert!(links.has("next"));
//! assert_eq!(links.get("self").unwrap().href, "/products/42");
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::hal::errors::ResourceError;

/// A single hypermedia link.
///
/// Fields follow the HAL link object: `href` is required, everything
/// else is optional metadata.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Link {
    /// The link target, absolute or relative to the document's URL.
    pub href: String,
    /// Whether `href` is a URI template requiring expansion.
    #[serde(default)]
    pub templated: bool,
    /// Media type hint for the target.
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    /// URL of the schema describing the target representation.
    #[serde(default)]
    pub profile: Option<String>,
    /// Human-readable label.
    #[serde(default)]
    pub title: Option<String>,
    /// Secondary key for distinguishing links sharing a relation.
    #[serde(default)]
    pub name: Option<String>,
    /// Deprecation notice URL, if the link is deprecated.
    #[serde(default)]
    pub deprecation: Option<String>,
}

/// Lookup table of a document's links, keyed by relation name.
///
/// Each relation maps to one or more links; the single-object and array
/// forms of `_links` entries are both accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkTable {
    links: BTreeMap<String, Vec<Link>>,
}

impl LinkTable {
    /// Parses a `_links` value into a table.
    ///
    /// `None` (no `_links` key) yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] if `_links` is not an
    /// object or an entry is not a valid link object.
    pub fn from_value(value: Option<&Value>) -> Result<Self, ResourceError> {
        let Some(value) = value else {
            return Ok(Self::default());
        };

        let Value::Object(map) = value else {
            return Err(ResourceError::InvalidArgument {
                reason: "'_links' must be an object".to_string(),
            });
        };

        let mut links = BTreeMap::new();
        for (rel, entry) in map {
            links.insert(rel.clone(), parse_one_or_many(rel, entry)?);
        }
        Ok(Self { links })
    }

    /// Returns `true` if a link with the given relation exists.
    #[must_use]
    pub fn has(&self, rel: &str) -> bool {
        self.links.contains_key(rel)
    }

    /// Returns the first link for the relation, if any.
    #[must_use]
    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.links.get(rel).and_then(|links| links.first())
    }

    /// Returns all links for the relation (empty when absent).
    #[must_use]
    pub fn get_all(&self, rel: &str) -> &[Link] {
        self.links.get(rel).map_or(&[], Vec::as_slice)
    }

    /// Iterates over all relations and their links.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Link])> {
        self.links
            .iter()
            .map(|(rel, links)| (rel.as_str(), links.as_slice()))
    }

    /// Returns the number of distinct relations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the document carried no links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Parses a `_links` entry that may be a single link object or an array.
fn parse_one_or_many(rel: &str, entry: &Value) -> Result<Vec<Link>, ResourceError> {
    let parse = |value: &Value| {
        Link::deserialize(value).map_err(|e| ResourceError::InvalidArgument {
            reason: format!("invalid link for relation '{rel}': {e}"),
        })
    };

    match entry {
        Value::Array(entries) => entries.iter().map(parse).collect(),
        other => Ok(vec![parse(other)?]),
    }
}

/// Lookup table of a document's embedded sub-documents, keyed by relation.
///
/// Like links, embedded entries accept both the single-document and
/// array forms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmbeddedTable {
    embedded: BTreeMap<String, Vec<Value>>,
    // First relation seen when parsing, for relation inference.
    first: Option<String>,
}

impl EmbeddedTable {
    /// Parses an `_embedded` value into a table.
    ///
    /// `None` (no `_embedded` key) yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] if `_embedded` is not
    /// an object.
    pub fn from_value(value: Option<&Value>) -> Result<Self, ResourceError> {
        let Some(value) = value else {
            return Ok(Self::default());
        };

        let Value::Object(map) = value else {
            return Err(ResourceError::InvalidArgument {
                reason: "'_embedded' must be an object".to_string(),
            });
        };

        let mut embedded = BTreeMap::new();
        for (rel, entry) in map {
            let docs = match entry {
                Value::Array(entries) => entries.clone(),
                other => vec![other.clone()],
            };
            embedded.insert(rel.clone(), docs);
        }

        Ok(Self {
            first: map.keys().next().cloned(),
            embedded,
        })
    }

    /// Returns `true` if sub-documents with the given relation exist.
    #[must_use]
    pub fn has(&self, rel: &str) -> bool {
        self.embedded.contains_key(rel)
    }

    /// Returns the sub-documents for the relation (empty when absent).
    #[must_use]
    pub fn get(&self, rel: &str) -> &[Value] {
        self.embedded.get(rel).map_or(&[], Vec::as_slice)
    }

    /// Returns the first embedded relation, if any.
    ///
    /// Used to infer the item relation of a collection when the caller
    /// does not name one.
    #[must_use]
    pub fn first_rel(&self) -> Option<&str> {
        self.first.as_deref()
    }

    /// Returns `true` if the document carried no embedded sub-documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.embedded.is_empty()
    }
}

/// A document split into properties, links, and embedded sub-documents.
#[derive(Clone, Debug)]
pub(crate) struct DocumentParts {
    pub properties: Map<String, Value>,
    pub links: LinkTable,
    pub embedded: EmbeddedTable,
}

/// Splits a raw document into its parts, consuming the reserved keys.
pub(crate) fn parse_document(document: Value) -> Result<DocumentParts, ResourceError> {
    let Value::Object(mut map) = document else {
        return Err(ResourceError::InvalidArgument {
            reason: "document must be a JSON object".to_string(),
        });
    };

    let links = LinkTable::from_value(map.remove("_links").as_ref())?;
    let embedded = EmbeddedTable::from_value(map.remove("_embedded").as_ref())?;

    Ok(DocumentParts {
        properties: map,
        links,
        embedded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_table_single_and_array_forms() {
        let links = LinkTable::from_value(Some(&json!({
            "self": { "href": "/products/42" },
            "curies": [
                { "href": "/rels/{rel}", "name": "ec", "templated": true },
                { "href": "/rels2/{rel}", "name": "doc", "templated": true }
            ]
        })))
        .unwrap();

        assert_eq!(links.get_all("self").len(), 1);
        assert_eq!(links.get_all("curies").len(), 2);
        assert!(links.get("curies").unwrap().templated);
    }

    #[test]
    fn test_link_table_missing_links_key_is_empty() {
        let links = LinkTable::from_value(None).unwrap();
        assert!(links.is_empty());
        assert!(links.get("self").is_none());
        assert!(!links.has("self"));
    }

    #[test]
    fn test_link_table_rejects_non_object() {
        assert!(matches!(
            LinkTable::from_value(Some(&json!("nope"))),
            Err(ResourceError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_link_table_rejects_link_without_href() {
        let result = LinkTable::from_value(Some(&json!({
            "self": { "title": "no href here" }
        })));
        assert!(matches!(
            result,
            Err(ResourceError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_link_profile_and_title_parse() {
        let links = LinkTable::from_value(Some(&json!({
            "self": {
                "href": "/products/42",
                "profile": "/schema/product",
                "title": "Product 42"
            }
        })))
        .unwrap();

        let link = links.get("self").unwrap();
        assert_eq!(link.profile.as_deref(), Some("/schema/product"));
        assert_eq!(link.title.as_deref(), Some("Product 42"));
        assert!(!link.templated);
    }

    #[test]
    fn test_embedded_table_one_or_many() {
        let embedded = EmbeddedTable::from_value(Some(&json!({
            "items": [{ "id": 1 }, { "id": 2 }],
            "owner": { "id": 7 }
        })))
        .unwrap();

        assert_eq!(embedded.get("items").len(), 2);
        assert_eq!(embedded.get("owner").len(), 1);
        assert!(embedded.get("missing").is_empty());
    }

    #[test]
    fn test_embedded_first_rel_inference() {
        let embedded = EmbeddedTable::from_value(Some(&json!({
            "items": [{ "id": 1 }]
        })))
        .unwrap();
        assert_eq!(embedded.first_rel(), Some("items"));

        let empty = EmbeddedTable::from_value(None).unwrap();
        assert!(empty.first_rel().is_none());
    }

    #[test]
    fn test_parse_document_strips_reserved_keys() {
        let parts = parse_document(json!({
            "name": "hoodie",
            "price": 34.99,
            "_links": { "self": { "href": "/products/42" } },
            "_embedded": { "variants": [{ "sku": "h-1" }] }
        }))
        .unwrap();

        assert_eq!(parts.properties.len(), 2);
        assert!(parts.properties.get("_links").is_none());
        assert!(parts.properties.get("_embedded").is_none());
        assert!(parts.links.has("self"));
        assert_eq!(parts.embedded.get("variants").len(), 1);
    }

    #[test]
    fn test_parse_document_rejects_non_object() {
        assert!(matches!(
            parse_document(json!([1, 2, 3])),
            Err(ResourceError::InvalidArgument { .. })
        ));
    }
}
