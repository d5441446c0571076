//! Hypermedia resource with mutation tracking and link navigation.
//!
//! A [`Resource`] wraps one HAL document: its plain properties, its
//! link table, and its embedded sub-documents. The wrapper tracks local
//! mutations against the snapshot taken at load time, navigates to
//! related documents through link relations, and persists changes with
//! schema-validated PUT requests.
//!
//! # Dirty Tracking
//!
//! A resource is clean immediately after construction, after
//! [`Resource::resolve`], and after a successful [`Resource::save`].
//! Any [`Resource::set_property`] or [`Resource::set`] call marks it
//! dirty; [`Resource::reset`] restores the load-time snapshot without a
//! network call.
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_client::hal::Resource;
//! use serde_json::json;
//!
//! let mut product = root.follow_link("ec:product").await?;
//! product.set_property("name", json!("Hoodie, red"))?;
//! assert!(product.is_dirty());
//!
//! product.save(None).await?;
//! assert!(!product.is_dirty());
//! ```

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::clients::Traversal;
use crate::hal::document::{parse_document, EmbeddedTable, Link, LinkTable};
use crate::hal::errors::ResourceError;
use crate::hal::list::{ListResource, ResourceFactory};
use crate::hal::Environment;

/// The relation every persistent entity links to itself with.
pub const SELF_REL: &str = "self";

/// A single hypermedia entity with mutation tracking and link-based
/// navigation.
///
/// Cheap to clone; cloning copies the document snapshots and shares the
/// underlying transport. A resource is not meant to be shared across
/// logical operations while dirty; `resolve` and `reset` overwrite the
/// working state unconditionally.
#[derive(Clone, Debug)]
pub struct Resource {
    env: Environment,
    traversal: Traversal,
    current: Map<String, Value>,
    original: Map<String, Value>,
    links: LinkTable,
    embedded: EmbeddedTable,
    /// Property keys fixed at construction time; [`Resource::to_original`]
    /// refuses to serialize anything outside this set.
    declared: BTreeSet<String>,
    dirty: bool,
    schema_url: Option<String>,
}

impl Resource {
    /// Wraps a fetched document.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] if the document is not
    /// a JSON object or carries malformed `_links`/`_embedded` entries.
    pub fn new(
        document: Value,
        env: Environment,
        traversal: Traversal,
    ) -> Result<Self, ResourceError> {
        Self::with_schema(document, env, traversal, None)
    }

    /// Wraps a fetched document with an explicit schema URL.
    ///
    /// The schema URL overrides the `self` link's `profile` when the
    /// resource is saved.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] if the document is not
    /// a JSON object or carries malformed `_links`/`_embedded` entries.
    pub fn with_schema(
        document: Value,
        env: Environment,
        traversal: Traversal,
        schema_url: Option<String>,
    ) -> Result<Self, ResourceError> {
        let parts = parse_document(document)?;
        let declared = parts.properties.keys().cloned().collect();

        Ok(Self {
            env,
            traversal,
            original: parts.properties.clone(),
            current: parts.properties,
            links: parts.links,
            embedded: parts.embedded,
            declared,
            dirty: false,
            schema_url,
        })
    }

    /// Returns `true` if the resource has local changes that were not
    /// saved.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the continuation for requests relative to this document.
    #[must_use]
    pub const fn traversal(&self) -> &Traversal {
        &self.traversal
    }

    /// Returns the environment this resource operates in.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.env
    }

    /// Returns the schema URL override, if one was set.
    #[must_use]
    pub fn schema_url(&self) -> Option<&str> {
        self.schema_url.as_deref()
    }

    /// Returns a property value.
    ///
    /// Absent properties yield `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingArgument`] if `name` is empty.
    pub fn get_property(&self, name: &str) -> Result<Option<&Value>, ResourceError> {
        if name.is_empty() {
            return Err(ResourceError::MissingArgument { name: "name" });
        }
        Ok(self.current.get(name))
    }

    /// Sets a property value and marks the resource dirty.
    ///
    /// Returns `&mut Self` so calls can be chained.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingArgument`] if `name` is empty.
    pub fn set_property(&mut self, name: &str, value: Value) -> Result<&mut Self, ResourceError> {
        if name.is_empty() {
            return Err(ResourceError::MissingArgument { name: "name" });
        }
        self.current.insert(name.to_string(), value);
        self.dirty = true;
        Ok(self)
    }

    /// Bulk-assigns properties from a document and marks the resource
    /// dirty.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] if `document` is not a
    /// JSON object.
    pub fn set(&mut self, document: Value) -> Result<&mut Self, ResourceError> {
        let Value::Object(map) = document else {
            return Err(ResourceError::InvalidArgument {
                reason: "set() requires a JSON object".to_string(),
            });
        };
        for (key, value) in map {
            self.current.insert(key, value);
        }
        self.dirty = true;
        Ok(self)
    }

    /// Bulk-reads properties.
    ///
    /// With `names` omitted, returns the full current snapshot. With
    /// `names` given, returns a table of exactly the requested keys;
    /// absent properties map to JSON null.
    #[must_use]
    pub fn get_all(&self, names: Option<&[&str]>) -> Map<String, Value> {
        names.map_or_else(
            || self.current.clone(),
            |names| {
                names
                    .iter()
                    .map(|&name| {
                        let value = self.current.get(name).cloned().unwrap_or(Value::Null);
                        (name.to_string(), value)
                    })
                    .collect()
            },
        )
    }

    /// Returns `true` if a link with the given relation exists.
    #[must_use]
    pub fn has_link(&self, rel: &str) -> bool {
        self.links.has(rel)
    }

    /// Returns the first link for the relation, or `None` when absent.
    #[must_use]
    pub fn get_link(&self, rel: &str) -> Option<&Link> {
        self.links.get(rel)
    }

    /// Returns all links for the relation (empty when absent).
    #[must_use]
    pub fn get_links(&self, rel: &str) -> &[Link] {
        self.links.get_all(rel)
    }

    /// Returns the full link table.
    #[must_use]
    pub const fn all_links(&self) -> &LinkTable {
        &self.links
    }

    /// Returns the table of embedded sub-documents.
    #[must_use]
    pub const fn embedded(&self) -> &EmbeddedTable {
        &self.embedded
    }

    /// Follows a link relation and wraps the target document.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::LinkNotFound`] when the relation is
    /// absent, [`ResourceError::InvalidArgument`] for templated links,
    /// and propagates transport failures unchanged.
    pub async fn follow_link(&self, rel: &str) -> Result<Self, ResourceError> {
        self.follow_link_with(rel, None).await
    }

    /// Follows a link relation, attaching a schema URL to the result.
    ///
    /// # Errors
    ///
    /// Same as [`Resource::follow_link`].
    pub async fn follow_link_with(
        &self,
        rel: &str,
        schema_url: Option<&str>,
    ) -> Result<Self, ResourceError> {
        let (document, traversal) = self.fetch_rel(rel).await?;
        Self::with_schema(
            document,
            self.env.clone(),
            traversal,
            schema_url.map(ToString::to_string),
        )
    }

    /// Follows a link relation and wraps the target as a paginated
    /// collection.
    ///
    /// `item_rel` names the embedded relation holding the collection's
    /// items; when `None` it is inferred from the target document.
    ///
    /// # Errors
    ///
    /// Same as [`Resource::follow_link`], plus
    /// [`ResourceError::NotAList`] when the target lacks list markers.
    pub async fn follow_list_link(
        &self,
        rel: &str,
        item_rel: Option<&str>,
    ) -> Result<ListResource, ResourceError> {
        let (document, traversal) = self.fetch_rel(rel).await?;
        ListResource::new(
            document,
            self.env.clone(),
            traversal,
            item_rel.map(ToString::to_string),
            ResourceFactory::DEFAULT,
        )
    }

    /// Resolves the link for `rel` and fetches its target.
    pub(crate) async fn fetch_rel(
        &self,
        rel: &str,
    ) -> Result<(Value, Traversal), ResourceError> {
        if rel.is_empty() {
            return Err(ResourceError::MissingArgument { name: "rel" });
        }
        let link = self
            .links
            .get(rel)
            .ok_or_else(|| ResourceError::LinkNotFound {
                rel: rel.to_string(),
            })?;
        if link.templated {
            return Err(ResourceError::InvalidArgument {
                reason: format!("link '{rel}' is templated and requires expansion"),
            });
        }
        let target = self.traversal.resolve(&link.href)?;
        Ok(self.env.client().get(&target).await?)
    }

    /// Re-fetches the entity through its own `self` link and replaces
    /// the local state with the server's representation.
    ///
    /// Used to upgrade an entity that was only partially known, e.g.
    /// one materialized from an embedded sub-document. Clears the dirty
    /// flag.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::LinkNotFound`] when the document has no
    /// `self` link; transport failures propagate unchanged.
    pub async fn resolve(&mut self) -> Result<&mut Self, ResourceError> {
        let target = self.self_target()?;
        let (document, traversal) = self.env.client().get(&target).await?;
        self.apply(document, traversal)?;
        Ok(self)
    }

    /// Restores the load-time snapshot without a network call and clears
    /// the dirty flag.
    pub fn reset(&mut self) -> &mut Self {
        self.current = self.original.clone();
        self.dirty = false;
        self
    }

    /// Persists the resource with a schema-validated PUT to its `self`
    /// link.
    ///
    /// The payload is [`Resource::to_original`]. It is validated against
    /// the schema named by `schema_override`, the stored schema URL, or
    /// the `self` link's `profile`, in that order of precedence, before
    /// any network write; when none of the three names a schema, the
    /// write proceeds unvalidated. On success the local state is
    /// replaced with the server's response and the dirty flag cleared.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedProperty`] or
    /// [`ResourceError::Validation`] before any request is made;
    /// transport failures propagate unchanged.
    pub async fn save(
        &mut self,
        schema_override: Option<&str>,
    ) -> Result<&mut Self, ResourceError> {
        let body = self.to_original()?;

        let schema_url = match schema_override {
            Some(url) => Some(url.to_string()),
            None => self.schema_url.clone().or_else(|| {
                self.links
                    .get(SELF_REL)
                    .and_then(|link| link.profile.clone())
            }),
        };

        if let Some(url) = schema_url {
            let absolute = self.traversal.resolve(&url)?;
            self.env
                .validator()
                .validate(&body, absolute.as_str())
                .await?;
        }

        let target = self.self_target()?;
        let (document, traversal) = self.env.client().put(&target, &body).await?;
        self.apply(document, traversal)?;
        Ok(self)
    }

    /// Deletes the entity through its `self` link.
    ///
    /// Local state is left untouched; callers are expected to discard
    /// the resource afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::LinkNotFound`] when the document has no
    /// `self` link; transport failures propagate unchanged.
    pub async fn delete(&self) -> Result<(), ResourceError> {
        let target = self.self_target()?;
        Ok(self.env.client().delete(&target).await?)
    }

    /// Serializes the resource for persistence.
    ///
    /// Only the property keys present at construction time are written,
    /// each read through the current (possibly mutated) state.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedProperty`] if properties
    /// outside the construction-time key set were added, preventing
    /// accidental data loss on re-serialization.
    pub fn to_original(&self) -> Result<Value, ResourceError> {
        for key in self.current.keys() {
            if !self.declared.contains(key) {
                return Err(ResourceError::UnexpectedProperty { name: key.clone() });
            }
        }

        let mut out = Map::new();
        for key in &self.declared {
            if let Some(value) = self.current.get(key) {
                out.insert(key.clone(), value.clone());
            }
        }
        Ok(Value::Object(out))
    }

    /// Direct property access for sibling modules.
    pub(crate) fn property(&self, name: &str) -> Option<&Value> {
        self.current.get(name)
    }

    /// Resolves the traversal for this entity's `self` link.
    fn self_target(&self) -> Result<Traversal, ResourceError> {
        let link = self
            .links
            .get(SELF_REL)
            .ok_or_else(|| ResourceError::LinkNotFound {
                rel: SELF_REL.to_string(),
            })?;
        Ok(self.traversal.resolve(&link.href)?)
    }

    /// Replaces all local state with a freshly fetched document.
    fn apply(&mut self, document: Value, traversal: Traversal) -> Result<(), ResourceError> {
        let parts = parse_document(document)?;
        self.declared = parts.properties.keys().cloned().collect();
        self.original = parts.properties.clone();
        self.current = parts.properties;
        self.links = parts.links;
        self.embedded = parts.embedded;
        self.traversal = traversal;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiUrl, Config};
    use serde_json::json;

    fn test_env() -> Environment {
        let config = Config::builder()
            .api_url(ApiUrl::new("https://api.example.com/rest").unwrap())
            .build()
            .unwrap();
        Environment::from_config(&config)
    }

    fn test_resource(document: Value) -> Resource {
        let env = test_env();
        let traversal = Traversal::new("https://api.example.com/rest/products/42").unwrap();
        Resource::new(document, env, traversal).unwrap()
    }

    fn product() -> Resource {
        test_resource(json!({
            "name": "Hoodie",
            "price": 34.99,
            "_links": {
                "self": { "href": "/rest/products/42", "profile": "/rest/schema/product" },
                "ec:variants": { "href": "/rest/products/42/variants" }
            }
        }))
    }

    #[test]
    fn test_construction_rejects_non_object() {
        let env = test_env();
        let traversal = Traversal::new("https://api.example.com/rest").unwrap();
        assert!(matches!(
            Resource::new(json!(42), env, traversal),
            Err(ResourceError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_clean_after_construction() {
        assert!(!product().is_dirty());
    }

    #[test]
    fn test_set_property_marks_dirty() {
        let mut resource = product();
        resource.set_property("name", json!("Hoodie, red")).unwrap();
        assert!(resource.is_dirty());
        assert_eq!(
            resource.get_property("name").unwrap(),
            Some(&json!("Hoodie, red"))
        );
    }

    #[test]
    fn test_set_property_chains() {
        let mut resource = product();
        resource
            .set_property("name", json!("A"))
            .unwrap()
            .set_property("price", json!(10.0))
            .unwrap();
        assert_eq!(resource.get_property("price").unwrap(), Some(&json!(10.0)));
    }

    #[test]
    fn test_get_property_rejects_empty_name() {
        let resource = product();
        assert!(matches!(
            resource.get_property(""),
            Err(ResourceError::MissingArgument { name: "name" })
        ));
    }

    #[test]
    fn test_get_property_absent_is_none() {
        let resource = product();
        assert_eq!(resource.get_property("nope").unwrap(), None);
    }

    #[test]
    fn test_set_rejects_non_object() {
        let mut resource = product();
        assert!(matches!(
            resource.set(json!([1, 2])),
            Err(ResourceError::InvalidArgument { .. })
        ));
        assert!(!resource.is_dirty());
    }

    #[test]
    fn test_set_bulk_assigns_and_marks_dirty() {
        let mut resource = product();
        resource
            .set(json!({"name": "Cap", "price": 9.99}))
            .unwrap();
        assert!(resource.is_dirty());
        assert_eq!(resource.get_property("name").unwrap(), Some(&json!("Cap")));
    }

    #[test]
    fn test_reset_restores_construction_snapshot() {
        let mut resource = product();
        let before = resource.get_all(None);

        resource.set(json!({"name": "Cap", "price": 1.0})).unwrap();
        resource.reset();

        assert!(!resource.is_dirty());
        assert_eq!(resource.get_all(None), before);
    }

    #[test]
    fn test_get_all_with_names_returns_exactly_requested_keys() {
        let resource = product();
        let table = resource.get_all(Some(&["name", "missing"]));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("name"), Some(&json!("Hoodie")));
        assert_eq!(table.get("missing"), Some(&Value::Null));
    }

    #[test]
    fn test_link_queries() {
        let resource = product();
        assert!(resource.has_link("ec:variants"));
        assert!(!resource.has_link("nope"));
        assert!(resource.get_link("nope").is_none());
        assert_eq!(resource.get_links("self").len(), 1);
        assert_eq!(resource.all_links().len(), 2);
    }

    #[test]
    fn test_to_original_serializes_declared_keys_through_current() {
        let mut resource = product();
        resource.set_property("name", json!("Changed")).unwrap();

        let original = resource.to_original().unwrap();
        assert_eq!(original, json!({"name": "Changed", "price": 34.99}));
    }

    #[test]
    fn test_to_original_rejects_foreign_keys() {
        let mut resource = product();
        resource.set_property("sneaky", json!(true)).unwrap();

        assert!(matches!(
            resource.to_original(),
            Err(ResourceError::UnexpectedProperty { name }) if name == "sneaky"
        ));
    }

    #[test]
    fn test_to_original_excludes_reserved_keys() {
        let resource = product();
        let original = resource.to_original().unwrap();
        assert!(original.get("_links").is_none());
        assert!(original.get("_embedded").is_none());
    }

    #[test]
    fn test_resource_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Resource>();
    }
}
