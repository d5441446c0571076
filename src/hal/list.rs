//! Paginated collection resources.
//!
//! A [`ListResource`] is one page of a paginated collection: a
//! [`Resource`] whose document carries `count`/`total` markers, embedded
//! item documents under an item relation, and pagination links
//! (`first`, `next`, `prev`). On top of page navigation it exposes the
//! bulk iteration operations `map`, `filter`, and `find`, which walk
//! the whole collection page by page.
//!
//! # Item Identity
//!
//! Items are materialized lazily from the embedded documents on every
//! access. There is no identity caching, so two calls to
//! [`ListResource::items`] return distinct wrappers. Callers that need
//! stable identity must key by an id property of the item itself, not
//! by wrapper identity.
//!
//! # Example
//!
//! ```rust,ignore
//! let products = root.follow_list_link("ec:products", None).await?;
//!
//! let names = products
//!     .map(|item| async move {
//!         Ok(item.get_property("name")?.cloned())
//!     }, false)
//!     .await?;
//! ```

use std::future::Future;
use std::ops::{Deref, DerefMut};

use serde_json::Value;

use crate::clients::Traversal;
use crate::hal::errors::ResourceError;
use crate::hal::pagination::PaginationIterator;
use crate::hal::resource::Resource;
use crate::hal::retry::RetryPolicy;
use crate::hal::Environment;

/// Relation of the collection's first page.
pub const FIRST_REL: &str = "first";
/// Relation of the following page.
pub const NEXT_REL: &str = "next";
/// Relation of the preceding page.
pub const PREV_REL: &str = "prev";

/// Constructors for materializing typed items and pages.
///
/// Typed layers supply their own functions here to customize how item
/// and page documents are wrapped, without the core knowing their
/// types. The default wraps items as plain [`Resource`]s and pages as
/// plain [`ListResource`]s.
#[derive(Clone, Copy, Debug)]
pub struct ResourceFactory {
    /// Wraps one embedded item document.
    pub item: fn(Value, Environment, Traversal) -> Result<Resource, ResourceError>,
    /// Wraps one fetched page document.
    pub list: fn(Value, Environment, Traversal, Option<String>) -> Result<ListResource, ResourceError>,
}

impl ResourceFactory {
    /// The untyped default factory.
    pub const DEFAULT: Self = Self {
        item: Resource::new,
        list: default_list,
    };
}

impl Default for ResourceFactory {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn default_list(
    document: Value,
    env: Environment,
    traversal: Traversal,
    item_rel: Option<String>,
) -> Result<ListResource, ResourceError> {
    ListResource::new(document, env, traversal, item_rel, ResourceFactory::DEFAULT)
}

/// One page of a paginated collection.
///
/// Derefs to [`Resource`], so all single-entity operations (property
/// access, link queries, `resolve`, …) are available on a page too.
#[derive(Clone, Debug)]
pub struct ListResource {
    resource: Resource,
    item_rel: String,
    count: Option<u64>,
    total: Option<u64>,
    cursor: usize,
    factory: ResourceFactory,
    retry_policy: RetryPolicy,
}

impl ListResource {
    /// Wraps a fetched collection page.
    ///
    /// `item_rel` names the embedded relation holding the page's items;
    /// when `None`, the first embedded relation is used.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotAList`] when the document carries
    /// neither a `count` nor a `total` property, or when no item
    /// relation is given and none can be inferred.
    pub fn new(
        document: Value,
        env: Environment,
        traversal: Traversal,
        item_rel: Option<String>,
        factory: ResourceFactory,
    ) -> Result<Self, ResourceError> {
        let resource = Resource::new(document, env, traversal)?;

        let count = resource.property("count").and_then(Value::as_u64);
        let total = resource.property("total").and_then(Value::as_u64);
        if count.is_none() && total.is_none() {
            return Err(ResourceError::NotAList {
                reason: "document carries neither 'count' nor 'total'".to_string(),
            });
        }

        let item_rel = item_rel
            .or_else(|| resource.embedded().first_rel().map(ToString::to_string))
            .ok_or_else(|| ResourceError::NotAList {
                reason: "no item relation given and none embedded to infer from".to_string(),
            })?;

        Ok(Self {
            resource,
            item_rel,
            count,
            total,
            cursor: 0,
            factory,
            retry_policy: RetryPolicy::default(),
        })
    }

    /// Replaces the retry policy used by bulk operations on this page
    /// and any pages navigated to from it.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the retry policy for bulk operations.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Number of items embedded in this page, if the document states it.
    #[must_use]
    pub const fn count(&self) -> Option<u64> {
        self.count
    }

    /// Number of items in the whole collection, if the document states it.
    #[must_use]
    pub const fn total(&self) -> Option<u64> {
        self.total
    }

    /// Returns the embedded relation holding this page's items.
    #[must_use]
    pub fn item_rel(&self) -> &str {
        &self.item_rel
    }

    /// The raw embedded item documents of this page, in document order.
    pub(crate) fn item_documents(&self) -> &[Value] {
        self.resource.embedded().get(&self.item_rel)
    }

    /// Materializes one item document through the factory.
    pub(crate) fn make_item(&self, document: Value) -> Result<Resource, ResourceError> {
        (self.factory.item)(
            document,
            self.resource.environment().clone(),
            self.resource.traversal().clone(),
        )
    }

    /// Materializes every item of this page.
    ///
    /// A new wrapper is constructed per item on every call; see the
    /// module docs on item identity.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] if an embedded item
    /// document is not an object.
    pub fn items(&self) -> Result<Vec<Resource>, ResourceError> {
        self.item_documents()
            .iter()
            .map(|doc| self.make_item(doc.clone()))
            .collect()
    }

    /// Materializes the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::IndexOutOfBounds`] for an empty page or
    /// an index past the page's items.
    pub fn item(&self, index: usize) -> Result<Resource, ResourceError> {
        let documents = self.item_documents();
        if index >= documents.len() {
            return Err(ResourceError::IndexOutOfBounds {
                index,
                count: documents.len(),
            });
        }
        self.make_item(documents[index].clone())
    }

    /// Materializes the first item of this page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::IndexOutOfBounds`] for an empty page.
    pub fn first_item(&self) -> Result<Resource, ResourceError> {
        self.item(0)
    }

    /// Sequentially consumes the current page's items.
    ///
    /// Returns `Ok(None)` once the page is exhausted and resets the
    /// internal cursor to the start, so the same page instance can be
    /// iterated again. Only this page's items are visited; use `map`,
    /// `filter`, or `find` to walk the whole collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] if an embedded item
    /// document is not an object.
    pub fn next_item(&mut self) -> Result<Option<Resource>, ResourceError> {
        let documents = self.item_documents();
        if self.cursor >= documents.len() {
            self.cursor = 0;
            return Ok(None);
        }
        let document = documents[self.cursor].clone();
        self.cursor += 1;
        self.make_item(document).map(Some)
    }

    /// Returns `true` if this page links to the collection's first page.
    #[must_use]
    pub fn has_first_link(&self) -> bool {
        self.resource.has_link(FIRST_REL)
    }

    /// Returns `true` if a following page exists.
    #[must_use]
    pub fn has_next_link(&self) -> bool {
        self.resource.has_link(NEXT_REL)
    }

    /// Returns `true` if a preceding page exists.
    #[must_use]
    pub fn has_prev_link(&self) -> bool {
        self.resource.has_link(PREV_REL)
    }

    /// Navigates to the collection's first page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::LinkNotFound`] when the relation is
    /// absent; transport failures propagate unchanged.
    pub async fn follow_first_link(&self) -> Result<Self, ResourceError> {
        self.follow_page(FIRST_REL).await
    }

    /// Navigates to the following page.
    ///
    /// # Errors
    ///
    /// Same as [`ListResource::follow_first_link`].
    pub async fn follow_next_link(&self) -> Result<Self, ResourceError> {
        self.follow_page(NEXT_REL).await
    }

    /// Navigates to the preceding page.
    ///
    /// # Errors
    ///
    /// Same as [`ListResource::follow_first_link`].
    pub async fn follow_prev_link(&self) -> Result<Self, ResourceError> {
        self.follow_page(PREV_REL).await
    }

    /// Fetches the page behind `rel` and wraps it through the factory,
    /// carrying this page's item relation and retry policy.
    async fn follow_page(&self, rel: &str) -> Result<Self, ResourceError> {
        let (document, traversal) = self.resource.fetch_rel(rel).await?;
        let page = (self.factory.list)(
            document,
            self.resource.environment().clone(),
            traversal,
            Some(self.item_rel.clone()),
        )?;
        Ok(page.with_retry_policy(self.retry_policy))
    }

    /// Applies `iterator` to every item of the whole collection, page
    /// by page, and collects the results in item order.
    ///
    /// Items are processed strictly sequentially, never concurrently;
    /// page N is fully processed before page N+1 is fetched. With
    /// `retry` set, each failing iterator call is retried per this
    /// page's [`RetryPolicy`] when the failure is transient (status
    /// 500 or above); without it, the per-page fetch is retried instead. The two
    /// retry layers are mutually exclusive so backoff delays never
    /// compound.
    ///
    /// # Errors
    ///
    /// Propagates the first unretryable (or budget-exhausting) failure
    /// and abandons remaining items and pages.
    pub async fn map<T, F, Fut>(&self, iterator: F, retry: bool) -> Result<Vec<T>, ResourceError>
    where
        F: FnMut(Resource) -> Fut,
        Fut: Future<Output = Result<T, ResourceError>>,
    {
        PaginationIterator::new(self.clone(), retry).map(iterator).await
    }

    /// Collects every item of the whole collection for which
    /// `predicate` returns `true`, in item order.
    ///
    /// Retry semantics match [`ListResource::map`].
    ///
    /// # Errors
    ///
    /// Propagates the first unretryable failure.
    pub async fn filter<F, Fut>(
        &self,
        predicate: F,
        retry: bool,
    ) -> Result<Vec<Resource>, ResourceError>
    where
        F: FnMut(Resource) -> Fut,
        Fut: Future<Output = Result<bool, ResourceError>>,
    {
        PaginationIterator::new(self.clone(), retry)
            .filter(predicate)
            .await
    }

    /// Returns the first item of the collection for which `predicate`
    /// returns `true`, skipping all remaining items and pages once a
    /// match is found.
    ///
    /// Retry semantics match [`ListResource::map`].
    ///
    /// # Errors
    ///
    /// Propagates the first unretryable failure.
    pub async fn find<F, Fut>(
        &self,
        predicate: F,
        retry: bool,
    ) -> Result<Option<Resource>, ResourceError>
    where
        F: FnMut(Resource) -> Fut,
        Fut: Future<Output = Result<bool, ResourceError>>,
    {
        PaginationIterator::new(self.clone(), retry)
            .find(predicate)
            .await
    }
}

/// Provides single-entity operations on a page.
impl Deref for ListResource {
    type Target = Resource;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}

impl DerefMut for ListResource {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.resource
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

    fn list(document: Value) -> Result<ListResource, ResourceError> {
        let traversal = Traversal::new("https://api.example.com/rest/products").unwrap();
        ListResource::new(document, test_env(), traversal, None, ResourceFactory::DEFAULT)
    }

    fn page() -> ListResource {
        list(json!({
            "count": 2,
            "total": 4,
            "_embedded": {
                "items": [{ "id": 1 }, { "id": 2 }]
            },
            "_links": {
                "self": { "href": "/rest/products" },
                "next": { "href": "/rest/products?page=2" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_construction_fails_without_count_and_total() {
        let result = list(json!({
            "_embedded": { "items": [{ "id": 1 }] }
        }));
        assert!(matches!(result, Err(ResourceError::NotAList { .. })));
    }

    #[test]
    fn test_construction_with_only_total_succeeds() {
        let result = list(json!({
            "total": 0,
            "_embedded": { "items": [] }
        }));
        assert!(result.is_ok());
    }

    #[test]
    fn test_construction_infers_item_rel() {
        let page = page();
        assert_eq!(page.item_rel(), "items");
        assert_eq!(page.count(), Some(2));
        assert_eq!(page.total(), Some(4));
    }

    #[test]
    fn test_construction_without_item_rel_or_embedded_fails() {
        let result = list(json!({ "count": 0, "total": 0 }));
        assert!(matches!(result, Err(ResourceError::NotAList { .. })));
    }

    #[test]
    fn test_explicit_item_rel_allows_empty_page() {
        let traversal = Traversal::new("https://api.example.com/rest/products").unwrap();
        let page = ListResource::new(
            json!({ "count": 0, "total": 0 }),
            test_env(),
            traversal,
            Some("items".to_string()),
            ResourceFactory::DEFAULT,
        )
        .unwrap();
        assert!(page.items().unwrap().is_empty());
    }

    #[test]
    fn test_items_materializes_fresh_instances() {
        let page = page();
        let mut first_pass = page.items().unwrap();
        first_pass[0]
            .set_property("id", json!(999))
            .unwrap();

        // A second materialization is unaffected by mutations of the first.
        let second_pass = page.items().unwrap();
        assert_eq!(
            second_pass[0].get_property("id").unwrap(),
            Some(&json!(1))
        );
    }

    #[test]
    fn test_item_bounds_checking() {
        let page = page();
        assert!(page.item(0).is_ok());
        assert!(matches!(
            page.item(2),
            Err(ResourceError::IndexOutOfBounds { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_first_item_on_empty_page_fails() {
        let empty = list(json!({
            "count": 0,
            "total": 0,
            "_embedded": { "items": [] }
        }))
        .unwrap();
        assert!(matches!(
            empty.first_item(),
            Err(ResourceError::IndexOutOfBounds { index: 0, count: 0 })
        ));
    }

    #[test]
    fn test_pagination_link_presence() {
        let page = page();
        assert!(page.has_next_link());
        assert!(!page.has_prev_link());
        assert!(!page.has_first_link());
    }

    #[test]
    fn test_next_item_cursor_resets_after_exhaustion() {
        let mut page = page();

        let a = page.next_item().unwrap().unwrap();
        let b = page.next_item().unwrap().unwrap();
        assert_eq!(a.get_property("id").unwrap(), Some(&json!(1)));
        assert_eq!(b.get_property("id").unwrap(), Some(&json!(2)));

        // Exhausted: yields None once, then starts over.
        assert!(page.next_item().unwrap().is_none());
        let again = page.next_item().unwrap().unwrap();
        assert_eq!(again.get_property("id").unwrap(), Some(&json!(1)));
    }

    #[test]
    fn test_deref_exposes_resource_operations() {
        let page = page();
        assert!(page.has_link("self"));
        assert!(!page.is_dirty());
    }

    #[test]
    fn test_list_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ListResource>();
    }
}
