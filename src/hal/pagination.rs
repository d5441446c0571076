//! Sequential iteration across collection pages.
//!
//! [`PaginationIterator`] drives the bulk operations of
//! [`ListResource`]: it processes the current page's items strictly in
//! embedded order, one at a time, then follows the `next` link and
//! repeats until the collection is exhausted (or, for `find`, until a
//! match short-circuits the walk). Items are never processed
//! concurrently and page N is always finished before page N+1 is
//! fetched: a remote collection may be mutated while being paged
//! through, and reordering calls would make result order undefined.
//!
//! Two mutually exclusive retry layers protect a walk: with per-item
//! retry requested, failing iterator calls are retried with exponential
//! backoff and page fetches fail fast; without it, page fetches are
//! retried and iterator failures propagate immediately.

use std::future::Future;

use serde_json::Value;

use crate::hal::errors::ResourceError;
use crate::hal::list::ListResource;
use crate::hal::resource::Resource;
use crate::hal::retry::{is_transient, with_retry};

/// Walks a collection page by page, applying a per-item operation.
///
/// One instance drives exactly one bulk call; the starting page is
/// cloned in so the caller's page keeps its own cursor state.
pub(crate) struct PaginationIterator {
    page: ListResource,
    retry: bool,
}

impl PaginationIterator {
    pub(crate) const fn new(page: ListResource, retry: bool) -> Self {
        Self { page, retry }
    }

    /// Applies `iterator` to every item, collecting results in item
    /// order across all pages.
    pub(crate) async fn map<T, F, Fut>(mut self, mut iterator: F) -> Result<Vec<T>, ResourceError>
    where
        F: FnMut(Resource) -> Fut,
        Fut: Future<Output = Result<T, ResourceError>>,
    {
        let mut results = Vec::new();
        loop {
            let documents = self.page.item_documents().to_vec();
            for document in documents {
                let value = self.invoke(&mut iterator, &document).await?;
                results.push(value);
            }
            if !self.advance().await? {
                return Ok(results);
            }
        }
    }

    /// Collects every item for which `predicate` holds, in item order
    /// across all pages.
    pub(crate) async fn filter<F, Fut>(
        mut self,
        mut predicate: F,
    ) -> Result<Vec<Resource>, ResourceError>
    where
        F: FnMut(Resource) -> Fut,
        Fut: Future<Output = Result<bool, ResourceError>>,
    {
        let mut matches = Vec::new();
        loop {
            let documents = self.page.item_documents().to_vec();
            for document in documents {
                if self.invoke(&mut predicate, &document).await? {
                    matches.push(self.page.make_item(document)?);
                }
            }
            if !self.advance().await? {
                return Ok(matches);
            }
        }
    }

    /// Returns the first item for which `predicate` holds; remaining
    /// items on the page and all later pages are skipped.
    pub(crate) async fn find<F, Fut>(
        mut self,
        mut predicate: F,
    ) -> Result<Option<Resource>, ResourceError>
    where
        F: FnMut(Resource) -> Fut,
        Fut: Future<Output = Result<bool, ResourceError>>,
    {
        loop {
            let documents = self.page.item_documents().to_vec();
            for document in documents {
                if self.invoke(&mut predicate, &document).await? {
                    return Ok(Some(self.page.make_item(document)?));
                }
            }
            if !self.advance().await? {
                return Ok(None);
            }
        }
    }

    /// Runs the iterator on one item, retrying transient failures when
    /// per-item retry is active.
    ///
    /// Each attempt materializes a fresh wrapper from the embedded
    /// document. Materialization errors carry no status and are never
    /// retried.
    async fn invoke<T, F, Fut>(
        &self,
        iterator: &mut F,
        document: &Value,
    ) -> Result<T, ResourceError>
    where
        F: FnMut(Resource) -> Fut,
        Fut: Future<Output = Result<T, ResourceError>>,
    {
        if !self.retry {
            let item = self.page.make_item(document.clone())?;
            return iterator(item).await;
        }

        let policy = self.page.retry_policy();
        let mut attempt: u32 = 0;
        loop {
            let item = self.page.make_item(document.clone())?;
            match iterator(item).await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt + 1 >= policy.max_attempts() || !is_transient(&error) {
                        return Err(error);
                    }
                    let delay = policy.backoff(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "item iterator failed, backing off before retry"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Moves to the next page. Returns `false` when the walk is done.
    async fn advance(&mut self) -> Result<bool, ResourceError> {
        if !self.page.has_next_link() {
            return Ok(false);
        }

        // TODO: revisit whether page fetches should also retry when
        // per-item retry is active; today the two layers are mutually
        // exclusive so backoff delays never compound.
        let next = if self.retry {
            self.page.follow_next_link().await?
        } else {
            let policy = self.page.retry_policy();
            let page = &self.page;
            with_retry(&policy, is_transient, || page.follow_next_link()).await?
        };

        self.page = next;
        Ok(true)
    }
}
