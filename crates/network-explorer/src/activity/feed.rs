// Copyright 2026 Boundless Foundation, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Paginated activity feed for a single entity.
//!
//! The feed accumulates pages as [ActivityFeed::fetch_more] is called. Changing
//! the filter or the address throws the accumulated pages away and starts over
//! from the first page; every restart bumps a generation counter and a page that
//! resolves for an older generation is dropped.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::filters::{ActivityFilter, EntityContext, FilterTable};
use crate::{
    errors::ExplorerError,
    source::{ActivityQuery, ActivitySource, FetchOutcome, Transaction},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    LoadingInitial,
    LoadingMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageKind {
    First,
    Next,
}

struct FeedState {
    address: String,
    filter: ActivityFilter,
    generation: u64,
    // None until the first page was requested
    transactions: Option<Vec<Transaction>>,
    cursor: Option<String>,
    has_more: bool,
    phase: Phase,
    error: Option<String>,
    failed: Option<PageKind>,
}

impl FeedState {
    fn reset(&mut self) {
        self.generation += 1;
        self.transactions = Some(Vec::new());
        self.cursor = None;
        self.has_more = false;
        self.error = None;
        self.failed = None;
        self.phase = Phase::LoadingInitial;
    }
}

/// Point-in-time view of a feed for renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub context: EntityContext,
    pub address: String,
    pub filter: ActivityFilter,
    pub transactions: Option<Vec<Transaction>>,
    pub has_more: bool,
    pub is_loading_initial: bool,
    pub is_loading_more: bool,
    pub error: Option<String>,
}

/// Filterable, paginated transaction list for a hotspot, account or validator.
pub struct ActivityFeed<S> {
    source: Arc<S>,
    context: EntityContext,
    page_size: Option<u32>,
    table: &'static FilterTable,
    state: Arc<RwLock<FeedState>>,
}

impl<S> Clone for ActivityFeed<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            context: self.context,
            page_size: self.page_size,
            table: self.table,
            state: self.state.clone(),
        }
    }
}

impl<S: ActivitySource> ActivityFeed<S> {
    /// Create a feed on the context's default filter. Nothing is fetched until
    /// [ActivityFeed::load] is called.
    pub fn new(
        source: Arc<S>,
        context: EntityContext,
        address: impl Into<String>,
        page_size: Option<u32>,
    ) -> Self {
        let table = FilterTable::global();
        Self {
            source,
            context,
            page_size,
            table,
            state: Arc::new(RwLock::new(FeedState {
                address: address.into(),
                filter: *table.default_filter(context),
                generation: 0,
                transactions: None,
                cursor: None,
                has_more: false,
                phase: Phase::Idle,
                error: None,
                failed: None,
            })),
        }
    }

    pub fn context(&self) -> EntityContext {
        self.context
    }

    pub fn filters(&self) -> &'static [ActivityFilter] {
        &self.table.for_context(self.context).filters
    }

    pub async fn filter(&self) -> ActivityFilter {
        self.state.read().await.filter
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        let state = self.state.read().await;
        FeedSnapshot {
            context: self.context,
            address: state.address.clone(),
            filter: state.filter,
            transactions: state.transactions.clone(),
            has_more: state.has_more,
            is_loading_initial: state.phase == Phase::LoadingInitial,
            is_loading_more: state.phase == Phase::LoadingMore,
            error: state.error.clone(),
        }
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.phase != Phase::Idle
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn set_error(&self, error: Option<String>) {
        self.state.write().await.error = error;
    }

    /// Discard loaded pages and fetch the first page again.
    pub async fn load(&self) -> FetchOutcome {
        let (generation, query) = {
            let mut state = self.state.write().await;
            state.reset();
            (state.generation, self.query(&state, None))
        };
        self.complete(generation, PageKind::First, query).await
    }

    /// Switch to the named filter of this feed's context and reload from the first page.
    pub async fn select_filter(&self, name: &str) -> Result<FetchOutcome, ExplorerError> {
        let filter = *self.table.lookup(self.context, name)?;
        let (generation, query) = {
            let mut state = self.state.write().await;
            state.filter = filter;
            state.reset();
            (state.generation, self.query(&state, None))
        };
        tracing::debug!("Switched {} activity filter to {name}", self.context);
        Ok(self.complete(generation, PageKind::First, query).await)
    }

    /// Point the feed at another entity and reload from the first page.
    pub async fn set_address(&self, address: impl Into<String>) -> FetchOutcome {
        let (generation, query) = {
            let mut state = self.state.write().await;
            state.address = address.into();
            state.reset();
            (state.generation, self.query(&state, None))
        };
        self.complete(generation, PageKind::First, query).await
    }

    /// Fetch the next page and append it.
    ///
    /// Skipped while a fetch is in flight, when there are no more pages, or when
    /// the first page was never requested.
    pub async fn fetch_more(&self) -> FetchOutcome {
        let (generation, query) = {
            let mut state = self.state.write().await;
            if state.phase != Phase::Idle || !state.has_more || state.transactions.is_none() {
                return FetchOutcome::Skipped;
            }
            state.phase = Phase::LoadingMore;
            state.error = None;
            let cursor = state.cursor.clone();
            (state.generation, self.query(&state, cursor))
        };
        self.complete(generation, PageKind::Next, query).await
    }

    /// Clear the error and run the failed request again.
    pub async fn retry(&self) -> FetchOutcome {
        let failed = {
            let mut state = self.state.write().await;
            state.error = None;
            state.failed.take()
        };
        match failed {
            Some(PageKind::Next) => self.fetch_more().await,
            Some(PageKind::First) | None => self.load().await,
        }
    }

    fn query(&self, state: &FeedState, cursor: Option<String>) -> ActivityQuery {
        ActivityQuery {
            context: self.context,
            address: state.address.clone(),
            types: state.filter.type_list(),
            cursor,
            limit: self.page_size,
        }
    }

    async fn complete(
        &self,
        generation: u64,
        kind: PageKind,
        query: ActivityQuery,
    ) -> FetchOutcome {
        tracing::debug!(
            "Fetching {:?} {} activity page for {} (generation {generation})",
            kind,
            self.context,
            query.address
        );
        let result = self.source.fetch_activity_page(&query).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(
                "Discarding stale {} activity page for {}",
                self.context,
                query.address
            );
            return FetchOutcome::Stale;
        }
        state.phase = Phase::Idle;
        match result {
            Ok(page) => {
                state.transactions.get_or_insert_with(Vec::new).extend(page.items);
                state.cursor = page.cursor;
                state.has_more = page.has_more;
                state.error = None;
                state.failed = None;
                FetchOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(
                    "Failed to fetch {} activity for {}: {err:?}",
                    self.context,
                    query.address
                );
                state.error = Some(err.to_string());
                state.failed = Some(kind);
                FetchOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{activity::filters::ALL_ACTIVITY, test_utils::MockActivitySource};
    use tracing_test::traced_test;

    fn hotspot_feed(source: &Arc<MockActivitySource>) -> ActivityFeed<MockActivitySource> {
        ActivityFeed::new(source.clone(), EntityContext::Hotspot, "hotspot-a", Some(2))
    }

    #[tokio::test]
    async fn starts_on_default_filter_without_fetching() {
        let source = Arc::new(MockActivitySource::new(3, 2));
        let feed = hotspot_feed(&source);

        let snapshot = feed.snapshot().await;
        assert_eq!(snapshot.filter.name, "Beacons");
        assert_eq!(snapshot.transactions, None);
        assert!(!snapshot.is_loading_initial);
        assert_eq!(feed.fetch_more().await, FetchOutcome::Skipped);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn pages_accumulate_until_exhausted() {
        let source = Arc::new(MockActivitySource::new(3, 2));
        let feed = hotspot_feed(&source);

        assert_eq!(feed.load().await, FetchOutcome::Applied);
        assert_eq!(feed.fetch_more().await, FetchOutcome::Applied);
        assert_eq!(feed.fetch_more().await, FetchOutcome::Applied);

        let snapshot = feed.snapshot().await;
        let transactions = snapshot.transactions.unwrap();
        assert_eq!(transactions.len(), 6);
        assert_eq!(transactions[0].hash, "hotspot-a/poc_receipts_v1/0/0");
        assert_eq!(transactions[5].hash, "hotspot-a/poc_receipts_v1/2/1");
        assert!(!snapshot.has_more);

        assert_eq!(feed.fetch_more().await, FetchOutcome::Skipped);
        assert_eq!(source.calls(), 3);

        let queries = source.queries();
        assert_eq!(queries[0].cursor, None);
        assert_eq!(queries[1].cursor.as_deref(), Some("1"));
        assert_eq!(queries[2].cursor.as_deref(), Some("2"));
        assert!(queries.iter().all(|q| q.types == ["poc_receipts_v1"] && q.limit == Some(2)));
    }

    #[tokio::test]
    async fn fetch_more_is_a_no_op_while_loading() {
        let source = Arc::new(MockActivitySource::new(3, 2).gated());
        let feed = hotspot_feed(&source);
        source.release(1);
        feed.load().await;

        let pending = tokio::spawn({
            let feed = feed.clone();
            async move { feed.fetch_more().await }
        });
        source.wait_for_calls(2).await;

        assert!(feed.snapshot().await.is_loading_more);
        assert_eq!(feed.fetch_more().await, FetchOutcome::Skipped);
        assert_eq!(source.calls(), 2);

        source.release(1);
        assert_eq!(pending.await.unwrap(), FetchOutcome::Applied);
        assert_eq!(feed.snapshot().await.transactions.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn filter_change_resets_before_first_page_resolves() {
        let source = Arc::new(MockActivitySource::new(3, 2).gated());
        let feed = hotspot_feed(&source);
        source.release(2);
        feed.load().await;
        feed.fetch_more().await;
        assert_eq!(feed.snapshot().await.transactions.unwrap().len(), 4);

        let pending = tokio::spawn({
            let feed = feed.clone();
            async move { feed.select_filter("Rewards").await }
        });
        source.wait_for_calls(3).await;

        let snapshot = feed.snapshot().await;
        assert_eq!(snapshot.transactions, Some(vec![]));
        assert!(snapshot.is_loading_initial);
        assert!(!snapshot.has_more);
        assert_eq!(snapshot.filter.name, "Rewards");

        source.release(1);
        assert_eq!(pending.await.unwrap().unwrap(), FetchOutcome::Applied);
        let transactions = feed.snapshot().await.transactions.unwrap();
        assert_eq!(transactions.len(), 2);
        assert!(transactions.iter().all(|t| t.txn_type == "rewards_v1"));

        let last = source.queries().pop().unwrap();
        assert_eq!(last.types, ["rewards_v1", "rewards_v2", "rewards_v3"]);
        assert_eq!(last.cursor, None);
    }

    #[tokio::test]
    #[traced_test]
    async fn page_for_previous_filter_is_discarded() {
        let source = Arc::new(MockActivitySource::new(3, 2).gated());
        let feed = hotspot_feed(&source);

        // Driven on one task so the logs stay inside the test's span.
        let second = async {
            source.wait_for_calls(1).await;
            feed.select_filter(ALL_ACTIVITY).await
        };
        let release = async {
            source.wait_for_calls(2).await;
            source.release(2);
        };
        let (first, second, ()) = tokio::join!(feed.load(), second, release);
        let outcomes = [first, second.unwrap()];
        assert!(outcomes.contains(&FetchOutcome::Stale));
        assert!(outcomes.contains(&FetchOutcome::Applied));

        let snapshot = feed.snapshot().await;
        let transactions = snapshot.transactions.unwrap();
        assert_eq!(transactions.len(), 2);
        assert!(transactions.iter().all(|t| t.txn_type == "any"));
        assert!(source.queries()[1].types.is_empty());
        assert!(logs_contain("Discarding stale hotspot activity page"));
    }

    #[tokio::test]
    async fn address_change_resets_cursor() {
        let source = Arc::new(MockActivitySource::new(3, 1));
        let feed = hotspot_feed(&source);
        feed.load().await;
        feed.fetch_more().await;

        assert_eq!(feed.set_address("hotspot-b").await, FetchOutcome::Applied);
        let snapshot = feed.snapshot().await;
        assert_eq!(snapshot.address, "hotspot-b");
        assert_eq!(snapshot.transactions.unwrap()[0].hash, "hotspot-b/poc_receipts_v1/0/0");
        assert_eq!(source.queries().last().unwrap().cursor, None);
    }

    #[tokio::test]
    async fn unknown_filter_is_rejected_without_reset() {
        let source = Arc::new(MockActivitySource::new(1, 1));
        let feed = hotspot_feed(&source);
        feed.load().await;

        let err = feed.select_filter("Payments").await.unwrap_err();
        assert!(matches!(err, ExplorerError::UnknownFilter { .. }));
        assert_eq!(feed.snapshot().await.transactions.unwrap().len(), 1);
        assert_eq!(feed.filter().await.name, "Beacons");
    }

    #[tokio::test]
    async fn retry_refetches_the_failed_page() {
        let source = Arc::new(MockActivitySource::new(3, 2));
        let feed = hotspot_feed(&source);

        source.fail_next();
        assert_eq!(feed.load().await, FetchOutcome::Failed);
        let snapshot = feed.snapshot().await;
        assert!(snapshot.error.unwrap().contains("503"));
        assert!(!snapshot.is_loading_initial);

        assert_eq!(feed.retry().await, FetchOutcome::Applied);
        assert_eq!(feed.error().await, None);
        assert_eq!(feed.snapshot().await.transactions.unwrap().len(), 2);

        source.fail_next();
        assert_eq!(feed.fetch_more().await, FetchOutcome::Failed);
        assert_eq!(feed.retry().await, FetchOutcome::Applied);
        assert_eq!(feed.snapshot().await.transactions.unwrap().len(), 4);
        assert_eq!(source.queries().last().unwrap().cursor.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn next_page_success_clears_previous_error() {
        let source = Arc::new(MockActivitySource::new(3, 2));
        let feed = hotspot_feed(&source);
        feed.load().await;

        source.fail_next();
        assert_eq!(feed.fetch_more().await, FetchOutcome::Failed);
        assert!(feed.error().await.is_some());

        assert_eq!(feed.fetch_more().await, FetchOutcome::Applied);
        let snapshot = feed.snapshot().await;
        assert_eq!(snapshot.error, None);
        assert_eq!(snapshot.transactions.unwrap().len(), 4);

        // Nothing failed since, so retry reloads from the first page.
        assert_eq!(feed.retry().await, FetchOutcome::Applied);
        assert_eq!(source.queries().last().unwrap().cursor, None);
    }

    #[tokio::test]
    async fn set_error_is_visible_in_snapshot() {
        let source = Arc::new(MockActivitySource::new(1, 1));
        let feed = hotspot_feed(&source);

        feed.set_error(Some("rate limited".into())).await;
        assert_eq!(feed.snapshot().await.error.as_deref(), Some("rate limited"));
        feed.set_error(None).await;
        assert_eq!(feed.error().await, None);
    }
}
