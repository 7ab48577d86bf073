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

//! Activity pane: filter navbar, scroll handling and the feed it drives.

use std::sync::Arc;

use crate::{
    activity::{ActivityFeed, EntityContext, FilterTable},
    config::ScrollConfig,
    errors::ExplorerError,
    scroll::ScrollDispatcher,
    source::{ActivitySource, FetchOutcome, Transaction},
};

/// Scroll container holding the activity list.
pub trait Viewport: Send + Sync {
    fn scroll_to_top(&self);
}

impl<V: Viewport + ?Sized> Viewport for Arc<V> {
    fn scroll_to_top(&self) {
        (**self).scroll_to_top()
    }
}

/// One pill of the filter navbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub key: &'static str,
    pub tags: &'static [&'static str],
    pub active: bool,
}

/// What the pane body shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PaneContent {
    Skeleton,
    Error {
        message: String,
    },
    List {
        title: String,
        description: String,
        context: EntityContext,
        address: String,
        transactions: Vec<Transaction>,
        has_more: bool,
    },
}

pub struct ActivityPane<S, V> {
    feed: ActivityFeed<S>,
    viewport: V,
    scroll: ScrollDispatcher,
}

impl<S: ActivitySource, V: Viewport> ActivityPane<S, V> {
    /// Build the pane and start its scroll dispatcher on the current runtime.
    pub fn new(feed: ActivityFeed<S>, viewport: V, scroll_config: &ScrollConfig) -> Self {
        let scroll = ScrollDispatcher::spawn(scroll_config.debounce());
        Self { feed, viewport, scroll }
    }

    pub fn feed(&self) -> &ActivityFeed<S> {
        &self.feed
    }

    pub fn on_scroll(&self, offset: f64) {
        self.scroll.on_scroll(offset);
    }

    pub fn nav_visible(&self) -> bool {
        self.scroll.is_visible()
    }

    pub async fn nav_items(&self) -> Vec<NavItem> {
        let active = self.feed.filter().await;
        self.feed
            .filters()
            .iter()
            .map(|filter| NavItem {
                key: filter.name,
                tags: filter.types,
                active: filter.name == active.name,
            })
            .collect()
    }

    /// Pills are not clickable while any page is loading.
    pub async fn nav_disabled(&self) -> bool {
        self.feed.is_loading().await
    }

    /// The list container stops scrolling while the first page loads.
    pub async fn overflow_hidden(&self) -> bool {
        self.feed.snapshot().await.is_loading_initial
    }

    /// Jump back to the top of the list and reload it with the named filter.
    pub async fn select_filter(&self, name: &str) -> Result<FetchOutcome, ExplorerError> {
        // Validate before touching the viewport.
        FilterTable::global().lookup(self.feed.context(), name)?;
        self.viewport.scroll_to_top();
        self.feed.select_filter(name).await
    }

    pub async fn fetch_more(&self) -> FetchOutcome {
        self.feed.fetch_more().await
    }

    pub async fn retry(&self) -> FetchOutcome {
        self.feed.retry().await
    }

    pub async fn content(&self) -> PaneContent {
        let snapshot = self.feed.snapshot().await;
        let transactions = match snapshot.transactions {
            Some(transactions) if !snapshot.is_loading_initial && !snapshot.is_loading_more => {
                transactions
            }
            _ => return PaneContent::Skeleton,
        };
        if let Some(message) = snapshot.error {
            return PaneContent::Error { message };
        }

        let filter = snapshot.filter.name;
        PaneContent::List {
            title: format!("{} Activity ({filter})", snapshot.context.title()),
            description: format!(
                "All transactions that this {} has participated in, \
                 filtered by the currently selected filter ({filter}).",
                snapshot.context
            ),
            context: snapshot.context,
            address: snapshot.address,
            transactions,
            has_more: snapshot.has_more,
        }
    }
}
