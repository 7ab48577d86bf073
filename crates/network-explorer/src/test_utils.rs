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

//! In-memory sources and viewports for exercising the controllers without an API.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use tokio::sync::Semaphore;

use crate::{
    errors::ExplorerError,
    pane::Viewport,
    source::{ActivityQuery, ActivitySource, Transaction, TransactionPage},
};

/// Build a transaction with the given hash and type.
pub fn txn(hash: impl Into<String>, txn_type: impl Into<String>) -> Transaction {
    Transaction {
        hash: hash.into(),
        txn_type: txn_type.into(),
        time: 0,
        height: 0,
        extra: Default::default(),
    }
}

/// Activity source serving a fixed number of pages per query.
///
/// Page `n` of a query holds `page_len` transactions hashed
/// `<address>/<first type or "any">/<n>/<i>`. When gated, every request waits
/// for one permit released through [MockActivitySource::release].
pub struct MockActivitySource {
    pages: usize,
    page_len: usize,
    gate: Option<Semaphore>,
    fail_next: AtomicBool,
    calls: AtomicUsize,
    queries: Mutex<Vec<ActivityQuery>>,
}

impl MockActivitySource {
    pub fn new(pages: usize, page_len: usize) -> Self {
        Self {
            pages,
            page_len,
            gate: None,
            fail_next: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Hold every request until a permit is released.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Let `n` pending or future requests through the gate.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Fail the next request with an API error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of requests received, including those still waiting at the gate.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<ActivityQuery> {
        self.queries.lock().map(|queries| queries.clone()).unwrap_or_default()
    }

    /// Yield until `n` requests have arrived.
    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait::async_trait]
impl ActivitySource for MockActivitySource {
    async fn fetch_activity_page(
        &self,
        query: &ActivityQuery,
    ) -> Result<TransactionPage, ExplorerError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ExplorerError::Api {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                url: format!("mock://{}/{}", query.context.collection(), query.address),
            });
        }

        let page: usize = query.cursor.as_deref().and_then(|c| c.parse().ok()).unwrap_or(0);
        let txn_type = query.types.first().cloned().unwrap_or_else(|| "any".to_string());
        let items = (0..self.page_len)
            .map(|i| txn(format!("{}/{txn_type}/{page}/{i}", query.address), txn_type.clone()))
            .collect();
        let has_more = page + 1 < self.pages;
        Ok(TransactionPage {
            items,
            cursor: has_more.then(|| (page + 1).to_string()),
            has_more,
        })
    }
}

/// Viewport that counts scroll-to-top requests.
#[derive(Default)]
pub struct RecordingViewport {
    resets: AtomicUsize,
}

impl RecordingViewport {
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl Viewport for RecordingViewport {
    fn scroll_to_top(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}
