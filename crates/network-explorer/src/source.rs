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

//! Data source seams for the reward and activity views.
//!
//! Controllers only talk to these traits. [crate::client::ExplorerClient] is the
//! HTTP implementation; tests plug in in-memory sources.

use serde::{Deserialize, Serialize};

use crate::{
    activity::EntityContext,
    errors::ExplorerError,
    rewards::{BucketGranularity, RewardBucket},
};

/// Source of time-bucketed reward series.
#[async_trait::async_trait]
pub trait RewardSource: Send + Sync {
    /// Fetch `count` buckets of the given granularity for `address`, newest first.
    async fn fetch_reward_buckets(
        &self,
        address: &str,
        count: u32,
        granularity: BucketGranularity,
    ) -> Result<Vec<RewardBucket>, ExplorerError>;
}

/// Source of paginated entity activity.
#[async_trait::async_trait]
pub trait ActivitySource: Send + Sync {
    /// Fetch one page of activity. An empty `types` list means all types.
    async fn fetch_activity_page(
        &self,
        query: &ActivityQuery,
    ) -> Result<TransactionPage, ExplorerError>;
}

/// A single page request against an [ActivitySource].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityQuery {
    pub context: EntityContext,
    pub address: String,
    /// Transaction-type allowlist; empty means no restriction.
    pub types: Vec<String>,
    /// Opaque cursor returned with the previous page.
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// One transaction record of an activity feed.
///
/// Only the fields the views read are typed, the rest is kept as-is for renderers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Transaction {
    pub hash: String,
    #[serde(rename = "type")]
    pub txn_type: String,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub height: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A page of transactions plus the continuation cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// What became of a controller's fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was published.
    Applied,
    /// No request was made.
    Skipped,
    /// The request finished after a newer one superseded it and was dropped.
    Stale,
    /// The request failed and the error was recorded.
    Failed,
}
