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

//! View logic of the network explorer: hotspot reward rollups, filtered and
//! paginated entity activity, and the scroll behaviour of the filter navbar.
//!
//! Data is read through the [source::RewardSource] and
//! [source::ActivitySource] traits; [client::ExplorerClient] implements both
//! over HTTP.

pub mod activity;
pub mod client;
pub mod config;
pub mod errors;
pub mod pane;
pub mod rewards;
pub mod scroll;
pub mod source;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use activity::{ActivityFeed, EntityContext, FilterTable};
pub use client::ExplorerClient;
pub use config::Config;
pub use errors::{CodedError, ExplorerError};
pub use pane::{ActivityPane, PaneContent, Viewport};
pub use rewards::{RewardState, RewardSummary, RewardSummaryController};
pub use source::{ActivitySource, FetchOutcome, RewardSource};
