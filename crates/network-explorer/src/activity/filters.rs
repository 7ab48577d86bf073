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

//! Activity filter categories per entity context.

use std::{str::FromStr, sync::LazyLock};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::errors::ExplorerError;

/// Filter name that places no restriction on transaction types.
pub const ALL_ACTIVITY: &str = "All Activity";

const REWARD_TYPES: &[&str] = &["rewards_v1", "rewards_v2", "rewards_v3"];

/// Kind of entity an activity feed belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EntityContext {
    Hotspot,
    Account,
    Validator,
}

impl EntityContext {
    /// Path segment of the entity collection in the explorer API.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Hotspot => "hotspots",
            Self::Account => "accounts",
            Self::Validator => "validators",
        }
    }

    /// Context name with its first letter upper-cased, for titles.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Hotspot => "Hotspot",
            Self::Account => "Account",
            Self::Validator => "Validator",
        }
    }
}

impl std::fmt::Display for EntityContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hotspot => write!(f, "hotspot"),
            Self::Account => write!(f, "account"),
            Self::Validator => write!(f, "validator"),
        }
    }
}

impl FromStr for EntityContext {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hotspot" => Ok(Self::Hotspot),
            "account" => Ok(Self::Account),
            "validator" => Ok(Self::Validator),
            other => Err(ExplorerError::UnknownContext(other.to_string())),
        }
    }
}

/// A named group of transaction types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityFilter {
    pub name: &'static str,
    pub types: &'static [&'static str],
}

impl ActivityFilter {
    const fn new(name: &'static str, types: &'static [&'static str]) -> Self {
        Self { name, types }
    }

    /// Whether the filter lets every transaction type through.
    pub fn is_unrestricted(&self) -> bool {
        self.types.is_empty()
    }

    pub fn matches(&self, txn_type: &str) -> bool {
        self.is_unrestricted() || self.types.contains(&txn_type)
    }

    pub fn type_list(&self) -> Vec<String> {
        self.types.iter().map(|t| t.to_string()).collect()
    }
}

/// Filters of one context, in navbar order, plus the one selected by default.
#[derive(Debug)]
pub struct ContextFilters {
    pub filters: Vec<ActivityFilter>,
    pub default_filter: &'static str,
}

impl ContextFilters {
    pub fn get(&self, name: &str) -> Option<&ActivityFilter> {
        self.filters.iter().find(|filter| filter.name == name)
    }

    pub fn default_entry(&self) -> &ActivityFilter {
        // The table below always lists its default filter.
        self.get(self.default_filter).unwrap_or(&self.filters[0])
    }
}

/// Immutable filter table keyed by context.
#[derive(Debug)]
pub struct FilterTable {
    hotspot: ContextFilters,
    account: ContextFilters,
    validator: ContextFilters,
}

static FILTERS: LazyLock<FilterTable> = LazyLock::new(|| FilterTable {
    hotspot: ContextFilters {
        filters: vec![
            ActivityFilter::new("Beacons", &["poc_receipts_v1"]),
            ActivityFilter::new("Data", &["state_channel_close_v1"]),
            ActivityFilter::new("Consensus", &["consensus_group_v1"]),
            ActivityFilter::new("Rewards", REWARD_TYPES),
            ActivityFilter::new(ALL_ACTIVITY, &[]),
        ],
        default_filter: "Beacons",
    },
    account: ContextFilters {
        filters: vec![
            ActivityFilter::new("Payments", &["payment_v1", "payment_v2"]),
            ActivityFilter::new("Stakes", &["stake_validator_v1"]),
            ActivityFilter::new("Hotspot Transfers", &["transfer_hotspot_v1"]),
            ActivityFilter::new("Token Burns", &["token_burn_v1"]),
            ActivityFilter::new("Rewards", REWARD_TYPES),
            ActivityFilter::new(ALL_ACTIVITY, &[]),
        ],
        default_filter: "Payments",
    },
    validator: ContextFilters {
        filters: vec![
            ActivityFilter::new("Heartbeats", &["validator_heartbeat_v1"]),
            ActivityFilter::new("Rewards", REWARD_TYPES),
            ActivityFilter::new(
                "Stakes",
                &["stake_validator_v1", "unstake_validator_v1", "transfer_validator_stake_v1"],
            ),
            ActivityFilter::new(ALL_ACTIVITY, &[]),
        ],
        default_filter: "Heartbeats",
    },
});

impl FilterTable {
    /// The process-wide table.
    pub fn global() -> &'static FilterTable {
        &FILTERS
    }

    pub fn for_context(&self, context: EntityContext) -> &ContextFilters {
        match context {
            EntityContext::Hotspot => &self.hotspot,
            EntityContext::Account => &self.account,
            EntityContext::Validator => &self.validator,
        }
    }

    /// Look up a filter, rejecting names the context does not define.
    pub fn lookup(
        &self,
        context: EntityContext,
        name: &str,
    ) -> Result<&ActivityFilter, ExplorerError> {
        self.for_context(context).get(name).ok_or_else(|| ExplorerError::UnknownFilter {
            context: context.to_string(),
            filter: name.to_string(),
        })
    }

    pub fn default_filter(&self, context: EntityContext) -> &ActivityFilter {
        self.for_context(context).default_entry()
    }
}
