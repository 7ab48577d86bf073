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

//! Hotspot reward summaries.
//!
//! Reward series arrive newest first: index 0 is the current period, index 1
//! the one before it. Rollups are sums over contiguous slices of the daily
//! series; slices past the end of a short series count as zero.

use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{
    config::RewardsConfig,
    errors::ExplorerError,
    source::{FetchOutcome, RewardSource},
};

/// Number of daily buckets collapsed into one month window.
pub const MONTH_WINDOW_DAYS: usize = 30;
/// Length of the daily series used for the one year card.
pub const YEAR_DAYS: u32 = 365;

const WEEK_DAYS: usize = 7;
const DAY_CARD_SLICES: usize = 24;
const YEAR_CARD_SLICES: usize = 12;

/// Bucket width of a reward series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketGranularity {
    Day,
    Hour,
}

impl std::fmt::Display for BucketGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Hour => write!(f, "hour"),
        }
    }
}

/// One aggregation point of a reward series.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RewardBucket {
    /// Unix timestamp (seconds) of the start of the bucket
    pub timestamp: i64,
    /// Rewards earned within the bucket
    pub total: f64,
}

/// Sum of `total` over `series[start..end]`, clipped to the series length.
pub fn sum_window(series: &[RewardBucket], start: usize, end: usize) -> f64 {
    let end = end.min(series.len());
    if start >= end {
        return 0.0;
    }
    series[start..end].iter().map(|bucket| bucket.total).sum()
}

/// Partition a daily series into consecutive 30 day windows.
///
/// Each window becomes one bucket stamped with its first member's timestamp.
/// The last window may hold fewer than 30 days.
pub fn split_into_months(series: &[RewardBucket]) -> Vec<RewardBucket> {
    series
        .chunks(MONTH_WINDOW_DAYS)
        .map(|window| RewardBucket {
            timestamp: window[0].timestamp,
            total: window.iter().map(|bucket| bucket.total).sum(),
        })
        .collect()
}

/// Raw series backing a [RewardSummary].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardBuckets {
    pub days: Vec<RewardBucket>,
    pub hours: Vec<RewardBucket>,
    /// 365 daily buckets, only fetched when the year card is enabled
    pub year: Option<Vec<RewardBucket>>,
}

/// Rollups derived from one fetch of the reward series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardSummary {
    pub buckets: RewardBuckets,
    pub day: f64,
    pub previous_day: f64,
    pub week: f64,
    pub previous_week: f64,
    pub month: f64,
    pub previous_month: f64,
    pub one_year: Option<f64>,
    pub months_of_year: Vec<RewardBucket>,
}

impl RewardSummary {
    pub fn from_buckets(days: Vec<RewardBucket>, hours: Vec<RewardBucket>) -> Self {
        Self {
            day: sum_window(&days, 0, 1),
            previous_day: sum_window(&days, 1, 2),
            week: sum_window(&days, 0, WEEK_DAYS),
            previous_week: sum_window(&days, WEEK_DAYS, 2 * WEEK_DAYS),
            month: sum_window(&days, 0, MONTH_WINDOW_DAYS),
            previous_month: sum_window(&days, MONTH_WINDOW_DAYS, 2 * MONTH_WINDOW_DAYS),
            one_year: None,
            months_of_year: Vec::new(),
            buckets: RewardBuckets { days, hours, year: None },
        }
    }

    /// Attach a one year daily series and its month windows.
    pub fn with_year(mut self, year: Vec<RewardBucket>) -> Self {
        self.one_year = Some(sum_window(&year, 0, year.len()));
        self.months_of_year = split_into_months(&year);
        self.buckets.year = Some(year);
        self
    }

    pub fn card(&self, timeframe: RewardTimeframe) -> Option<RewardCard> {
        let card = match timeframe {
            RewardTimeframe::Day => RewardCard {
                timeframe,
                value: self.day,
                previous_value: Some(self.previous_day),
                scale: ChartScale::Hours,
                slices: DAY_CARD_SLICES,
                chart: head(&self.buckets.hours, DAY_CARD_SLICES),
            },
            RewardTimeframe::Week => RewardCard {
                timeframe,
                value: self.week,
                previous_value: Some(self.previous_week),
                scale: ChartScale::Days,
                slices: WEEK_DAYS,
                chart: head(&self.buckets.days, WEEK_DAYS),
            },
            RewardTimeframe::Month => RewardCard {
                timeframe,
                value: self.month,
                previous_value: Some(self.previous_month),
                scale: ChartScale::Days,
                slices: MONTH_WINDOW_DAYS,
                chart: head(&self.buckets.days, MONTH_WINDOW_DAYS),
            },
            RewardTimeframe::Year => RewardCard {
                timeframe,
                value: self.one_year?,
                previous_value: None,
                scale: ChartScale::Year,
                slices: YEAR_CARD_SLICES,
                chart: head(&self.months_of_year, YEAR_CARD_SLICES),
            },
        };
        Some(card)
    }

    /// Cards for the requested timeframes, skipping those without data.
    pub fn cards(&self, timeframes: &[RewardTimeframe]) -> Vec<RewardCard> {
        timeframes.iter().filter_map(|timeframe| self.card(*timeframe)).collect()
    }
}

fn head(series: &[RewardBucket], n: usize) -> Vec<RewardBucket> {
    series[..n.min(series.len())].to_vec()
}

/// Period shown by a reward card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RewardTimeframe {
    Day,
    Week,
    Month,
    Year,
}

impl RewardTimeframe {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Day => "24 Hours",
            Self::Week => "7 Days",
            Self::Month => "30 Days",
            Self::Year => "1 Year",
        }
    }
}

/// X axis unit of a card's chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartScale {
    Hours,
    Days,
    Year,
}

/// Everything a reward card renders.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardCard {
    pub timeframe: RewardTimeframe,
    pub value: f64,
    pub previous_value: Option<f64>,
    pub scale: ChartScale,
    pub slices: usize,
    pub chart: Vec<RewardBucket>,
}

impl RewardCard {
    /// Relative change against the previous period, in percent.
    pub fn change_percent(&self) -> Option<f64> {
        match self.previous_value {
            Some(previous) if previous != 0.0 => Some((self.value - previous) / previous * 100.0),
            _ => None,
        }
    }
}

/// Published state of a [RewardSummaryController].
#[derive(Debug, Clone, PartialEq)]
pub enum RewardState {
    Loading,
    Failed(String),
    Ready(RewardSummary),
}

struct SummaryState {
    address: String,
    generation: u64,
    state: RewardState,
}

/// Loads reward series for one hotspot and publishes the derived summary.
///
/// Only the most recent load publishes: a load started for a previous address
/// is dropped when it resolves.
pub struct RewardSummaryController<S> {
    source: Arc<S>,
    config: RewardsConfig,
    inner: Arc<RwLock<SummaryState>>,
}

impl<S> Clone for RewardSummaryController<S> {
    fn clone(&self) -> Self {
        Self { source: self.source.clone(), config: self.config.clone(), inner: self.inner.clone() }
    }
}

impl<S: RewardSource> RewardSummaryController<S> {
    pub fn new(source: Arc<S>, address: impl Into<String>, config: RewardsConfig) -> Self {
        Self {
            source,
            config,
            inner: Arc::new(RwLock::new(SummaryState {
                address: address.into(),
                generation: 0,
                state: RewardState::Loading,
            })),
        }
    }

    pub async fn state(&self) -> RewardState {
        self.inner.read().await.state.clone()
    }

    pub async fn is_loading(&self) -> bool {
        matches!(self.inner.read().await.state, RewardState::Loading)
    }

    pub async fn address(&self) -> String {
        self.inner.read().await.address.clone()
    }

    /// Load the summary for the current address.
    pub async fn load(&self) -> FetchOutcome {
        self.run(None).await
    }

    /// Switch to another hotspot and load its summary.
    pub async fn set_address(&self, address: impl Into<String>) -> FetchOutcome {
        self.run(Some(address.into())).await
    }

    /// Re-run the load after a failure.
    pub async fn retry(&self) -> FetchOutcome {
        self.run(None).await
    }

    async fn run(&self, address: Option<String>) -> FetchOutcome {
        let (generation, address) = {
            let mut inner = self.inner.write().await;
            if let Some(address) = address {
                inner.address = address;
            }
            inner.generation += 1;
            inner.state = RewardState::Loading;
            (inner.generation, inner.address.clone())
        };

        tracing::debug!("Loading rewards for {address} (generation {generation})");
        let result = self.fetch_summary(&address).await;

        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            tracing::debug!("Discarding stale rewards for {address}");
            return FetchOutcome::Stale;
        }
        match result {
            Ok(summary) => {
                inner.state = RewardState::Ready(summary);
                FetchOutcome::Applied
            }
            Err(err) => {
                tracing::error!("Failed to load rewards for {address}: {err:?}");
                inner.state = RewardState::Failed(err.to_string());
                FetchOutcome::Failed
            }
        }
    }

    async fn fetch_summary(&self, address: &str) -> Result<RewardSummary, ExplorerError> {
        let days = self.source.fetch_reward_buckets(
            address,
            self.config.day_buckets,
            BucketGranularity::Day,
        );
        let hours = self.source.fetch_reward_buckets(
            address,
            self.config.hour_buckets,
            BucketGranularity::Hour,
        );
        let year = async {
            if self.config.year_summary {
                self.source
                    .fetch_reward_buckets(address, YEAR_DAYS, BucketGranularity::Day)
                    .await
                    .map(Some)
            } else {
                Ok(None)
            }
        };

        let (days, hours, year) = tokio::try_join!(days, hours, year)?;
        let summary = RewardSummary::from_buckets(days, hours);
        Ok(match year {
            Some(year) => summary.with_year(year),
            None => summary,
        })
    }
}
