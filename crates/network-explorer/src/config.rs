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

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::{fs, time::Duration};
use url::Url;

use crate::{errors::ExplorerError, rewards::RewardTimeframe};

/// Environment variable overriding [ApiConfig::base_url].
pub const API_URL_ENV: &str = "EXPLORER_API_URL";

pub mod defaults {
    use url::Url;

    use crate::rewards::RewardTimeframe;

    pub const DEFAULT_API_URL: &str = "https://api.helium.io/";

    pub fn base_url() -> Url {
        Url::parse(DEFAULT_API_URL).expect("default API URL is valid")
    }

    pub const fn timeout_secs() -> u64 {
        30
    }

    pub fn user_agent() -> String {
        format!("network-explorer/{}", env!("CARGO_PKG_VERSION"))
    }

    pub const fn day_buckets() -> u32 {
        60
    }

    pub const fn hour_buckets() -> u32 {
        48
    }

    pub fn cards() -> Vec<RewardTimeframe> {
        vec![RewardTimeframe::Day, RewardTimeframe::Month]
    }

    pub const fn debounce_ms() -> u64 {
        100
    }
}

/// Explorer API connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the explorer API
    #[serde(default = "defaults::base_url")]
    pub base_url: Url,
    /// HTTP request timeout in seconds
    #[serde(default = "defaults::timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            timeout_secs: defaults::timeout_secs(),
            user_agent: defaults::user_agent(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL, honouring the `EXPLORER_API_URL` override.
    pub fn resolved_base_url(&self) -> Result<Url> {
        match std::env::var(API_URL_ENV) {
            Ok(url_str) => {
                tracing::debug!("Using {API_URL_ENV} from environment: {url_str}");
                Url::parse(&url_str).with_context(|| format!("Invalid {API_URL_ENV}"))
            }
            Err(_) => Ok(self.base_url.clone()),
        }
    }
}

/// Reward summary settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RewardsConfig {
    /// Number of daily buckets fetched for the rollups
    ///
    /// Month over month comparisons need at least 60.
    #[serde(default = "defaults::day_buckets")]
    pub day_buckets: u32,
    /// Number of hourly buckets fetched for the 24 hour chart
    #[serde(default = "defaults::hour_buckets")]
    pub hour_buckets: u32,
    /// Also fetch a year of daily buckets for the 1 year card
    #[serde(default)]
    pub year_summary: bool,
    /// Cards shown, in order
    #[serde(default = "defaults::cards")]
    pub cards: Vec<RewardTimeframe>,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            day_buckets: defaults::day_buckets(),
            hour_buckets: defaults::hour_buckets(),
            year_summary: false,
            cards: defaults::cards(),
        }
    }
}

/// Activity feed settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ActivityConfig {
    /// Page size requested from the API; the server default applies when unset
    pub page_size: Option<u32>,
}

/// Filter navbar scroll handling
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrollConfig {
    /// Debounce window for scroll events (in millisecs)
    #[serde(default = "defaults::debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { debounce_ms: defaults::debounce_ms() }
    }
}

impl ScrollConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Top level explorer config
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub rewards: RewardsConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Config {
    /// Load the config from disk
    pub async fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .await
            .context(format!("Failed to read config file from {path:?}"))?;
        let config: Self =
            toml::from_str(&data).context(format!("Failed to parse toml file from {path:?}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ExplorerError> {
        if self.api.timeout_secs == 0 {
            return Err(ExplorerError::Config("api.timeout_secs must be greater than 0".into()));
        }
        if self.activity.page_size == Some(0) {
            return Err(ExplorerError::Config("activity.page_size must be greater than 0".into()));
        }
        Ok(())
    }
}
