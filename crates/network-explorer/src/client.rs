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

//! Client for the explorer API serving reward buckets and entity activity.

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

use crate::{
    config::ApiConfig,
    errors::ExplorerError,
    rewards::{BucketGranularity, RewardBucket},
    source::{ActivityQuery, ActivitySource, RewardSource, Transaction, TransactionPage},
};

#[derive(Debug, Deserialize)]
struct DataResponse<T> {
    data: Vec<T>,
    #[serde(default)]
    cursor: Option<String>,
}

/// HTTP implementation of [RewardSource] and [ActivitySource].
#[derive(Clone, Debug)]
pub struct ExplorerClient {
    client: Client,
    base_url: Url,
}

impl ExplorerClient {
    /// Create a client from config, honouring the `EXPLORER_API_URL` override.
    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        let base_url = config.resolved_base_url()?;
        Ok(Self::with_config(base_url, config)?)
    }

    /// Create a client with an explicit URL and default settings
    pub fn new(base_url: Url) -> Result<Self, ExplorerError> {
        Self::with_config(base_url, &ApiConfig::default())
    }

    /// Create a client for `base_url` using the timeout and user agent of `config`.
    pub fn with_config(base_url: Url, config: &ApiConfig) -> Result<Self, ExplorerError> {
        tracing::debug!("Using explorer API at {base_url}");
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get reward buckets for a hotspot
    /// GET /v1/hotspots/{address}/rewards/buckets
    pub async fn get_reward_buckets(
        &self,
        address: &str,
        count: u32,
        granularity: BucketGranularity,
    ) -> Result<Vec<RewardBucket>, ExplorerError> {
        let mut url = self.endpoint(&["v1", "hotspots", address, "rewards", "buckets"])?;
        url.query_pairs_mut()
            .append_pair("count", &count.to_string())
            .append_pair("bucket", &granularity.to_string());

        let response: DataResponse<RewardBucket> = self.get_json(url).await?;
        Ok(response.data)
    }

    /// Get one page of activity for a hotspot, account or validator
    /// GET /v1/{collection}/{address}/activity
    pub async fn get_activity(
        &self,
        query: &ActivityQuery,
    ) -> Result<TransactionPage, ExplorerError> {
        let mut url =
            self.endpoint(&["v1", query.context.collection(), &query.address, "activity"])?;
        {
            let mut pairs = url.query_pairs_mut();
            if !query.types.is_empty() {
                pairs.append_pair("filter_types", &query.types.join(","));
            }
            if let Some(cursor) = &query.cursor {
                pairs.append_pair("cursor", cursor);
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        let response: DataResponse<Transaction> = self.get_json(url).await?;
        let has_more = response.cursor.is_some();
        Ok(TransactionPage { items: response.data, cursor: response.cursor, has_more })
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ExplorerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ExplorerError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ExplorerError> {
        let url_str = url.to_string();
        tracing::debug!("GET {url_str}");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ExplorerError::Api { status: response.status(), url: url_str });
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl RewardSource for ExplorerClient {
    async fn fetch_reward_buckets(
        &self,
        address: &str,
        count: u32,
        granularity: BucketGranularity,
    ) -> Result<Vec<RewardBucket>, ExplorerError> {
        self.get_reward_buckets(address, count, granularity).await
    }
}

#[async_trait::async_trait]
impl ActivitySource for ExplorerClient {
    async fn fetch_activity_page(
        &self,
        query: &ActivityQuery,
    ) -> Result<TransactionPage, ExplorerError> {
        self.get_activity(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::EntityContext;
    use httpmock::prelude::*;
    use serde_json::json;

    fn create_test_client() -> (MockServer, ExplorerClient) {
        let server = MockServer::start();
        let base_url = Url::parse(&server.base_url()).unwrap();
        let client =
            ExplorerClient::new(base_url).expect("Failed to create client from mock server URL");
        (server, client)
    }

    fn query(types: &[&str], cursor: Option<&str>) -> ActivityQuery {
        ActivityQuery {
            context: EntityContext::Hotspot,
            address: "112abc".to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            cursor: cursor.map(str::to_string),
            limit: None,
        }
    }

    #[tokio::test]
    async fn test_get_reward_buckets() {
        let (server, client) = create_test_client();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/hotspots/112abc/rewards/buckets")
                .query_param("count", "60")
                .query_param("bucket", "day");
            then.status(200).json_body(json!({
                "data": [
                    { "timestamp": 1_700_086_400, "total": 1.5 },
                    { "timestamp": 1_700_000_000, "total": 0.25 }
                ]
            }));
        });

        let buckets =
            client.get_reward_buckets("112abc", 60, BucketGranularity::Day).await.unwrap();

        assert_eq!(
            buckets,
            vec![
                RewardBucket { timestamp: 1_700_086_400, total: 1.5 },
                RewardBucket { timestamp: 1_700_000_000, total: 0.25 },
            ]
        );
        mock.assert();
    }

    #[tokio::test]
    async fn test_get_activity_with_filter_and_cursor() {
        let (server, client) = create_test_client();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/hotspots/112abc/activity")
                .query_param("filter_types", "rewards_v1,rewards_v2,rewards_v3")
                .query_param("cursor", "eyJiZWZvcmUiOjEwfQ");
            then.status(200).json_body(json!({
                "data": [{
                    "hash": "tx1",
                    "type": "rewards_v2",
                    "time": 1_700_000_000,
                    "height": 1_200_000,
                    "rewards": [{ "amount": 10 }]
                }],
                "cursor": "eyJiZWZvcmUiOjl9"
            }));
        });

        let types = ["rewards_v1", "rewards_v2", "rewards_v3"];
        let page = client.get_activity(&query(&types, Some("eyJiZWZvcmUiOjEwfQ"))).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].txn_type, "rewards_v2");
        assert_eq!(page.items[0].height, 1_200_000);
        assert_eq!(page.items[0].extra["rewards"], json!([{ "amount": 10 }]));
        assert_eq!(page.cursor.as_deref(), Some("eyJiZWZvcmUiOjl9"));
        assert!(page.has_more);
        mock.assert();
    }

    #[tokio::test]
    async fn test_get_activity_unfiltered_last_page() {
        let (server, client) = create_test_client();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/accounts/112abc/activity")
                .matches(|req| req.query_params.iter().flatten().next().is_none());
            then.status(200).json_body(json!({ "data": [] }));
        });

        let query = ActivityQuery { context: EntityContext::Account, ..query(&[], None) };
        let page = client.get_activity(&query).await.unwrap();

        assert!(page.items.is_empty());
        assert!(!page.has_more);
        assert_eq!(page.cursor, None);
        mock.assert();
    }

    #[tokio::test]
    async fn test_api_error() {
        let (server, client) = create_test_client();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1/validators/112abc/activity");
            then.status(500);
        });

        let query = ActivityQuery { context: EntityContext::Validator, ..query(&[], None) };
        let err = client.get_activity(&query).await.unwrap_err();

        assert!(matches!(
            err,
            ExplorerError::Api { status, .. }
                if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR
        ));
        mock.assert();
    }

    #[test]
    fn endpoint_encodes_address_segment() {
        let base_url = Url::parse("http://localhost:8080/api/").unwrap();
        let client = ExplorerClient::new(base_url).unwrap();

        let url = client.endpoint(&["v1", "hotspots", "a/b?c#d", "activity"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/hotspots/a%2Fb%3Fc%23d/activity");
        assert_eq!(url.query(), None);

        let client = ExplorerClient::new(Url::parse("http://localhost:8080").unwrap()).unwrap();
        let url = client.endpoint(&["v1", "accounts", "112abc", "activity"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/accounts/112abc/activity");
    }
}
