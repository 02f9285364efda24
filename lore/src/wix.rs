//! [`ContentStore`] backed by the Wix Data REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::store::{ContentStore, Filter, Record, StoreError};

pub const DEFAULT_BASE_URL: &str = "https://www.wixapis.com";

/// Credentials and connection settings for [`WixStore`].
#[derive(Clone, Debug)]
pub struct WixConfig {
    pub base_url: String,
    pub api_key: String,
    pub account_id: String,
    pub site_id: String,
    pub timeout: Duration,
}

impl Default for WixConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: String::new(),
            account_id: String::new(),
            site_id: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(rename = "dataItems", default)]
    data_items: Vec<DataItem>,
}

#[derive(Deserialize)]
struct DataItem {
    #[serde(default)]
    data: Option<Record>,
}

pub struct WixStore {
    config: WixConfig,
    client: reqwest::Client,
}

impl WixStore {
    pub fn new(config: WixConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn query_url(&self) -> String {
        format!(
            "{}/wix-data/v2/items/query",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ContentStore for WixStore {
    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Record>, StoreError> {
        info!(collection, "querying wix collection");
        let body = json!({
            "dataCollectionId": collection,
            "query": {
                "filter": filter.to_json(),
                "sort": [],
                "paging": { "limit": limit },
            },
        });
        let resp = self
            .client
            .post(self.query_url())
            .header("Authorization", self.config.api_key.as_str())
            .header("wix-site-id", self.config.site_id.as_str())
            .header("wix-account-id", self.config.account_id.as_str())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(collection, %status, %body, "wix api error");
            return Err(StoreError::Status { status, body });
        }

        let bytes = resp.bytes().await?;
        let parsed: QueryResponse = serde_json::from_slice(&bytes)?;
        let records: Vec<Record> = parsed
            .data_items
            .into_iter()
            .map(|item| item.data.unwrap_or_default())
            .collect();
        info!(collection, found = records.len(), "wix query complete");
        Ok(records)
    }
}
