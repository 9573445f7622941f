use crate::core::config::ClientConfig;
use crate::data::category::Category;
use crate::data::record::{parse_records, Record};
use crate::fetch::query::BoundsQuery;
use crate::{MapError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;

/// Shared async HTTP client for record requests
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Anything that can return the records of a category inside a bounding box
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, category: &Category, query: &BoundsQuery) -> Result<Vec<Record>>;
}

/// Fetches records with `GET <base>/api/<category>?west=..&north=..&east=..&south=..`
pub struct HttpRecordSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            base_url: base_url.into(),
        }
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        #[cfg(not(target_arch = "wasm32"))]
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        #[cfg(target_arch = "wasm32")]
        let client = reqwest::Client::builder().build()?;

        Ok(Self::with_client(config.api_base_url.clone(), client))
    }

    /// Full endpoint URL for a category, without the query string
    pub fn endpoint(&self, category: &Category) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), category.api_path())
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl RecordSource for HttpRecordSource {
    async fn fetch(&self, category: &Category, query: &BoundsQuery) -> Result<Vec<Record>> {
        let url = self.endpoint(category);
        log::debug!("GET {}?{}", url, query.to_query_string());

        let response = self.client.get(&url).query(&query.pairs()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MapError::HttpStatus {
                category: category.id.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        parse_records(&body)
    }
}
