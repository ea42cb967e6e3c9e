//! reqwest-backed YouTube Data API v3 client

use crate::api::{BatchGetClient, ListRequest, Page, PagedListClient, Resource};
use crate::config::YouTubeConfig;
use crate::{CollectError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;
use yt_core::PageCursor;

/// Subset of a list response the collectors consume
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<Value>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

/// API-key authenticated client for the YouTube Data API
pub struct YouTubeClient {
    config: YouTubeConfig,
    client: reqwest::Client,
}

impl YouTubeClient {
    pub fn new(config: YouTubeConfig) -> Result<Self> {
        if config.api_key().map_or(true, str::is_empty) {
            return Err(CollectError::Configuration(
                "YouTube API key required".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &YouTubeConfig {
        &self.config
    }

    /// Full request URL for one page of `request`
    pub fn list_url(&self, request: &ListRequest, cursor: Option<&PageCursor>) -> Result<Url> {
        let base = self.config.base_url().trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/{}", base, request.resource().path()))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("part", &request.part_param());
            for (name, value) in request.filters() {
                query.append_pair(name, value);
            }
            if let Some(max_results) = request.max_results() {
                query.append_pair("maxResults", &max_results.to_string());
            }
            if let Some(cursor) = cursor {
                query.append_pair("pageToken", cursor.as_str());
            }
            if let Some(key) = self.config.api_key() {
                query.append_pair("key", key);
            }
        }

        Ok(url)
    }

    async fn fetch(&self, url: Url) -> Result<ListResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CollectError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PagedListClient for YouTubeClient {
    async fn list_page(&self, request: &ListRequest, cursor: Option<&PageCursor>) -> Result<Page> {
        debug!(
            "GET {} part={} page_token={}",
            request.resource().path(),
            request.part_param(),
            cursor.map_or("-", PageCursor::as_str)
        );

        let url = self.list_url(request, cursor)?;
        let response = self.fetch(url).await?;

        Ok(Page {
            items: response.items,
            next_cursor: PageCursor::from_token(response.next_page_token),
        })
    }
}

#[async_trait]
impl BatchGetClient for YouTubeClient {
    async fn get_batch(&self, resource: Resource, ids: &[String], parts: &[&str]) -> Result<Vec<Value>> {
        let request = parts
            .iter()
            .fold(ListRequest::new(resource), |request, part| request.with_part(part))
            .with_filter("id", ids.join(","));

        debug!(
            "GET {} part={} ids={}",
            resource.path(),
            request.part_param(),
            ids.len()
        );

        let url = self.list_url(&request, None)?;
        Ok(self.fetch(url).await?.items)
    }
}
