//! Capabilities the collectors need from an API client

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use yt_core::PageCursor;

/// List endpoints used by the collectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resource {
    Channels,
    Search,
    Videos,
    CommentThreads,
}

impl Resource {
    /// Path segment under the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Channels => "channels",
            Resource::Search => "search",
            Resource::Videos => "videos",
            Resource::CommentThreads => "commentThreads",
        }
    }
}

/// One listing request, minus the page token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRequest {
    resource: Resource,
    parts: Vec<String>,
    filters: Vec<(String, String)>,
    max_results: Option<u32>,
}

impl ListRequest {
    /// Create a request against `resource` with no parts or filters
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            parts: Vec::new(),
            filters: Vec::new(),
            max_results: None,
        }
    }

    /// Add a resource part (`snippet`, `statistics`, ...)
    pub fn with_part(mut self, part: &str) -> Self {
        self.parts.push(part.to_string());
        self
    }

    /// Add a query filter; insertion order is kept
    pub fn with_filter(mut self, name: &str, value: impl Into<String>) -> Self {
        self.filters.push((name.to_string(), value.into()));
        self
    }

    /// Set the page size
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Comma-joined `part` parameter
    pub fn part_param(&self) -> String {
        self.parts.join(",")
    }

    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }

    /// Value of a filter by name
    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn max_results(&self) -> Option<u32> {
        self.max_results
    }
}

/// One page of raw items plus the continuation cursor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    pub next_cursor: Option<PageCursor>,
}

impl Page {
    /// Final page, no continuation
    pub fn last(items: Vec<Value>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    /// Page followed by another one
    pub fn with_next(items: Vec<Value>, token: &str) -> Self {
        Self {
            items,
            next_cursor: PageCursor::from_token(Some(token.to_string())),
        }
    }
}

/// Client that can fetch one page of a list endpoint
#[async_trait]
pub trait PagedListClient: Send + Sync {
    async fn list_page(&self, request: &ListRequest, cursor: Option<&PageCursor>) -> Result<Page>;
}

/// Client that can fetch many resources by id in one request
#[async_trait]
pub trait BatchGetClient: Send + Sync {
    async fn get_batch(&self, resource: Resource, ids: &[String], parts: &[&str]) -> Result<Vec<Value>>;
}
