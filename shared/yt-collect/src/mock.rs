//! Scripted clients for exercising collectors without the network

use crate::api::{BatchGetClient, ListRequest, Page, PagedListClient, Resource};
use crate::{CollectError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Mutex, PoisonError};
use yt_core::PageCursor;

/// Paged client that replays a fixed sequence of pages
pub struct MockPagedClient {
    pages: Vec<Page>,
    fail_on_call: Option<usize>,
    calls: Mutex<Vec<(ListRequest, Option<String>)>>,
}

impl MockPagedClient {
    pub fn new(pages: Vec<Page>) -> Self {
        Self {
            pages,
            fail_on_call: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make the n-th request (0-based) fail with a 503
    pub fn with_failure_on(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Number of page requests served so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Cursor sent with each request, in order
    pub fn requested_cursors(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cursor)| cursor.clone())
            .collect()
    }

    /// Requests received, in order
    pub fn requests(&self) -> Vec<ListRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }
}

#[async_trait]
impl PagedListClient for MockPagedClient {
    async fn list_page(&self, request: &ListRequest, cursor: Option<&PageCursor>) -> Result<Page> {
        let call = {
            let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
            calls.push((request.clone(), cursor.map(|c| c.as_str().to_string())));
            calls.len() - 1
        };

        if self.fail_on_call == Some(call) {
            return Err(CollectError::Api {
                status: 503,
                body: "backendError".to_string(),
            });
        }

        self.pages
            .get(call)
            .cloned()
            .ok_or_else(|| CollectError::Configuration(format!("no scripted page for call {}", call)))
    }
}

/// Batch client that returns the same items for every request
pub struct MockBatchClient {
    items: Vec<Value>,
    calls: Mutex<Vec<(Resource, Vec<String>, Vec<String>)>>,
}

impl MockBatchClient {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of batch requests served so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Ids and parts of the most recent request
    pub fn last_call(&self) -> Option<(Resource, Vec<String>, Vec<String>)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl BatchGetClient for MockBatchClient {
    async fn get_batch(&self, resource: Resource, ids: &[String], parts: &[&str]) -> Result<Vec<Value>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push((
            resource,
            ids.to_vec(),
            parts.iter().map(|p| p.to_string()).collect(),
        ));
        Ok(self.items.clone())
    }
}
