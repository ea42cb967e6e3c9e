//! Cursor-following collector for paged list endpoints

use crate::api::{ListRequest, PagedListClient};
use crate::{CollectError, Result};
use serde_json::Value;
use tracing::debug;
use yt_core::PageCursor;

/// How many pages a collection run may request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// Exactly one request; any returned cursor is ignored
    SinglePage,

    /// Keep requesting until the response carries no cursor
    FollowCursor,
}

/// Runs one listing request to completion and extracts a record per item
pub struct Collector<'a, C: PagedListClient + ?Sized> {
    client: &'a C,
    request: ListRequest,
    pagination: Pagination,
}

impl<'a, C: PagedListClient + ?Sized> Collector<'a, C> {
    /// Create a cursor-following collector
    pub fn new(client: &'a C, request: ListRequest) -> Self {
        Self {
            client,
            request,
            pagination: Pagination::FollowCursor,
        }
    }

    /// Set pagination mode
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn request(&self) -> &ListRequest {
        &self.request
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Fetch pages sequentially, applying `extract` to every item in order.
    ///
    /// `extract` may drop an item by returning `Ok(None)`. The first failing
    /// page request or extraction aborts the run and nothing collected so far
    /// is returned.
    pub async fn collect<T, E, F>(&self, mut extract: F) -> Result<Vec<T>>
    where
        F: FnMut(&Value) -> std::result::Result<Option<T>, E>,
        E: Into<CollectError>,
    {
        let resource = self.request.resource().path();
        let mut records = Vec::new();
        let mut cursor: Option<PageCursor> = None;
        let mut pages = 0usize;

        loop {
            let page = self.client.list_page(&self.request, cursor.as_ref()).await?;
            pages += 1;
            debug!(
                "{}: page {} returned {} items",
                resource,
                pages,
                page.items.len()
            );

            for item in &page.items {
                match extract(item) {
                    Ok(Some(record)) => records.push(record),
                    Ok(None) => {}
                    Err(e) => return Err(e.into()),
                }
            }

            cursor = match self.pagination {
                Pagination::SinglePage => None,
                Pagination::FollowCursor => page.next_cursor,
            };

            if cursor.is_none() {
                break;
            }
        }

        debug!(
            "{}: collected {} records across {} pages",
            resource,
            records.len(),
            pages
        );
        Ok(records)
    }
}
