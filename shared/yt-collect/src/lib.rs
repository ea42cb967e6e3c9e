//! YT Collect - Paginated collectors over the YouTube Data API list endpoints

pub mod api;
pub mod client;
pub mod collector;
pub mod config;
pub mod mock;
pub mod youtube;

pub use api::{BatchGetClient, ListRequest, Page, PagedListClient, Resource};
pub use client::YouTubeClient;
pub use collector::{Collector, Pagination};
pub use config::{BatchLimitPolicy, YouTubeConfig};
pub use youtube::{
    extract_batch, get_channel_info, get_comments, get_video_info, get_videos_in_time_range,
    COMMENT_PAGE_SIZE, SEARCH_PAGE_SIZE,
};

pub use yt_core::{ChannelRecord, CommentRecord, CoreError, FieldSelection, PageCursor, VideoRecord};

/// Result type for collection operations
pub type Result<T> = std::result::Result<T, CollectError>;

/// Error types for collection operations
#[derive(thiserror::Error, Debug)]
pub enum CollectError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YouTube API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Malformed item: {0}")]
    Core(#[from] CoreError),

    #[error("Batch of {requested} ids exceeds the limit of {limit}")]
    BatchTooLarge { requested: usize, limit: usize },

    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
