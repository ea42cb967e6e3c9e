//! Channel, search, video and comment-thread collectors

use crate::api::{BatchGetClient, ListRequest, PagedListClient, Resource};
use crate::collector::{Collector, Pagination};
use crate::config::BatchLimitPolicy;
use crate::{CollectError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};
use yt_core::{
    extract_video_record, require_path, ChannelRecord, CommentRecord, CoreError, FieldSelection,
    VideoRecord, MAX_BATCH_IDS,
};

/// Page size for `search.list`
pub const SEARCH_PAGE_SIZE: u32 = 50;

/// Page size for `commentThreads.list`
pub const COMMENT_PAGE_SIZE: u32 = 100;

/// Parts requested for batch video lookups
const VIDEO_PARTS: [&str; 3] = ["snippet", "contentDetails", "statistics"];

/// Look up channels by id in a single `channels.list` call
pub async fn get_channel_info<C: PagedListClient + ?Sized>(
    client: &C,
    channel_ids: &[String],
) -> Result<Vec<ChannelRecord>> {
    if channel_ids.is_empty() {
        debug!("No channel ids given, skipping channels.list");
        return Ok(Vec::new());
    }

    let request = ListRequest::new(Resource::Channels)
        .with_part("snippet")
        .with_part("statistics")
        .with_filter("id", channel_ids.join(","));

    let channels = Collector::new(client, request)
        .with_pagination(Pagination::SinglePage)
        .collect(|item| ChannelRecord::from_item(item).map(Some))
        .await?;

    info!("Fetched {} of {} channels", channels.len(), channel_ids.len());
    Ok(channels)
}

/// Ids of every video a channel published inside `[published_after, published_before]`.
///
/// Both bounds are RFC 3339 timestamps, e.g. `2023-09-09T00:00:00Z`.
pub async fn get_videos_in_time_range<C: PagedListClient + ?Sized>(
    client: &C,
    channel_id: &str,
    published_after: &str,
    published_before: &str,
) -> Result<Vec<String>> {
    let after = parse_bound("published_after", published_after)?;
    let before = parse_bound("published_before", published_before)?;
    if after > before {
        return Err(CollectError::InvalidTimeRange(format!(
            "{} is later than {}",
            published_after, published_before
        )));
    }

    let request = ListRequest::new(Resource::Search)
        .with_part("snippet")
        .with_filter("channelId", channel_id)
        .with_filter("publishedAfter", after.to_rfc3339_opts(SecondsFormat::Secs, true))
        .with_filter("publishedBefore", before.to_rfc3339_opts(SecondsFormat::Secs, true))
        .with_filter("q", "")
        .with_filter("type", "video")
        .with_max_results(SEARCH_PAGE_SIZE);

    let video_ids = Collector::new(client, request)
        .collect(|item| search_video_id(item).map(Some))
        .await?;

    info!(
        "Channel {} published {} videos between {} and {}",
        channel_id,
        video_ids.len(),
        published_after,
        published_before
    );
    Ok(video_ids)
}

/// Fetch up to 50 videos in one `videos.list` call and flatten each one
pub async fn get_video_info<C: BatchGetClient + ?Sized>(
    client: &C,
    video_ids: &[String],
    selection: &FieldSelection,
    policy: BatchLimitPolicy,
) -> Result<Vec<VideoRecord>> {
    if video_ids.len() > MAX_BATCH_IDS {
        match policy {
            BatchLimitPolicy::Reject => {
                return Err(CollectError::BatchTooLarge {
                    requested: video_ids.len(),
                    limit: MAX_BATCH_IDS,
                })
            }
            BatchLimitPolicy::Warn => warn!(
                "Number of videos ({}) exceeds the limit of {}, sending batch anyway",
                video_ids.len(),
                MAX_BATCH_IDS
            ),
        }
    }

    if video_ids.is_empty() {
        debug!("No video ids given, skipping videos.list");
        return Ok(Vec::new());
    }

    let items = client.get_batch(Resource::Videos, video_ids, &VIDEO_PARTS).await?;
    debug!("videos.list returned {} of {} videos", items.len(), video_ids.len());

    extract_batch(&items, selection)
}

/// Flatten every item of one batch response; one missing sub-object fails the batch
pub fn extract_batch(items: &[Value], selection: &FieldSelection) -> Result<Vec<VideoRecord>> {
    items
        .iter()
        .map(|item| extract_video_record(item, selection).map_err(CollectError::from))
        .collect()
}

/// Top-level comments of one video, following every page
pub async fn get_comments<C: PagedListClient + ?Sized>(
    client: &C,
    video_id: &str,
) -> Result<Vec<CommentRecord>> {
    let request = ListRequest::new(Resource::CommentThreads)
        .with_part("snippet")
        .with_filter("videoId", video_id)
        .with_max_results(COMMENT_PAGE_SIZE);

    let comments = Collector::new(client, request)
        .collect(|item| CommentRecord::from_thread(item).map(Some))
        .await?;

    info!("Fetched {} comments for video {}", comments.len(), video_id);
    Ok(comments)
}

fn parse_bound(name: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CollectError::InvalidTimeRange(format!("{} '{}': {}", name, value, e)))
}

fn search_video_id(item: &Value) -> std::result::Result<String, CoreError> {
    let id = require_path(item, &["id", "videoId"])?;
    id.as_str()
        .map(str::to_string)
        .ok_or_else(|| CoreError::InvalidField {
            path: "id.videoId".to_string(),
            reason: format!("expected a string, found {}", id),
        })
}
