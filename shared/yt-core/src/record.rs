//! Flat records extracted from channel, video and comment-thread items

use crate::projection::{item_label, project, require_object, require_path, require_str};
use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Channel summary from `channels.list` with `snippet,statistics`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelRecord {
    pub id: String,
    pub title: String,

    /// Not every channel publishes a country
    pub country: Option<String>,

    pub view_count: u64,
    pub subscriber_count: u64,
    pub video_count: u64,
}

impl ChannelRecord {
    const SNIPPET_FIELDS: [&'static str; 2] = ["title", "country"];
    const STATISTIC_FIELDS: [&'static str; 3] = ["viewCount", "subscriberCount", "videoCount"];

    /// Build a channel record from one raw `channels.list` item
    pub fn from_item(item: &Value) -> Result<Self> {
        let id = require_id(item)?;
        let snippet = project(&Self::SNIPPET_FIELDS, require_object(item, "snippet")?);
        let stats = project(&Self::STATISTIC_FIELDS, require_object(item, "statistics")?);

        let title = match &snippet[0] {
            Some(Value::String(title)) => title.clone(),
            Some(other) => return Err(invalid("snippet.title", other, "expected a string")),
            None => {
                return Err(CoreError::MissingField {
                    path: "snippet.title".to_string(),
                })
            }
        };
        let country = match &snippet[1] {
            Some(Value::String(country)) => Some(country.clone()),
            Some(other) => {
                debug!("Channel {} has non-string country {}, treating as absent", id, other);
                None
            }
            None => {
                debug!("Channel {} publishes no country", id);
                None
            }
        };

        Ok(Self {
            id,
            title,
            country,
            view_count: parse_count("statistics.viewCount", &stats[0])?,
            subscriber_count: parse_count("statistics.subscriberCount", &stats[1])?,
            video_count: parse_count("statistics.videoCount", &stats[2])?,
        })
    }
}

/// Which fields to pull from each sub-object of a video item
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldSelection {
    snippet: Vec<String>,
    content: Vec<String>,
    statistics: Vec<String>,
}

impl FieldSelection {
    /// Create an empty selection (records will carry only the id)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set snippet fields
    pub fn with_snippet<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.snippet = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set contentDetails fields
    pub fn with_content<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.content = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set statistics fields
    pub fn with_statistics<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.statistics = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn snippet(&self) -> &[String] {
        &self.snippet
    }

    pub fn content(&self) -> &[String] {
        &self.content
    }

    pub fn statistics(&self) -> &[String] {
        &self.statistics
    }

    /// Number of projected slots (excluding the id)
    pub fn len(&self) -> usize {
        self.snippet.len() + self.content.len() + self.statistics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names in record order, starting with `id`
    pub fn columns(&self) -> Vec<String> {
        std::iter::once("id".to_string())
            .chain(self.snippet.iter().cloned())
            .chain(self.content.iter().cloned())
            .chain(self.statistics.iter().cloned())
            .collect()
    }
}

/// Video id followed by snippet, contentDetails and statistics projections
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRecord {
    pub id: String,
    pub values: Vec<Option<Value>>,
}

impl VideoRecord {
    /// Flatten into a single row, `null` standing in for absent fields
    pub fn to_row(&self) -> Vec<Value> {
        std::iter::once(Value::String(self.id.clone()))
            .chain(self.values.iter().map(|v| v.clone().unwrap_or(Value::Null)))
            .collect()
    }

    /// Row width, always `1 + selection.len()`
    pub fn width(&self) -> usize {
        1 + self.values.len()
    }
}

/// Flatten one `videos.list` item according to `selection`.
///
/// All three sub-objects must be present even when their field list is empty.
pub fn extract_video_record(item: &Value, selection: &FieldSelection) -> Result<VideoRecord> {
    let id = require_id(item)?;
    let snippet = require_object(item, "snippet")?;
    let content = require_object(item, "contentDetails")?;
    let statistics = require_object(item, "statistics")?;

    let mut values = Vec::with_capacity(selection.len());
    values.extend(project(selection.snippet(), snippet));
    values.extend(project(selection.content(), content));
    values.extend(project(selection.statistics(), statistics));

    Ok(VideoRecord { id, values })
}

/// Top-level comment of a comment thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentRecord {
    pub author_display_name: String,
    pub published_at: String,
    pub text: String,
}

impl CommentRecord {
    /// Build a comment record from one raw `commentThreads.list` item
    pub fn from_thread(item: &Value) -> Result<Self> {
        let comment = require_path(item, &["snippet", "topLevelComment", "snippet"])?
            .as_object()
            .ok_or_else(|| CoreError::MissingStructure {
                item_id: item_label(item),
                section: "snippet.topLevelComment.snippet".to_string(),
            })?;

        Ok(Self {
            author_display_name: comment_str(comment, "authorDisplayName")?.to_string(),
            published_at: comment_str(comment, "publishedAt")?.to_string(),
            text: comment_str(comment, "textOriginal")?.to_string(),
        })
    }
}

/// Required string under `snippet.topLevelComment.snippet`, reported with its full path
fn comment_str<'a>(comment: &'a serde_json::Map<String, Value>, key: &str) -> Result<&'a str> {
    const SECTION: &str = "snippet.topLevelComment.snippet";
    require_str(comment, key).map_err(|e| match e {
        CoreError::MissingField { path } => CoreError::MissingField {
            path: format!("{}.{}", SECTION, path),
        },
        CoreError::InvalidField { path, reason } => CoreError::InvalidField {
            path: format!("{}.{}", SECTION, path),
            reason,
        },
        other => other,
    })
}

fn require_id(item: &Value) -> Result<String> {
    match item.get("id") {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(other) => Err(invalid("id", other, "expected a string")),
        None => Err(CoreError::MissingField {
            path: "id".to_string(),
        }),
    }
}

/// Statistics arrive as decimal strings
fn parse_count(path: &str, value: &Option<Value>) -> Result<u64> {
    match value {
        Some(Value::String(s)) => s.parse().map_err(|e| CoreError::InvalidField {
            path: path.to_string(),
            reason: format!("{}: {:?}", e, s),
        }),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| invalid(path, &Value::Number(n.clone()), "expected a non-negative integer")),
        Some(other) => Err(invalid(path, other, "expected a count")),
        None => Err(CoreError::MissingField {
            path: path.to_string(),
        }),
    }
}

fn invalid(path: &str, value: &Value, reason: &str) -> CoreError {
    CoreError::InvalidField {
        path: path.to_string(),
        reason: format!("{}, found {}", reason, value),
    }
}
