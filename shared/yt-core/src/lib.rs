//! YT Core - Shared record types and field projection for YouTube Data API items

pub mod cursor;
pub mod projection;
pub mod record;

pub use cursor::PageCursor;
pub use projection::{project, require_object, require_path, require_str};
pub use record::{
    extract_video_record, ChannelRecord, CommentRecord, FieldSelection, VideoRecord,
};

/// Upstream maximum for a single `videos.list` batch
pub const MAX_BATCH_IDS: usize = 50;

/// Result type for YT Core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Error types for YT Core operations
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Item {item_id} is missing the '{section}' object")]
    MissingStructure { item_id: String, section: String },

    #[error("Required field missing: {path}")]
    MissingField { path: String },

    #[error("Invalid value for {path}: {reason}")]
    InvalidField { path: String, reason: String },
}
