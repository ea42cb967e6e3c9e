/// yt-insights - YouTube Data API collectors and classifier comparison
///
/// The collectors live in `yt-collect` (records and projection in `yt-core`),
/// the comparison loop in `yt-modeling`. This crate adds configuration and
/// output helpers for the command-line front end.

pub mod config;
pub mod output;

// Re-export main types for easy access
pub use crate::config::{Config, LoggingConfig};
pub use crate::output::{comparison_report, video_table};
pub use yt_collect::{BatchLimitPolicy, YouTubeClient, YouTubeConfig};
pub use yt_core::{ChannelRecord, CommentRecord, FieldSelection, VideoRecord};
pub use yt_modeling::{ModelEvaluation, ModelOutcome, TrainTestSplit};
