use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use yt_collect::{
    get_channel_info, get_comments, get_video_info, get_videos_in_time_range, YouTubeClient,
};
use yt_core::FieldSelection;
use yt_insights::{comparison_report, video_table, Config};
use yt_modeling::{
    baseline_by_name, compare, compare_isolated, ModelOutcome, MonotonicClock, NamedModel,
    TrainTestSplit, BASELINE_NAMES,
};

#[derive(Parser, Debug)]
#[command(name = "yt-insights", version, author = "TigreRoll")]
#[command(about = "Collect YouTube channel, video and comment data and compare classifiers")]
struct Cli {
    /// Configuration file (defaults to yt-insights.toml or config/yt-insights.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Channel title, country and statistics for one or more channel ids
    Channels {
        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<String>,
    },

    /// Ids of the videos a channel published inside a time window
    Videos {
        #[arg(long)]
        channel: String,

        /// Lower bound, RFC 3339 (e.g. 2023-09-09T00:00:00Z)
        #[arg(long)]
        after: String,

        /// Upper bound, RFC 3339
        #[arg(long)]
        before: String,
    },

    /// Selected fields for a batch of at most 50 videos
    VideoInfo {
        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<String>,

        /// Fields taken from `snippet`
        #[arg(long, value_delimiter = ',')]
        snippet: Vec<String>,

        /// Fields taken from `contentDetails`
        #[arg(long, value_delimiter = ',')]
        content: Vec<String>,

        /// Fields taken from `statistics`
        #[arg(long, value_delimiter = ',')]
        statistics: Vec<String>,

        /// Send oversized batches with a warning instead of rejecting them
        #[arg(long)]
        allow_oversized: bool,
    },

    /// Top-level comments of a video
    Comments {
        #[arg(long)]
        video: String,
    },

    /// Fit and score baseline classifiers on a JSON train/test split
    Compare {
        /// JSON file with x_train, y_train, x_test, y_test
        #[arg(long)]
        split: PathBuf,

        /// Baselines to run, in report order
        #[arg(long, value_delimiter = ',', default_value = "majority,nearest-centroid,threshold")]
        models: Vec<String>,

        /// Report failing models instead of aborting the comparison
        #[arg(long)]
        isolate: bool,
    },

    /// Show the effective configuration, optionally writing it to a file
    Config {
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Channels { ids } => {
            let client = api_client(&config)?;
            let channels = get_channel_info(&client, &ids).await?;
            print_json(&channels)?;
        }
        Commands::Videos {
            channel,
            after,
            before,
        } => {
            let client = api_client(&config)?;
            let video_ids = get_videos_in_time_range(&client, &channel, &after, &before).await?;
            print_json(&video_ids)?;
        }
        Commands::VideoInfo {
            ids,
            snippet,
            content,
            statistics,
            allow_oversized,
        } => {
            let client = api_client(&config)?;
            let selection = FieldSelection::new()
                .with_snippet(snippet)
                .with_content(content)
                .with_statistics(statistics);
            let policy = config.batch_policy(allow_oversized);

            let records = get_video_info(&client, &ids, &selection, policy).await?;
            print_json(&video_table(&selection, &records))?;
        }
        Commands::Comments { video } => {
            let client = api_client(&config)?;
            let comments = get_comments(&client, &video).await?;
            print_json(&comments)?;
        }
        Commands::Compare {
            split,
            models,
            isolate,
        } => {
            let split = TrainTestSplit::load(&split)
                .with_context(|| format!("Failed to load split {}", split.display()))?;
            let mut models = build_models(&models)?;
            let clock = MonotonicClock::new();

            info!("📊 Comparing {} models", models.len());
            let outcomes = if isolate {
                compare_isolated(&mut models, &split, &clock)?
            } else {
                compare(&mut models, &split, &clock)?
                    .into_iter()
                    .map(ModelOutcome::Evaluated)
                    .collect()
            };
            print_json(&comparison_report(&outcomes))?;
        }
        Commands::Config { save } => {
            println!("{}", config.summary());
            if let Some(path) = save {
                config.save(&path)?;
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn api_client(config: &Config) -> Result<YouTubeClient> {
    config.validate()?;
    Ok(YouTubeClient::new(config.youtube.clone())?)
}

fn build_models(names: &[String]) -> Result<Vec<NamedModel>> {
    names
        .iter()
        .map(|name| {
            baseline_by_name(name)
                .map(|model| (name.clone(), model))
                .ok_or_else(|| {
                    anyhow!(
                        "Unknown model '{}', expected one of: {}",
                        name,
                        BASELINE_NAMES.join(", ")
                    )
                })
        })
        .collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
