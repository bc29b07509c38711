//! `vts`: inspect media creation times and check them against a session.
//!
//! Usage:
//!   vts probe ride.mp4
//!   vts probe ride.mp4 --session-start 2023-11-14T22:13:20Z --session-end 1700000600
//!   vts config

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use vts_core::config::ConfigManager;
use vts_core::container::read_source_metadata;
use vts_core::logging::{init_tracing, LogLevel};
use vts_core::models::{ByteSource, SessionTimeline};
use vts_core::timeline::align;

#[derive(Parser, Debug)]
#[command(name = "vts", version, about = "Video/telemetry sync tools")]
struct Cli {
    /// Config file (created with defaults if missing)
    #[arg(short, long, default_value = ".config/vts.toml")]
    config: PathBuf,

    /// Log level when RUST_LOG is unset (overrides the config file)
    #[arg(long)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a video's creation time and, given a session, its alignment
    Probe {
        /// MP4 or QuickTime file
        file: PathBuf,

        /// Session start (epoch seconds or RFC 3339)
        #[arg(long, value_parser = parse_timestamp, requires = "session_end")]
        session_start: Option<i64>,

        /// Session end (epoch seconds or RFC 3339)
        #[arg(long, value_parser = parse_timestamp, requires = "session_start")]
        session_end: Option<i64>,

        /// Media duration in seconds, when the file header lacks one
        #[arg(long)]
        duration: Option<f64>,
    },
    /// Print the effective configuration
    Config,
}

/// Accept either integer epoch seconds or an RFC 3339 timestamp.
fn parse_timestamp(value: &str) -> Result<i64, String> {
    if let Ok(seconds) = value.parse::<i64>() {
        return Ok(seconds);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.timestamp())
        .map_err(|e| format!("expected epoch seconds or RFC 3339 timestamp: {e}"))
}

fn format_epoch(seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| seconds.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigManager::new(&cli.config);
    config
        .load_or_create()
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    init_tracing(cli.log_level.unwrap_or(config.settings().logging.level));

    match cli.command {
        Command::Probe {
            file,
            session_start,
            session_end,
            duration,
        } => {
            let source = ByteSource::File(file.clone());
            let metadata = read_source_metadata(&source)
                .await
                .with_context(|| format!("reading {}", file.display()))?;

            println!("file:          {}", file.display());
            println!(
                "created:       {} ({})",
                format_epoch(metadata.creation_time_epoch_seconds),
                metadata.creation_time_epoch_seconds
            );
            match metadata.duration_seconds {
                Some(d) => println!("duration:      {d:.3}s"),
                None => println!("duration:      unknown"),
            }

            let (Some(start), Some(end)) = (session_start, session_end) else {
                return Ok(());
            };
            let session = SessionTimeline::new(start, end);
            if session.duration_seconds() < 0 {
                bail!("session end {end} is before session start {start}");
            }
            let Some(media_duration) = duration.or(metadata.duration_seconds) else {
                bail!("file has no duration; pass --duration");
            };

            let alignment = align(metadata.creation_time_epoch_seconds, media_duration, &session);
            println!(
                "session:       {} .. {}",
                format_epoch(session.start_epoch_seconds),
                format_epoch(session.end_epoch_seconds)
            );
            println!("offset:        {}s", alignment.time_offset_seconds);
            println!("overlaps:      {}", alignment.overlaps);
            println!(
                "start at:      {:.3}s into the video",
                alignment.initial_video_position(media_duration)
            );

            if !alignment.overlaps {
                tracing::warn!("Video and session do not overlap");
            }
        }
        Command::Config => {
            let settings = config.settings();
            println!("# {}", config.path().display());
            println!("overlap_policy        = {}", settings.sync.overlap_policy);
            println!("metadata_timeout_ms   = {}", settings.sync.metadata_timeout_ms);
            println!("seek_to_session_start = {}", settings.sync.seek_to_session_start);
            println!("log level             = {:?}", settings.logging.level);
        }
    }

    Ok(())
}
