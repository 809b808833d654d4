//! Process-wide logging for the server and the admin tool.
//!
//! Without a `[log]` table spdlog's default console logger stays in place.

use std::sync::Arc;
use std::time::Duration;

use spdlog::sink::{RotatingFileSink, RotationPolicy, StdStream, StdStreamSink};
use spdlog::{Level, LevelFilter, Logger, LoggerBuilder};

use crate::config::{Config, Log, LogLevel};

const LOGGER_NAME: &str = "myblog";

/// Daily files kept before the oldest is removed
const KEPT_LOG_FILES: usize = 60;

impl From<LogLevel> for Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Critical => Level::Critical,
            LogLevel::Error => Level::Error,
            LogLevel::Warn => Level::Warn,
            LogLevel::Info => Level::Info,
            LogLevel::Debug => Level::Debug,
            LogLevel::Trace => Level::Trace,
        }
    }
}

/// Warnings and errors go to stderr, everything below to stdout.
fn add_console_sinks(builder: &mut LoggerBuilder) -> spdlog::Result<()> {
    let below_warn = StdStreamSink::builder()
        .std_stream(StdStream::Stdout)
        .level_filter(LevelFilter::MoreVerbose(Level::Warn))
        .build()?;
    let warn_and_up = StdStreamSink::builder()
        .std_stream(StdStream::Stderr)
        .level_filter(LevelFilter::MoreSevereEqual(Level::Warn))
        .build()?;

    builder.sink(Arc::new(below_warn)).sink(Arc::new(warn_and_up));
    Ok(())
}

fn daily_file_sink(log: &Log) -> spdlog::Result<RotatingFileSink> {
    RotatingFileSink::builder()
        .base_path(&log.location)
        .rotation_policy(RotationPolicy::Daily { hour: 0, minute: 0 })
        .max_files(KEPT_LOG_FILES)
        .rotate_on_open(false)
        .build()
}

/// Builds the logger described by a `[log]` table without installing it.
pub fn build_logger(log: &Log) -> spdlog::Result<Logger> {
    let mut builder = Logger::builder();
    builder
        .name(LOGGER_NAME)
        .level_filter(LevelFilter::MoreSevereEqual(log.level.into()))
        .sink(Arc::new(daily_file_sink(log)?));

    if log.log_to_console {
        add_console_sinks(&mut builder)?;
    }

    let logger = builder.build()?;
    logger.set_flush_level_filter(LevelFilter::MoreSevereEqual(Level::Info));
    Ok(logger)
}

pub fn configure_logger(config: &Config) -> spdlog::Result<()> {
    let Some(ref log) = config.log else {
        return Ok(());
    };

    let logger = Arc::new(build_logger(log)?);
    logger.set_flush_period(Some(Duration::from_secs(2)));
    spdlog::set_default_logger(logger);

    Ok(())
}
