//! Configuration types and CLI options.

use clap::{Parser, ValueEnum};

use crate::config::constants::{DEFAULT_PORT, DEFAULT_WORKER_COUNT};

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options.
///
/// The database connection string is deliberately not a flag: it comes
/// from the `DATABASE_URL` environment variable (a `.env` file is loaded
/// if present).
#[derive(Debug, Parser)]
#[command(name = "crawl_search", about = "Web crawler with an integrated search index")]
pub struct Opt {
    /// Port for the HTTP API
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Number of concurrent crawl workers per job
    #[arg(long, default_value_t = DEFAULT_WORKER_COUNT)]
    pub workers: usize,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,
}
