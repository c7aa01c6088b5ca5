//! Error type definitions.
//!
//! Typed errors for the layers that propagate (initialization, storage,
//! engine start), plus the per-task counter categories: errors are
//! failures that abandon a task, warnings are missing optional data, and
//! info entries are notable non-failures.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for repository operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The requested job does not exist.
    #[error("job not found")]
    JobNotFound,

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Failure encoding or decoding the stored crawl input JSON.
    #[error("input serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A stored status column held a value outside the state machine.
    #[error("unknown job status: {0}")]
    UnknownStatus(String),
}

/// Fatal engine errors. Only a bad seed URL fails a crawl as a whole;
/// everything else is a per-task condition.
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("invalid start URL: {0}")]
    InvalidStartUrl(#[from] url::ParseError),

    #[error("start URL has no host: {0}")]
    StartUrlMissingHost(String),
}

/// Per-task failure categories. Each abandons the task but never the
/// crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    FetchError,
    NonOkStatus,
    BodyReadError,
    ParseError,
    BudgetCheckError,
    PersistError,
}

/// Missing optional page data worth tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    MissingTitle,
}

/// Notable non-failure events per task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// The page budget denied admission; the task stops cooperatively.
    BudgetReached,
    /// The URL had already been visited in this crawl.
    SkippedVisited,
    /// A discovered link pointed outside the allowed host.
    SkippedExternalHost,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::FetchError => "HTTP fetch error",
            ErrorType::NonOkStatus => "non-200 response",
            ErrorType::BodyReadError => "response body read error",
            ErrorType::ParseError => "HTML parse error",
            ErrorType::BudgetCheckError => "page budget check error",
            ErrorType::PersistError => "page persistence error",
        }
    }
}

impl WarningType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::MissingTitle => "missing title",
        }
    }
}

impl InfoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::BudgetReached => "page budget reached",
            InfoType::SkippedVisited => "already visited",
            InfoType::SkippedExternalHost => "external host skipped",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
