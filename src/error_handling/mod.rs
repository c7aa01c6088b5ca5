//! Error handling and crawl statistics.
//!
//! This module provides:
//! - Typed error definitions for the propagating layers
//! - Per-crawl statistics tracking (errors, warnings, info metrics)
//!
//! Per-task conditions inside the engine are counted and logged, never
//! propagated; only initialization, storage, and seed-URL failures carry
//! typed errors upward.

mod stats;
mod types;

// Re-export public API
pub use stats::CrawlStats;
pub use types::{
    CrawlError, ErrorType, InfoType, InitializationError, StorageError, WarningType,
};
