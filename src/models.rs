//! Domain types shared across the crawl engine, service layer, storage,
//! and HTTP surface.
//!
//! Wire field names match the original JSON contract (`StartURL`,
//! `PagesCrawled`, ...), hence the serde renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parameters of a crawl request. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlInput {
    /// Absolute http/https seed URL.
    #[serde(rename = "StartURL")]
    pub start_url: String,

    /// Maximum link depth; 0 fetches only the seed.
    #[serde(rename = "MaxDepth")]
    pub max_depth: u32,

    /// Maximum number of pages admitted for persistence. Must be >= 1.
    #[serde(rename = "MaxPages")]
    pub max_pages: u32,

    /// When true, links leaving the seed's host are not followed.
    #[serde(rename = "SameDomainOnly")]
    pub same_domain_only: bool,

    /// Per-request politeness delay applied before each fetch.
    #[serde(rename = "RequestDelayMs")]
    pub request_delay_ms: u64,
}

/// Lifecycle state of a crawl job.
///
/// Transitions: PENDING -> RUNNING -> {COMPLETED | FAILED}. CANCELLED is
/// reserved for future cancellation wiring and is never produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrawlStatus {
    Pending,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl CrawlStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrawlStatus::Pending => "PENDING",
            CrawlStatus::Running => "RUNNING",
            CrawlStatus::Completed => "COMPLETED",
            CrawlStatus::Cancelled => "CANCELLED",
            CrawlStatus::Failed => "FAILED",
        }
    }

    /// Parses the database representation back into a status.
    pub fn parse(s: &str) -> Option<CrawlStatus> {
        match s {
            "PENDING" => Some(CrawlStatus::Pending),
            "RUNNING" => Some(CrawlStatus::Running),
            "COMPLETED" => Some(CrawlStatus::Completed),
            "CANCELLED" => Some(CrawlStatus::Cancelled),
            "FAILED" => Some(CrawlStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A crawl job as seen by clients and the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlJob {
    /// Opaque unique token (UUID v4).
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "Input")]
    pub input: CrawlInput,

    #[serde(rename = "Status")]
    pub status: CrawlStatus,

    /// Monotonically non-decreasing, never exceeds `input.max_pages`.
    #[serde(rename = "PagesCrawled")]
    pub pages_crawled: u32,

    /// Short human-readable message; empty unless status is FAILED.
    #[serde(rename = "Error")]
    pub error: String,

    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// A unit of crawl work. Lives only in the engine's work queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTask {
    pub url: String,
    pub depth: u32,
}

/// A fetched page about to be persisted; the repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub job_id: String,
    pub url: String,
    pub title: String,
    pub html: String,
    pub text_content: String,
    pub fetched_at: DateTime<Utc>,
}

/// A persisted page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Stable identifier assigned by the repository (SQLite rowid).
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(rename = "JobID")]
    pub job_id: String,

    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "Html")]
    pub html: String,

    #[serde(rename = "TextContent")]
    pub text_content: String,

    #[serde(rename = "FetchedAt")]
    pub fetched_at: DateTime<Utc>,
}
