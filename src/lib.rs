//! crawl_search library: a job-scoped web crawler with an integrated
//! in-memory full-text search index.
//!
//! A client submits a crawl (seed URL, depth cap, page cap); a bounded
//! worker pool fetches pages, persists them, and feeds each one into a
//! process-wide TF-IDF index that stays queryable while crawls run.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use crawl_search::crawl::{Engine, PageBudget, PageSink};
//! use crawl_search::initialization::init_client;
//! use crawl_search::search::Index;
//! use crawl_search::service::{CrawlService, IndexingWriter, JobRepository, PageRepository};
//! use crawl_search::storage::Repository;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repository = Arc::new(Repository::connect("sqlite:crawl_search.db").await?);
//! let index = Arc::new(Index::new());
//!
//! let writer = Arc::new(IndexingWriter::new(
//!     Arc::clone(&repository) as Arc<dyn PageRepository>,
//!     Arc::clone(&index),
//! ));
//! let engine = Arc::new(Engine::new(
//!     10,
//!     init_client()?,
//!     Arc::clone(&repository) as Arc<dyn PageBudget>,
//!     writer as Arc<dyn PageSink>,
//! ));
//! let service = CrawlService::new(
//!     Arc::clone(&repository) as Arc<dyn JobRepository>,
//!     Arc::clone(&repository) as Arc<dyn PageRepository>,
//!     engine,
//! );
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crawl;
pub mod error_handling;
pub mod initialization;
pub mod models;
pub mod search;
pub mod server;
pub mod service;
pub mod storage;

// Re-export the pieces a binary needs to wire the system together.
pub use config::Opt;
pub use crawl::Engine;
pub use search::Index;
pub use service::CrawlService;
pub use storage::{run_migrations, Repository};
