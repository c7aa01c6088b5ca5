//! Service layer: job orchestration and the persistence-to-index
//! coupling, expressed against the repository traits rather than a
//! concrete database.

mod crawl_service;
mod indexing_writer;

pub use crawl_service::{CrawlService, JobRepository, PageRepository, SubmitError};
pub use indexing_writer::IndexingWriter;
