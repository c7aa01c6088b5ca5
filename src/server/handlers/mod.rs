//! HTTP handlers for the crawl and search API.

mod crawl;
mod search;

pub use crawl::{get_job_handler, get_pages_handler, submit_crawl_handler};
pub use search::{reindex_handler, search_handler};
