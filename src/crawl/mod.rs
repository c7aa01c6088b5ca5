//! The crawl engine and its supporting pieces: worker pool, bounded work
//! queue with close-on-zero termination, per-crawl URL dedup, and HTML
//! extraction.

mod engine;
mod parser;
mod queue;
mod visited;

pub use engine::{Engine, PageBudget, PageSink};
pub use parser::{parse_page, ParseError, ParsedPage};
pub use queue::WorkQueue;
pub use visited::VisitedSet;
