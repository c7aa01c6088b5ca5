//! Configuration constants.
//!
//! Operational parameters shared by the engine and the server. CLI flags
//! override the defaults; the constants with no flag are fixed by design.

use std::time::Duration;

/// Per-request HTTP timeout. Covers connect, TLS, and body transfer; a
/// hung fetch cannot stall a worker for longer than this.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Bounded work-queue capacity per crawl. Enqueues block once the queue
/// is full, providing backpressure against very high fan-out pages.
pub const QUEUE_CAPACITY: usize = 1000;

/// Default number of crawl workers.
pub const DEFAULT_WORKER_COUNT: usize = 10;

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default User-Agent string for HTTP requests.
///
/// A browser-like value; plenty of sites serve reduced or empty markup
/// to obviously non-browser agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
