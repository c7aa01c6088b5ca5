//! Shared state for the HTTP API.

use std::sync::Arc;

use crate::search::Index;
use crate::service::{CrawlService, PageRepository};

/// State handed to every handler. All fields are cheap clones of
/// process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CrawlService>,
    pub index: Arc<Index>,
    /// Direct page access for `/reindex` rebuilds.
    pub pages: Arc<dyn PageRepository>,
}
