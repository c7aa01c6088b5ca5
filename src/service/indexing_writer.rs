//! The coupling point between page persistence and the live index.

use std::sync::Arc;

use async_trait::async_trait;

use crate::crawl::PageSink;
use crate::models::NewPage;
use crate::search::{Document, Index};

use super::PageRepository;

/// Page sink that persists through the repository and immediately feeds
/// the saved page into the search index, so queries reflect newly crawled
/// content without a rebuild. This is the only place persistence and the
/// index meet.
pub struct IndexingWriter {
    pages: Arc<dyn PageRepository>,
    index: Arc<Index>,
}

impl IndexingWriter {
    pub fn new(pages: Arc<dyn PageRepository>, index: Arc<Index>) -> Self {
        Self { pages, index }
    }
}

#[async_trait]
impl PageSink for IndexingWriter {
    async fn create_page(&self, page: NewPage) -> anyhow::Result<()> {
        let saved = self.pages.upsert_page(&page).await?;
        self.index.add_document(&Document {
            id: saved.id,
            text: format!("{} {}", saved.title, saved.text_content),
        });
        Ok(())
    }
}
