//! In-memory inverted index with TF-IDF ranking.
//!
//! The index is a process-wide singleton shared by all crawls and queries:
//! crawled pages are added incrementally while searches run concurrently.
//! Reads take a shared lock, writes an exclusive one, so a search never
//! observes a document mid-update.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// A document as fed to the index: the page id plus its searchable text
/// (conventionally `title + " " + text_content`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: i64,
    pub text: String,
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "DocumentID")]
    pub document_id: i64,

    #[serde(rename = "Score")]
    pub score: f64,
}

/// Splits text into lowercase terms.
///
/// Boundaries are whitespace and punctuation; tokens shorter than two
/// characters are dropped. Emits terms in document order with duplicates
/// preserved, so term frequencies can be counted downstream.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .map(|t| t.trim().to_lowercase())
        .filter(|t| t.chars().count() >= 2)
        .collect()
}

#[derive(Debug, Default)]
struct IndexInner {
    /// term -> (document id -> term count in that document)
    entries: HashMap<String, HashMap<i64, usize>>,
    /// document id -> token count at index time
    doc_len: HashMap<i64, usize>,
    /// number of distinct documents indexed
    total_docs: usize,
}

impl IndexInner {
    fn insert(&mut self, doc: &Document) {
        let terms = tokenize(&doc.text);
        self.doc_len.insert(doc.id, terms.len());
        for term in terms {
            *self.entries.entry(term).or_default().entry(doc.id).or_insert(0) += 1;
        }
    }
}

/// The inverted index. Cheap to share behind an `Arc`.
#[derive(Debug, Default)]
pub struct Index {
    inner: RwLock<IndexInner>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all index state with the given documents in one exclusive
    /// critical section. Used at startup and by `/reindex`.
    pub fn build_from_documents(&self, documents: &[Document]) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.entries.clear();
        inner.doc_len.clear();
        inner.total_docs = documents.len();
        for doc in documents {
            inner.insert(doc);
        }
    }

    /// Adds one document, replacing any previous postings for the same id.
    ///
    /// Re-adding an existing id counts as an update, not a new document:
    /// the old postings and length entry are removed first and
    /// `total_docs` is left unchanged.
    pub fn add_document(&self, document: &Document) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let is_replace = inner.doc_len.remove(&document.id).is_some();
        if is_replace {
            for postings in inner.entries.values_mut() {
                postings.remove(&document.id);
            }
        } else {
            inner.total_docs += 1;
        }
        inner.insert(document);
    }

    /// Number of distinct documents currently indexed.
    pub fn total_docs(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).total_docs
    }

    /// Ranked retrieval over the query terms.
    ///
    /// Per term: `idf = ln((N + 1) / (df + 1)) + 1`; per posting:
    /// `tf = count / doc_len`; a document's score is the sum of
    /// `tf * idf` over the query terms. Results are ordered by score
    /// descending, ties broken by ascending document id, so a fixed
    /// corpus always yields the same ordering.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());

        let terms = tokenize(query);
        if terms.is_empty() || inner.total_docs == 0 {
            return Vec::new();
        }

        let n = inner.total_docs as f64;
        let mut scores: HashMap<i64, f64> = HashMap::new();

        for term in &terms {
            let Some(postings) = inner.entries.get(term) else {
                continue;
            };
            if postings.is_empty() {
                continue;
            }
            let df = postings.len() as f64;
            let idf = ((n + 1.0) / (df + 1.0)).ln() + 1.0;

            for (&doc_id, &count) in postings {
                let dl = inner.doc_len.get(&doc_id).copied().unwrap_or(0);
                if dl == 0 {
                    continue;
                }
                let tf = count as f64 / dl as f64;
                *scores.entry(doc_id).or_insert(0.0) += tf * idf;
            }
        }

        let mut results: Vec<SearchResult> = scores
            .into_iter()
            .map(|(document_id, score)| SearchResult { document_id, score })
            .collect();
        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.document_id.cmp(&b.document_id))
        });
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn doc(id: i64, text: &str) -> Document {
        Document {
            id,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_tokenize_lowercases_and_drops_short_tokens() {
        assert_eq!(tokenize("Hello, World! a"), vec!["hello", "world"]);
    }

    #[test]
    fn test_tokenize_preserves_order_and_duplicates() {
        assert_eq!(tokenize("go go rust"), vec!["go", "go", "rust"]);
    }

    #[test]
    fn test_tokenize_splits_on_punctuation() {
        assert_eq!(
            tokenize("foo.bar/baz?qux=42"),
            vec!["foo", "bar", "baz", "qux", "42"]
        );
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \t\n ").is_empty());
        assert!(tokenize("a . b , c").is_empty());
    }

    #[test]
    fn test_search_empty_index_returns_nothing() {
        let index = Index::new();
        assert!(index.search("anything").is_empty());
    }

    #[test]
    fn test_search_empty_query_returns_nothing() {
        let index = Index::new();
        index.add_document(&doc(1, "some text here"));
        assert!(index.search("").is_empty());
        assert!(index.search("a").is_empty()); // tokenizes to nothing
    }

    #[test]
    fn test_search_ranks_shorter_document_higher() {
        // d2 has tf = 1/1 for "rust", d1 has tf = 1/3; idf is shared.
        let index = Index::new();
        index.add_document(&doc(1, "go go rust"));
        index.add_document(&doc(2, "rust"));

        let results = index.search("rust");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document_id, 2);
        assert_eq!(results[1].document_id, 1);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_search_tie_breaks_by_ascending_id() {
        let index = Index::new();
        index.add_document(&doc(9, "rust crawler"));
        index.add_document(&doc(3, "rust crawler"));
        index.add_document(&doc(7, "rust crawler"));

        let results = index.search("rust");
        let ids: Vec<i64> = results.iter().map(|r| r.document_id).collect();
        assert_eq!(ids, vec![3, 7, 9]);
        assert!(results.windows(2).all(|w| w[0].score == w[1].score));
    }

    #[test]
    fn test_search_is_deterministic_across_insertion_order() {
        let docs = [
            doc(1, "the quick brown fox"),
            doc(2, "quick quick fox"),
            doc(3, "brown bear"),
            doc(4, "fox and bear and fox"),
        ];

        let forward = Index::new();
        for d in &docs {
            forward.add_document(d);
        }
        let backward = Index::new();
        for d in docs.iter().rev() {
            backward.add_document(d);
        }

        for query in ["fox", "quick brown", "bear fox", "missing"] {
            assert_eq!(forward.search(query), backward.search(query));
        }
    }

    #[test]
    fn test_add_document_twice_is_idempotent() {
        let index = Index::new();
        index.add_document(&doc(1, "rust web crawler"));
        let once = index.search("rust crawler");

        index.add_document(&doc(1, "rust web crawler"));
        assert_eq!(index.total_docs(), 1);
        assert_eq!(index.search("rust crawler"), once);
    }

    #[test]
    fn test_add_document_replaces_previous_text() {
        let index = Index::new();
        index.add_document(&doc(1, "old words entirely"));
        index.add_document(&doc(1, "fresh content"));

        assert_eq!(index.total_docs(), 1);
        assert!(index.search("old").is_empty());
        assert_eq!(index.search("fresh").len(), 1);
    }

    #[test]
    fn test_build_equivalent_to_incremental_adds() {
        let docs = vec![
            doc(1, "alpha beta gamma"),
            doc(2, "beta beta delta"),
            doc(3, "gamma delta epsilon"),
        ];

        let built = Index::new();
        built.build_from_documents(&docs);

        let incremental = Index::new();
        for d in &docs {
            incremental.add_document(d);
        }

        assert_eq!(built.total_docs(), incremental.total_docs());
        for query in ["alpha", "beta", "gamma delta", "epsilon beta"] {
            assert_eq!(built.search(query), incremental.search(query));
        }
    }

    #[test]
    fn test_build_replaces_all_state() {
        let index = Index::new();
        index.add_document(&doc(1, "stale entry"));
        index.build_from_documents(&[doc(2, "only survivor")]);

        assert_eq!(index.total_docs(), 1);
        assert!(index.search("stale").is_empty());
        assert_eq!(index.search("survivor").len(), 1);
    }

    #[test]
    fn test_multi_term_query_sums_scores() {
        let index = Index::new();
        index.add_document(&doc(1, "rust crawler"));
        index.add_document(&doc(2, "rust"));
        index.add_document(&doc(3, "crawler"));

        let results = index.search("rust crawler");
        // Document 1 matches both terms; 2 and 3 match one each.
        assert_eq!(results[0].document_id, 1);
        assert_eq!(results.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_and_searches() {
        let index = Arc::new(Index::new());

        let mut handles = Vec::new();
        for writer in 0..4i64 {
            let index = Arc::clone(&index);
            handles.push(tokio::spawn(async move {
                for i in 0..50 {
                    index.add_document(&Document {
                        id: writer * 1000 + i,
                        text: format!("shared corpus entry {} from writer {}", i, writer),
                    });
                }
            }));
        }
        for _ in 0..4 {
            let index = Arc::clone(&index);
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    // Every observed hit must carry a finite, positive score:
                    // a reader can never see a document with postings but no
                    // length entry.
                    for result in index.search("corpus entry") {
                        assert!(result.score.is_finite());
                        assert!(result.score > 0.0);
                    }
                    tokio::task::yield_now().await;
                }
            }));
        }
        for handle in handles {
            handle.await.expect("task panicked");
        }

        assert_eq!(index.total_docs(), 200);
    }

    // Property-based tests using proptest
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_tokenize_tokens_are_lowercase_and_long_enough(text in ".{0,200}") {
            for token in tokenize(&text) {
                prop_assert!(token.chars().count() >= 2);
                prop_assert_eq!(token.clone(), token.to_lowercase());
                prop_assert!(!token.chars().any(|c| c.is_whitespace() || c.is_ascii_punctuation()));
            }
        }

        #[test]
        fn test_search_results_are_sorted(
            texts in prop::collection::vec("[a-z ]{0,40}", 1..10),
            query in "[a-z ]{1,20}",
        ) {
            let index = Index::new();
            for (i, text) in texts.iter().enumerate() {
                index.add_document(&Document { id: i as i64, text: text.clone() });
            }
            let results = index.search(&query);
            for w in results.windows(2) {
                prop_assert!(
                    w[0].score > w[1].score
                        || (w[0].score == w[1].score && w[0].document_id < w[1].document_id)
                );
            }
        }

        #[test]
        fn test_readd_never_changes_total_docs(
            text_a in "[a-z ]{0,40}",
            text_b in "[a-z ]{0,40}",
        ) {
            let index = Index::new();
            index.add_document(&Document { id: 1, text: text_a });
            index.add_document(&Document { id: 1, text: text_b });
            prop_assert_eq!(index.total_docs(), 1);
        }
    }
}
