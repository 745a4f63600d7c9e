//! Text index contract and the default in-memory implementation
//!
//! This module provides:
//! - TextIndex, the contract the search coordinator talks to
//! - MemoryTextIndex, a concurrent in-memory prefix-matching index
//!
//! The coordinator treats the index as a best-effort candidate recall
//! service: it assumes no ordering from it and does all ranking downstream.
//! Cancellation of in-flight queries is also owned by the coordinator —
//! an index implementation only has to answer what it is asked.

use crate::tokenizer::tokenize_unique;
use curator_core::error::Result;
use curator_core::item::ItemId;
use dashmap::DashMap;
use rustc_hash::FxHashSet;
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// TextIndex Trait
// ============================================================================

/// Contract between the search coordinator and a full-text index backend
///
/// One index instance covers exactly one catalog version: the coordinator
/// builds a fresh instance on every catalog replacement and discards the
/// previous one. Implementations must be Send + Sync — builds and queries
/// run on background workers.
pub trait TextIndex: Send + Sync {
    /// Add one document; called once per item at build time
    fn index_document(&self, id: &ItemId, text: &str) -> Result<()>;

    /// Return candidate ids for a query, best effort, no ordering guarantee
    fn search(&self, query: &str) -> Result<Vec<ItemId>>;

    /// Number of documents indexed so far
    fn total_docs(&self) -> usize;
}

// ============================================================================
// MemoryTextIndex
// ============================================================================

/// Concurrent in-memory text index with prefix matching
///
/// Query tokens match indexed tokens by prefix (search-as-you-type), and
/// every query token must be matched by some token of a document for the
/// document to be a candidate (AND across tokens). Candidates come back in
/// first-indexed order, which for a catalog build is catalog order.
///
/// # Thread Safety
///
/// Uses DashMap for the posting lists. Multiple readers/writers supported.
#[derive(Debug, Default)]
pub struct MemoryTextIndex {
    /// Token -> ids of documents containing it
    postings: DashMap<String, Vec<ItemId>>,

    /// Document -> insertion sequence, for stable candidate ordering
    doc_seq: DashMap<ItemId, u64>,

    /// Next insertion sequence
    next_seq: AtomicU64,
}

impl MemoryTextIndex {
    /// Create an empty index
    pub fn new() -> Self {
        MemoryTextIndex::default()
    }

    /// Remove a document's postings (used when a document is re-indexed)
    fn remove_document(&self, id: &ItemId) {
        for mut entry in self.postings.iter_mut() {
            entry.value_mut().retain(|doc| doc != id);
        }
        self.doc_seq.remove(id);
    }

    /// Ids of documents with at least one indexed token starting with `prefix`
    fn docs_matching_prefix(&self, prefix: &str) -> FxHashSet<ItemId> {
        let mut docs = FxHashSet::default();
        for entry in self.postings.iter() {
            if entry.key().starts_with(prefix) {
                docs.extend(entry.value().iter().cloned());
            }
        }
        docs
    }
}

impl TextIndex for MemoryTextIndex {
    fn index_document(&self, id: &ItemId, text: &str) -> Result<()> {
        if self.doc_seq.contains_key(id) {
            self.remove_document(id);
        }

        for token in tokenize_unique(text) {
            self.postings.entry(token).or_default().push(id.clone());
        }

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.doc_seq.insert(id.clone(), seq);
        Ok(())
    }

    fn search(&self, query: &str) -> Result<Vec<ItemId>> {
        let tokens = tokenize_unique(query);
        if tokens.is_empty() {
            return Ok(vec![]);
        }

        let mut candidates: Option<FxHashSet<ItemId>> = None;
        for token in &tokens {
            let matched = self.docs_matching_prefix(token);
            candidates = Some(match candidates {
                None => matched,
                Some(existing) => existing.intersection(&matched).cloned().collect(),
            });
            if candidates.as_ref().is_some_and(FxHashSet::is_empty) {
                break;
            }
        }

        let mut ids: Vec<ItemId> = candidates.unwrap_or_default().into_iter().collect();
        ids.sort_by_key(|id| self.doc_seq.get(id).map(|seq| *seq).unwrap_or(u64::MAX));
        Ok(ids)
    }

    fn total_docs(&self) -> usize {
        self.doc_seq.len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    fn build(docs: &[(&str, &str)]) -> MemoryTextIndex {
        let index = MemoryTextIndex::new();
        for (doc_id, text) in docs {
            index.index_document(&id(doc_id), text).unwrap();
        }
        index
    }

    #[test]
    fn test_empty_index() {
        let index = MemoryTextIndex::new();
        assert_eq!(index.total_docs(), 0);
        assert!(index.search("anything").unwrap().is_empty());
    }

    #[test]
    fn test_exact_token_match() {
        let index = build(&[("a", "hero knight"), ("b", "space ship")]);
        assert_eq!(index.search("knight").unwrap(), vec![id("a")]);
        assert_eq!(index.search("ship").unwrap(), vec![id("b")]);
    }

    #[test]
    fn test_prefix_match() {
        let index = build(&[("a", "hero knight"), ("b", "knife block")]);
        // "kni" matches both "knight" and "knife"
        let ids = index.search("kni").unwrap();
        assert_eq!(ids, vec![id("a"), id("b")]);
    }

    #[test]
    fn test_all_tokens_must_match() {
        let index = build(&[("a", "red hero"), ("b", "red ship"), ("c", "blue hero")]);
        assert_eq!(index.search("red hero").unwrap(), vec![id("a")]);
        assert!(index.search("red green").unwrap().is_empty());
    }

    #[test]
    fn test_results_in_indexed_order() {
        let index = build(&[("z", "tile grass"), ("m", "tile stone"), ("a", "tile dirt")]);
        assert_eq!(
            index.search("tile").unwrap(),
            vec![id("z"), id("m"), id("a")]
        );
    }

    #[test]
    fn test_case_insensitive() {
        let index = build(&[("a", "Hero Knight")]);
        assert_eq!(index.search("HERO").unwrap(), vec![id("a")]);
    }

    #[test]
    fn test_query_with_no_usable_tokens() {
        let index = build(&[("a", "hero")]);
        assert!(index.search("! ?").unwrap().is_empty());
    }

    #[test]
    fn test_reindexing_replaces_postings() {
        let index = build(&[("a", "hero knight")]);
        index.index_document(&id("a"), "space ship").unwrap();

        assert_eq!(index.total_docs(), 1);
        assert!(index.search("knight").unwrap().is_empty());
        assert_eq!(index.search("ship").unwrap(), vec![id("a")]);
    }

    #[test]
    fn test_no_match() {
        let index = build(&[("a", "hero")]);
        assert!(index.search("dragon").unwrap().is_empty());
    }

    #[test]
    fn test_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryTextIndex>();
    }
}
