//! Exact-content deduplication.
//!
//! Two signals, both SHA-256 hex digests:
//! - the file hash of a whole document (skip re-ingesting an identical file)
//! - the content hash of a chunk (the same passage shared by several documents)
//!
//! Near-duplicates are out of scope; only byte-identical content matches.

use std::collections::HashSet;

use crate::models::Chunk;

/// Result of a deduplication check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupResult {
    /// Document is new — proceed with ingestion.
    New,
    /// Document is byte-identical to one already seen.
    DuplicateDocument(String),
}

/// Hashes seen so far in one ingestion run.
#[derive(Debug, Default, Clone)]
pub struct DedupIndex {
    documents: HashSet<String>,
    chunks: HashSet<String>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a document hash without recording it.
    pub fn check_document(&self, file_hash: &str) -> DedupResult {
        if self.documents.contains(file_hash) {
            DedupResult::DuplicateDocument(file_hash.to_string())
        } else {
            DedupResult::New
        }
    }

    /// Record a document hash. Returns `false` if it was already present.
    pub fn record_document(&mut self, file_hash: &str) -> bool {
        self.documents.insert(file_hash.to_string())
    }

    /// Record chunk hashes, returning how many were not seen before.
    pub fn record_chunks(&mut self, chunks: &[Chunk]) -> usize {
        chunks
            .iter()
            .filter(|c| self.chunks.insert(c.content_hash.clone()))
            .count()
    }

    pub fn contains_chunk(&self, content_hash: &str) -> bool {
        self.chunks.contains(content_hash)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

/// Drop chunks whose content hash already appeared earlier in `chunks`.
/// Order of first occurrences is kept; positions are left untouched.
pub fn dedup_chunks(chunks: Vec<Chunk>) -> Vec<Chunk> {
    let mut seen = HashSet::new();
    chunks
        .into_iter()
        .filter(|c| seen.insert(c.content_hash.clone()))
        .collect()
}
