//! Batch ingestion over many documents.
//!
//! For each document:
//!   1. Hash the raw text and skip byte-identical files already seen
//!   2. Chunk (metadata, header split or fallback, fingerprints)
//!   3. Skip documents that produced no chunks
//!   4. Record chunk hashes so shared passages are counted once
//!
//! Per-document problems never abort the batch; they are reported in the
//! returned [`BatchReport`].

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::chunker::{chunk_hashed, ChunkerConfig};
use crate::dedup::{DedupIndex, DedupResult};
use crate::fingerprint::document_hash;
use crate::models::{ChunkedDocument, ChunkingOutcome, RawDocument};

// ── Per-document status ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    DuplicateDocument,
    EmptyContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    Success {
        chunks: usize,
        /// Chunks whose content hash was not seen earlier in the batch.
        new_chunks: usize,
        outcome: ChunkingOutcome,
    },
    Skipped { reason: SkipReason },
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub source: String,
    pub file_hash: String,
    pub document_id: Option<String>,
    #[serde(flatten)]
    pub status: DocumentStatus,
}

// ── Result summary ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub reports: Vec<DocumentReport>,
    /// Chunked documents that were not skipped, in input order.
    #[serde(skip)]
    pub documents: Vec<ChunkedDocument>,
    pub documents_ingested: usize,
    pub documents_skipped: usize,
    pub chunks_total: usize,
    pub chunks_new: usize,
    pub duration_ms: u64,
}

impl BatchReport {
    fn new() -> Self {
        Self {
            reports: Vec::new(),
            documents: Vec::new(),
            documents_ingested: 0,
            documents_skipped: 0,
            chunks_total: 0,
            chunks_new: 0,
            duration_ms: 0,
        }
    }

    fn skip(&mut self, doc: &RawDocument, file_hash: String, document_id: Option<String>, reason: SkipReason) {
        warn!(source = %doc.source, ?reason, "Document skipped");
        self.documents_skipped += 1;
        self.reports.push(DocumentReport {
            source: doc.source.clone(),
            file_hash,
            document_id,
            status: DocumentStatus::Skipped { reason },
        });
    }
}

// ── Batch orchestrator ────────────────────────────────────────────────────────

/// Chunk a batch of documents, skipping duplicates and empty documents.
/// `index` carries seen hashes across calls.
#[instrument(skip_all, fields(n_docs = docs.len()))]
pub fn ingest_batch(docs: &[RawDocument], index: &mut DedupIndex, config: &ChunkerConfig) -> BatchReport {
    let t0 = std::time::Instant::now();
    let mut report = BatchReport::new();

    for doc in docs {
        let file_hash = document_hash(&doc.text);
        if let DedupResult::DuplicateDocument(hash) = index.check_document(&file_hash) {
            report.skip(doc, hash, None, SkipReason::DuplicateDocument);
            continue;
        }

        let chunked = chunk_hashed(doc, file_hash, config);
        index.record_document(&chunked.file_hash);

        if chunked.is_empty() {
            let document_id = chunked.metadata.document_id.clone();
            report.skip(doc, chunked.file_hash, document_id, SkipReason::EmptyContent);
            continue;
        }

        let new_chunks = index.record_chunks(&chunked.chunks);
        report.documents_ingested += 1;
        report.chunks_total += chunked.chunks.len();
        report.chunks_new += new_chunks;
        report.reports.push(DocumentReport {
            source: chunked.source.clone(),
            file_hash: chunked.file_hash.clone(),
            document_id: chunked.metadata.document_id.clone(),
            status: DocumentStatus::Success {
                chunks: chunked.chunks.len(),
                new_chunks,
                outcome: chunked.outcome.clone(),
            },
        });
        report.documents.push(chunked);
    }

    report.duration_ms = t0.elapsed().as_millis() as u64;

    info!(
        ingested    = report.documents_ingested,
        skipped     = report.documents_skipped,
        chunks      = report.chunks_total,
        chunks_new  = report.chunks_new,
        duration_ms = report.duration_ms,
        "Batch ingestion complete"
    );

    report
}

// ── Tests ─────────────────────────────────────────────────────────────────────
