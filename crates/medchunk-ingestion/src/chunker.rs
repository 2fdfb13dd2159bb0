//! Section-aware document chunker.
//!
//! raw text ─► metadata extractor ─► header splitter ─┬─► assembler ─► chunks
//!                                                    └─► fallback ──┘
//!
//! Never fails outward: a split error degrades to the bounded fallback chunk,
//! and whitespace-only input yields no chunks.

use std::sync::Arc;

use medchunk_common::ChunkerSettings;
use tracing::{debug, info, instrument};

use crate::assembler::{assemble_chunks, ChunkSource};
use crate::fallback::{fallback_chunk, DEFAULT_FALLBACK_MAX_CHARS};
use crate::fingerprint::document_hash;
use crate::metadata::extract_metadata;
use crate::models::{
    Chunk, ChunkedDocument, ChunkingOutcome, DocumentMetadata, FallbackReason, RawDocument,
};
use crate::splitter::{split_sections, SplitError, SplitterConfig};

/// Configuration for the chunker.
#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Character bound of the fallback chunk.
    pub fallback_max_chars: usize,
    pub splitter: SplitterConfig,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            fallback_max_chars: DEFAULT_FALLBACK_MAX_CHARS,
            splitter: SplitterConfig::default(),
        }
    }
}

impl From<&ChunkerSettings> for ChunkerConfig {
    fn from(settings: &ChunkerSettings) -> Self {
        Self {
            fallback_max_chars: settings.fallback_max_chars,
            splitter: SplitterConfig {
                marker: settings.heading_marker,
                max_depth: settings.max_heading_depth,
            },
        }
    }
}

impl From<SplitError> for FallbackReason {
    fn from(e: SplitError) -> Self {
        match e {
            SplitError::NoHeadings => FallbackReason::NoHeadings,
            SplitError::NoContent => FallbackReason::NoContent,
        }
    }
}

/// Chunk one document into retrieval units.
pub fn chunk_document(doc: &RawDocument, config: &ChunkerConfig) -> ChunkedDocument {
    chunk_hashed(doc, document_hash(&doc.text), config)
}

/// [`chunk_document`] for callers that already hashed the raw text.
#[instrument(skip(doc, file_hash, config), fields(source = %doc.source))]
pub(crate) fn chunk_hashed(doc: &RawDocument, file_hash: String, config: &ChunkerConfig) -> ChunkedDocument {
    let text = doc.text.as_str();
    let metadata = Arc::new(extract_metadata(text));

    if text.trim().is_empty() {
        debug!("Empty document, nothing to chunk");
        return ChunkedDocument {
            source: doc.source.clone(),
            file_hash,
            metadata,
            chunks: Vec::new(),
            outcome: ChunkingOutcome::Empty,
        };
    }

    let (chunks, outcome) = match split_sections(text, &config.splitter) {
        Ok(regions) => {
            let chunks = assemble_chunks(Arc::clone(&metadata), ChunkSource::Regions(regions));
            (chunks, ChunkingOutcome::Hierarchical)
        }
        Err(e) => {
            debug!(error = %e, "Header split failed, using fallback chunk");
            (fallback(text, &metadata, config), ChunkingOutcome::Fallback { reason: e.into() })
        }
    };

    info!(
        chunks = chunks.len(),
        outcome = outcome.as_str(),
        document_id = ?metadata.document_id,
        "Document chunked"
    );

    ChunkedDocument {
        source: doc.source.clone(),
        file_hash,
        metadata,
        chunks,
        outcome,
    }
}

fn fallback(text: &str, metadata: &Arc<DocumentMetadata>, config: &ChunkerConfig) -> Vec<Chunk> {
    match fallback_chunk(text, config.fallback_max_chars) {
        Some(content) => assemble_chunks(Arc::clone(metadata), ChunkSource::Fallback(content)),
        None => Vec::new(),
    }
}

/// Chunk bare text with the default configuration.
pub fn chunk_text(text: &str) -> Vec<Chunk> {
    chunk_document(&RawDocument::new("inline", text), &ChunkerConfig::default()).chunks
}
