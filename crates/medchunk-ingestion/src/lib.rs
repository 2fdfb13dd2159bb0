//! medchunk-ingestion — Clinical document chunking pipeline.
//! - Document metadata extraction (document, patient, clinician ids, creation date)
//! - Header-hierarchy splitting with a bounded fallback
//! - Chunk assembly with shared metadata and positions
//! - SHA-256 content fingerprints and exact-content dedup
//! - Embedding / vector index interfaces

pub mod models;
pub mod metadata;
pub mod splitter;
pub mod fallback;
pub mod assembler;
pub mod fingerprint;
pub mod chunker;
pub mod dedup;
pub mod pipeline;
pub mod sink;

pub use chunker::{chunk_document, chunk_text, ChunkerConfig};
pub use models::{Chunk, ChunkedDocument, ChunkingOutcome, DocumentMetadata, RawDocument};
