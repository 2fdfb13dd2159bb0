//! Turns split regions (or the fallback text) into positioned, fingerprinted chunks.

use std::sync::Arc;

use crate::fingerprint::content_hash;
use crate::models::{Chunk, DocumentMetadata};
use crate::splitter::Region;

/// What the chunks are built from.
#[derive(Debug, Clone)]
pub enum ChunkSource {
    Regions(Vec<Region>),
    Fallback(String),
}

/// Build chunks in document order. Positions are contiguous from 0 and every
/// chunk shares `metadata`. Region bodies and the fallback text are trimmed
/// the same way before hashing.
pub fn assemble_chunks(metadata: Arc<DocumentMetadata>, source: ChunkSource) -> Vec<Chunk> {
    match source {
        ChunkSource::Regions(regions) => regions
            .into_iter()
            .filter_map(|region| {
                let content = trim_blank_lines(&region.body);
                (!content.is_empty()).then(|| (content.to_string(), region.heading_chain))
            })
            .enumerate()
            .map(|(position, (content, heading_chain))| {
                new_chunk(content, position, heading_chain, &metadata)
            })
            .collect(),
        ChunkSource::Fallback(text) => match trim_blank_lines(&text) {
            "" => Vec::new(),
            content => vec![new_chunk(content.to_string(), 0, Vec::new(), &metadata)],
        },
    }
}

fn new_chunk(
    content: String,
    position: usize,
    heading_chain: Vec<String>,
    metadata: &Arc<DocumentMetadata>,
) -> Chunk {
    let content_hash = content_hash(&content);
    Chunk {
        content,
        position,
        heading_chain,
        metadata: Arc::clone(metadata),
        content_hash,
    }
}

/// Drop leading blank lines and trailing whitespace. Interior whitespace and
/// the indentation of the first non-blank line are kept.
pub fn trim_blank_lines(body: &str) -> &str {
    let mut start = 0;
    for line in body.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }
    body[start..].trim_end()
}
