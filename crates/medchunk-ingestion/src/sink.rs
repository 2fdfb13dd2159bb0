//! Interfaces to the embedding service and the vector index.
//!
//! The chunker itself never talks to either. This module defines the traits
//! the ingestion service implements, the payload stored with every vector,
//! and [`index_document`], which embeds a chunked document and upserts it
//! unless the index already holds the same file.

use std::collections::HashMap;

use async_trait::async_trait;
use medchunk_common::{IndexSettings, MedchunkError, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::models::{Chunk, ChunkedDocument};

/// Produces one fixed-dimension vector per input text.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
    fn dimension(&self) -> usize;
}

/// Vector store supporting upsert by point id and lookup by file hash.
#[async_trait]
pub trait ChunkIndex: Send + Sync {
    async fn contains_document(&self, file_hash: &str) -> Result<bool>;
    /// Returns the number of points written.
    async fn upsert(&self, points: Vec<IndexPoint>) -> Result<usize>;
}

/// Metadata stored next to each vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPayload {
    pub file_hash: String,
    pub content_hash: String,
    pub document_id: Option<String>,
    pub text: String,
    pub chunk_index: usize,
    pub section: String,
    pub heading_chain: Vec<String>,
    pub patient_id: Option<String>,
    pub clinician_id: Option<String>,
    pub date_created: Option<String>,
    pub file_name: String,
}

impl ChunkPayload {
    pub fn new(doc: &ChunkedDocument, chunk: &Chunk, default_section: &str) -> Self {
        let meta = &chunk.metadata;
        Self {
            file_hash: doc.file_hash.clone(),
            content_hash: chunk.content_hash.clone(),
            document_id: meta.document_id.clone(),
            text: chunk.content.clone(),
            chunk_index: chunk.position,
            section: chunk.section().unwrap_or(default_section).to_string(),
            heading_chain: chunk.heading_chain.clone(),
            patient_id: meta.patient_id.clone(),
            clinician_id: meta.clinician_id.clone(),
            date_created: meta.date_created.clone(),
            file_name: doc.source.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexPoint {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub payload: ChunkPayload,
}

/// Deterministic point id: re-ingesting the same file overwrites its points.
pub fn point_id(file_hash: &str, position: usize) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, format!("{file_hash}_{position}").as_bytes())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IndexOutcome {
    Indexed { points: usize },
    SkippedDuplicate,
    SkippedEmpty,
}

/// Embed every chunk of `doc` in one batch and upsert the points.
#[instrument(skip_all, fields(source = %doc.source, chunks = doc.chunks.len()))]
pub async fn index_document(
    doc: &ChunkedDocument,
    embedder: &dyn Embedder,
    index: &dyn ChunkIndex,
    settings: &IndexSettings,
) -> Result<IndexOutcome> {
    if embedder.dimension() != settings.vector_size {
        return Err(MedchunkError::Config(format!(
            "embedder dimension {} does not match index vector size {}",
            embedder.dimension(),
            settings.vector_size
        )));
    }

    if index.contains_document(&doc.file_hash).await? {
        debug!(file_hash = %doc.file_hash, "File already indexed");
        return Ok(IndexOutcome::SkippedDuplicate);
    }
    if doc.chunks.is_empty() {
        return Ok(IndexOutcome::SkippedEmpty);
    }

    let texts: Vec<String> = doc.chunks.iter().map(|c| c.content.clone()).collect();
    let vectors = embedder.embed(&texts).await?;
    if vectors.len() != doc.chunks.len() {
        return Err(MedchunkError::Embedding(format!(
            "expected {} vectors, got {}",
            doc.chunks.len(),
            vectors.len()
        )));
    }

    let points = doc
        .chunks
        .iter()
        .zip(vectors)
        .map(|(chunk, vector)| {
            if vector.len() != settings.vector_size {
                return Err(MedchunkError::Embedding(format!(
                    "vector for chunk {} has dimension {}, expected {}",
                    chunk.position,
                    vector.len(),
                    settings.vector_size
                )));
            }
            Ok(IndexPoint {
                id: point_id(&doc.file_hash, chunk.position),
                vector,
                payload: ChunkPayload::new(doc, chunk, &settings.default_section),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let written = index.upsert(points).await?;
    info!(points = written, collection = %settings.collection, "Document indexed");
    Ok(IndexOutcome::Indexed { points: written })
}

/// Process-local index keyed by point id.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    points: RwLock<HashMap<Uuid, IndexPoint>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.points.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.points.read().await.is_empty()
    }

    pub async fn get(&self, id: &Uuid) -> Option<IndexPoint> {
        self.points.read().await.get(id).cloned()
    }

    /// Points whose chunk content matches `content_hash`.
    pub async fn find_by_content_hash(&self, content_hash: &str) -> Vec<IndexPoint> {
        self.points
            .read()
            .await
            .values()
            .filter(|p| p.payload.content_hash == content_hash)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ChunkIndex for InMemoryIndex {
    async fn contains_document(&self, file_hash: &str) -> Result<bool> {
        Ok(self
            .points
            .read()
            .await
            .values()
            .any(|p| p.payload.file_hash == file_hash))
    }

    /// All vectors in the collection share one dimension; a batch that
    /// breaks this is rejected whole.
    async fn upsert(&self, points: Vec<IndexPoint>) -> Result<usize> {
        let mut guard = self.points.write().await;
        let dim = guard
            .values()
            .next()
            .or(points.first())
            .map(|p| p.vector.len());
        if let Some(dim) = dim {
            if let Some(bad) = points.iter().find(|p| p.vector.len() != dim) {
                return Err(MedchunkError::Index(format!(
                    "point {} has dimension {}, collection uses {dim}",
                    bad.id,
                    bad.vector.len()
                )));
            }
        }

        let n = points.len();
        for point in points {
            guard.insert(point.id, point);
        }
        Ok(n)
    }
}
