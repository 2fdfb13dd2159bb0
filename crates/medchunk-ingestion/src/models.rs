//! Data models for the chunking pipeline.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A raw clinical document as received from the caller.
/// The source id is only used for tracing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    pub source: String,
    pub text: String,
}

impl RawDocument {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self { source: source.into(), text: text.into() }
    }
}

/// The fixed set of identifying fields looked up in every document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    DocumentId,
    PatientId,
    ClinicianId,
    DateCreated,
}

impl MetadataField {
    pub const ALL: [MetadataField; 4] = [
        MetadataField::DocumentId,
        MetadataField::PatientId,
        MetadataField::ClinicianId,
        MetadataField::DateCreated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataField::DocumentId  => "document_id",
            MetadataField::PatientId   => "patient_id",
            MetadataField::ClinicianId => "clinician_id",
            MetadataField::DateCreated => "date_created",
        }
    }
}

/// Document-level metadata. A field the text does not carry stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub document_id: Option<String>,
    pub patient_id: Option<String>,
    pub clinician_id: Option<String>,
    pub date_created: Option<String>,
}

impl DocumentMetadata {
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        match field {
            MetadataField::DocumentId  => self.document_id.as_deref(),
            MetadataField::PatientId   => self.patient_id.as_deref(),
            MetadataField::ClinicianId => self.clinician_id.as_deref(),
            MetadataField::DateCreated => self.date_created.as_deref(),
        }
    }

    pub(crate) fn set(&mut self, field: MetadataField, value: Option<String>) {
        match field {
            MetadataField::DocumentId  => self.document_id = value,
            MetadataField::PatientId   => self.patient_id = value,
            MetadataField::ClinicianId => self.clinician_id = value,
            MetadataField::DateCreated => self.date_created = value,
        }
    }

    /// True when no field could be extracted.
    pub fn is_empty(&self) -> bool {
        MetadataField::ALL.iter().all(|f| self.get(*f).is_none())
    }
}

/// A retrieval unit ready for embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    /// 0-based, contiguous within one document.
    pub position: usize,
    /// Ancestor headings, root to leaf. Empty for fallback chunks.
    pub heading_chain: Vec<String>,
    /// Shared by every chunk of the same document.
    #[serde(rename = "document_metadata")]
    pub metadata: Arc<DocumentMetadata>,
    /// Lowercase hex SHA-256 of `content`.
    pub content_hash: String,
}

impl Chunk {
    /// Top-level heading, if any.
    pub fn title(&self) -> Option<&str> {
        self.heading_chain.first().map(String::as_str)
    }

    /// Innermost heading, if any.
    pub fn section(&self) -> Option<&str> {
        self.heading_chain.last().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.heading_chain.len()
    }
}

/// Why the header splitter gave up and the fallback chunk was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FallbackReason {
    NoHeadings,
    NoContent,
}

/// How a document was turned into chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChunkingOutcome {
    Hierarchical,
    Fallback { reason: FallbackReason },
    Empty,
}

impl ChunkingOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkingOutcome::Hierarchical  => "hierarchical",
            ChunkingOutcome::Fallback { .. } => "fallback",
            ChunkingOutcome::Empty         => "empty",
        }
    }
}

/// Result of chunking one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkedDocument {
    pub source: String,
    /// SHA-256 of the whole raw text.
    pub file_hash: String,
    pub metadata: Arc<DocumentMetadata>,
    pub chunks: Vec<Chunk>,
    pub outcome: ChunkingOutcome,
}

impl ChunkedDocument {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn document_id(&self) -> Option<&str> {
        self.metadata.document_id.as_deref()
    }
}
