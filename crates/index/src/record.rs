use serde::{Deserialize, Serialize};

use cvmatch_core::{Embedding, PiiInfo};

/// A core chunk plus the embedding it owns. Embeddings are never shared
/// across chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub id: String,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub embedding: Embedding,
}

/// Fully-populated resume as stored by the index. Immutable after ingest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub id: String,
    pub owner_id: String,
    pub filename: String,
    pub mime: String,
    pub text: String,
    pub chunks: Vec<EmbeddedChunk>,
    pub pii: PiiInfo,
    pub created_at_ms: i64,
}

/// Job posting stored verbatim; requirements embed lazily at match time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub created_at_ms: i64,
}

/// One page of an owner's resumes. `total` counts all matches before the
/// `[offset, offset + limit)` slice is taken.
#[derive(Debug, Clone, Serialize)]
pub struct ResumePage {
    pub total: usize,
    pub items: Vec<ResumeRecord>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobMatch {
    pub resume_id: String,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChunkHit {
    pub resume_id: String,
    pub text: String,
    pub score: f32,
}
