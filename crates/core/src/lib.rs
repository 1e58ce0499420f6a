mod chunk;
mod embedding;
mod error;
mod pii;
mod redact;
mod similarity;

pub use chunk::{Chunk, ChunkConfig, Chunker};
pub use embedding::{
    DeterministicEmbedder, DeterministicEmbedderConfig, Embedding, EmbeddingBackend,
    EmbeddingClient, RemoteEmbeddingClient, DEFAULT_DIMENSIONS,
};
pub use error::{MatchError, Result};
pub use pii::{extract_pii, PiiDetector, PiiInfo, RegexPiiDetector};
pub use redact::{redact, EMAIL_PLACEHOLDER, PHONE_PLACEHOLDER};
pub use similarity::cosine;
