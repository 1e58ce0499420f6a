mod record;
mod store;

pub use record::{ChunkHit, EmbeddedChunk, JobMatch, JobRecord, ResumePage, ResumeRecord};
pub use store::DocumentIndex;
