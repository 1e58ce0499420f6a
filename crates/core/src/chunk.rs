use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkConfig {
    pub max_len: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self { max_len: 800 }
    }
}

/// One fixed-stride segment of a source document. `start`/`end` are a
/// half-open character-offset range into the parent text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    pub id: String,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Fixed-stride segmentation with no overlap and no boundary awareness.
/// Sentence or paragraph splitting is deliberately not attempted.
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// Splits `text` into `ceil(chars / max_len)` chunks; empty input yields
    /// none. Concatenating the chunk texts in id order reconstructs the
    /// input exactly. Offsets count Unicode scalar values, so slicing never
    /// lands inside a multi-byte sequence.
    pub fn chunk_text(&self, text: &str) -> Vec<Chunk> {
        let max_len = self.config.max_len.max(1);
        let mut chunks = Vec::new();
        if text.is_empty() {
            return chunks;
        }
        let mut boundaries: Vec<usize> = text.char_indices().map(|(idx, _)| idx).collect();
        boundaries.push(text.len());
        let total = boundaries.len() - 1;
        let mut start = 0usize;
        let mut counter = 0usize;
        while start < total {
            let end = (start + max_len).min(total);
            chunks.push(Chunk {
                id: format!("c{counter}"),
                start,
                end,
                text: text[boundaries[start]..boundaries[end]].to_string(),
            });
            counter += 1;
            start = end;
        }
        chunks
    }
}
