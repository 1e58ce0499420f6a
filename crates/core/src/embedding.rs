use std::env;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{MatchError, Result};

/// Fixed-length vector representing a piece of text. Vectors are only
/// comparable when produced by the same provider and dimension.
pub type Embedding = Vec<f32>;

pub const DEFAULT_DIMENSIONS: usize = 384;
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy)]
pub struct DeterministicEmbedderConfig {
    pub dimensions: usize,
}

impl Default for DeterministicEmbedderConfig {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
        }
    }
}

/// Digest-derived embedding for reproducible offline operation. Same text and
/// dimension always yield the same vector, across calls and process restarts.
#[derive(Clone)]
pub struct DeterministicEmbedder {
    config: DeterministicEmbedderConfig,
}

impl DeterministicEmbedder {
    pub fn new(config: DeterministicEmbedderConfig) -> Self {
        Self { config }
    }

    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    pub fn embed_text(&self, text: &str) -> Embedding {
        let digest = Sha256::digest(text.as_bytes());
        let dims = self.config.dimensions.max(1);
        let mut out = Vec::with_capacity(dims);
        for i in 0..dims {
            let byte = digest[i % digest.len()];
            // byte 0..=255 -> [-1, 1]
            out.push((byte as f32 / 255.0) * 2.0 - 1.0);
        }
        out
    }
}

#[derive(Clone)]
pub enum EmbeddingBackend {
    Deterministic(DeterministicEmbedder),
    Remote(RemoteEmbeddingClient),
}

/// Provider handle injected into the document index. The strategy is chosen
/// once at construction, not re-read from the environment per call.
#[derive(Clone)]
pub struct EmbeddingClient {
    backend: EmbeddingBackend,
}

impl EmbeddingClient {
    pub fn from_env() -> Result<Self> {
        match env::var("EMBEDDING_PROVIDER")
            .unwrap_or_else(|_| "deterministic".to_string())
            .to_lowercase()
            .as_str()
        {
            "remote" => Ok(Self {
                backend: EmbeddingBackend::Remote(RemoteEmbeddingClient::from_env()?),
            }),
            _ => {
                let dims = env::var("EMBEDDING_DIMENSIONS")
                    .ok()
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(DEFAULT_DIMENSIONS);
                Ok(Self::deterministic(dims))
            }
        }
    }

    pub fn deterministic(dimensions: usize) -> Self {
        Self {
            backend: EmbeddingBackend::Deterministic(DeterministicEmbedder::new(
                DeterministicEmbedderConfig { dimensions },
            )),
        }
    }

    pub fn remote(client: RemoteEmbeddingClient) -> Self {
        Self {
            backend: EmbeddingBackend::Remote(client),
        }
    }

    pub fn embed(&self, text: &str) -> Result<Embedding> {
        match &self.backend {
            EmbeddingBackend::Deterministic(embedder) => Ok(embedder.embed_text(text)),
            EmbeddingBackend::Remote(client) => client.embed(text),
        }
    }

    /// Output dimension, when known ahead of a call. Remote endpoints define
    /// their own dimension, so it is only observable from a response.
    pub fn dimensions(&self) -> Option<usize> {
        match &self.backend {
            EmbeddingBackend::Deterministic(embedder) => Some(embedder.dimensions()),
            EmbeddingBackend::Remote(_) => None,
        }
    }
}

impl Default for EmbeddingClient {
    fn default() -> Self {
        Self::deterministic(DEFAULT_DIMENSIONS)
    }
}

/// Blocking client for a remote embedding endpoint. One outbound call per
/// invocation; no caching at this layer.
#[derive(Debug, Clone)]
pub struct RemoteEmbeddingClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl RemoteEmbeddingClient {
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        if endpoint.trim().is_empty() {
            return Err(MatchError::Configuration(
                "remote embedding endpoint is empty".to_string(),
            ));
        }
        if api_key.trim().is_empty() {
            return Err(MatchError::Configuration(
                "remote embedding api key is empty".to_string(),
            ));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MatchError::Provider(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_env() -> Result<Self> {
        let endpoint = env::var("EMBEDDING_ENDPOINT").map_err(|_| {
            MatchError::Configuration("EMBEDDING_ENDPOINT is required for remote embeddings".to_string())
        })?;
        let api_key = env::var("EMBEDDING_API_KEY").map_err(|_| {
            MatchError::Configuration("EMBEDDING_API_KEY is required for remote embeddings".to_string())
        })?;
        let timeout_ms = env::var("EMBEDDING_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        Self::new(&endpoint, &api_key, Duration::from_millis(timeout_ms))
    }

    pub fn embed(&self, text: &str) -> Result<Embedding> {
        debug!(endpoint = %self.endpoint, chars = text.len(), "remote embed");
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({ "text": text }))
            .send()
            .map_err(|e| MatchError::Provider(e.to_string()))?;
        if !response.status().is_success() {
            return Err(MatchError::Provider(format!(
                "embedding request failed: {}",
                response.status()
            )));
        }
        let parsed: RemoteEmbeddingResponse = response
            .json()
            .map_err(|e| MatchError::Provider(e.to_string()))?;
        parsed
            .embedding
            .and_then(|payload| payload.values)
            .ok_or_else(|| {
                MatchError::Provider("response missing embedding.values array".to_string())
            })
    }
}

#[derive(Deserialize)]
struct RemoteEmbeddingResponse {
    embedding: Option<RemoteEmbeddingValues>,
}

#[derive(Deserialize)]
struct RemoteEmbeddingValues {
    values: Option<Vec<f32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_embedding_is_stable() {
        let embedder = DeterministicEmbedder::new(DeterministicEmbedderConfig::default());
        let a = embedder.embed_text("senior rust engineer");
        let b = embedder.embed_text("senior rust engineer");
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_DIMENSIONS);
    }

    #[test]
    fn deterministic_values_stay_in_unit_range() {
        let embedder =
            DeterministicEmbedder::new(DeterministicEmbedderConfig { dimensions: 512 });
        for value in embedder.embed_text("range check") {
            assert!((-1.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn dimension_wraps_over_digest_length() {
        let embedder = DeterministicEmbedder::new(DeterministicEmbedderConfig { dimensions: 64 });
        let vector = embedder.embed_text("wrap");
        // SHA-256 digest is 32 bytes, so position 32 repeats position 0.
        assert_eq!(vector[0], vector[32]);
        assert_eq!(vector[5], vector[37]);
    }

    #[test]
    fn different_texts_differ() {
        let embedder = DeterministicEmbedder::new(DeterministicEmbedderConfig::default());
        assert_ne!(embedder.embed_text("alpha"), embedder.embed_text("beta"));
    }

    #[test]
    fn client_reports_dimensions_when_known() {
        assert_eq!(EmbeddingClient::deterministic(96).dimensions(), Some(96));
        let remote =
            RemoteEmbeddingClient::new("http://localhost:9", "key", Duration::from_secs(1))
                .unwrap();
        assert_eq!(EmbeddingClient::remote(remote).dimensions(), None);
        let vector = EmbeddingClient::deterministic(96).embed("sample text").unwrap();
        assert_eq!(vector.len(), 96);
    }

    #[test]
    fn remote_client_requires_credentials() {
        let err = RemoteEmbeddingClient::new("", "key", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, MatchError::Configuration(_)));
        let err = RemoteEmbeddingClient::new("http://localhost:9", "", Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, MatchError::Configuration(_)));
    }
}
