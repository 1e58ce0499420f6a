use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("embedding provider error: {0}")]
    Provider(String),
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("other: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MatchError>;

impl From<anyhow::Error> for MatchError {
    fn from(value: anyhow::Error) -> Self {
        Self::Other(value.to_string())
    }
}
