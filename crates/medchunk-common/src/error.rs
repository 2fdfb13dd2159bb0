use thiserror::Error;

#[derive(Debug, Error)]
pub enum MedchunkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<toml::de::Error> for MedchunkError {
    fn from(e: toml::de::Error) -> Self {
        MedchunkError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MedchunkError>;
