//! Configuration loading for medchunk.
//! Reads medchunk.toml from the current directory or the path in MEDCHUNK_CONFIG.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MedchunkError, Result};

pub const CONFIG_ENV_VAR: &str = "MEDCHUNK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "medchunk.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chunker: ChunkerSettings,
    #[serde(default)]
    pub index: IndexSettings,
}

/// Knobs for the header splitter and the fallback chunker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerSettings {
    /// Character bound of the single chunk produced when no structure is found.
    #[serde(default = "default_fallback_max_chars")]
    pub fallback_max_chars: usize,
    /// Marker character that opens a heading line; depth = run length.
    #[serde(default = "default_heading_marker")]
    pub heading_marker: char,
    /// Longest marker run still treated as a heading.
    #[serde(default = "default_max_heading_depth")]
    pub max_heading_depth: usize,
}

fn default_fallback_max_chars() -> usize { 2000 }
fn default_heading_marker()     -> char  { '#' }
fn default_max_heading_depth()  -> usize { 6 }

impl Default for ChunkerSettings {
    fn default() -> Self {
        Self {
            fallback_max_chars: default_fallback_max_chars(),
            heading_marker: default_heading_marker(),
            max_heading_depth: default_max_heading_depth(),
        }
    }
}

/// Settings shared with the vector index collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSettings {
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_vector_size")]
    pub vector_size: usize,
    /// Section label stored for chunks that have no heading chain.
    #[serde(default = "default_section")]
    pub default_section: String,
}

fn default_collection()  -> String { "medical_docs".to_string() }
fn default_vector_size() -> usize  { 768 }
fn default_section()     -> String { "General".to_string() }

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            vector_size: default_vector_size(),
            default_section: default_section(),
        }
    }
}

impl Config {
    /// Load from `$MEDCHUNK_CONFIG`, or `medchunk.toml` in the working directory.
    /// A missing file yields the defaults.
    pub fn load_or_default() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV_VAR)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        if !Path::new(&path).exists() {
            tracing::debug!(path = %path, "No config file, using defaults");
            return Ok(Self::default());
        }

        Self::from_path(&path)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.as_ref().display(), "Config loaded");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let c = &self.chunker;
        if c.fallback_max_chars == 0 {
            return Err(MedchunkError::Config(
                "chunker.fallback_max_chars must be greater than 0".to_string(),
            ));
        }
        if c.max_heading_depth == 0 {
            return Err(MedchunkError::Config(
                "chunker.max_heading_depth must be greater than 0".to_string(),
            ));
        }
        if c.heading_marker.is_whitespace() || c.heading_marker.is_alphanumeric() {
            return Err(MedchunkError::Config(format!(
                "chunker.heading_marker {:?} must be a punctuation character",
                c.heading_marker
            )));
        }
        if self.index.vector_size == 0 {
            return Err(MedchunkError::Config(
                "index.vector_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
