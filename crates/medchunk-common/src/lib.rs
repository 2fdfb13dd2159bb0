//! medchunk-common — Shared error type and configuration used across all medchunk crates.

pub mod error;
pub mod config;

// Re-export commonly used types
pub use config::{ChunkerSettings, Config, IndexSettings};
pub use error::{MedchunkError, Result};
