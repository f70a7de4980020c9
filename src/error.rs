//! Error types for vox-timeline.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoxError {
    // Script ingestion errors
    #[error("Invalid script: {message}")]
    InvalidScript {
        /// Position of the offending record, when one record is to blame.
        index: Option<usize>,
        message: String,
    },

    // Synthesis errors
    #[error("Synthesis error: {message}")]
    Synthesis { message: String },

    #[error("Synthesis failed for line {index} ({text:?}): {message}")]
    SynthesisFailure {
        index: usize,
        text: String,
        message: String,
    },

    // Composition errors
    #[error("Format conversion failed for segment {index}: {message}")]
    FormatConversion { index: usize, message: String },

    #[error("Composed track too large: {samples} samples (limit {limit})")]
    TrackTooLarge { samples: u64, limit: u64 },

    #[error("Debug export failed for {}: {message}", path.display())]
    DebugExport { path: PathBuf, message: String },

    #[error("Composition cancelled")]
    Cancelled,

    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VoxError {
    /// Script error tied to a single record.
    pub fn invalid_record(index: usize, message: impl Into<String>) -> Self {
        VoxError::InvalidScript {
            index: Some(index),
            message: format!("record {}: {}", index, message.into()),
        }
    }

    /// Index of the script line or segment this error is about, if any.
    pub fn line_index(&self) -> Option<usize> {
        match self {
            VoxError::InvalidScript { index, .. } => *index,
            VoxError::SynthesisFailure { index, .. } => Some(*index),
            VoxError::FormatConversion { index, .. } => Some(*index),
            _ => None,
        }
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VoxError>;
