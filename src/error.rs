//! Error types for the caption model.
//!
//! Every failure is recoverable by the caller: training errors leave the
//! previously trained state untouched, so retrying with corrected input is
//! always safe.

use thiserror::Error;

/// Top-level error type for captioner operations.
#[derive(Error, Debug)]
pub enum CaptionError {
    /// A batch or online training call was rejected before any state changed
    #[error("Training failed: {0}")]
    Training(#[from] TrainingError),

    /// The classifier was asked to learn a class it was never told about
    #[error("Unknown class index {index} (classifier declares {declared} classes)")]
    UnknownClass { index: usize, declared: usize },

    /// A feature vector does not match the width the classifier was fitted on
    #[error("Feature vector has width {got}, expected {expected}")]
    FeatureWidth { got: usize, expected: usize },

    /// A persisted snapshot does not describe a consistent model
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a training batch is refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrainingError {
    #[error("training batch is empty")]
    EmptyBatch,

    #[error("got {label_sets} label sets but {captions} captions")]
    LengthMismatch { label_sets: usize, captions: usize },

    #[error("caption at position {position} is blank")]
    BlankCaption { position: usize },

    /// None of the label sets produced a single usable term
    #[error("empty feature vocabulary; label sets contain no usable terms")]
    EmptyFeatureVocabulary,
}

pub type Result<T> = std::result::Result<T, CaptionError>;
