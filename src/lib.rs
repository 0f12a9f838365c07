pub mod captioning;
pub mod classifiers;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod logging;
pub mod sampling;
pub mod ui;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use captioning::{AdaptiveCaptioner, ModelSnapshot, SharedCaptioner, TemplateCaptioner};
pub use config::CaptionerConfig;
pub use crate::core::{Caption, LabelSet, TrainingExample};
pub use error::{CaptionError, TrainingError};
