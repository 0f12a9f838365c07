//! Captioner configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config
//! file. Values are checked by [`CaptionerConfig::validate`] before a
//! captioner is built from them.

use crate::error::{CaptionError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumString};
use tracing::Level;

pub const SUBJECT_PLACEHOLDER: &str = "{}";

fn default_templates() -> Vec<String> {
    [
        "This image shows {}.",
        "A scene featuring {}.",
        "An image containing {}.",
        "A view of {}.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_neutral_caption() -> String {
    "An interesting image.".into()
}

fn default_max_subjects() -> usize {
    3
}

fn default_subject_separator() -> String {
    ", ".into()
}

fn default_smoothing() -> f64 {
    1.0
}

fn default_min_token_chars() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".into()
}

/// Row normalisation applied to TF-IDF vectors.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Norm {
    L1,
    #[default]
    L2,
    None,
}

/// How log lines are rendered on stderr.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    #[schemars(
        title = "Level",
        description = "Level for captionist events: error, warn, info, debug or trace"
    )]
    pub level: String,

    #[serde(default)]
    #[schemars(title = "Format", description = "pretty or json")]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Applies the command-line switches; each one only ever raises the
    /// file setting.
    pub fn with_overrides(mut self, verbose: bool, json_logs: bool) -> Self {
        let quieter_than_debug = self
            .level
            .parse::<Level>()
            .map_or(true, |level| level < Level::DEBUG);
        if verbose && quieter_than_debug {
            self.level = "debug".into();
        }
        if json_logs {
            self.format = LogFormat::Json;
        }
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VectorizerConfig {
    #[serde(default = "default_true")]
    #[schemars(title = "Lowercase", description = "Lowercase labels before tokenizing")]
    pub lowercase: bool,

    #[serde(default = "default_min_token_chars")]
    #[schemars(
        title = "Minimum token length",
        description = "Tokens shorter than this many characters are dropped",
        range(min = 1)
    )]
    pub min_token_chars: usize,

    #[serde(default)]
    #[schemars(
        title = "Sublinear TF",
        description = "Use 1 + ln(count) instead of the raw term count"
    )]
    pub sublinear_tf: bool,

    #[serde(default)]
    #[schemars(title = "Norm", description = "Row normalisation: l1, l2 or none")]
    pub norm: Norm,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            min_token_chars: default_min_token_chars(),
            sublinear_tf: false,
            norm: Norm::L2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CaptionerConfig {
    #[serde(default = "default_templates")]
    #[schemars(
        title = "Templates",
        description = "Fallback sentence templates; each holds one {} subject placeholder"
    )]
    pub templates: Vec<String>,

    #[serde(default = "default_neutral_caption")]
    #[schemars(
        title = "Neutral caption",
        description = "Caption used when an image has no labels"
    )]
    pub neutral_caption: String,

    #[serde(default = "default_max_subjects")]
    #[schemars(
        title = "Max subjects",
        description = "How many leading labels form the fallback subject phrase",
        range(min = 1)
    )]
    pub max_subjects: usize,

    #[serde(default = "default_subject_separator")]
    #[schemars(title = "Subject separator")]
    pub subject_separator: String,

    #[serde(default = "default_smoothing")]
    #[schemars(
        title = "Smoothing",
        description = "Additive smoothing (alpha) of the naive Bayes feature estimates"
    )]
    pub smoothing: f64,

    #[serde(default)]
    pub vectorizer: VectorizerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    #[schemars(
        title = "Seed",
        description = "Seed for template and caption draws; omit for OS entropy"
    )]
    pub seed: Option<u64>,
}

impl Default for CaptionerConfig {
    fn default() -> Self {
        Self {
            templates: default_templates(),
            neutral_caption: default_neutral_caption(),
            max_subjects: default_max_subjects(),
            subject_separator: default_subject_separator(),
            smoothing: default_smoothing(),
            vectorizer: VectorizerConfig::default(),
            logging: LoggingConfig::default(),
            seed: None,
        }
    }
}

impl CaptionerConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: CaptionerConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.templates.is_empty() {
            return Err(CaptionError::Config("templates must not be empty".into()));
        }
        for template in &self.templates {
            if template.matches(SUBJECT_PLACEHOLDER).count() != 1 {
                return Err(CaptionError::Config(format!(
                    "template '{template}' must contain exactly one {SUBJECT_PLACEHOLDER} placeholder"
                )));
            }
        }
        if self.neutral_caption.trim().is_empty() {
            return Err(CaptionError::Config("neutral_caption must not be blank".into()));
        }
        if self.max_subjects == 0 {
            return Err(CaptionError::Config("max_subjects must be >= 1".into()));
        }
        if !self.smoothing.is_finite() || self.smoothing <= 0.0 {
            return Err(CaptionError::Config(format!(
                "smoothing must be a positive finite number, got {}",
                self.smoothing
            )));
        }
        if self.vectorizer.min_token_chars == 0 {
            return Err(CaptionError::Config("vectorizer.min_token_chars must be >= 1".into()));
        }
        if self.logging.level.parse::<Level>().is_err() {
            return Err(CaptionError::Config(format!(
                "logging.level '{}' is not a log level",
                self.logging.level
            )));
        }
        Ok(())
    }
}
