use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueHint};

use crate::config::CaptionerConfig;
use crate::core::LabelSet;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Caption images from their labels and learn from corrected captions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Captioner configuration file (JSON)
    #[arg(long, global = true, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Model snapshot to load and, for learning commands, save back
    #[arg(long, global = true, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub model: Option<PathBuf>,

    /// Seed template and caption draws (overrides the config file)
    #[arg(long, global = true, value_name = "N")]
    pub seed: Option<u64>,

    /// Log debug output (raises logging.level from the config file)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log as JSON lines (overrides logging.format)
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a caption for a label set
    Caption(CaptionArgs),
    /// Retrain the model from a corpus file, replacing what it learned
    Train(TrainArgs),
    /// Teach the model a corrected caption for a label set
    Correct(CorrectArgs),
    /// Show the caption vocabulary and, optionally, a predicted distribution
    Inspect(InspectArgs),
    /// Print the JSON schema of the configuration file
    Schema,
}

#[derive(Debug, Args)]
pub struct CaptionArgs {
    /// Comma separated labels, e.g. "dog,cat,house"; omit for an unlabeled image
    #[arg(long, value_name = "LABELS", value_parser = parse_labels)]
    pub labels: Option<LabelSet>,

    /// Use the template fallback even when a trained model exists
    #[arg(long)]
    pub template_only: bool,
}

#[derive(Debug, Args)]
pub struct TrainArgs {
    /// JSON corpus: {"label_sets": [[...]], "captions": [...]}
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub corpus: PathBuf,
}

#[derive(Debug, Args)]
pub struct CorrectArgs {
    /// Comma separated labels of the image
    #[arg(long, value_name = "LABELS", value_parser = parse_labels)]
    pub labels: LabelSet,

    /// The caption a human chose for the image
    #[arg(long, value_name = "TEXT")]
    pub caption: String,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Also print caption probabilities for these labels
    #[arg(long, value_name = "LABELS", value_parser = parse_labels)]
    pub labels: Option<LabelSet>,
}

impl Cli {
    pub fn load_config(&self) -> Result<CaptionerConfig> {
        let mut config = match &self.config {
            Some(path) => CaptionerConfig::from_json_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => CaptionerConfig::default(),
        };
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }

    pub fn require_model(&self, command: &str) -> Result<&Path> {
        match &self.model {
            Some(path) => Ok(path),
            None => bail!("'{command}' needs --model PATH to save what it learns"),
        }
    }
}

fn parse_labels(raw: &str) -> std::result::Result<LabelSet, String> {
    Ok(LabelSet::parse_comma_separated(raw))
}
