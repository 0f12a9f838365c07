use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use schemars::schema_for;

use captionist::captioning::{AdaptiveCaptioner, ModelSnapshot, TrainingCorpus};
use captionist::config::CaptionerConfig;
use captionist::logging;
use captionist::ui::cli::args::{Cli, Command};
use captionist::ui::cli::drivers::InquireDriver;
use captionist::ui::cli::session::run_session;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GREEN: &str = "\x1b[32m";
const FG_GREY: &str = "\x1b[90m";

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    logging::init(
        &config
            .logging
            .clone()
            .with_overrides(cli.verbose, cli.json_logs),
    );

    match &cli.command {
        Some(Command::Caption(args)) => {
            let mut captioner = open_captioner(&config, cli.model.as_deref())?;
            let labels = args.labels.clone().unwrap_or_default();
            let caption = if args.template_only {
                captioner.generate_caption(&labels)
            } else {
                captioner.generate_improved_caption(&labels)
            };
            println!("{caption}");
        }
        Some(Command::Train(args)) => {
            let model_path = cli.require_model("train")?;
            let corpus = TrainingCorpus::from_json_file(&args.corpus)
                .with_context(|| format!("failed to read corpus {}", args.corpus.display()))?;
            let mut captioner = open_captioner(&config, Some(model_path))?;
            captioner
                .explicit_train(&corpus.label_sets, &corpus.captions)
                .context("training failed")?;
            save_captioner(&captioner, model_path)?;
            println!(
                "{FG_GREEN}{BOLD}trained{RESET} on {} examples, {} captions known",
                corpus.len(),
                captioner.vocabulary().len()
            );
        }
        Some(Command::Correct(args)) => {
            let model_path = cli.require_model("correct")?;
            let mut captioner = open_captioner(&config, Some(model_path))?;
            captioner
                .update_model(&args.labels, &args.caption)
                .context("failed to learn from correction")?;
            save_captioner(&captioner, model_path)?;
            println!(
                "{FG_GREEN}{BOLD}learned{RESET} {} -> {}  {DIM}({} captions known){RESET}",
                args.labels,
                args.caption,
                captioner.vocabulary().len()
            );
        }
        Some(Command::Inspect(args)) => {
            let captioner = open_captioner(&config, cli.model.as_deref())?;
            print_inspection(&captioner, args.labels.as_ref());
        }
        Some(Command::Schema) => {
            let schema = schema_for!(CaptionerConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        None => {
            let mut captioner = open_captioner(&config, cli.model.as_deref())?;
            println!("{BOLD}{FG_CYAN}▶ Caption session{RESET}");
            println!(
                "{FG_GREY}────────────────────────────────────────────────────────{RESET}"
            );
            let summary = run_session(&mut captioner, &InquireDriver, &mut io::stdout())
                .context("caption session failed")?;
            if let Some(path) = cli.model.as_deref()
                && summary.corrections > 0
            {
                save_captioner(&captioner, path)?;
            }
            println!(
                "{DIM}{} captions shown, {} corrections learned{RESET}",
                summary.captions_shown, summary.corrections
            );
            let _ = io::stdout().flush();
        }
    }

    Ok(())
}

/// Loads the snapshot at `path` when it exists, else starts untrained.
fn open_captioner(config: &CaptionerConfig, path: Option<&Path>) -> Result<AdaptiveCaptioner> {
    match path {
        Some(path) if path.exists() => {
            let snapshot = ModelSnapshot::load(path)
                .with_context(|| format!("failed to load model {}", path.display()))?;
            AdaptiveCaptioner::restore(config, snapshot)
                .with_context(|| format!("failed to restore model {}", path.display()))
        }
        _ => AdaptiveCaptioner::new(config).context("failed to build captioner"),
    }
}

fn save_captioner(captioner: &AdaptiveCaptioner, path: &Path) -> Result<()> {
    captioner
        .snapshot()
        .save(path)
        .with_context(|| format!("failed to save model to {}", path.display()))
}

fn print_inspection(captioner: &AdaptiveCaptioner, labels: Option<&captionist::LabelSet>) {
    let Some(model) = captioner.model() else {
        println!("{DIM}model is untrained; captions come from templates{RESET}");
        return;
    };

    println!(
        "{BOLD}{FG_CYAN}{} captions{RESET}  {DIM}{} examples seen, {} label terms, alpha {}{RESET}",
        model.vocabulary.len(),
        captioner.examples_seen(),
        model.vectorizer.num_features(),
        model.classifier.alpha()
    );

    match labels {
        Some(labels) => {
            let features = model.vectorizer.transform(&labels.joined());
            if features.is_zero() {
                println!("{DIM}no label term was seen in training; using caption priors{RESET}");
            } else {
                println!("{DIM}{} known label terms{RESET}", features.nnz());
            }
            println!("{DIM}P(caption | {labels}){RESET}");
            for (caption, p) in captioner.caption_probabilities(labels) {
                println!("  {} {caption}", progress_bar(p, 20));
            }
        }
        None => {
            let terms: Vec<String> = model
                .vectorizer
                .terms()
                .map(|term| {
                    let idf = model.vectorizer.idf_of(term).unwrap_or(0.0);
                    format!("{term}{FG_GREY}({idf:.2}){RESET}")
                })
                .collect();
            println!("{DIM}terms:{RESET} {}", terms.join(" "));
            for (i, caption) in model.vocabulary.as_slice().iter().enumerate() {
                let weight = model.classifier.class_weight(i).unwrap_or(0.0);
                println!("  {FG_GREY}{i:>4}{RESET} {caption}  {DIM}x{weight}{RESET}");
            }
        }
    }
}

fn progress_bar(ratio: f64, width: usize) -> String {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!(
        "[{}{}] {:>5.1}%",
        "█".repeat(filled),
        "░".repeat(empty),
        ratio * 100.0
    )
}
