use std::io::Write;

use anyhow::Result;

use crate::captioning::AdaptiveCaptioner;
use crate::classifiers::IncrementalClassifier;
use crate::core::LabelSet;
use crate::ui::cli::drivers::PromptDriver;

const LABELS_PROMPT: &str = "Labels:";
const LABELS_HELP: &str = "Comma separated, e.g. dog, cat. Leave empty to finish.";
const CORRECTION_PROMPT: &str = "Correct caption:";
const CORRECTION_HELP: &str = "Leave empty to accept the caption as is.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub captions_shown: usize,
    pub corrections: usize,
}

/// Interactive loop: caption each label set, learn from every correction.
///
/// Ends when the user enters no labels or skips the labels prompt.
pub fn run_session<C, D, W>(
    captioner: &mut AdaptiveCaptioner<C>,
    driver: &D,
    out: &mut W,
) -> Result<SessionSummary>
where
    C: IncrementalClassifier,
    D: PromptDriver,
    W: Write,
{
    let mut summary = SessionSummary::default();

    loop {
        let Some(raw) = driver.text(LABELS_PROMPT, Some(LABELS_HELP))? else {
            break;
        };
        let labels = LabelSet::parse_comma_separated(&raw);
        if labels.is_empty() {
            break;
        }

        let caption = captioner.generate_improved_caption(&labels);
        summary.captions_shown += 1;
        writeln!(out, "{caption}")?;

        let correction = driver
            .text(CORRECTION_PROMPT, Some(CORRECTION_HELP))?
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if correction.is_empty() || correction == caption {
            continue;
        }

        match captioner.update_model(&labels, &correction) {
            Ok(()) => {
                summary.corrections += 1;
                writeln!(out, "learned: {labels} -> {correction}")?;
            }
            Err(e) => writeln!(out, "could not learn from correction: {e}")?,
        }
    }

    Ok(summary)
}
