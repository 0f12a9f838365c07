use crate::core::label_set::{Caption, LabelSet};
use crate::error::{Result, TrainingError};
use serde::{Deserialize, Serialize};

/// A label set paired with the caption a human accepted for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub labels: LabelSet,
    pub caption: Caption,
}

impl TrainingExample {
    pub fn new(labels: impl Into<LabelSet>, caption: impl Into<Caption>) -> Self {
        Self {
            labels: labels.into(),
            caption: caption.into(),
        }
    }

    /// Pairs the administrative parallel lists, refusing unequal lengths.
    pub fn zip(label_sets: &[LabelSet], captions: &[Caption]) -> Result<Vec<TrainingExample>> {
        if label_sets.len() != captions.len() {
            return Err(TrainingError::LengthMismatch {
                label_sets: label_sets.len(),
                captions: captions.len(),
            }
            .into());
        }
        Ok(label_sets
            .iter()
            .zip(captions)
            .map(|(labels, caption)| TrainingExample::new(labels.clone(), caption.clone()))
            .collect())
    }
}

/// Checks the structural requirements shared by batch and online training.
pub fn validate_batch(examples: &[TrainingExample]) -> std::result::Result<(), TrainingError> {
    if examples.is_empty() {
        return Err(TrainingError::EmptyBatch);
    }
    if let Some(position) = examples.iter().position(|e| e.caption.trim().is_empty()) {
        return Err(TrainingError::BlankCaption { position });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaptionError;

    #[test]
    fn zip_pairs_in_order() {
        let label_sets = vec![LabelSet::from(["dog"]), LabelSet::from(["tree"])];
        let captions = vec!["A dog".to_string(), "A tree".to_string()];
        let examples = TrainingExample::zip(&label_sets, &captions).unwrap();
        assert_eq!(examples[1], TrainingExample::new(["tree"], "A tree"));
    }

    #[test]
    fn zip_rejects_mismatched_lengths() {
        let label_sets = vec![LabelSet::from(["dog"])];
        let err = TrainingExample::zip(&label_sets, &[]).unwrap_err();
        assert!(matches!(
            err,
            CaptionError::Training(TrainingError::LengthMismatch {
                label_sets: 1,
                captions: 0
            })
        ));
    }

    #[test]
    fn validate_batch_flags_empty_and_blank() {
        assert_eq!(validate_batch(&[]), Err(TrainingError::EmptyBatch));
        let batch = vec![
            TrainingExample::new(["dog"], "A dog"),
            TrainingExample::new(["cat"], "   "),
        ];
        assert_eq!(
            validate_batch(&batch),
            Err(TrainingError::BlankCaption { position: 1 })
        );
        assert!(validate_batch(&batch[..1]).is_ok());
    }
}
