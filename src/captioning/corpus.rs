use crate::core::{Caption, LabelSet, TrainingExample};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Administrative retraining corpus: parallel label-set and caption lists.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingCorpus {
    pub label_sets: Vec<LabelSet>,
    pub captions: Vec<Caption>,
}

impl TrainingCorpus {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn len(&self) -> usize {
        self.label_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label_sets.is_empty()
    }

    pub fn examples(&self) -> Result<Vec<TrainingExample>> {
        TrainingExample::zip(&self.label_sets, &self.captions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CaptionError, TrainingError};
    use std::io::Write;

    #[test]
    fn reads_parallel_lists() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"label_sets": [["dog", "cat"], ["house"]], "captions": ["A dog and a cat", "A house"]}}"#
        )
        .unwrap();

        let corpus = TrainingCorpus::from_json_file(file.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        let examples = corpus.examples().unwrap();
        assert_eq!(examples[0], TrainingExample::new(["dog", "cat"], "A dog and a cat"));
    }

    #[test]
    fn uneven_lists_fail_when_paired() {
        let corpus = TrainingCorpus {
            label_sets: vec![LabelSet::from(["dog"])],
            captions: Vec::new(),
        };
        assert!(matches!(
            corpus.examples(),
            Err(CaptionError::Training(TrainingError::LengthMismatch { .. }))
        ));
    }
}
