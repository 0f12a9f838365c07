use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// The captions a model can emit, in stable class order.
///
/// Position in `values` is the class index handed to the classifier. The
/// set only grows; a caption keeps its index for the lifetime of the fit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CaptionVocabulary {
    values: Vec<String>,
    caption_to_index: HashMap<String, usize>,
}

impl CaptionVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct captions of a batch, ordered lexicographically.
    pub fn from_batch<'a, I>(captions: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = captions.into_iter().collect();
        let mut vocabulary = Self::new();
        for caption in distinct {
            vocabulary.insert(caption);
        }
        vocabulary
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn index_of(&self, caption: &str) -> Option<usize> {
        self.caption_to_index.get(caption).copied()
    }

    pub fn contains(&self, caption: &str) -> bool {
        self.caption_to_index.contains_key(caption)
    }

    /// Index the caption would receive if inserted now.
    pub fn index_for(&self, caption: &str) -> usize {
        self.index_of(caption).unwrap_or(self.values.len())
    }

    /// Returns the caption's index, appending it when unseen.
    pub fn insert(&mut self, caption: &str) -> usize {
        if let Some(idx) = self.index_of(caption) {
            return idx;
        }
        let idx = self.values.len();
        self.values.push(caption.to_string());
        self.caption_to_index.insert(caption.to_string(), idx);
        idx
    }

    pub fn as_slice(&self) -> &[String] {
        &self.values
    }
}

impl From<Vec<String>> for CaptionVocabulary {
    fn from(values: Vec<String>) -> Self {
        let mut vocabulary = Self::new();
        for caption in &values {
            vocabulary.insert(caption);
        }
        vocabulary
    }
}

impl From<CaptionVocabulary> for Vec<String> {
    fn from(vocabulary: CaptionVocabulary) -> Self {
        vocabulary.values
    }
}
