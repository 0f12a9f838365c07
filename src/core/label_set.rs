use serde::{Deserialize, Serialize};
use std::fmt;

pub type Caption = String;

/// Ordered labels describing one image, as produced by the vision service.
///
/// Labels are kept exactly as received: duplicates and ordering are
/// preserved, since the fallback caption uses the leading labels.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn leading(&self, n: usize) -> &[String] {
        &self.labels[..n.min(self.labels.len())]
    }

    /// Flat document fed to the feature transform.
    pub fn joined(&self) -> String {
        self.labels.join(" ")
    }

    /// Parses a comma separated list, trimming and dropping empty entries.
    pub fn parse_comma_separated(raw: &str) -> Self {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for LabelSet {
    fn from(labels: Vec<String>) -> Self {
        Self::new(labels)
    }
}

impl From<Vec<&str>> for LabelSet {
    fn from(labels: Vec<&str>) -> Self {
        labels.into_iter().collect()
    }
}

impl<const N: usize> From<[&str; N]> for LabelSet {
    fn from(labels: [&str; N]) -> Self {
        labels.into_iter().collect()
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.labels.join(", "))
    }
}
