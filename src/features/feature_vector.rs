use serde::{Deserialize, Serialize};

/// Sparse fixed-width feature vector.
///
/// Entries are sorted by index and hold no explicit zeros.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    width: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn zeros(width: usize) -> Self {
        Self {
            width,
            entries: Vec::new(),
        }
    }

    /// Builds a vector from `(index, value)` pairs in any order.
    ///
    /// Duplicate indices are summed; indices outside `width` are dropped.
    pub fn from_pairs(width: usize, pairs: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut entries: Vec<(usize, f64)> = pairs.into_iter().filter(|(i, _)| *i < width).collect();
        entries.sort_unstable_by_key(|(i, _)| *i);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (idx, value) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == idx => *acc += value,
                _ => merged.push((idx, value)),
            }
        }
        merged.retain(|(_, v)| *v != 0.0);

        Self {
            width,
            entries: merged,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn l1_norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v.abs()).sum()
    }

    pub fn l2_norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }

    pub fn scale(&mut self, factor: f64) {
        for (_, v) in self.entries.iter_mut() {
            *v *= factor;
        }
    }
}
