use crate::classifiers::classifier::IncrementalClassifier;
use crate::error::{CaptionError, Result};
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};

/// Multinomial naive Bayes over non-negative term weights.
///
/// Keeps raw per-class weight totals, so an online update is just an
/// addition and the batch fit is the same as training every example in
/// sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNaiveBayes {
    alpha: f64,
    num_features: usize,
    observed_class_distribution: Vec<f64>,
    feature_weight_per_class: Vec<Vec<f64>>,
}

impl MultinomialNaiveBayes {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            num_features: 0,
            observed_class_distribution: Vec::new(),
            feature_weight_per_class: Vec::new(),
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn class_weight(&self, class_index: usize) -> Option<f64> {
        self.observed_class_distribution.get(class_index).copied()
    }

    #[inline]
    fn ensure_class(&mut self, class_index: usize) {
        if class_index >= self.observed_class_distribution.len() {
            let width = self.num_features;
            self.observed_class_distribution.resize(class_index + 1, 0.0);
            self.feature_weight_per_class
                .resize_with(class_index + 1, || vec![0.0; width]);
        }
    }

    /// Per-class log joint likelihood of `features`.
    pub fn joint_log_likelihood(&self, features: &FeatureVector) -> Vec<f64> {
        let total: f64 = self.observed_class_distribution.iter().sum();
        let num_classes = self.observed_class_distribution.len();
        let smoothed_width = self.alpha * self.num_features as f64;

        (0..num_classes)
            .map(|c| {
                let prior = if total > 0.0 {
                    (self.observed_class_distribution[c] / total).ln()
                } else {
                    -(num_classes as f64).ln()
                };

                let row = &self.feature_weight_per_class[c];
                let denominator = (row.iter().sum::<f64>() + smoothed_width).ln();
                let likelihood: f64 = features
                    .iter()
                    .filter_map(|(f, x)| {
                        row.get(f)
                            .map(|w| x * ((w + self.alpha).ln() - denominator))
                    })
                    .sum();

                prior + likelihood
            })
            .collect()
    }
}

fn normalise_log_probabilities(jll: &[f64]) -> Vec<f64> {
    let max = jll.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return vec![1.0 / jll.len() as f64; jll.len()];
    }
    let exp: Vec<f64> = jll.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exp.iter().sum();
    exp.into_iter().map(|v| v / sum).collect()
}

impl IncrementalClassifier for MultinomialNaiveBayes {
    fn fresh(&self) -> Self {
        Self::new(self.alpha)
    }

    fn set_model_context(&mut self, num_features: usize, num_classes: usize) {
        self.num_features = num_features;
        self.observed_class_distribution = vec![0.0; num_classes];
        self.feature_weight_per_class = vec![vec![0.0; num_features]; num_classes];
    }

    fn declare_classes(&mut self, num_classes: usize) {
        if num_classes > 0 {
            self.ensure_class(num_classes - 1);
        }
    }

    fn number_of_classes(&self) -> usize {
        self.observed_class_distribution.len()
    }

    fn number_of_features(&self) -> usize {
        self.num_features
    }

    fn train_on_instance(
        &mut self,
        features: &FeatureVector,
        class_index: usize,
        weight: f64,
    ) -> Result<()> {
        if features.width() != self.num_features {
            return Err(CaptionError::FeatureWidth {
                got: features.width(),
                expected: self.num_features,
            });
        }
        if class_index >= self.observed_class_distribution.len() {
            return Err(CaptionError::UnknownClass {
                index: class_index,
                declared: self.observed_class_distribution.len(),
            });
        }

        let w = weight.max(0.0);
        if w == 0.0 {
            return Ok(());
        }

        self.observed_class_distribution[class_index] += w;
        let row = &mut self.feature_weight_per_class[class_index];
        for (f, x) in features.iter() {
            row[f] += w * x;
        }
        Ok(())
    }

    fn get_votes_for_instance(&self, features: &FeatureVector) -> Vec<f64> {
        if self.observed_class_distribution.is_empty() {
            return Vec::new();
        }
        normalise_log_probabilities(&self.joint_log_likelihood(features))
    }

    fn total_weight_seen(&self) -> f64 {
        self.observed_class_distribution.iter().sum()
    }

    fn check_consistency(&self) -> std::result::Result<(), String> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(format!("alpha {} is not a positive finite number", self.alpha));
        }
        if self.feature_weight_per_class.len() != self.observed_class_distribution.len() {
            return Err("class weights and feature weights disagree on class count".into());
        }
        if let Some(row) = self
            .feature_weight_per_class
            .iter()
            .find(|row| row.len() != self.num_features)
        {
            return Err(format!(
                "feature row has width {}, expected {}",
                row.len(),
                self.num_features
            ));
        }
        Ok(())
    }
}
