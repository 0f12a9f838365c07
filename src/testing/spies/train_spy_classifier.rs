use crate::classifiers::{IncrementalClassifier, MultinomialNaiveBayes};
use crate::error::Result;
use crate::features::FeatureVector;
use std::sync::{Arc, Mutex};

/// One observed `train_on_instance` call.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainCall {
    pub class_index: usize,
    pub declared_classes: usize,
}

#[derive(Clone)]
pub struct TrainSpyHandle(Arc<Mutex<Vec<TrainCall>>>);

impl TrainSpyHandle {
    pub fn calls(&self) -> Vec<TrainCall> {
        self.0.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

/// Records the class set each update was trained against, then delegates
/// to a real naive Bayes model so predictions stay meaningful.
pub struct TrainSpyClassifier {
    calls: Arc<Mutex<Vec<TrainCall>>>,
    inner: MultinomialNaiveBayes,
}

impl TrainSpyClassifier {
    pub fn new() -> (Self, TrainSpyHandle) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                calls: calls.clone(),
                inner: MultinomialNaiveBayes::new(1.0),
            },
            TrainSpyHandle(calls),
        )
    }
}

impl IncrementalClassifier for TrainSpyClassifier {
    fn fresh(&self) -> Self {
        Self {
            calls: self.calls.clone(),
            inner: self.inner.fresh(),
        }
    }

    fn set_model_context(&mut self, num_features: usize, num_classes: usize) {
        self.inner.set_model_context(num_features, num_classes);
    }

    fn declare_classes(&mut self, num_classes: usize) {
        self.inner.declare_classes(num_classes);
    }

    fn number_of_classes(&self) -> usize {
        self.inner.number_of_classes()
    }

    fn number_of_features(&self) -> usize {
        self.inner.number_of_features()
    }

    fn train_on_instance(
        &mut self,
        features: &FeatureVector,
        class_index: usize,
        weight: f64,
    ) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(TrainCall {
                class_index,
                declared_classes: self.inner.number_of_classes(),
            });
        }
        self.inner.train_on_instance(features, class_index, weight)
    }

    fn get_votes_for_instance(&self, features: &FeatureVector) -> Vec<f64> {
        self.inner.get_votes_for_instance(features)
    }

    fn total_weight_seen(&self) -> f64 {
        self.inner.total_weight_seen()
    }

    fn check_consistency(&self) -> std::result::Result<(), String> {
        self.inner.check_consistency()
    }
}
