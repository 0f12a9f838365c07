use crate::captioning::adaptive_captioner::AdaptiveCaptioner;
use crate::captioning::snapshot::ModelSnapshot;
use crate::classifiers::{IncrementalClassifier, MultinomialNaiveBayes};
use crate::core::{Caption, LabelSet, TrainingExample};
use crate::error::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle to one captioner shared by several request workers.
///
/// Every operation runs under a single lock, so online updates are
/// serialized and readers never observe a half-applied update.
pub struct SharedCaptioner<C = MultinomialNaiveBayes> {
    inner: Arc<Mutex<AdaptiveCaptioner<C>>>,
}

impl<C> Clone for SharedCaptioner<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: IncrementalClassifier> SharedCaptioner<C> {
    pub fn new(captioner: AdaptiveCaptioner<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(captioner)),
        }
    }

    // No operation leaves a partial update behind; poisoning is recovered.
    fn lock(&self) -> MutexGuard<'_, AdaptiveCaptioner<C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn train(&self, examples: &[TrainingExample]) -> Result<()> {
        self.lock().train(examples)
    }

    pub fn explicit_train(&self, label_sets: &[LabelSet], captions: &[Caption]) -> Result<()> {
        self.lock().explicit_train(label_sets, captions)
    }

    pub fn generate_caption(&self, labels: &LabelSet) -> Caption {
        self.lock().generate_caption(labels)
    }

    pub fn generate_improved_caption(&self, labels: &LabelSet) -> Caption {
        self.lock().generate_improved_caption(labels)
    }

    pub fn update_model(&self, labels: &LabelSet, caption: &str) -> Result<()> {
        self.lock().update_model(labels, caption)
    }

    pub fn is_trained(&self) -> bool {
        self.lock().is_trained()
    }

    pub fn vocabulary(&self) -> Vec<String> {
        self.lock().vocabulary().to_vec()
    }

    /// Runs `f` with exclusive access, for multi-step operations that must
    /// not interleave with other callers.
    pub fn with_captioner<T>(&self, f: impl FnOnce(&mut AdaptiveCaptioner<C>) -> T) -> T {
        f(&mut self.lock())
    }
}

impl<C: IncrementalClassifier + Clone> SharedCaptioner<C> {
    pub fn snapshot(&self) -> ModelSnapshot<C> {
        self.lock().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CaptionerConfig;
    use std::thread;

    fn shared() -> SharedCaptioner {
        let config = CaptionerConfig {
            seed: Some(17),
            ..CaptionerConfig::default()
        };
        SharedCaptioner::new(AdaptiveCaptioner::new(&config).unwrap())
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let captioner = shared();
        captioner
            .train(&[TrainingExample::new(["dog", "cat"], "A dog and a cat")])
            .unwrap();

        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let handle = captioner.clone();
                thread::spawn(move || {
                    for round in 0..10 {
                        let caption = format!("Caption {worker}-{round}");
                        handle
                            .update_model(&LabelSet::from(["dog", "house"]), &caption)
                            .unwrap();
                        let drawn = handle.generate_improved_caption(&LabelSet::from(["dog"]));
                        assert!(handle.vocabulary().contains(&drawn));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(captioner.vocabulary().len(), 81);
        let examples = captioner.with_captioner(|c| c.examples_seen());
        assert!((examples - 81.0).abs() < 1e-9);
    }

    #[test]
    fn clones_share_state() {
        let a = shared();
        let b = a.clone();
        assert!(!b.is_trained());
        a.update_model(&LabelSet::from(["beach"]), "A sunny beach").unwrap();
        assert!(b.is_trained());
        assert_eq!(b.vocabulary(), vec!["A sunny beach".to_string()]);
        assert!(b.snapshot().is_trained());
    }
}
