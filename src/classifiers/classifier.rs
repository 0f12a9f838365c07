use crate::error::Result;
use crate::features::FeatureVector;

/// A probabilistic classifier that learns one instance at a time.
///
/// Classes are plain indices. The class set must be declared before an
/// index can be trained, and it can only grow.
pub trait IncrementalClassifier {
    /// An untrained classifier with the same hyperparameters.
    fn fresh(&self) -> Self
    where
        Self: Sized;
    /// Resets all learned state for a new feature space and class set.
    fn set_model_context(&mut self, num_features: usize, num_classes: usize);
    /// Grows the class set to at least `num_classes`. Never shrinks.
    fn declare_classes(&mut self, num_classes: usize);
    fn number_of_classes(&self) -> usize;
    fn number_of_features(&self) -> usize;
    /// Fails only for an undeclared class or a vector of the wrong width.
    fn train_on_instance(
        &mut self,
        features: &FeatureVector,
        class_index: usize,
        weight: f64,
    ) -> Result<()>;
    /// Posterior probability per declared class, summing to one.
    fn get_votes_for_instance(&self, features: &FeatureVector) -> Vec<f64>;
    fn total_weight_seen(&self) -> f64;
    /// Structural checks for state restored from a snapshot.
    fn check_consistency(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}
