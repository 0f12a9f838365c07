pub mod bayes;
pub mod classifier;

pub use bayes::MultinomialNaiveBayes;
pub use classifier::IncrementalClassifier;
