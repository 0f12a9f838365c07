pub mod multinomial_naive_bayes;

pub use multinomial_naive_bayes::MultinomialNaiveBayes;
