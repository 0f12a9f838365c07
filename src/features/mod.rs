pub mod feature_vector;
pub mod tfidf_vectorizer;
pub mod tokenizer;

pub use feature_vector::FeatureVector;
pub use tfidf_vectorizer::TfidfVectorizer;
