use crate::config::{Norm, VectorizerConfig};
use crate::error::TrainingError;
use crate::features::feature_vector::FeatureVector;
use crate::features::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// TF-IDF transform over label documents.
///
/// Fitted once per batch training call; afterwards `transform` maps any
/// document into the same feature space and silently ignores terms that
/// were not seen during the fit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn fit(config: &VectorizerConfig, documents: &[String]) -> Result<Self, TrainingError> {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for document in documents {
            let distinct: BTreeSet<String> =
                tokenize(document, config.lowercase, config.min_token_chars)
                    .into_iter()
                    .collect();
            for term in distinct {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(TrainingError::EmptyFeatureVocabulary);
        }

        let n_documents = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (index, (term, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((1.0 + n_documents) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        Ok(Self {
            config: config.clone(),
            vocabulary,
            idf,
        })
    }

    pub fn fit_transform(
        config: &VectorizerConfig,
        documents: &[String],
    ) -> Result<(Self, Vec<FeatureVector>), TrainingError> {
        let vectorizer = Self::fit(config, documents)?;
        let features = documents.iter().map(|d| vectorizer.transform(d)).collect();
        Ok((vectorizer, features))
    }

    pub fn transform(&self, document: &str) -> FeatureVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in tokenize(document, self.config.lowercase, self.config.min_token_chars) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let sublinear = self.config.sublinear_tf;
        let mut vector = FeatureVector::from_pairs(
            self.num_features(),
            counts.into_iter().map(|(index, count)| {
                let tf = if sublinear { 1.0 + count.ln() } else { count };
                (index, tf * self.idf[index])
            }),
        );

        let norm = match self.config.norm {
            Norm::L1 => vector.l1_norm(),
            Norm::L2 => vector.l2_norm(),
            Norm::None => 0.0,
        };
        if norm > 0.0 {
            vector.scale(1.0 / norm);
        }
        vector
    }

    pub fn num_features(&self) -> usize {
        self.idf.len()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf_of(&self, term: &str) -> Option<f64> {
        self.index_of(term).map(|i| self.idf[i])
    }

    /// Terms in feature-index order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }

    /// Confirms a deserialized transform is internally consistent.
    pub fn check_consistency(&self) -> Result<(), String> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(format!(
                "vectorizer has {} terms but {} idf weights",
                self.vocabulary.len(),
                self.idf.len()
            ));
        }
        let mut seen = vec![false; self.idf.len()];
        for (term, &index) in &self.vocabulary {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(format!("term '{term}' has invalid feature index {index}")),
            }
        }
        if let Some(w) = self.idf.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(format!("idf weight {w} is not a positive finite number"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn docs(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn vocabulary_is_sorted_with_smoothed_idf() {
        let config = VectorizerConfig::default();
        let v = TfidfVectorizer::fit(&config, &docs(&["dog cat", "house tree"])).unwrap();

        assert_eq!(v.terms().collect::<Vec<_>>(), vec!["cat", "dog", "house", "tree"]);
        assert_eq!(v.index_of("house"), Some(2));
        // ln(3/2) + 1 for terms present in one of two documents
        let expected = (3.0f64 / 2.0).ln() + 1.0;
        for term in ["cat", "dog", "house", "tree"] {
            assert!(approx(v.idf_of(term).unwrap(), expected, EPS));
        }
    }

    #[test]
    fn shared_terms_get_lower_idf() {
        let config = VectorizerConfig::default();
        let v = TfidfVectorizer::fit(&config, &docs(&["dog cat", "dog house"])).unwrap();
        assert!(approx(v.idf_of("dog").unwrap(), 1.0, EPS));
        assert!(v.idf_of("cat").unwrap() > v.idf_of("dog").unwrap());
    }

    #[test]
    fn transform_is_l2_normalised_and_ignores_unseen_terms() {
        let config = VectorizerConfig::default();
        let v = TfidfVectorizer::fit(&config, &docs(&["dog cat", "house tree"])).unwrap();

        let x = v.transform("dog house zebra");
        assert_eq!(x.width(), 4);
        assert_eq!(x.nnz(), 2);
        assert!(approx(x.l2_norm(), 1.0, EPS));
        assert!(approx(x.get(1), x.get(2), EPS));

        assert!(v.transform("zebra giraffe").is_zero());
    }

    #[test]
    fn repeated_terms_weigh_more() {
        let config = VectorizerConfig {
            norm: Norm::None,
            ..VectorizerConfig::default()
        };
        let v = TfidfVectorizer::fit(&config, &docs(&["dog cat"])).unwrap();
        let x = v.transform("dog dog cat");
        assert!(approx(x.get(v.index_of("dog").unwrap()), 2.0, EPS));
        assert!(approx(x.get(v.index_of("cat").unwrap()), 1.0, EPS));

        let sub = VectorizerConfig {
            norm: Norm::None,
            sublinear_tf: true,
            ..VectorizerConfig::default()
        };
        let v = TfidfVectorizer::fit(&sub, &docs(&["dog cat"])).unwrap();
        let x = v.transform("dog dog cat");
        assert!(approx(x.get(v.index_of("dog").unwrap()), 1.0 + 2.0f64.ln(), EPS));
    }

    #[test]
    fn l1_norm_sums_to_one() {
        let config = VectorizerConfig {
            norm: Norm::L1,
            ..VectorizerConfig::default()
        };
        let v = TfidfVectorizer::fit(&config, &docs(&["dog cat", "dog house"])).unwrap();
        assert!(approx(v.transform("dog cat").l1_norm(), 1.0, EPS));
    }

    #[test]
    fn documents_without_terms_fail_to_fit() {
        let config = VectorizerConfig::default();
        let err = TfidfVectorizer::fit(&config, &docs(&["", "a b"])).unwrap_err();
        assert_eq!(err, TrainingError::EmptyFeatureVocabulary);
    }

    #[test]
    fn consistency_check_catches_tampering() {
        let config = VectorizerConfig::default();
        let mut v = TfidfVectorizer::fit(&config, &docs(&["dog cat"])).unwrap();
        assert!(v.check_consistency().is_ok());
        v.idf.push(1.0);
        assert!(v.check_consistency().is_err());
    }
}
