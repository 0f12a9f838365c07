use crate::captioning::template_captioner::TemplateCaptioner;
use crate::classifiers::{IncrementalClassifier, MultinomialNaiveBayes};
use crate::config::{CaptionerConfig, VectorizerConfig};
use crate::core::training_example::validate_batch;
use crate::core::{Caption, CaptionVocabulary, LabelSet, TrainingExample};
use crate::error::{CaptionError, Result, TrainingError};
use crate::features::TfidfVectorizer;
use crate::sampling::{RngSampler, Sampler, argmax};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Everything a trained captioner has learned.
///
/// Built aside during a batch fit and swapped in whole, so a failed fit
/// never leaves a half-trained model behind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedModel<C> {
    pub vectorizer: TfidfVectorizer,
    pub vocabulary: CaptionVocabulary,
    pub classifier: C,
}

impl<C: IncrementalClassifier> FittedModel<C> {
    pub fn check_consistency(&self) -> std::result::Result<(), String> {
        self.vectorizer.check_consistency()?;
        self.classifier.check_consistency()?;
        if self.vocabulary.is_empty() {
            return Err("caption vocabulary is empty".into());
        }
        if self.classifier.number_of_classes() != self.vocabulary.len() {
            return Err(format!(
                "classifier declares {} classes but vocabulary holds {} captions",
                self.classifier.number_of_classes(),
                self.vocabulary.len()
            ));
        }
        if self.classifier.number_of_features() != self.vectorizer.num_features() {
            return Err(format!(
                "classifier expects {} features but vectorizer produces {}",
                self.classifier.number_of_features(),
                self.vectorizer.num_features()
            ));
        }
        Ok(())
    }

    fn probabilities(&self, labels: &LabelSet) -> Vec<f64> {
        let features = self.vectorizer.transform(&labels.joined());
        if features.is_zero() {
            debug!(%labels, "no known label terms, caption priors only");
        }
        let mut votes = self.classifier.get_votes_for_instance(&features);
        votes.truncate(self.vocabulary.len());
        votes
    }

    fn draw(&self, labels: &LabelSet, sampler: &mut dyn Sampler) -> Caption {
        if self.vocabulary.len() == 1 {
            return self.vocabulary.as_slice()[0].clone();
        }

        let votes = self.probabilities(labels);
        let index = sampler.pick_weighted(&votes).unwrap_or_else(|| {
            warn!(?votes, "degenerate caption distribution, using most likely caption");
            argmax(&votes).unwrap_or(0)
        });
        // out-of-range draws fall on the last caption
        let index = index.min(self.vocabulary.len() - 1);
        self.vocabulary.as_slice()[index].clone()
    }
}

/// Label-conditioned caption model that keeps learning from corrections.
///
/// Until the first training call every caption comes from the
/// [`TemplateCaptioner`]. After that, captions are drawn from a naive Bayes
/// distribution over every caption seen so far.
pub struct AdaptiveCaptioner<C = MultinomialNaiveBayes> {
    template: TemplateCaptioner,
    vectorizer_config: VectorizerConfig,
    prototype: C,
    sampler: Box<dyn Sampler>,
    model: Option<FittedModel<C>>,
}

impl<C: fmt::Debug> fmt::Debug for AdaptiveCaptioner<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptiveCaptioner")
            .field("template", &self.template)
            .field("vectorizer_config", &self.vectorizer_config)
            .field("trained", &self.model.is_some())
            .field(
                "captions",
                &self.model.as_ref().map_or(0, |m| m.vocabulary.len()),
            )
            .field("classifier", &self.model.as_ref().map(|m| &m.classifier))
            .finish_non_exhaustive()
    }
}

impl AdaptiveCaptioner<MultinomialNaiveBayes> {
    /// Untrained captioner; draws are seeded when `config.seed` is set.
    pub fn new(config: &CaptionerConfig) -> Result<Self> {
        let sampler = Box::new(RngSampler::from_seed_option(config.seed));
        Self::with_parts(config, MultinomialNaiveBayes::new(config.smoothing), sampler)
    }
}

impl<C: IncrementalClassifier> AdaptiveCaptioner<C> {
    pub fn with_parts(
        config: &CaptionerConfig,
        prototype: C,
        sampler: Box<dyn Sampler>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            template: TemplateCaptioner::new(config),
            vectorizer_config: config.vectorizer.clone(),
            prototype,
            sampler,
            model: None,
        })
    }

    pub fn with_sampler(mut self, sampler: Box<dyn Sampler>) -> Self {
        self.sampler = sampler;
        self
    }

    pub(crate) fn install(&mut self, model: FittedModel<C>) {
        self.model = Some(model);
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&FittedModel<C>> {
        self.model.as_ref()
    }

    /// Captions in class order; empty before training.
    pub fn vocabulary(&self) -> &[String] {
        self.model
            .as_ref()
            .map(|m| m.vocabulary.as_slice())
            .unwrap_or(&[])
    }

    pub fn examples_seen(&self) -> f64 {
        self.model
            .as_ref()
            .map(|m| m.classifier.total_weight_seen())
            .unwrap_or(0.0)
    }

    /// Re-fits the feature space and classifier on `examples`.
    ///
    /// Replaces any previous model, vocabulary included. On error the
    /// previous model is kept as it was.
    pub fn train(&mut self, examples: &[TrainingExample]) -> Result<()> {
        let fitted = self.fit(examples)?;
        info!(
            examples = examples.len(),
            features = fitted.vectorizer.num_features(),
            captions = fitted.vocabulary.len(),
            "caption model trained"
        );
        self.model = Some(fitted);
        Ok(())
    }

    /// Administrative bulk retrain from parallel label/caption lists.
    pub fn explicit_train(&mut self, label_sets: &[LabelSet], captions: &[Caption]) -> Result<()> {
        let examples = TrainingExample::zip(label_sets, captions)?;
        self.train(&examples)
    }

    fn fit(&self, examples: &[TrainingExample]) -> Result<FittedModel<C>> {
        validate_batch(examples)?;

        let documents: Vec<String> = examples.iter().map(|e| e.labels.joined()).collect();
        let (vectorizer, features) =
            TfidfVectorizer::fit_transform(&self.vectorizer_config, &documents)?;
        let vocabulary = CaptionVocabulary::from_batch(examples.iter().map(|e| e.caption.as_str()));

        let mut classifier = self.prototype.fresh();
        classifier.set_model_context(vectorizer.num_features(), vocabulary.len());
        for (example, x) in examples.iter().zip(&features) {
            classifier.train_on_instance(x, vocabulary.index_for(&example.caption), 1.0)?;
        }

        Ok(FittedModel {
            vectorizer,
            vocabulary,
            classifier,
        })
    }

    /// Template caption, regardless of training state.
    pub fn generate_caption(&mut self, labels: &LabelSet) -> Caption {
        self.template.generate(labels, self.sampler.as_mut())
    }

    /// Caption drawn from the learned distribution, or the template
    /// caption while untrained.
    pub fn generate_improved_caption(&mut self, labels: &LabelSet) -> Caption {
        match &self.model {
            Some(model) => {
                let caption = model.draw(labels, self.sampler.as_mut());
                debug!(%labels, %caption, "sampled caption");
                caption
            }
            None => {
                debug!(%labels, "caption model untrained, using template");
                self.template.generate(labels, self.sampler.as_mut())
            }
        }
    }

    /// Probability of every known caption for `labels`, in class order.
    pub fn caption_probabilities(&self, labels: &LabelSet) -> Vec<(String, f64)> {
        let Some(model) = &self.model else {
            return Vec::new();
        };
        model
            .vocabulary
            .as_slice()
            .iter()
            .cloned()
            .zip(model.probabilities(labels))
            .collect()
    }

    /// Learns from a single corrected caption.
    ///
    /// The first call on an untrained captioner is a batch fit of one
    /// example. Later calls reuse the fitted feature space; a caption never
    /// seen before is added to the vocabulary and declared to the
    /// classifier before the update is applied.
    pub fn update_model(&mut self, labels: &LabelSet, caption: &str) -> Result<()> {
        if caption.trim().is_empty() {
            return Err(TrainingError::BlankCaption { position: 0 }.into());
        }

        if let Some(model) = self.model.as_mut() {
            let features = model.vectorizer.transform(&labels.joined());
            // nothing may change until the update is known to fit
            let expected = model.classifier.number_of_features();
            if features.width() != expected {
                return Err(CaptionError::FeatureWidth {
                    got: features.width(),
                    expected,
                });
            }
            let is_new = !model.vocabulary.contains(caption);
            let class_index = model.vocabulary.index_for(caption);

            model.classifier.declare_classes(class_index + 1);
            model.classifier.train_on_instance(&features, class_index, 1.0)?;
            model.vocabulary.insert(caption);

            if is_new {
                info!(caption, captions = model.vocabulary.len(), "caption vocabulary grew");
            } else {
                debug!(caption, class_index, "reinforced caption");
            }
            return Ok(());
        }

        self.train(&[TrainingExample::new(labels.clone(), caption)])
    }
}
