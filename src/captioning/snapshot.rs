//! Opaque, serializable captioner state.
//!
//! A snapshot holds the fitted feature transform, the caption vocabulary
//! and the classifier weights as one unit. The surrounding service decides
//! where snapshots live; [`ModelSnapshot::save`] and [`ModelSnapshot::load`]
//! cover the common JSON-file case.

use crate::captioning::adaptive_captioner::{AdaptiveCaptioner, FittedModel};
use crate::classifiers::{IncrementalClassifier, MultinomialNaiveBayes};
use crate::config::CaptionerConfig;
use crate::error::{CaptionError, Result};
use crate::sampling::{RngSampler, Sampler};
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot<C = MultinomialNaiveBayes> {
    pub format_version: u32,
    pub saved_at: String,
    /// `None` for a captioner that has never been trained.
    pub model: Option<FittedModel<C>>,
}

impl<C> ModelSnapshot<C> {
    pub fn new(model: Option<FittedModel<C>>) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            saved_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            model,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }
}

impl<C: Serialize> ModelSnapshot<C> {
    /// Writes the snapshot next to `path` and renames it into place, so an
    /// existing file is either fully replaced or left as it was.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut staged = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(staged.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|e| e.error)?;

        info!(path = %path.display(), trained = self.is_trained(), "saved caption model");
        Ok(())
    }
}

impl<C: DeserializeOwned> ModelSnapshot<C> {
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Self = serde_json::from_reader(reader)?;
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(CaptionError::InvalidSnapshot(format!(
                "unsupported format version {} (expected {SNAPSHOT_FORMAT_VERSION})",
                snapshot.format_version
            )));
        }
        Ok(snapshot)
    }
}

impl<C: IncrementalClassifier + Clone> AdaptiveCaptioner<C> {
    pub fn snapshot(&self) -> ModelSnapshot<C> {
        ModelSnapshot::new(self.model().cloned())
    }

    /// Rebuilds a captioner around a previously saved model.
    pub fn from_snapshot(
        config: &CaptionerConfig,
        prototype: C,
        sampler: Box<dyn Sampler>,
        snapshot: ModelSnapshot<C>,
    ) -> Result<Self> {
        let mut captioner = Self::with_parts(config, prototype, sampler)?;
        if let Some(model) = snapshot.model {
            model.check_consistency().map_err(CaptionError::InvalidSnapshot)?;
            captioner.install(model);
        }
        Ok(captioner)
    }
}

impl AdaptiveCaptioner<MultinomialNaiveBayes> {
    pub fn restore(config: &CaptionerConfig, snapshot: ModelSnapshot) -> Result<Self> {
        Self::from_snapshot(
            config,
            MultinomialNaiveBayes::new(config.smoothing),
            Box::new(RngSampler::from_seed_option(config.seed)),
            snapshot,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LabelSet, TrainingExample};
    use tempfile::tempdir;

    const EPS: f64 = 1e-12;

    fn trained() -> AdaptiveCaptioner {
        let config = CaptionerConfig {
            seed: Some(1),
            ..CaptionerConfig::default()
        };
        let mut captioner = AdaptiveCaptioner::new(&config).unwrap();
        captioner
            .train(&[
                TrainingExample::new(["dog", "cat"], "A dog and a cat"),
                TrainingExample::new(["house", "tree"], "A house near a tree"),
            ])
            .unwrap();
        captioner
            .update_model(&LabelSet::from(["dog", "house"]), "A dog in front of a house")
            .unwrap();
        captioner
    }

    #[test]
    fn save_and_load_reproduce_distribution() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let original = trained();
        original.snapshot().save(&path).unwrap();

        let snapshot: ModelSnapshot = ModelSnapshot::load(&path).unwrap();
        assert_eq!(snapshot.format_version, SNAPSHOT_FORMAT_VERSION);
        let restored = AdaptiveCaptioner::restore(&CaptionerConfig::default(), snapshot).unwrap();

        assert_eq!(restored.vocabulary(), original.vocabulary());
        let labels = LabelSet::from(["dog", "tree"]);
        let a = original.caption_probabilities(&labels);
        let b = restored.caption_probabilities(&labels);
        for ((ca, pa), (cb, pb)) in a.iter().zip(&b) {
            assert_eq!(ca, cb);
            assert!((pa - pb).abs() <= EPS);
        }
    }

    #[test]
    fn untrained_snapshot_restores_untrained() {
        let config = CaptionerConfig::default();
        let captioner = AdaptiveCaptioner::new(&config).unwrap();
        let snapshot = captioner.snapshot();
        assert!(!snapshot.is_trained());

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: ModelSnapshot = serde_json::from_str(&json).unwrap();
        let restored = AdaptiveCaptioner::restore(&config, back).unwrap();
        assert!(!restored.is_trained());
    }

    #[test]
    fn inconsistent_snapshot_is_rejected() {
        let mut snapshot = trained().snapshot();
        if let Some(model) = snapshot.model.as_mut() {
            model.vocabulary.insert("A caption the classifier never saw");
        }
        let err = AdaptiveCaptioner::restore(&CaptionerConfig::default(), snapshot).unwrap_err();
        assert!(matches!(err, CaptionError::InvalidSnapshot(_)), "err={err}");
    }

    #[test]
    fn unknown_format_version_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut snapshot = trained().snapshot();
        snapshot.format_version = 99;
        snapshot.save(&path).unwrap();

        let err = ModelSnapshot::<MultinomialNaiveBayes>::load(&path).unwrap_err();
        assert!(matches!(err, CaptionError::InvalidSnapshot(_)));
    }

    struct UnwritableClassifier;

    impl Serialize for UnwritableClassifier {
        fn serialize<S>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            Err(serde::ser::Error::custom("classifier cannot be written"))
        }
    }

    #[test]
    fn failed_save_keeps_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let original = trained();
        original.snapshot().save(&path).unwrap();
        let before = fs::read(&path).unwrap();

        let model = original.model().cloned().unwrap();
        let broken = ModelSnapshot::new(Some(FittedModel {
            vectorizer: model.vectorizer,
            vocabulary: model.vocabulary,
            classifier: UnwritableClassifier,
        }));
        let err = broken.save(&path).unwrap_err();
        assert!(matches!(err, CaptionError::Json(_)));

        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        let reloaded: ModelSnapshot = ModelSnapshot::load(&path).unwrap();
        assert!(reloaded.is_trained());
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models").join("model.json");
        trained().snapshot().save(&path).unwrap();
        assert!(ModelSnapshot::<MultinomialNaiveBayes>::load(&path).unwrap().is_trained());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = ModelSnapshot::<MultinomialNaiveBayes>::load(&dir.path().join("absent.json"))
            .unwrap_err();
        assert!(matches!(err, CaptionError::Io(_)));
    }
}
