use crate::config::{CaptionerConfig, SUBJECT_PLACEHOLDER};
use crate::core::{Caption, LabelSet};
use crate::sampling::Sampler;

/// Cold-start caption generator: a random sentence template filled with
/// the leading labels. Holds no learned state.
#[derive(Clone, Debug)]
pub struct TemplateCaptioner {
    templates: Vec<String>,
    neutral_caption: String,
    max_subjects: usize,
    subject_separator: String,
}

impl TemplateCaptioner {
    pub fn new(config: &CaptionerConfig) -> Self {
        Self {
            templates: config.templates.clone(),
            neutral_caption: config.neutral_caption.clone(),
            max_subjects: config.max_subjects,
            subject_separator: config.subject_separator.clone(),
        }
    }

    pub fn subject_phrase(&self, labels: &LabelSet) -> String {
        labels.leading(self.max_subjects).join(&self.subject_separator)
    }

    pub fn generate(&self, labels: &LabelSet, sampler: &mut dyn Sampler) -> Caption {
        if labels.is_empty() || self.templates.is_empty() {
            return self.neutral_caption.clone();
        }
        // out-of-range draws fall on the last template
        let last = self.templates.len() - 1;
        let template = &self.templates[sampler.pick_uniform(self.templates.len()).min(last)];
        template.replacen(SUBJECT_PLACEHOLDER, &self.subject_phrase(labels), 1)
    }
}

impl Default for TemplateCaptioner {
    fn default() -> Self {
        Self::new(&CaptionerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::RngSampler;
    use crate::testing::stubs::{FirstChoiceSampler, OutOfRangeSampler};

    #[test]
    fn empty_labels_give_neutral_caption() {
        let captioner = TemplateCaptioner::default();
        let (mut sampler, draws) = FirstChoiceSampler::new();
        let caption = captioner.generate(&LabelSet::default(), &mut sampler);
        assert_eq!(caption, "An interesting image.");
        assert_eq!(draws.uniform_draws(), 0);
    }

    #[test]
    fn uses_first_three_labels() {
        let captioner = TemplateCaptioner::default();
        let mut sampler = RngSampler::seeded(11);
        let labels = LabelSet::from(["dog", "cat", "house", "tree"]);
        for _ in 0..20 {
            let caption = captioner.generate(&labels, &mut sampler);
            assert!(caption.contains("dog, cat, house"), "caption={caption}");
            assert!(!caption.contains("tree"), "caption={caption}");
        }
    }

    #[test]
    fn stubbed_draw_picks_first_template() {
        let captioner = TemplateCaptioner::default();
        let (mut sampler, draws) = FirstChoiceSampler::new();
        let caption = captioner.generate(&LabelSet::from(["dog"]), &mut sampler);
        assert_eq!(caption, "This image shows dog.");
        assert_eq!(draws.uniform_draws(), 1);
    }

    #[test]
    fn out_of_range_draw_uses_last_template() {
        let captioner = TemplateCaptioner::default();
        let caption = captioner.generate(&LabelSet::from(["dog"]), &mut OutOfRangeSampler);
        assert_eq!(caption, "A view of dog.");
    }

    #[test]
    fn every_template_is_reachable() {
        let captioner = TemplateCaptioner::default();
        let mut sampler = RngSampler::seeded(5);
        let labels = LabelSet::from(["dog"]);
        let seen: std::collections::HashSet<String> =
            (0..200).map(|_| captioner.generate(&labels, &mut sampler)).collect();
        assert_eq!(seen.len(), 4, "seen={seen:?}");
    }

    #[test]
    fn honours_configured_subjects_and_separator() {
        let config = CaptionerConfig {
            templates: vec!["Look: {}!".into()],
            max_subjects: 2,
            subject_separator: " & ".into(),
            ..CaptionerConfig::default()
        };
        let captioner = TemplateCaptioner::new(&config);
        let mut sampler = RngSampler::seeded(0);
        let caption = captioner.generate(&LabelSet::from(["a", "b", "c"]), &mut sampler);
        assert_eq!(caption, "Look: a & b!");
    }
}
