pub mod caption_vocabulary;
pub mod label_set;
pub mod training_example;

pub use caption_vocabulary::CaptionVocabulary;
pub use label_set::{Caption, LabelSet};
pub use training_example::TrainingExample;
