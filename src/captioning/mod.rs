pub mod adaptive_captioner;
pub mod corpus;
pub mod shared_captioner;
pub mod snapshot;
pub mod template_captioner;

pub use adaptive_captioner::{AdaptiveCaptioner, FittedModel};
pub use corpus::TrainingCorpus;
pub use shared_captioner::SharedCaptioner;
pub use snapshot::{ModelSnapshot, SNAPSHOT_FORMAT_VERSION};
pub use template_captioner::TemplateCaptioner;
