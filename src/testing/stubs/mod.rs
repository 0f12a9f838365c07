mod first_choice_sampler;
mod out_of_range_sampler;

pub use first_choice_sampler::{DrawCountHandle, FirstChoiceSampler};
pub use out_of_range_sampler::OutOfRangeSampler;
