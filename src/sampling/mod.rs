mod sampler;

pub use sampler::{RngSampler, Sampler, argmax};
