use crate::sampling::Sampler;

/// Answers `usize::MAX` to every draw, whatever the range asked for.
pub struct OutOfRangeSampler;

impl Sampler for OutOfRangeSampler {
    fn pick_uniform(&mut self, _len: usize) -> usize {
        usize::MAX
    }

    fn pick_weighted(&mut self, _weights: &[f64]) -> Option<usize> {
        Some(usize::MAX)
    }
}
