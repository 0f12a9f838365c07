use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the random choices made while captioning.
pub trait Sampler: Send {
    /// Uniform index in `0..len`. `len` is never zero.
    fn pick_uniform(&mut self, len: usize) -> usize;
    /// Index drawn proportionally to `weights`, or `None` when the weights
    /// do not form a usable distribution.
    fn pick_weighted(&mut self, weights: &[f64]) -> Option<usize>;
}

/// [`Sampler`] backed by any `rand` generator.
pub struct RngSampler<R> {
    rng: R,
}

impl<R: Rng + Send> RngSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSampler<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Seeded when a seed is given, OS entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_os_rng(),
        }
    }
}

impl<R: Rng + Send> Sampler for RngSampler<R> {
    fn pick_uniform(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn pick_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let dist = WeightedIndex::new(weights).ok()?;
        Some(dist.sample(&mut self.rng))
    }
}

/// Index of the largest weight; first wins on ties.
pub fn argmax(weights: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &w) in weights.iter().enumerate() {
        if w.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if b >= w => {}
            _ => best = Some((i, w)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_samplers_repeat() {
        let mut a = RngSampler::seeded(42);
        let mut b = RngSampler::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.pick_uniform(7), b.pick_uniform(7));
            assert_eq!(
                a.pick_weighted(&[0.2, 0.3, 0.5]),
                b.pick_weighted(&[0.2, 0.3, 0.5])
            );
        }
    }

    #[test]
    fn uniform_stays_in_range() {
        let mut s = RngSampler::seeded(1);
        for _ in 0..100 {
            assert!(s.pick_uniform(3) < 3);
        }
        assert_eq!(s.pick_uniform(1), 0);
    }

    #[test]
    fn weighted_never_picks_zero_weight() {
        let mut s = RngSampler::seeded(9);
        for _ in 0..200 {
            assert_eq!(s.pick_weighted(&[0.0, 1.0, 0.0]), Some(1));
        }
    }

    #[test]
    fn weighted_rejects_degenerate_input() {
        let mut s = RngSampler::seeded(3);
        assert_eq!(s.pick_weighted(&[]), None);
        assert_eq!(s.pick_weighted(&[0.0, 0.0]), None);
        assert_eq!(s.pick_weighted(&[f64::NAN, 1.0]), None);
    }

    #[test]
    fn argmax_prefers_first_maximum() {
        assert_eq!(argmax(&[0.1, 0.7, 0.7]), Some(1));
        assert_eq!(argmax(&[f64::NAN, 0.2]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
