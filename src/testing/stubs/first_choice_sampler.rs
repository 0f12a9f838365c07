use crate::sampling::Sampler;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub struct DrawCountHandle {
    uniform: Arc<AtomicU64>,
    weighted: Arc<AtomicU64>,
}

impl DrawCountHandle {
    pub fn uniform_draws(&self) -> u64 {
        self.uniform.load(Ordering::Relaxed)
    }

    pub fn weighted_draws(&self) -> u64 {
        self.weighted.load(Ordering::Relaxed)
    }
}

/// Always answers index 0 and counts how often it was asked.
pub struct FirstChoiceSampler {
    uniform: Arc<AtomicU64>,
    weighted: Arc<AtomicU64>,
}

impl FirstChoiceSampler {
    pub fn new() -> (Self, DrawCountHandle) {
        let uniform = Arc::new(AtomicU64::new(0));
        let weighted = Arc::new(AtomicU64::new(0));
        (
            Self {
                uniform: uniform.clone(),
                weighted: weighted.clone(),
            },
            DrawCountHandle { uniform, weighted },
        )
    }
}

impl Sampler for FirstChoiceSampler {
    fn pick_uniform(&mut self, _len: usize) -> usize {
        self.uniform.fetch_add(1, Ordering::Relaxed);
        0
    }

    fn pick_weighted(&mut self, _weights: &[f64]) -> Option<usize> {
        self.weighted.fetch_add(1, Ordering::Relaxed);
        Some(0)
    }
}
