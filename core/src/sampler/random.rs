//! Random Sampler.

use super::*;
use crate::rng::*;

/// Implements a sampler that uses a PRNG to generate uniformly random samples.
#[derive(Clone, Debug, Default)]
pub struct RandomSampler {
    /// Sizes of requested 1D sub-sequences.
    sizes_1d: Vec<usize>,

    /// Sizes of requested 2D sub-sequences.
    sizes_2d: Vec<usize>,

    /// The random number generator.
    rng: RNG,
}

impl RandomSampler {
    /// Create a new `RandomSampler`.
    ///
    /// * `seed` - Optional stream for the random number generator.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            sizes_1d: vec![],
            sizes_2d: vec![],
            rng: seed.map_or_else(RNG::default, RNG::new),
        }
    }

    /// Returns a sampler with the same reservations on a different stream, for
    /// use by another worker thread.
    ///
    /// * `seed` - Stream for the random number generator.
    pub fn clone_with_seed(&self, seed: u64) -> Self {
        Self {
            sizes_1d: self.sizes_1d.clone(),
            sizes_2d: self.sizes_2d.clone(),
            rng: RNG::new(seed),
        }
    }
}

impl Sampler for RandomSampler {
    fn request_sub_sequence_1d(&mut self, size: usize) -> SubSequenceId {
        self.sizes_1d.push(size);
        SubSequenceId {
            index: self.sizes_1d.len() - 1,
        }
    }

    fn request_sub_sequence_2d(&mut self, size: usize) -> SubSequenceId {
        self.sizes_2d.push(size);
        SubSequenceId {
            index: self.sizes_2d.len() - 1,
        }
    }

    fn fill(&mut self, sample: &mut Sample) {
        let rng = &mut self.rng;
        let (seq_1d, seq_2d) = sample.layout_mut(&self.sizes_1d, &self.sizes_2d);
        for v in seq_1d.iter_mut().flatten() {
            *v = rng.uniform_float();
        }
        for p in seq_2d.iter_mut().flatten() {
            *p = rng.uniform_point2();
        }
    }
}
