//! Sampler

mod random;

use crate::geometry::*;
use crate::pbrt::*;

// Re-export
pub use random::*;

/// Identifies a sub-sequence of samples reserved with a `Sampler`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SubSequenceId {
    /// Index of the sub-sequence among those of the same dimension.
    pub index: usize,
}

/// The random numbers drawn for one camera sample. Stores every sub-sequence
/// that was reserved with the sampler that filled it.
#[derive(Clone, Debug, Default)]
pub struct Sample {
    /// 1D sub-sequences.
    sub_sequences_1d: Vec<Vec<Float>>,

    /// 2D sub-sequences.
    sub_sequences_2d: Vec<Vec<Point2f>>,
}

impl Sample {
    /// Returns a reserved 1D sub-sequence. Unknown ids give an empty slice.
    ///
    /// * `id` - The sub-sequence.
    pub fn sub_sequence_1d(&self, id: SubSequenceId) -> &[Float] {
        self.sub_sequences_1d
            .get(id.index)
            .map(|s| s.as_slice())
            .unwrap_or(&[])
    }

    /// Returns a reserved 2D sub-sequence. Unknown ids give an empty slice.
    ///
    /// * `id` - The sub-sequence.
    pub fn sub_sequence_2d(&self, id: SubSequenceId) -> &[Point2f] {
        self.sub_sequences_2d
            .get(id.index)
            .map(|s| s.as_slice())
            .unwrap_or(&[])
    }

    /// Returns mutable access to the sub-sequences, resized to the given
    /// layout.
    ///
    /// * `sizes_1d` - Sizes of the 1D sub-sequences.
    /// * `sizes_2d` - Sizes of the 2D sub-sequences.
    pub fn layout_mut(
        &mut self,
        sizes_1d: &[usize],
        sizes_2d: &[usize],
    ) -> (&mut [Vec<Float>], &mut [Vec<Point2f>]) {
        self.sub_sequences_1d.resize(sizes_1d.len(), vec![]);
        for (s, n) in self.sub_sequences_1d.iter_mut().zip(sizes_1d) {
            s.resize(*n, 0.0);
        }
        self.sub_sequences_2d.resize(sizes_2d.len(), vec![]);
        for (s, n) in self.sub_sequences_2d.iter_mut().zip(sizes_2d) {
            s.resize(*n, Point2f::zero());
        }
        (&mut self.sub_sequences_1d, &mut self.sub_sequences_2d)
    }
}

/// Sampler interface. Sub-sequences are reserved before rendering starts and
/// filled for every camera sample.
pub trait Sampler {
    /// Reserves a 1D sub-sequence.
    ///
    /// * `size` - Number of samples in the sub-sequence.
    fn request_sub_sequence_1d(&mut self, size: usize) -> SubSequenceId;

    /// Reserves a 2D sub-sequence.
    ///
    /// * `size` - Number of samples in the sub-sequence.
    fn request_sub_sequence_2d(&mut self, size: usize) -> SubSequenceId;

    /// Draws new values for every reserved sub-sequence.
    ///
    /// * `sample` - The sample to fill.
    fn fill(&mut self, sample: &mut Sample);
}
