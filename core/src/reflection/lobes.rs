//! Lobe Selection

use super::*;
use crate::rng::ONE_MINUS_EPSILON;

/// Maximum number of lobes a `LobeSelector` chooses from.
pub const MAX_LOBES: usize = 4;

/// Stochastic choice between the lobes of a multi-lobe Bsdf. Each lobe gets
/// a non-negative weight, usually a cheap proxy of its energy; weights are
/// normalised to selection probabilities.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LobeSelector {
    /// Lobe weights. Incompatible lobes have weight 0.
    weights: [Float; MAX_LOBES],

    /// Number of lobes.
    n: usize,

    /// Sum of weights.
    total: Float,
}

impl LobeSelector {
    /// Create a selector from raw weights. Negative and non-finite weights
    /// count as 0.
    ///
    /// * `weights` - One weight per lobe, at most `MAX_LOBES`.
    pub fn new(weights: &[Float]) -> Self {
        debug_assert!(weights.len() <= MAX_LOBES);
        let mut ret = Self::default();
        for (i, w) in weights.iter().take(MAX_LOBES).enumerate() {
            let w = if w.is_finite() { max(*w, 0.0) } else { 0.0 };
            ret.weights[i] = w;
            ret.total += w;
        }
        ret.n = min(weights.len(), MAX_LOBES);
        ret
    }

    /// Create a selector for lobes with given capabilities. Lobes that are
    /// not compatible with `allowed` get weight 0.
    ///
    /// * `lobes`   - Capabilities and weight of each lobe.
    /// * `allowed` - The capabilities the caller accepts.
    pub fn with_caps(lobes: &[(BsdfCaps, Float)], allowed: BsdfCaps) -> Self {
        let mut weights = [0.0; MAX_LOBES];
        for (i, (caps, w)) in lobes.iter().take(MAX_LOBES).enumerate() {
            if compatible_caps(*caps, allowed) {
                weights[i] = *w;
            }
        }
        Self::new(&weights[..min(lobes.len(), MAX_LOBES)])
    }

    /// Returns the number of lobes.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Returns true if there are no lobes.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Returns the sum of all weights.
    pub fn total(&self) -> Float {
        self.total
    }

    /// Returns the selection probability of a lobe.
    ///
    /// * `i` - Lobe index.
    pub fn probability(&self, i: usize) -> Float {
        if i < self.n && self.total > 0.0 {
            self.weights[i] / self.total
        } else {
            0.0
        }
    }

    /// Picks a lobe by partitioning [0, 1) by the cumulative probabilities.
    /// Returns the lobe index and the residual of the sample rescaled to
    /// [0, 1), or `None` when every weight is 0.
    ///
    /// * `component_sample` - Uniform sample in [0, 1).
    pub fn select(&self, component_sample: Float) -> Option<(usize, Float)> {
        if self.total <= 0.0 {
            return None;
        }

        let target = component_sample * self.total;
        let last = (0..self.n).rev().find(|i| self.weights[*i] > 0.0)?;
        let mut acc = 0.0;
        for i in 0..=last {
            let w = self.weights[i];
            if w <= 0.0 {
                continue;
            }
            if target < acc + w || i == last {
                let rescaled = clamp((target - acc) / w, 0.0, ONE_MINUS_EPSILON);
                return Some((i, rescaled));
            }
            acc += w;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    #[test]
    fn zero_weights_fail() {
        let selector = LobeSelector::new(&[0.0, 0.0]);
        assert_eq!(selector.select(0.3), None);
        assert_eq!(selector.probability(0), 0.0);
    }

    #[test]
    fn partitions_by_cumulative_probability() {
        let selector = LobeSelector::new(&[1.0, 3.0]);
        assert!(approx_eq!(f32, selector.probability(0), 0.25));
        let (i, s) = selector.select(0.125).unwrap();
        assert_eq!(i, 0);
        assert!(approx_eq!(f32, s, 0.5, epsilon = 1e-6));
        let (i, s) = selector.select(0.625).unwrap();
        assert_eq!(i, 1);
        assert!(approx_eq!(f32, s, 0.5, epsilon = 1e-6));
    }

    #[test]
    fn skips_incompatible_lobes() {
        let selector = LobeSelector::with_caps(
            &[
                (BsdfCaps::REFLECTION | BsdfCaps::DIFFUSE, 1.0),
                (BsdfCaps::REFLECTION | BsdfCaps::SPECULAR, 1.0),
            ],
            BsdfCaps::ALL_DIFFUSE,
        );
        assert_eq!(selector.probability(1), 0.0);
        assert_eq!(selector.select(0.99).map(|(i, _)| i), Some(0));
    }

    proptest! {
        #[test]
        fn rescaled_sample_in_unit_interval(
            a in 0.0..10.0f32, b in 0.0..10.0f32, c in 0.0..10.0f32, u in 0.0..1.0f32
        ) {
            let selector = LobeSelector::new(&[a, b, c]);
            if let Some((i, s)) = selector.select(u) {
                prop_assert!(selector.probability(i) > 0.0);
                prop_assert!((0.0..1.0).contains(&s));
            } else {
                prop_assert_eq!(selector.total(), 0.0);
            }
        }
    }
}
