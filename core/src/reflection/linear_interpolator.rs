//! Linear Interpolator

use super::*;
use bumpalo::Bump;

/// Blend `(1 - t) a + t b` of two child Bsdfs.
#[derive(Copy, Clone)]
pub struct LinearInterpolatorBsdf<'arena> {
    frame: Frame,
    a: &'arena Bsdf<'arena>,
    b: &'arena Bsdf<'arena>,
    t: Float,
}

assert_bsdf_size!(LinearInterpolatorBsdf<'static>);

impl<'arena> LinearInterpolatorBsdf<'arena> {
    /// Allocate a new `LinearInterpolatorBsdf` in the arena.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `frame` - Local frame of the parent Bsdf.
    /// * `a`     - Child at `t = 0`.
    /// * `b`     - Child at `t = 1`.
    /// * `t`     - Blend factor, clamped to [0, 1].
    pub fn alloc(
        arena: &'arena Bump,
        frame: Frame,
        a: &'arena Bsdf<'arena>,
        b: &'arena Bsdf<'arena>,
        t: Float,
    ) -> BxDF<'arena> {
        let t = clamp(t, 0.0, 1.0);
        BxDF::LinearInterpolator(arena.alloc(Self { frame, a, b, t }))
    }

    /// Returns the weighted sum of both children; the density mixes them by
    /// their selection probabilities.
    ///
    /// * `omega_in`  - Direction towards the viewer.
    /// * `omega_out` - Direction towards the light.
    /// * `allowed`   - Capabilities the caller accepts.
    pub fn evaluate(&self, omega_in: &Vector3f, omega_out: &Vector3f, allowed: BsdfCaps) -> BsdfOut {
        let selector = self.selector(allowed);
        let mut out = BsdfOut::default();
        for (i, (child, weight)) in self.children().iter().enumerate() {
            let p = selector.probability(i);
            if p > 0.0 {
                out += evaluate_child(&self.frame, child, omega_in, omega_out, allowed)
                    .scaled(*weight, p);
            }
        }
        out
    }

    /// Picks a child by its weight and samples it, then adds the other child
    /// unless the sampled lobe is specular.
    ///
    /// * `omega_in`         - Direction towards the viewer.
    /// * `u`                - The 2D uniform random values.
    /// * `component_sample` - Selects the child and is rescaled for it.
    /// * `allowed`          - Capabilities the caller accepts.
    pub fn sample(
        &self,
        omega_in: &Vector3f,
        u: &Point2f,
        component_sample: Float,
        allowed: BsdfCaps,
    ) -> SampleBsdfOut {
        let selector = self.selector(allowed);
        let (k, rescaled) = match selector.select(component_sample) {
            Some(s) => s,
            None => return SampleBsdfOut::default(),
        };
        let children = self.children();
        let (picked, weight) = children[k];

        let mut out = sample_child(&self.frame, picked, omega_in, u, rescaled, allowed);
        if !out.is_valid() {
            return SampleBsdfOut::default();
        }
        out.value *= weight;
        out.pdf *= selector.probability(k);
        if out.used_caps.contains(BsdfCaps::SPECULAR) {
            return out;
        }

        let j = 1 - k;
        let p = selector.probability(j);
        if p > 0.0 {
            let (other, weight) = children[j];
            let e = evaluate_child(&self.frame, other, omega_in, &out.omega_out, allowed);
            out.value += e.value * weight;
            out.pdf += e.pdf * p;
        }
        out
    }

    fn children(&self) -> [(&'arena Bsdf<'arena>, Float); 2] {
        [(self.a, 1.0 - self.t), (self.b, self.t)]
    }

    fn selector(&self, allowed: BsdfCaps) -> LobeSelector {
        LobeSelector::with_caps(
            &[(self.a.caps(), 1.0 - self.t), (self.b.caps(), self.t)],
            allowed,
        )
    }
}
