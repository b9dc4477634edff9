//! Sum

use super::*;
use bumpalo::Bump;

/// Sum of the child Bsdfs. Sampling picks one compatible child uniformly.
#[derive(Copy, Clone)]
pub struct SumBsdf<'arena> {
    frame: Frame,
    children: &'arena [&'arena Bsdf<'arena>],
}

assert_bsdf_size!(SumBsdf<'static>);

impl<'arena> SumBsdf<'arena> {
    /// Allocate a new `SumBsdf` in the arena.
    ///
    /// * `arena`    - The arena for memory allocations.
    /// * `frame`    - Local frame of the parent Bsdf.
    /// * `children` - The child Bsdfs.
    pub fn alloc(
        arena: &'arena Bump,
        frame: Frame,
        children: &[&'arena Bsdf<'arena>],
    ) -> BxDF<'arena> {
        let children = arena.alloc_slice_copy(children);
        BxDF::Sum(arena.alloc(Self { frame, children }))
    }

    /// Returns the combined capabilities of the children.
    ///
    /// * `children` - The child Bsdfs.
    pub fn caps_of(children: &[&Bsdf<'_>]) -> BsdfCaps {
        children
            .iter()
            .fold(BsdfCaps::NONE, |caps, child| caps | child.caps())
    }

    /// Sums the compatible children; the density is their average.
    ///
    /// * `omega_in`  - Direction towards the viewer.
    /// * `omega_out` - Direction towards the light.
    /// * `allowed`   - Capabilities the caller accepts.
    pub fn evaluate(&self, omega_in: &Vector3f, omega_out: &Vector3f, allowed: BsdfCaps) -> BsdfOut {
        let mut out = BsdfOut::default();
        let mut n = 0;
        for child in self.compatible(allowed) {
            out += evaluate_child(&self.frame, child, omega_in, omega_out, allowed);
            n += 1;
        }
        if n > 0 {
            out.pdf /= n as Float;
        }
        out
    }

    /// Samples one compatible child chosen uniformly, then adds the other
    /// children unless the sampled lobe is specular.
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
        let n = self.compatible(allowed).count();
        if n == 0 {
            return SampleBsdfOut::default();
        }
        let nf = n as Float;
        let k = min((component_sample * nf) as usize, n - 1);
        let rescaled = clamp(component_sample * nf - k as Float, 0.0, ONE_MINUS_EPSILON);

        let picked = match self.compatible(allowed).nth(k) {
            Some(child) => child,
            None => return SampleBsdfOut::default(),
        };

        let mut out = sample_child(&self.frame, picked, omega_in, u, rescaled, allowed);
        if !out.is_valid() {
            return SampleBsdfOut::default();
        }
        if out.used_caps.contains(BsdfCaps::SPECULAR) {
            out.pdf /= nf;
            return out;
        }
        for (j, child) in self.compatible(allowed).enumerate() {
            if j != k {
                let other = evaluate_child(&self.frame, child, omega_in, &out.omega_out, allowed);
                out.value += other.value;
                out.pdf += other.pdf;
            }
        }
        out.pdf /= nf;
        out
    }

    fn compatible(&self, allowed: BsdfCaps) -> impl Iterator<Item = &'arena Bsdf<'arena>> + '_ {
        self.children
            .iter()
            .copied()
            .filter(move |child| child.compatible_caps(allowed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::ShadingContext;

    #[test]
    fn sum_of_lambert_children() {
        let arena = Bump::new();
        let ctx = ShadingContext::default();
        let a = Bsdf::alloc(&arena, &ctx, Lambert::CAPS, Lambert::alloc(&arena, Spectrum::new(0.3)));
        let b = Bsdf::alloc(&arena, &ctx, Lambert::CAPS, Lambert::alloc(&arena, Spectrum::new(0.4)));
        let sum = SumBsdf::alloc(&arena, ctx.frame(), &[a, b]);
        let omega_in = Vector3f::new(0.0, 0.6, 0.8);

        let albedo = testing::albedo(10_000, 41, |u, cs| sum.sample(&omega_in, u, cs, BsdfCaps::ALL));
        assert!((albedo[0] - 0.7).abs() < 1e-3, "{}", albedo);

        let err = testing::max_sample_evaluate_error(
            1_000,
            43,
            |u, cs| sum.sample(&omega_in, u, cs, BsdfCaps::ALL),
            |o| sum.evaluate(&omega_in, o, BsdfCaps::ALL),
        );
        assert!(err < 1e-4, "err = {}", err);
    }

    #[test]
    fn caps_are_the_union() {
        let arena = Bump::new();
        let ctx = ShadingContext::default();
        let a = Bsdf::alloc(&arena, &ctx, Lambert::CAPS, Lambert::alloc(&arena, Spectrum::new(0.3)));
        let m = Bsdf::alloc(
            &arena,
            &ctx,
            Mirror::caps_for(0.0),
            Mirror::alloc(&arena, Spectrum::ONE, 0.0),
        );
        assert_eq!(
            SumBsdf::caps_of(&[a, m]),
            BsdfCaps::REFLECTION | BsdfCaps::DIFFUSE | BsdfCaps::SPECULAR
        );
    }

    #[test]
    fn specular_child_is_not_mixed() {
        let arena = Bump::new();
        let ctx = ShadingContext::default();
        let a = Bsdf::alloc(&arena, &ctx, Lambert::CAPS, Lambert::alloc(&arena, Spectrum::new(0.3)));
        let m = Bsdf::alloc(
            &arena,
            &ctx,
            Mirror::caps_for(0.0),
            Mirror::alloc(&arena, Spectrum::ONE, 0.0),
        );
        let sum = SumBsdf::alloc(&arena, ctx.frame(), &[a, m]);
        let omega_in = Vector3f::new(0.0, 0.0, 1.0);
        let s = sum.sample(&omega_in, &Point2f::new(0.5, 0.5), 0.75, BsdfCaps::ALL);
        assert_eq!(s.used_caps, BsdfCaps::REFLECTION | BsdfCaps::SPECULAR);
        assert!((s.pdf - 0.5).abs() < 1e-6);

        let only_diffuse = sum.sample(&omega_in, &Point2f::new(0.5, 0.5), 0.75, BsdfCaps::ALL_DIFFUSE);
        assert_eq!(only_diffuse.used_caps, BsdfCaps::REFLECTION | BsdfCaps::DIFFUSE);
    }
}
