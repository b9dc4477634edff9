//! Flip

use super::*;
use bumpalo::Bump;

/// Swaps reflection and transmission of a child Bsdf by mirroring the
/// outgoing direction through the surface plane.
#[derive(Copy, Clone)]
pub struct FlipBsdf<'arena> {
    frame: Frame,
    child: &'arena Bsdf<'arena>,
}

assert_bsdf_size!(FlipBsdf<'static>);

impl<'arena> FlipBsdf<'arena> {
    /// Allocate a new `FlipBsdf` in the arena.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `frame` - Local frame of the parent Bsdf.
    /// * `child` - The child Bsdf.
    pub fn alloc(arena: &'arena Bump, frame: Frame, child: &'arena Bsdf<'arena>) -> BxDF<'arena> {
        BxDF::Flip(arena.alloc(Self { frame, child }))
    }

    /// Evaluates the child with the mirrored outgoing direction.
    ///
    /// * `omega_in`  - Direction towards the viewer.
    /// * `omega_out` - Direction towards the light.
    /// * `allowed`   - Capabilities the caller accepts.
    pub fn evaluate(&self, omega_in: &Vector3f, omega_out: &Vector3f, allowed: BsdfCaps) -> BsdfOut {
        evaluate_child(
            &self.frame,
            self.child,
            omega_in,
            &flip_z(omega_out),
            allowed.flipped(),
        )
    }

    /// Samples the child and mirrors the sampled direction.
    ///
    /// * `omega_in`         - Direction towards the viewer.
    /// * `u`                - The 2D uniform random values.
    /// * `component_sample` - Component sample for the child.
    /// * `allowed`          - Capabilities the caller accepts.
    pub fn sample(
        &self,
        omega_in: &Vector3f,
        u: &Point2f,
        component_sample: Float,
        allowed: BsdfCaps,
    ) -> SampleBsdfOut {
        let mut out = sample_child(
            &self.frame,
            self.child,
            omega_in,
            u,
            component_sample,
            allowed.flipped(),
        );
        if out.is_valid() {
            out.omega_out = flip_z(&out.omega_out);
            out.used_caps = out.used_caps.flipped();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::ShadingContext;

    #[test]
    fn flipped_lambert_transmits() {
        let arena = Bump::new();
        let ctx = ShadingContext::default();
        let child = Bsdf::alloc(&arena, &ctx, Lambert::CAPS, Lambert::alloc(&arena, Spectrum::new(0.5)));
        let flip = Bsdf::alloc(
            &arena,
            &ctx,
            Lambert::CAPS.flipped(),
            FlipBsdf::alloc(&arena, ctx.frame(), child),
        );
        assert_eq!(flip.caps(), BsdfCaps::TRANSMISSION | BsdfCaps::DIFFUSE);

        let omega_in = Vector3f::new(0.0, 0.0, 1.0);
        let s = flip.sample(&omega_in, &Point2f::new(0.3, 0.4), 0.5, BsdfCaps::ALL);
        assert!(s.is_valid());
        assert!(s.omega_out.z < 0.0);
        assert_eq!(s.used_caps, BsdfCaps::TRANSMISSION | BsdfCaps::DIFFUSE);

        let e = flip.evaluate(&omega_in, &s.omega_out, BsdfCaps::ALL);
        assert!((e.pdf - s.pdf).abs() < 1e-5);
        assert!(flip.evaluate(&omega_in, &flip_z(&s.omega_out), BsdfCaps::ALL).is_black());
        assert!(flip.evaluate(&omega_in, &s.omega_out, BsdfCaps::ALL_REFLECTION).is_black());
    }
}
