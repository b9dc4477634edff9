//! Lambertian Reflection

use super::*;
use bumpalo::Bump;

/// BRDF for perfect diffuse surfaces that scatter incident illumination
/// equally in all directions.
#[derive(Copy, Clone, Debug)]
pub struct Lambert {
    /// Reflectance divided by π.
    diffuse_over_pi: Spectrum,
}

assert_bsdf_size!(Lambert);

impl Lambert {
    /// Capabilities of the model.
    pub const CAPS: BsdfCaps = BsdfCaps::REFLECTION.union(BsdfCaps::DIFFUSE);

    /// Create a new `Lambert`.
    ///
    /// * `diffuse` - Reflectance spectrum.
    pub fn new(diffuse: Spectrum) -> Self {
        Self {
            diffuse_over_pi: diffuse * INV_PI,
        }
    }

    /// Allocate a new `Lambert` in the arena.
    ///
    /// * `arena`   - The arena for memory allocations.
    /// * `diffuse` - Reflectance spectrum.
    pub fn alloc(arena: &Bump, diffuse: Spectrum) -> BxDF<'_> {
        BxDF::Lambert(arena.alloc(Self::new(diffuse)))
    }

    /// Returns the value and density for a pair of directions.
    ///
    /// * `omega_in`  - Direction towards the viewer.
    /// * `omega_out` - Direction towards the light.
    /// * `allowed`   - Capabilities the caller accepts.
    pub fn evaluate(&self, omega_in: &Vector3f, omega_out: &Vector3f, allowed: BsdfCaps) -> BsdfOut {
        if !compatible_caps(Self::CAPS, allowed) || !same_hemisphere(omega_in, omega_out) {
            return BsdfOut::default();
        }
        BsdfOut::new(
            self.diffuse_over_pi,
            cosine_hemisphere_pdf(abs_cos_theta(omega_out)),
        )
    }

    /// Samples a cosine-weighted direction on the side of `omega_in`.
    ///
    /// * `omega_in`         - Direction towards the viewer.
    /// * `u`                - The 2D uniform random values.
    /// * `component_sample` - Unused.
    /// * `allowed`          - Capabilities the caller accepts.
    pub fn sample(
        &self,
        omega_in: &Vector3f,
        u: &Point2f,
        _component_sample: Float,
        allowed: BsdfCaps,
    ) -> SampleBsdfOut {
        if !compatible_caps(Self::CAPS, allowed) || omega_in.z == 0.0 {
            return SampleBsdfOut::default();
        }
        let mut omega_out = cosine_sample_hemisphere(u);
        if omega_in.z < 0.0 {
            omega_out.z = -omega_out.z;
        }
        SampleBsdfOut::new(
            omega_out,
            self.diffuse_over_pi,
            cosine_hemisphere_pdf(abs_cos_theta(&omega_out)),
            Self::CAPS,
        )
    }
}
