//! Oren-Nayar Microfacet Model

use super::*;
use bumpalo::Bump;

/// BRDF for the Oren-Nayar model of rough diffuse surfaces made of
/// V-shaped Lambertian cavities.
#[derive(Copy, Clone, Debug)]
pub struct OrenNayar {
    /// Reflectance divided by π.
    diffuse_over_pi: Spectrum,

    /// Precomputed `A = 1 - 0.5 σ^2 / (σ^2 + 0.33)`.
    a: Float,

    /// Precomputed `B = 0.45 σ^2 / (σ^2 + 0.09)`.
    b: Float,
}

assert_bsdf_size!(OrenNayar);

impl OrenNayar {
    /// Capabilities of the model.
    pub const CAPS: BsdfCaps = BsdfCaps::REFLECTION.union(BsdfCaps::DIFFUSE);

    /// Create a new `OrenNayar`.
    ///
    /// * `diffuse` - Reflectance spectrum.
    /// * `sigma`   - Standard deviation of the slope angle in radians.
    pub fn new(diffuse: Spectrum, sigma: Float) -> Self {
        let sigma2 = sqr(max(sigma, 0.0));
        Self {
            diffuse_over_pi: diffuse * INV_PI,
            a: 1.0 - 0.5 * sigma2 / (sigma2 + 0.33),
            b: 0.45 * sigma2 / (sigma2 + 0.09),
        }
    }

    /// Allocate a new `OrenNayar` in the arena.
    ///
    /// * `arena`   - The arena for memory allocations.
    /// * `diffuse` - Reflectance spectrum.
    /// * `sigma`   - Standard deviation of the slope angle in radians.
    pub fn alloc(arena: &Bump, diffuse: Spectrum, sigma: Float) -> BxDF<'_> {
        BxDF::OrenNayar(arena.alloc(Self::new(diffuse, sigma)))
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
            self.value(omega_in, omega_out),
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
            self.value(omega_in, &omega_out),
            cosine_hemisphere_pdf(abs_cos_theta(&omega_out)),
            Self::CAPS,
        )
    }

    fn value(&self, omega_in: &Vector3f, omega_out: &Vector3f) -> Spectrum {
        let cos_in = abs_cos_theta(omega_in);
        let cos_out = abs_cos_theta(omega_out);
        let sin_in2 = sin_2_theta(omega_in);
        let sin_out2 = sin_2_theta(omega_out);

        // Cosine of the azimuth difference, only the forward half contributes.
        let norm2 = sin_in2 * sin_out2;
        let cos_phi = if norm2 > 0.0 {
            max(0.0, (omega_in.x * omega_out.x + omega_in.y * omega_out.y) / norm2.sqrt())
        } else {
            0.0
        };

        // sin(α) tan(β) with α the larger and β the smaller polar angle.
        let sin_alpha_tan_beta = norm2.sqrt() / max(cos_in, cos_out);

        self.diffuse_over_pi * (self.a + self.b * cos_phi * sin_alpha_tan_beta)
    }
}
