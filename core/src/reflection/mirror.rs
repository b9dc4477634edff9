//! Mirror

use super::*;
use bumpalo::Bump;

/// Perfect mirror. A non-zero fuzz jitters the reflected direction by a point
/// on a sphere of radius `fuzz` around its tip, which turns the delta lobe
/// into a glossy one.
#[derive(Copy, Clone, Debug)]
pub struct Mirror {
    /// Reflectance.
    reflectance: Spectrum,

    /// Radius of the jitter sphere.
    fuzz: Float,
}

assert_bsdf_size!(Mirror);

impl Mirror {
    /// Create a new `Mirror`.
    ///
    /// * `reflectance` - Reflectance.
    /// * `fuzz`        - Radius of the jitter sphere; 0 for a perfect mirror.
    pub fn new(reflectance: Spectrum, fuzz: Float) -> Self {
        Self {
            reflectance,
            fuzz: max(fuzz, 0.0),
        }
    }

    /// Allocate a new `Mirror` in the arena.
    ///
    /// * `arena`       - The arena for memory allocations.
    /// * `reflectance` - Reflectance.
    /// * `fuzz`        - Radius of the jitter sphere; 0 for a perfect mirror.
    pub fn alloc(arena: &Bump, reflectance: Spectrum, fuzz: Float) -> BxDF<'_> {
        BxDF::Mirror(arena.alloc(Self::new(reflectance, fuzz)))
    }

    /// Returns the capabilities for a given fuzz.
    ///
    /// * `fuzz` - Radius of the jitter sphere.
    pub fn caps_for(fuzz: Float) -> BsdfCaps {
        if fuzz > 0.0 {
            BsdfCaps::REFLECTION | BsdfCaps::GLOSSY
        } else {
            BsdfCaps::REFLECTION | BsdfCaps::SPECULAR
        }
    }

    /// Returns the capabilities.
    pub fn caps(&self) -> BsdfCaps {
        Self::caps_for(self.fuzz)
    }

    /// Returns the value and density for a pair of directions. A perfect
    /// mirror always evaluates to zero.
    ///
    /// * `omega_in`  - Direction towards the viewer.
    /// * `omega_out` - Direction towards the light.
    /// * `allowed`   - Capabilities the caller accepts.
    pub fn evaluate(&self, omega_in: &Vector3f, omega_out: &Vector3f, allowed: BsdfCaps) -> BsdfOut {
        if self.fuzz <= 0.0
            || !compatible_caps(self.caps(), allowed)
            || !same_hemisphere(omega_in, omega_out)
        {
            return BsdfOut::default();
        }
        let pdf = self.fuzz_pdf(&reflect(omega_in), omega_out);
        if pdf <= 0.0 || !pdf.is_finite() {
            return BsdfOut::default();
        }
        BsdfOut::new(self.reflectance * (pdf / abs_cos_theta(omega_out)), pdf)
    }

    /// Samples the reflected direction.
    ///
    /// * `omega_in`         - Direction towards the viewer.
    /// * `u`                - The 2D uniform random values for the jitter.
    /// * `component_sample` - Unused.
    /// * `allowed`          - Capabilities the caller accepts.
    pub fn sample(
        &self,
        omega_in: &Vector3f,
        u: &Point2f,
        _component_sample: Float,
        allowed: BsdfCaps,
    ) -> SampleBsdfOut {
        let caps = self.caps();
        if !compatible_caps(caps, allowed) || omega_in.z == 0.0 {
            return SampleBsdfOut::default();
        }

        let r = reflect(omega_in);
        if self.fuzz <= 0.0 {
            return SampleBsdfOut::new(r, self.reflectance / abs_cos_theta(&r), 1.0, caps);
        }

        let omega_out = (r + uniform_sample_sphere(u) * self.fuzz).normalize();
        if !same_hemisphere(omega_in, &omega_out) {
            return SampleBsdfOut::default();
        }
        let pdf = self.fuzz_pdf(&r, &omega_out);
        if pdf <= 0.0 || !pdf.is_finite() {
            return SampleBsdfOut::default();
        }
        SampleBsdfOut::new(
            omega_out,
            self.reflectance * (pdf / abs_cos_theta(&omega_out)),
            pdf,
            caps,
        )
    }

    /// Solid-angle density of `normalize(r + fuzz * s)` with `s` uniform on
    /// the unit sphere. Each intersection `t d` of the ray with the jitter
    /// sphere contributes `t^2 / (4π fuzz sqrt(disc))`.
    ///
    /// * `r` - Unit reflected direction.
    /// * `d` - Unit direction.
    fn fuzz_pdf(&self, r: &Vector3f, d: &Vector3f) -> Float {
        let b = d.dot(r);
        let disc = b * b - 1.0 + self.fuzz * self.fuzz;
        if disc <= 0.0 {
            return 0.0;
        }
        let sq = disc.sqrt();
        let t2: Float = [b - sq, b + sq]
            .iter()
            .filter(|t| **t > 0.0)
            .map(|t| t * t)
            .sum();
        t2 / (FOUR_PI * self.fuzz * sq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;
    use float_cmp::approx_eq;

    #[test]
    fn normal_incidence() {
        let m = Mirror::new(Spectrum::new(0.8), 0.0);
        let omega_in = Vector3f::new(0.0, 0.0, 1.0);
        let s = m.sample(&omega_in, &Point2f::new(0.5, 0.5), 0.5, BsdfCaps::ALL);
        assert_eq!(s.omega_out, omega_in);
        assert_eq!(s.pdf, 1.0);
        assert_eq!(s.used_caps, BsdfCaps::REFLECTION | BsdfCaps::SPECULAR);
        assert!(approx_eq!(f32, s.value[0], 0.8, epsilon = 1e-6));
        assert!(m.evaluate(&omega_in, &omega_in, BsdfCaps::ALL).is_black());
    }

    #[test]
    fn fuzz_makes_mirror_glossy() {
        assert_eq!(Mirror::caps_for(0.3), BsdfCaps::REFLECTION | BsdfCaps::GLOSSY);
        let m = Mirror::new(Spectrum::ONE, 0.3);
        let omega_in = Vector3f::new(0.0, 0.0, 1.0);
        let s = m.sample(&omega_in, &Point2f::new(0.2, 0.7), 0.5, BsdfCaps::ALL_SPECULAR);
        assert!(!s.is_valid());
    }

    #[test]
    fn fuzz_density_is_normalised() {
        // With fuzz > 1 the origin lies inside the jitter sphere, so the
        // density has no singular silhouette.
        let m = Mirror::new(Spectrum::ONE, 2.0);
        let r = Vector3f::new(0.6, 0.0, 0.8);
        let mut rng = RNG::new(7);
        let n = 20_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let d = uniform_sample_sphere(&rng.uniform_point2());
            sum += m.fuzz_pdf(&r, &d) / uniform_sphere_pdf();
        }
        assert!(approx_eq!(f32, sum / n as Float, 1.0, epsilon = 0.03));
    }

    #[test]
    fn fuzzy_sample_matches_evaluation() {
        let m = Mirror::new(Spectrum::new(0.9), 0.4);
        let omega_in = Vector3f::new(0.3, -0.2, (1.0f32 - 0.13).sqrt());
        let err = testing::max_sample_evaluate_error(
            2_000,
            3,
            |u, cs| m.sample(&omega_in, u, cs, BsdfCaps::ALL),
            |o| m.evaluate(&omega_in, o, BsdfCaps::ALL),
        );
        assert!(err < 1e-3, "err = {}", err);
        let a = testing::albedo(10_000, 5, |u, cs| m.sample(&omega_in, u, cs, BsdfCaps::ALL));
        assert!(a[0] <= 0.9 + 1e-3);
    }
}
