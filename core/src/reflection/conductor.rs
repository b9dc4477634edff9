//! Conductor

use super::*;
use bumpalo::Bump;

/// Smooth metal with the exact Fresnel reflectance of a complex refractive
/// index.
#[derive(Copy, Clone, Debug)]
pub struct Conductor {
    reflectance: Spectrum,
    eta: Spectrum,
    kappa: Spectrum,
}

assert_bsdf_size!(Conductor);

impl Conductor {
    /// Capabilities of the model.
    pub const CAPS: BsdfCaps = BsdfCaps::REFLECTION.union(BsdfCaps::SPECULAR);

    /// Create a new `Conductor`.
    ///
    /// * `reflectance` - Extra reflectance multiplier.
    /// * `eta`         - Real part of the refractive index.
    /// * `kappa`       - Absorption coefficient.
    pub fn new(reflectance: Spectrum, eta: Spectrum, kappa: Spectrum) -> Self {
        Self {
            reflectance,
            eta: eta.max_value(MIN_INDEX),
            kappa: kappa.max_value(MIN_INDEX),
        }
    }

    /// Allocate a new `Conductor` in the arena.
    ///
    /// * `arena`       - The arena for memory allocations.
    /// * `reflectance` - Extra reflectance multiplier.
    /// * `eta`         - Real part of the refractive index.
    /// * `kappa`       - Absorption coefficient.
    pub fn alloc(arena: &Bump, reflectance: Spectrum, eta: Spectrum, kappa: Spectrum) -> BxDF<'_> {
        BxDF::Conductor(arena.alloc(Self::new(reflectance, eta, kappa)))
    }

    /// A delta lobe always evaluates to zero.
    ///
    /// * `omega_in`  - Direction towards the viewer.
    /// * `omega_out` - Direction towards the light.
    /// * `allowed`   - Capabilities the caller accepts.
    pub fn evaluate(&self, _omega_in: &Vector3f, _omega_out: &Vector3f, _allowed: BsdfCaps) -> BsdfOut {
        BsdfOut::default()
    }

    /// Samples the mirror direction weighted by the Fresnel reflectance.
    ///
    /// * `omega_in`         - Direction towards the viewer.
    /// * `u`                - Unused.
    /// * `component_sample` - Unused.
    /// * `allowed`          - Capabilities the caller accepts.
    pub fn sample(
        &self,
        omega_in: &Vector3f,
        _u: &Point2f,
        _component_sample: Float,
        allowed: BsdfCaps,
    ) -> SampleBsdfOut {
        let cos_i = abs_cos_theta(omega_in);
        if !compatible_caps(Self::CAPS, allowed) || cos_i == 0.0 {
            return SampleBsdfOut::default();
        }
        let f = fresnel_conductor(cos_i, &self.eta, &self.kappa);
        SampleBsdfOut::new(
            reflect(omega_in),
            self.reflectance * f / cos_i,
            1.0,
            Self::CAPS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn gold_like_conductor_reflects_most_light() {
        let c = Conductor::new(
            Spectrum::ONE,
            Spectrum::from_rgb([0.17, 0.35, 1.5]),
            Spectrum::from_rgb([3.1, 2.7, 1.9]),
        );
        let omega_in = Vector3f::new(0.0, 0.6, 0.8);
        let s = c.sample(&omega_in, &Point2f::zero(), 0.5, BsdfCaps::ALL);
        assert_eq!(s.omega_out, Vector3f::new(0.0, -0.6, 0.8));
        assert_eq!(s.pdf, 1.0);
        let albedo = s.value * abs_cos_theta(&s.omega_out);
        assert!(albedo[0] > 0.8 && albedo[0] <= 1.0);
        assert!(albedo[2] < albedo[0]);
    }

    #[test]
    fn indices_are_floored() {
        let c = Conductor::new(Spectrum::ONE, Spectrum::new(-1.0), Spectrum::new(-1.0));
        let s = c.sample(&Vector3f::new(0.0, 0.0, 1.0), &Point2f::zero(), 0.5, BsdfCaps::ALL);
        assert!(s.value.is_finite());
        assert!(approx_eq!(f32, s.value[0], 1.0, epsilon = 1e-4));
    }

    #[test]
    fn evaluates_to_zero() {
        let c = Conductor::new(Spectrum::ONE, Spectrum::new(1.5), Spectrum::new(2.0));
        let w = Vector3f::new(0.0, 0.0, 1.0);
        assert_eq!(c.evaluate(&w, &w, BsdfCaps::ALL), BsdfOut::default());
    }
}
