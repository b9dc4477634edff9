//! Dielectric

use super::*;
use bumpalo::Bump;

/// Smooth interface between two dielectrics. Reflection and refraction are
/// chosen stochastically in proportion to their Fresnel-weighted energy.
#[derive(Copy, Clone, Debug)]
pub struct Dielectric {
    /// Reflectance multiplier.
    reflectance: Spectrum,

    /// Transmittance multiplier.
    transmittance: Spectrum,

    /// Ratio of the refractive index on the `+z` side over the one on the
    /// `-z` side.
    ior: Float,
}

assert_bsdf_size!(Dielectric);

/// Lobe of a specular reflection.
const CAPS_REFLECTION: BsdfCaps = BsdfCaps::REFLECTION.union(BsdfCaps::SPECULAR);

/// Lobe of a specular refraction.
const CAPS_TRANSMISSION: BsdfCaps = BsdfCaps::TRANSMISSION.union(BsdfCaps::SPECULAR);

impl Dielectric {
    /// Capabilities of the model.
    pub const CAPS: BsdfCaps = BsdfCaps::ALL_SPECULAR;

    /// Create a new `Dielectric`.
    ///
    /// * `ior`           - Refractive index on the `+z` side over the one on
    ///                     the `-z` side.
    /// * `reflectance`   - Reflectance multiplier.
    /// * `transmittance` - Transmittance multiplier.
    pub fn new(ior: Float, reflectance: Spectrum, transmittance: Spectrum) -> Self {
        Self {
            reflectance,
            transmittance,
            ior,
        }
    }

    /// Allocate a new `Dielectric` in the arena.
    ///
    /// * `arena`         - The arena for memory allocations.
    /// * `ior`           - Refractive index ratio across the interface.
    /// * `reflectance`   - Reflectance multiplier.
    /// * `transmittance` - Transmittance multiplier.
    pub fn alloc(
        arena: &Bump,
        ior: Float,
        reflectance: Spectrum,
        transmittance: Spectrum,
    ) -> BxDF<'_> {
        BxDF::Dielectric(arena.alloc(Self::new(ior, reflectance, transmittance)))
    }

    /// A delta lobe always evaluates to zero.
    ///
    /// * `omega_in`  - Direction towards the viewer.
    /// * `omega_out` - Direction towards the light.
    /// * `allowed`   - Capabilities the caller accepts.
    pub fn evaluate(&self, _omega_in: &Vector3f, _omega_out: &Vector3f, _allowed: BsdfCaps) -> BsdfOut {
        BsdfOut::default()
    }

    /// Chooses between reflection and refraction.
    ///
    /// * `omega_in`         - Direction towards the viewer.
    /// * `u`                - Unused.
    /// * `component_sample` - Selects the lobe.
    /// * `allowed`          - Capabilities the caller accepts.
    pub fn sample(
        &self,
        omega_in: &Vector3f,
        _u: &Point2f,
        component_sample: Float,
        allowed: BsdfCaps,
    ) -> SampleBsdfOut {
        let cos_i = abs_cos_theta(omega_in);
        if cos_i == 0.0 {
            return SampleBsdfOut::default();
        }
        let ior = if omega_in.z > 0.0 { self.ior } else { 1.0 / self.ior };

        let (fresnel, refracted) = match refract(omega_in, ior) {
            Some((omega_t, cos_t)) => (
                fresnel_dielectric(cos_i, cos_t, ior, 1.0),
                Some((omega_t, cos_t)),
            ),
            None => (1.0, None),
        };

        let pow_refl = if has_caps(allowed, CAPS_REFLECTION) {
            self.reflectance.abs_average() * fresnel
        } else {
            0.0
        };
        let pow_trans = if has_caps(allowed, CAPS_TRANSMISSION) {
            self.transmittance.abs_average() * (1.0 - fresnel)
        } else {
            0.0
        };
        if pow_refl + pow_trans <= 0.0 {
            return SampleBsdfOut::default();
        }
        let prob_refl = pow_refl / (pow_refl + pow_trans);

        if component_sample < prob_refl {
            return SampleBsdfOut::new(
                reflect(omega_in),
                self.reflectance * (fresnel / cos_i),
                prob_refl,
                CAPS_REFLECTION,
            );
        }
        match refracted {
            Some((omega_t, cos_t)) if cos_t > 0.0 => SampleBsdfOut::new(
                omega_t,
                self.transmittance * ((1.0 - fresnel) / cos_t),
                1.0 - prob_refl,
                CAPS_TRANSMISSION,
            ),
            _ => SampleBsdfOut::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn index_matched_interface_transmits_straight_through() {
        let d = Dielectric::new(1.0, Spectrum::ONE, Spectrum::ONE);
        let omega_in = Vector3f::new(0.36, 0.48, 0.8);
        let s = d.sample(&omega_in, &Point2f::zero(), 0.5, BsdfCaps::ALL);
        assert_eq!(s.used_caps, BsdfCaps::TRANSMISSION | BsdfCaps::SPECULAR);
        assert!((s.omega_out + omega_in).length() < 1e-6);
        assert!(approx_eq!(f32, s.pdf, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, s.value[1], 1.0 / 0.8, epsilon = 1e-5));
    }

    #[test]
    fn glass_at_normal_incidence() {
        let d = Dielectric::new(1.0 / 1.5, Spectrum::ONE, Spectrum::ONE);
        let omega_in = Vector3f::new(0.0, 0.0, 1.0);
        let refl = d.sample(&omega_in, &Point2f::zero(), 0.01, BsdfCaps::ALL);
        assert_eq!(refl.used_caps, BsdfCaps::REFLECTION | BsdfCaps::SPECULAR);
        assert!(approx_eq!(f32, refl.pdf, 0.04, epsilon = 1e-5));
        assert!(approx_eq!(f32, refl.value[0], 0.04, epsilon = 1e-5));

        let trans = d.sample(&omega_in, &Point2f::zero(), 0.5, BsdfCaps::ALL);
        assert_eq!(trans.omega_out, Vector3f::new(0.0, 0.0, -1.0));
        assert!(approx_eq!(f32, trans.pdf, 0.96, epsilon = 1e-5));

        // value / pdf sums to one over both choices
        let total = refl.value[0] / refl.pdf * refl.pdf + trans.value[0] / trans.pdf * trans.pdf;
        assert!(approx_eq!(f32, total, 1.0, epsilon = 1e-5));
    }

    #[test]
    fn total_internal_reflection_from_inside() {
        let d = Dielectric::new(1.0 / 1.5, Spectrum::ONE, Spectrum::ONE);
        let omega_in = Vector3f::new(0.9, 0.0, -(1.0f32 - 0.81).sqrt());
        let s = d.sample(&omega_in, &Point2f::zero(), 0.99, BsdfCaps::ALL);
        assert_eq!(s.used_caps, BsdfCaps::REFLECTION | BsdfCaps::SPECULAR);
        assert!(approx_eq!(f32, s.pdf, 1.0, epsilon = 1e-6));
        assert!(s.omega_out.z < 0.0);
    }

    #[test]
    fn restricted_to_transmission() {
        let d = Dielectric::new(1.0 / 1.5, Spectrum::ONE, Spectrum::ONE);
        let omega_in = Vector3f::new(0.0, 0.6, 0.8);
        let s = d.sample(&omega_in, &Point2f::zero(), 0.0, BsdfCaps::ALL_TRANSMISSION);
        assert_eq!(s.used_caps, BsdfCaps::TRANSMISSION | BsdfCaps::SPECULAR);
        assert!(approx_eq!(f32, s.pdf, 1.0, epsilon = 1e-6));
        assert!(s.omega_out.z < 0.0);
    }
}
