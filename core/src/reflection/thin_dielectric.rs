//! Thin Dielectric

use super::*;
use bumpalo::Bump;

/// Thin slab of dielectric material, such as a window pane. Light leaves on
/// the side it entered or passes straight through without bending; the
/// inner reflections are summed in closed form.
#[derive(Copy, Clone, Debug)]
pub struct ThinDielectric {
    /// Transparency for one pass at normal incidence.
    transparency: Spectrum,

    /// Ratio of the outer over the inner refractive index.
    ior: Float,
}

assert_bsdf_size!(ThinDielectric);

impl ThinDielectric {
    /// Capabilities of the model.
    pub const CAPS: BsdfCaps = BsdfCaps::ALL_SPECULAR;

    /// Create a new `ThinDielectric`.
    ///
    /// * `ior`          - Ratio of the outer over the inner refractive index.
    /// * `transparency` - Transparency for one pass at normal incidence.
    pub fn new(ior: Float, transparency: Spectrum) -> Self {
        Self { transparency, ior }
    }

    /// Allocate a new `ThinDielectric` in the arena.
    ///
    /// * `arena`        - The arena for memory allocations.
    /// * `ior`          - Ratio of the outer over the inner refractive index.
    /// * `transparency` - Transparency for one pass at normal incidence.
    pub fn alloc(arena: &Bump, ior: Float, transparency: Spectrum) -> BxDF<'_> {
        BxDF::ThinDielectric(arena.alloc(Self::new(ior, transparency)))
    }

    /// A delta lobe always evaluates to zero.
    ///
    /// * `omega_in`  - Direction towards the viewer.
    /// * `omega_out` - Direction towards the light.
    /// * `allowed`   - Capabilities the caller accepts.
    pub fn evaluate(&self, _omega_in: &Vector3f, _omega_out: &Vector3f, _allowed: BsdfCaps) -> BsdfOut {
        BsdfOut::default()
    }

    /// Returns the total reflectance and transmittance of the slab.
    ///
    /// * `cos_i` - Cosine of the incident angle.
    pub fn reflectance_transmittance(&self, cos_i: Float) -> (Spectrum, Spectrum) {
        let sin_t2 = sqr(self.ior) * (1.0 - sqr(cos_i));
        if sin_t2 >= 1.0 {
            return (Spectrum::ONE, Spectrum::ZERO);
        }
        let cos_t = (1.0 - sin_t2).sqrt();
        let r = fresnel_dielectric(cos_i, cos_t, self.ior, 1.0);
        let t = self.transparency.pow(1.0 / cos_t);

        let rt = t * r;
        let denom = Spectrum::ONE - rt * rt;
        let tr = t * (1.0 - r);
        let big_r = (Spectrum::ONE + tr * tr / denom) * r;
        let big_t = t * sqr(1.0 - r) / denom;
        (big_r.clamp(0.0, 1.0), big_t.clamp(0.0, 1.0))
    }

    /// Chooses between reflection and straight transmission.
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
        let caps_refl = BsdfCaps::REFLECTION | BsdfCaps::SPECULAR;
        let caps_trans = BsdfCaps::TRANSMISSION | BsdfCaps::SPECULAR;

        let cos_i = abs_cos_theta(omega_in);
        if cos_i == 0.0 {
            return SampleBsdfOut::default();
        }
        let (big_r, big_t) = self.reflectance_transmittance(cos_i);
        let (r, t) = (big_r.average(), big_t.average());

        let do_refl = has_caps(allowed, caps_refl);
        let do_trans = has_caps(allowed, caps_trans);
        let sr = match (do_refl, do_trans) {
            (true, true) => r,
            (true, false) => 1.0,
            _ => 0.0,
        };
        let st = match (do_refl, do_trans) {
            (true, true) => t,
            (false, true) => 1.0,
            _ => 0.0,
        };
        if sr + st <= 0.0 {
            return SampleBsdfOut::default();
        }

        let pr = sr / (sr + st);
        if component_sample < pr {
            SampleBsdfOut::new(reflect(omega_in), big_r / cos_i, pr, caps_refl)
        } else {
            SampleBsdfOut::new(-*omega_in, big_t / cos_i, 1.0 - pr, caps_trans)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn clear_pane_conserves_energy() {
        let d = ThinDielectric::new(1.0 / 1.5, Spectrum::ONE);
        for cos_i in [1.0, 0.7, 0.3, 0.05] {
            let (r, t) = d.reflectance_transmittance(cos_i);
            assert!(approx_eq!(f32, r[0] + t[0], 1.0, epsilon = 1e-5));
        }
    }

    #[test]
    fn pane_at_normal_incidence() {
        // r = 0.04, R = 2r / (1 + r)
        let d = ThinDielectric::new(1.0 / 1.5, Spectrum::ONE);
        let (r, _) = d.reflectance_transmittance(1.0);
        assert!(approx_eq!(f32, r[0], 0.08 / 1.04, epsilon = 1e-5));
    }

    #[test]
    fn transmission_does_not_bend() {
        let d = ThinDielectric::new(1.0 / 1.5, Spectrum::new(0.5));
        let omega_in = Vector3f::new(0.36, 0.48, 0.8);
        let s = d.sample(&omega_in, &Point2f::zero(), 0.999, BsdfCaps::ALL);
        assert_eq!(s.used_caps, BsdfCaps::TRANSMISSION | BsdfCaps::SPECULAR);
        assert_eq!(s.omega_out, -omega_in);
        let t = s.value[0] * 0.8;
        assert!(t > 0.0 && t < 0.5);
    }

    #[test]
    fn only_reflection_allowed() {
        let d = ThinDielectric::new(1.0 / 1.5, Spectrum::ONE);
        let omega_in = Vector3f::new(0.0, 0.0, 1.0);
        let s = d.sample(&omega_in, &Point2f::zero(), 0.9, BsdfCaps::ALL_REFLECTION);
        assert_eq!(s.used_caps, BsdfCaps::REFLECTION | BsdfCaps::SPECULAR);
        assert_eq!(s.pdf, 1.0);
    }
}
