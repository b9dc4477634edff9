//! Walter

use super::*;
use bumpalo::Bump;

/// Rough dielectric interface of Walter et al., "Microfacet Models for
/// Refraction through Rough Surfaces". Light is reflected or refracted by
/// microfacets sampled from a distribution.
#[derive(Copy, Clone)]
pub struct Walter {
    reflectance: Spectrum,
    transmittance: Spectrum,

    /// Refractive index on the `+z` side.
    eta_outside: Float,

    /// Refractive index on the `-z` side.
    eta_inside: Float,

    mdf: MicrofacetRef,
    alpha_u: Float,
    alpha_v: Float,
}

assert_bsdf_size!(Walter);

/// Lobe of the rough reflection.
const CAPS_REFLECTION: BsdfCaps = BsdfCaps::REFLECTION.union(BsdfCaps::GLOSSY);

/// Lobe of the rough refraction.
const CAPS_TRANSMISSION: BsdfCaps = BsdfCaps::TRANSMISSION.union(BsdfCaps::GLOSSY);

/// The refraction Jacobian is undefined when both indices match.
const MIN_JACOBIAN_DENOMINATOR: Float = 1e-6;

/// Refractive indices seen from the viewer, with the viewer moved to the
/// `+z` side.
struct Side {
    flip: bool,
    eta_i: Float,
    eta_t: Float,
}

impl Side {
    fn to_upper(&self, w: &Vector3f) -> Vector3f {
        if self.flip {
            flip_z(w)
        } else {
            *w
        }
    }
}

impl Walter {
    /// Capabilities of the model.
    pub const CAPS: BsdfCaps = CAPS_REFLECTION.union(CAPS_TRANSMISSION);

    /// Create a new `Walter`.
    ///
    /// * `eta_outside`   - Refractive index on the `+z` side.
    /// * `eta_inside`    - Refractive index on the `-z` side.
    /// * `reflectance`   - Reflectance multiplier.
    /// * `transmittance` - Transmittance multiplier.
    /// * `mdf`           - Microfacet distribution.
    /// * `alpha_u`       - Roughness along the first tangent.
    /// * `alpha_v`       - Roughness along the second tangent.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        eta_outside: Float,
        eta_inside: Float,
        reflectance: Spectrum,
        transmittance: Spectrum,
        mdf: MicrofacetRef,
        alpha_u: Float,
        alpha_v: Float,
    ) -> Self {
        Self {
            reflectance,
            transmittance,
            eta_outside: max(eta_outside, MIN_INDEX),
            eta_inside: max(eta_inside, MIN_INDEX),
            mdf,
            alpha_u,
            alpha_v,
        }
    }

    /// Allocate a new `Walter` in the arena.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `model` - The model.
    pub fn alloc(arena: &Bump, model: Self) -> BxDF<'_> {
        BxDF::Walter(arena.alloc(model))
    }

    /// Returns the value and density for a pair of directions. Directions on
    /// the same side are a reflection, directions on opposite sides a
    /// refraction.
    ///
    /// * `omega_in`  - Direction towards the viewer.
    /// * `omega_out` - Direction towards the light.
    /// * `allowed`   - Capabilities the caller accepts.
    pub fn evaluate(&self, omega_in: &Vector3f, omega_out: &Vector3f, allowed: BsdfCaps) -> BsdfOut {
        if omega_in.z == 0.0 || omega_out.z == 0.0 {
            return BsdfOut::default();
        }
        let side = self.side(omega_in);
        let i = side.to_upper(omega_in);
        let o = side.to_upper(omega_out);

        let h = if o.z > 0.0 {
            (i + o).normalize()
        } else {
            let h = (i * side.eta_i + o * side.eta_t).normalize();
            if h.z < 0.0 {
                -h
            } else {
                h
            }
        };
        let cos_i = i.dot(&h);
        if h.z <= 0.0 || cos_i <= 0.0 {
            return BsdfOut::default();
        }

        let fresnel = microfacet_fresnel(side.eta_i / side.eta_t, cos_i);
        let p_refl = match self.probability_reflection(fresnel, allowed) {
            Some(p) => p,
            None => return BsdfOut::default(),
        };
        if o.z > 0.0 {
            if p_refl <= 0.0 {
                return BsdfOut::default();
            }
            self.reflection(&i, &o, &h, fresnel).scaled(1.0, p_refl)
        } else {
            if p_refl >= 1.0 || o.dot(&h) >= 0.0 {
                return BsdfOut::default();
            }
            self.transmission(&side, &i, &o, &h, fresnel)
                .scaled(1.0, 1.0 - p_refl)
        }
    }

    /// Samples a microfacet normal, then reflects or refracts about it.
    ///
    /// * `omega_in`         - Direction towards the viewer.
    /// * `u`                - The 2D uniform random values.
    /// * `component_sample` - Chooses between reflection and refraction.
    /// * `allowed`          - Capabilities the caller accepts.
    pub fn sample(
        &self,
        omega_in: &Vector3f,
        u: &Point2f,
        component_sample: Float,
        allowed: BsdfCaps,
    ) -> SampleBsdfOut {
        if omega_in.z == 0.0 {
            return SampleBsdfOut::default();
        }
        let side = self.side(omega_in);
        let i = side.to_upper(omega_in);

        let h = self.mdf.sample_h(u, self.alpha_u, self.alpha_v);
        let cos_i = i.dot(&h);
        if cos_i <= 0.0 {
            return SampleBsdfOut::default();
        }
        let eta = side.eta_i / side.eta_t;
        let fresnel = microfacet_fresnel(eta, cos_i);
        let p_refl = match self.probability_reflection(fresnel, allowed) {
            Some(p) => p,
            None => return SampleBsdfOut::default(),
        };

        if component_sample < p_refl {
            let o = reflect_about(&i, &h);
            if o.z <= 0.0 {
                return SampleBsdfOut::default();
            }
            let out = self.reflection(&i, &o, &h, fresnel).scaled(1.0, p_refl);
            return SampleBsdfOut::from_bsdf_out(side.to_upper(&o), out, CAPS_REFLECTION);
        }

        let sin_t2 = sqr(eta) * (1.0 - sqr(cos_i));
        if sin_t2 >= 1.0 {
            return SampleBsdfOut::default();
        }
        let cos_t = (1.0 - sin_t2).sqrt();
        let o = (i * -eta + h * (eta * cos_i - cos_t)).normalize();
        if o.z >= 0.0 {
            return SampleBsdfOut::default();
        }
        let out = self
            .transmission(&side, &i, &o, &h, fresnel)
            .scaled(1.0, 1.0 - p_refl);
        if out.pdf <= 0.0 {
            return SampleBsdfOut::default();
        }
        SampleBsdfOut::from_bsdf_out(side.to_upper(&o), out, CAPS_TRANSMISSION)
    }

    fn side(&self, omega_in: &Vector3f) -> Side {
        if omega_in.z > 0.0 {
            Side {
                flip: false,
                eta_i: self.eta_outside,
                eta_t: self.eta_inside,
            }
        } else {
            Side {
                flip: true,
                eta_i: self.eta_inside,
                eta_t: self.eta_outside,
            }
        }
    }

    /// Probability of choosing the reflection, or `None` if neither lobe is
    /// allowed.
    fn probability_reflection(&self, fresnel: Float, allowed: BsdfCaps) -> Option<Float> {
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
        let total = pow_refl + pow_trans;
        if total > 0.0 {
            Some(pow_refl / total)
        } else {
            None
        }
    }

    fn reflection(&self, i: &Vector3f, o: &Vector3f, h: &Vector3f, fresnel: Float) -> BsdfOut {
        let (d, pdf_h) = self.mdf.d(h, self.alpha_u, self.alpha_v);
        let g = self.mdf.g1(i, h, self.alpha_u, self.alpha_v)
            * self.mdf.g1(o, h, self.alpha_u, self.alpha_v);
        BsdfOut::new(
            self.reflectance * (fresnel * d * g / (4.0 * i.z * o.z)),
            pdf_h / (4.0 * i.dot(h)),
        )
    }

    fn transmission(
        &self,
        side: &Side,
        i: &Vector3f,
        o: &Vector3f,
        h: &Vector3f,
        fresnel: Float,
    ) -> BsdfOut {
        let cos_i = i.dot(h);
        let cos_o = o.dot(h);
        let denom = side.eta_i * cos_i + side.eta_t * cos_o;
        if abs(denom) < MIN_JACOBIAN_DENOMINATOR {
            return BsdfOut::default();
        }
        // dh/dωo
        let jacobian = sqr(side.eta_t) * abs(cos_o) / sqr(denom);

        let (d, pdf_h) = self.mdf.d(h, self.alpha_u, self.alpha_v);
        let g = self.mdf.g1(i, h, self.alpha_u, self.alpha_v)
            * self.mdf.g1(o, h, self.alpha_u, self.alpha_v);
        BsdfOut::new(
            self.transmittance * ((1.0 - fresnel) * d * g * cos_i * jacobian / abs(i.z * o.z)),
            pdf_h * jacobian,
        )
    }
}

/// Fresnel reflectance of a microfacet, 1 on total internal reflection.
///
/// * `eta`   - Ratio of the incident over the transmitted index.
/// * `cos_i` - Cosine between the incident direction and the microfacet.
fn microfacet_fresnel(eta: Float, cos_i: Float) -> Float {
    let sin_t2 = sqr(eta) * (1.0 - sqr(cos_i));
    if sin_t2 >= 1.0 {
        return 1.0;
    }
    let cos_t = (1.0 - sin_t2).sqrt();
    min(fresnel_dielectric(cos_i, cos_t, eta, 1.0), 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::microfacet::MicrofacetKind;
    use proptest::prelude::*;

    fn glass(kind: MicrofacetKind, alpha: Float) -> Walter {
        Walter::new(
            1.0,
            1.5,
            Spectrum::ONE,
            Spectrum::ONE,
            kind.distribution(),
            alpha,
            alpha,
        )
    }

    #[test]
    fn indices_floored() {
        let m = Walter::new(0.0, -1.0, Spectrum::ONE, Spectrum::ONE, MicrofacetKind::Blinn.distribution(), 0.1, 0.1);
        assert_eq!((m.eta_outside, m.eta_inside), (MIN_INDEX, MIN_INDEX));
    }

    #[test]
    fn albedo_at_most_one_from_both_sides() {
        let m = glass(MicrofacetKind::TrowbridgeReitz, 0.2);
        for omega_in in [Vector3f::new(0.0, 0.6, 0.8), Vector3f::new(0.0, 0.3, -(0.91f32).sqrt())] {
            let a = testing::albedo(20_000, 23, |u, cs| m.sample(&omega_in, u, cs, BsdfCaps::ALL));
            assert!(a[0] > 0.7 && a[0] <= 1.02, "{}", a);
        }
    }

    #[test]
    fn sample_matches_evaluation() {
        for kind in [MicrofacetKind::Beckmann, MicrofacetKind::TrowbridgeReitz] {
            let m = glass(kind, 0.3);
            for omega_in in [Vector3f::new(0.3, 0.0, 0.95).normalize(), Vector3f::new(0.0, 0.5, -0.7).normalize()] {
                let err = testing::max_sample_evaluate_error(
                    2_000,
                    29,
                    |u, cs| m.sample(&omega_in, u, cs, BsdfCaps::ALL),
                    |o| m.evaluate(&omega_in, o, BsdfCaps::ALL),
                );
                assert!(err < 1e-2, "{}: err = {}", kind, err);
            }
        }
    }

    #[test]
    fn used_caps_follow_allowed() {
        let m = glass(MicrofacetKind::Beckmann, 0.3);
        let omega_in = Vector3f::new(0.0, 0.0, 1.0);
        let mut rng = crate::rng::RNG::new(31);
        for _ in 0..200 {
            let u = rng.uniform_point2();
            let s = m.sample(&omega_in, &u, rng.uniform_float(), BsdfCaps::ALL_TRANSMISSION);
            if s.is_valid() {
                assert_eq!(s.used_caps, BsdfCaps::TRANSMISSION | BsdfCaps::GLOSSY);
                assert!(s.omega_out.z < 0.0);
                assert!(m.evaluate(&omega_in, &s.omega_out, BsdfCaps::ALL_REFLECTION).is_black());
            }
        }
    }

    crate::prop_hemisphere!(upper, 0.05);

    proptest! {
        #[test]
        fn non_negative(i in upper(), o in upper(), down in proptest::bool::ANY) {
            let m = glass(MicrofacetKind::Blinn, 0.25);
            let o = if down { flip_z(&o) } else { o };
            let out = m.evaluate(&i, &o, BsdfCaps::ALL);
            prop_assert!(out.value.min_component_value() >= 0.0);
            prop_assert!(out.pdf >= 0.0);
        }
    }
}
