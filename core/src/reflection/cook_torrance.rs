//! Cook-Torrance

use super::*;
use bumpalo::Bump;

/// Rough metal: a microfacet BRDF with the Fresnel reflectance of a conductor
/// evaluated at the microfacet normal.
#[derive(Copy, Clone)]
pub struct CookTorrance {
    reflectance: Spectrum,
    eta: Spectrum,
    kappa: Spectrum,
    mdf: MicrofacetRef,
    alpha_u: Float,
    alpha_v: Float,
}

assert_bsdf_size!(CookTorrance);

impl CookTorrance {
    /// Capabilities of the model.
    pub const CAPS: BsdfCaps = BsdfCaps::REFLECTION.union(BsdfCaps::GLOSSY);

    /// Create a new `CookTorrance`.
    ///
    /// * `reflectance` - Reflectance multiplier.
    /// * `eta`         - Real part of the refractive index.
    /// * `kappa`       - Absorption coefficient.
    /// * `mdf`         - Microfacet distribution.
    /// * `alpha_u`     - Roughness along the first tangent.
    /// * `alpha_v`     - Roughness along the second tangent.
    pub fn new(
        reflectance: Spectrum,
        eta: Spectrum,
        kappa: Spectrum,
        mdf: MicrofacetRef,
        alpha_u: Float,
        alpha_v: Float,
    ) -> Self {
        Self {
            reflectance,
            eta: eta.max_value(MIN_INDEX),
            kappa: kappa.max_value(MIN_INDEX),
            mdf,
            alpha_u,
            alpha_v,
        }
    }

    /// Allocate a new `CookTorrance` in the arena.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `model` - The model.
    pub fn alloc(arena: &Bump, model: Self) -> BxDF<'_> {
        BxDF::CookTorrance(arena.alloc(model))
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
        if omega_in.z < 0.0 {
            self.evaluate_upper(&flip_z(omega_in), &flip_z(omega_out))
        } else {
            self.evaluate_upper(omega_in, omega_out)
        }
    }

    /// Samples a microfacet normal and reflects `omega_in` about it.
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
        let flip = omega_in.z < 0.0;
        let k1 = if flip { flip_z(omega_in) } else { *omega_in };

        let h = self.mdf.sample_h(u, self.alpha_u, self.alpha_v);
        let k2 = reflect_about(&k1, &h);
        if k2.z <= 0.0 {
            return SampleBsdfOut::default();
        }
        let out = self.evaluate_upper(&k1, &k2);
        let omega_out = if flip { flip_z(&k2) } else { k2 };
        SampleBsdfOut::from_bsdf_out(omega_out, out, Self::CAPS)
    }

    fn evaluate_upper(&self, k1: &Vector3f, k2: &Vector3f) -> BsdfOut {
        let h = (*k1 + *k2).normalize();
        let cos_h = k1.dot(&h);
        if cos_h <= 0.0 {
            return BsdfOut::default();
        }
        let (d, pdf_h) = self.mdf.d(&h, self.alpha_u, self.alpha_v);
        let g = self.mdf.g1(k1, &h, self.alpha_u, self.alpha_v)
            * self.mdf.g1(k2, &h, self.alpha_u, self.alpha_v);
        let f = fresnel_conductor(cos_h, &self.eta, &self.kappa);
        BsdfOut::new(
            self.reflectance * f * (d * g / (4.0 * k1.z * k2.z)),
            pdf_h / (4.0 * cos_h),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::microfacet::MicrofacetKind;
    use proptest::prelude::*;

    fn model(kind: MicrofacetKind, alpha_u: Float, alpha_v: Float) -> CookTorrance {
        CookTorrance::new(
            Spectrum::ONE,
            Spectrum::new(0.2),
            Spectrum::new(3.0),
            kind.distribution(),
            alpha_u,
            alpha_v,
        )
    }

    #[test]
    fn albedo_at_most_one() {
        for kind in [MicrofacetKind::Beckmann, MicrofacetKind::Blinn, MicrofacetKind::TrowbridgeReitz] {
            let m = model(kind, 0.3, 0.3);
            let omega_in = Vector3f::new(0.0, 0.6, 0.8);
            let a = testing::albedo(20_000, 11, |u, cs| m.sample(&omega_in, u, cs, BsdfCaps::ALL));
            assert!(a[0] > 0.5 && a[0] <= 1.02, "{}: {}", kind, a);
        }
    }

    #[test]
    fn sample_matches_evaluation() {
        let m = model(MicrofacetKind::TrowbridgeReitz, 0.2, 0.5);
        let omega_in = Vector3f::new(0.48, 0.0, 0.6).normalize();
        let err = testing::max_sample_evaluate_error(
            2_000,
            13,
            |u, cs| m.sample(&omega_in, u, cs, BsdfCaps::ALL),
            |o| m.evaluate(&omega_in, o, BsdfCaps::ALL),
        );
        assert!(err < 1e-3, "err = {}", err);
    }

    #[test]
    fn below_the_surface_is_black() {
        let m = model(MicrofacetKind::Beckmann, 0.3, 0.3);
        let i = Vector3f::new(0.0, 0.0, 1.0);
        let o = Vector3f::new(0.0, 0.6, -0.8);
        let out = m.evaluate(&i, &o, BsdfCaps::ALL);
        assert!(out.is_black());
        assert_eq!(out.pdf, 0.0);
    }

    crate::prop_hemisphere!(upper, 0.05);

    proptest! {
        #[test]
        fn non_negative_and_mirror_symmetric(i in upper(), o in upper()) {
            let m = model(MicrofacetKind::Blinn, 0.25, 0.4);
            let a = m.evaluate(&i, &o, BsdfCaps::ALL);
            let b = m.evaluate(&flip_z(&i), &flip_z(&o), BsdfCaps::ALL);
            prop_assert!(a.value.min_component_value() >= 0.0);
            prop_assert!(a.pdf >= 0.0);
            prop_assert_eq!(a, b);
        }
    }
}
