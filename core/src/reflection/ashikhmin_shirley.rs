//! Ashikhmin-Shirley

use super::*;
use bumpalo::Bump;

/// Anisotropic Phong-style BRDF of Ashikhmin and Shirley: a glossy specular
/// layer over a diffuse substrate, with energy exchanged between both.
#[derive(Copy, Clone)]
pub struct AshikhminShirley {
    /// Diffuse reflectance of the substrate, already attenuated by the
    /// specular layer.
    diffuse: Spectrum,

    /// Specular reflectance at normal incidence.
    specular: Spectrum,

    mdf: MicrofacetRef,
    alpha_u: Float,
    alpha_v: Float,
}

assert_bsdf_size!(AshikhminShirley);

/// Lobe of the substrate.
const CAPS_DIFFUSE: BsdfCaps = BsdfCaps::REFLECTION.union(BsdfCaps::DIFFUSE);

/// Lobe of the specular layer.
const CAPS_GLOSSY: BsdfCaps = BsdfCaps::REFLECTION.union(BsdfCaps::GLOSSY);

impl AshikhminShirley {
    /// Capabilities of the model.
    pub const CAPS: BsdfCaps = CAPS_DIFFUSE.union(CAPS_GLOSSY);

    /// Create a new `AshikhminShirley`.
    ///
    /// * `diffuse`  - Diffuse reflectance of the substrate.
    /// * `specular` - Specular reflectance at normal incidence.
    /// * `mdf`      - Microfacet distribution of the specular layer.
    /// * `alpha_u`  - Roughness along the first tangent.
    /// * `alpha_v`  - Roughness along the second tangent.
    pub fn new(
        diffuse: Spectrum,
        specular: Spectrum,
        mdf: MicrofacetRef,
        alpha_u: Float,
        alpha_v: Float,
    ) -> Self {
        Self {
            diffuse: diffuse * (Spectrum::ONE - specular),
            specular,
            mdf,
            alpha_u,
            alpha_v,
        }
    }

    /// Allocate a new `AshikhminShirley` in the arena.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `model` - The model.
    pub fn alloc(arena: &Bump, model: Self) -> BxDF<'_> {
        BxDF::AshikhminShirley(arena.alloc(model))
    }

    /// Returns the value and density for a pair of directions. The density
    /// mixes both lobes by their selection probabilities.
    ///
    /// * `omega_in`  - Direction towards the viewer.
    /// * `omega_out` - Direction towards the light.
    /// * `allowed`   - Capabilities the caller accepts.
    pub fn evaluate(&self, omega_in: &Vector3f, omega_out: &Vector3f, allowed: BsdfCaps) -> BsdfOut {
        if !same_hemisphere(omega_in, omega_out) {
            return BsdfOut::default();
        }
        let selector = self.selector(allowed);
        if omega_in.z < 0.0 {
            self.evaluate_upper(&flip_z(omega_in), &flip_z(omega_out), &selector)
        } else {
            self.evaluate_upper(omega_in, omega_out, &selector)
        }
    }

    /// Picks the substrate or the specular layer and samples a direction from
    /// it.
    ///
    /// * `omega_in`         - Direction towards the viewer.
    /// * `u`                - The 2D uniform random values.
    /// * `component_sample` - Selects the lobe.
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
        let selector = self.selector(allowed);
        let lobe = match selector.select(component_sample) {
            Some((lobe, _)) => lobe,
            None => return SampleBsdfOut::default(),
        };

        let flip = omega_in.z < 0.0;
        let k1 = if flip { flip_z(omega_in) } else { *omega_in };
        let (k2, used_caps) = if lobe == 0 {
            (cosine_sample_hemisphere(u), CAPS_DIFFUSE)
        } else {
            let h = self.mdf.sample_h(u, self.alpha_u, self.alpha_v);
            (reflect_about(&k1, &h), CAPS_GLOSSY)
        };
        if k2.z <= 0.0 {
            return SampleBsdfOut::default();
        }

        let out = self.evaluate_upper(&k1, &k2, &selector);
        let omega_out = if flip { flip_z(&k2) } else { k2 };
        SampleBsdfOut::from_bsdf_out(omega_out, out, used_caps)
    }

    /// Selection weights of the substrate and the specular layer.
    fn selector(&self, allowed: BsdfCaps) -> LobeSelector {
        let pd = if has_caps(allowed, CAPS_DIFFUSE) {
            self.diffuse.abs_average()
        } else {
            0.0
        };
        let ps = if has_caps(allowed, CAPS_GLOSSY) {
            (self.specular.abs_average() + 1.0) / 2.0
        } else {
            0.0
        };
        LobeSelector::new(&[pd, ps])
    }

    fn evaluate_upper(&self, k1: &Vector3f, k2: &Vector3f, selector: &LobeSelector) -> BsdfOut {
        let mut out = BsdfOut::default();
        let ps = selector.probability(1);
        if ps > 0.0 {
            let h = (*k1 + *k2).normalize();
            let (value, pdf) = self.rho_s(k1, k2, &h);
            out += BsdfOut::new(value, pdf * ps);
        }
        let pd = selector.probability(0);
        if pd > 0.0 {
            out += BsdfOut::new(self.rho_d(k1, k2), pd * cosine_hemisphere_pdf(k2.z));
        }
        out
    }

    fn rho_d(&self, k1: &Vector3f, k2: &Vector3f) -> Spectrum {
        let a = max(0.0, 1.0 - pow5(1.0 - k1.z / 2.0));
        let b = max(0.0, 1.0 - pow5(1.0 - k2.z / 2.0));
        self.diffuse * (a * b * 28.0 / (23.0 * PI))
    }

    fn rho_s(&self, k1: &Vector3f, k2: &Vector3f, h: &Vector3f) -> (Spectrum, Float) {
        let hk = k1.dot(h);
        if hk <= 0.0 {
            return (Spectrum::ZERO, 0.0);
        }
        let schlick = pow5(max(1.0 - hk, 0.0));
        let f = self.specular + (Spectrum::ONE - self.specular) * schlick;
        let (d, pdf_h) = self.mdf.d(h, self.alpha_u, self.alpha_v);
        (f * (d / (4.0 * hk * max(k1.z, k2.z))), pdf_h / (4.0 * hk))
    }
}
