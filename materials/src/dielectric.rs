//! Dielectric Shader

use super::*;

/// Implements smooth dielectric interfaces such as glass or water.
pub struct DielectricShader {
    /// Refractive index of the solid.
    inner_refraction_index: ArcTexture<Spectrum>,

    /// Refractive index of the medium around the solid.
    outer_refraction_index: ArcTexture<Spectrum>,

    /// Multiplier of the Fresnel reflectance.
    reflectance: ArcTexture<Spectrum>,

    /// Multiplier of the Fresnel transmittance.
    transmittance: ArcTexture<Spectrum>,
}

/// Parameters of a `DielectricShader`.
#[derive(Clone)]
pub struct DielectricState {
    pub version: u32,
    pub inner_refraction_index: ArcTexture<Spectrum>,
    pub outer_refraction_index: ArcTexture<Spectrum>,
    pub reflectance: ArcTexture<Spectrum>,
    pub transmittance: ArcTexture<Spectrum>,
}

impl DielectricShader {
    /// Create a new `DielectricShader`.
    ///
    /// * `inner_refraction_index` - Refractive index of the solid.
    /// * `outer_refraction_index` - Refractive index around the solid.
    /// * `reflectance`            - Multiplier of the Fresnel reflectance.
    /// * `transmittance`          - Multiplier of the Fresnel transmittance.
    pub fn new(
        inner_refraction_index: ArcTexture<Spectrum>,
        outer_refraction_index: ArcTexture<Spectrum>,
        reflectance: ArcTexture<Spectrum>,
        transmittance: ArcTexture<Spectrum>,
    ) -> Self {
        Self {
            inner_refraction_index,
            outer_refraction_index,
            reflectance,
            transmittance,
        }
    }
}

impl Shader for DielectricShader {
    fn name(&self) -> &'static str {
        "Dielectric"
    }

    fn caps(&self) -> BsdfCaps {
        Dielectric::CAPS
    }

    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        let (ior_top, ior_bottom) = oriented_indices(
            refractive_index(&self.outer_refraction_index, sample, ctx),
            refractive_index(&self.inner_refraction_index, sample, ctx),
            ctx.solid_event,
        );
        let bxdf = Dielectric::alloc(
            arena,
            ior_top / ior_bottom,
            self.reflectance.evaluate(sample, ctx),
            self.transmittance.evaluate(sample, ctx),
        );
        Bsdf::alloc(arena, ctx, Dielectric::CAPS, bxdf)
    }
}

impl Persistent for DielectricShader {
    type State = DielectricState;

    fn state(&self) -> Self::State {
        DielectricState {
            version: STATE_VERSION,
            inner_refraction_index: Arc::clone(&self.inner_refraction_index),
            outer_refraction_index: Arc::clone(&self.outer_refraction_index),
            reflectance: Arc::clone(&self.reflectance),
            transmittance: Arc::clone(&self.transmittance),
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        self.inner_refraction_index = state.inner_refraction_index;
        self.outer_refraction_index = state.outer_refraction_index;
        self.reflectance = state.reflectance;
        self.transmittance = state.transmittance;
        Ok(())
    }
}

impl From<&TextureParams> for DielectricShader {
    /// Create a dielectric shader from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn from(tp: &TextureParams) -> Self {
        Self::new(
            tp.get_spectrum_texture_or_else("innerRefractionIndex", Spectrum::new(1.5), ConstantTexture::arc),
            tp.get_spectrum_texture_or_else("outerRefractionIndex", Spectrum::ONE, ConstantTexture::arc),
            tp.get_spectrum_texture_or_else("reflectance", Spectrum::ONE, ConstantTexture::arc),
            tp.get_spectrum_texture_or_else("transmittance", Spectrum::ONE, ConstantTexture::arc),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use float_cmp::approx_eq;

    fn glass(inner: Float) -> DielectricShader {
        DielectricShader::new(
            constant_spectrum(inner),
            constant_spectrum(1.0),
            constant_spectrum(1.0),
            constant_spectrum(1.0),
        )
    }

    #[test]
    fn index_matched_passes_straight_through() {
        let shader = glass(1.0);
        let arena = Bump::new();
        let bsdf = shade(&shader, &arena);
        let i = direction(0.7, 0.3);
        for cs in [0.0, 0.5, 0.99] {
            let s = bsdf.sample(&i, &Point2f::new(0.5, 0.5), cs, BsdfCaps::ALL);
            assert!(s.is_valid());
            assert_eq!(s.used_caps, BsdfCaps::TRANSMISSION | BsdfCaps::SPECULAR);
            assert!((s.omega_out + i).length() < 1e-5, "{:?}", s.omega_out);
            assert!(approx_eq!(f32, s.pdf, 1.0, epsilon = 1e-6));
        }
    }

    #[test]
    fn energy_is_conserved() {
        let shader = glass(1.5);
        let arena = Bump::new();
        let bsdf = shade(&shader, &arena);
        let a = albedo(bsdf, &direction(0.9, 0.0), 10_000, 6);
        assert!(a[0] <= 1.0 + 1e-3 && a[0] > 0.9, "{}", a);
    }

    #[test]
    fn leaving_uses_the_inner_index_on_top() {
        let shader = glass(1.5);
        let arena = Bump::new();
        let mut ctx = ShadingContext::default();
        ctx.solid_event = SolidEvent::Leaving;
        let bsdf = shader.bsdf(&arena, &Sample::default(), &ctx);
        // Beyond the critical angle of glass everything is reflected.
        let i = direction(1.0, 0.0);
        let s = bsdf.sample(&i, &Point2f::new(0.5, 0.5), 0.99, BsdfCaps::ALL);
        assert_eq!(s.used_caps, BsdfCaps::REFLECTION | BsdfCaps::SPECULAR);

        ctx.solid_event = SolidEvent::Entering;
        let bsdf = shader.bsdf(&arena, &Sample::default(), &ctx);
        let s = bsdf.sample(&i, &Point2f::new(0.5, 0.5), 0.99, BsdfCaps::ALL);
        assert_eq!(s.used_caps, BsdfCaps::TRANSMISSION | BsdfCaps::SPECULAR);
    }
}
