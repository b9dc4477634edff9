//! Thin Dielectric Shader

use super::*;

/// Implements thin dielectric slabs such as window panes.
pub struct ThinDielectricShader {
    /// Refractive index of the slab.
    inner_refraction_index: ArcTexture<Spectrum>,

    /// Refractive index around the slab.
    outer_refraction_index: ArcTexture<Spectrum>,

    /// Transparency for one pass at normal incidence.
    transparency: ArcTexture<Spectrum>,
}

/// Parameters of a `ThinDielectricShader`.
#[derive(Clone)]
pub struct ThinDielectricState {
    pub version: u32,
    pub inner_refraction_index: ArcTexture<Spectrum>,
    pub outer_refraction_index: ArcTexture<Spectrum>,
    pub transparency: ArcTexture<Spectrum>,
}

impl ThinDielectricShader {
    /// Create a new `ThinDielectricShader`.
    ///
    /// * `inner_refraction_index` - Refractive index of the slab.
    /// * `outer_refraction_index` - Refractive index around the slab.
    /// * `transparency`           - Transparency for one pass.
    pub fn new(
        inner_refraction_index: ArcTexture<Spectrum>,
        outer_refraction_index: ArcTexture<Spectrum>,
        transparency: ArcTexture<Spectrum>,
    ) -> Self {
        Self {
            inner_refraction_index,
            outer_refraction_index,
            transparency,
        }
    }
}

impl Shader for ThinDielectricShader {
    fn name(&self) -> &'static str {
        "ThinDielectric"
    }

    fn caps(&self) -> BsdfCaps {
        ThinDielectric::CAPS
    }

    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        let outer = refractive_index(&self.outer_refraction_index, sample, ctx);
        let inner = refractive_index(&self.inner_refraction_index, sample, ctx);
        let transparency = self.transparency.evaluate(sample, ctx).clamp(0.0, 1.0);
        let bxdf = ThinDielectric::alloc(arena, outer / inner, transparency);
        Bsdf::alloc(arena, ctx, ThinDielectric::CAPS, bxdf)
    }
}

impl Persistent for ThinDielectricShader {
    type State = ThinDielectricState;

    fn state(&self) -> Self::State {
        ThinDielectricState {
            version: STATE_VERSION,
            inner_refraction_index: Arc::clone(&self.inner_refraction_index),
            outer_refraction_index: Arc::clone(&self.outer_refraction_index),
            transparency: Arc::clone(&self.transparency),
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        self.inner_refraction_index = state.inner_refraction_index;
        self.outer_refraction_index = state.outer_refraction_index;
        self.transparency = state.transparency;
        Ok(())
    }
}

impl From<&TextureParams> for ThinDielectricShader {
    /// Create a thin dielectric shader from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn from(tp: &TextureParams) -> Self {
        Self::new(
            tp.get_spectrum_texture_or_else("innerRefractionIndex", Spectrum::new(1.5), ConstantTexture::arc),
            tp.get_spectrum_texture_or_else("outerRefractionIndex", Spectrum::ONE, ConstantTexture::arc),
            tp.get_spectrum_texture_or_else("transparency", Spectrum::ONE, ConstantTexture::arc),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn lossless_pane_conserves_energy() {
        let shader = ThinDielectricShader::from(&TextureParams::default());
        let arena = Bump::new();
        let bsdf = shade(&shader, &arena);
        let i = direction(0.6, 1.0);
        let a = albedo(bsdf, &i, 10_000, 8);
        assert!((a[0] - 1.0).abs() < 1e-3, "{}", a);

        // Transmitted light is not bent.
        let s = bsdf.sample(&i, &Point2f::new(0.5, 0.5), 0.999, BsdfCaps::ALL);
        assert_eq!(s.used_caps, BsdfCaps::TRANSMISSION | BsdfCaps::SPECULAR);
        assert!((s.omega_out + i).length() < 1e-5);
    }

    #[test]
    fn opaque_pane_only_reflects() {
        let shader = ThinDielectricShader::new(
            constant_spectrum(1.5),
            constant_spectrum(1.0),
            constant_spectrum(0.0),
        );
        let arena = Bump::new();
        let bsdf = shade(&shader, &arena);
        let i = direction(0.3, 0.0);
        let s = bsdf.sample(&i, &Point2f::new(0.5, 0.5), 0.999, BsdfCaps::ALL);
        assert_eq!(s.used_caps, BsdfCaps::REFLECTION | BsdfCaps::SPECULAR);
    }
}
