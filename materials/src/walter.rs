//! Walter Shader

use super::*;

/// Implements rough dielectrics such as frosted glass with the microfacet
/// refraction model of Walter et al.
pub struct WalterShader {
    /// Refractive index of the solid.
    inner_refraction_index: ArcTexture<Spectrum>,

    /// Refractive index of the medium around the solid.
    outer_refraction_index: ArcTexture<Spectrum>,

    /// Multiplier of the reflected part.
    reflectance: ArcTexture<Spectrum>,

    /// Multiplier of the refracted part.
    transmittance: ArcTexture<Spectrum>,

    /// Roughness along the first tangent.
    roughness_u: ArcTexture<Float>,

    /// Roughness along the second tangent.
    roughness_v: ArcTexture<Float>,

    /// Microfacet distribution.
    mdf: MicrofacetKind,

    /// Number of samples for Monte Carlo estimates.
    number_of_samples: usize,
}

/// Parameters of a `WalterShader`.
#[derive(Clone)]
pub struct WalterState {
    pub version: u32,
    pub inner_refraction_index: ArcTexture<Spectrum>,
    pub outer_refraction_index: ArcTexture<Spectrum>,
    pub reflectance: ArcTexture<Spectrum>,
    pub transmittance: ArcTexture<Spectrum>,
    pub roughness_u: ArcTexture<Float>,
    pub roughness_v: ArcTexture<Float>,
    pub mdf: MicrofacetKind,
    pub number_of_samples: usize,
}

impl WalterShader {
    /// Create a new `WalterShader`.
    ///
    /// * `inner_refraction_index` - Refractive index of the solid.
    /// * `outer_refraction_index` - Refractive index around the solid.
    /// * `reflectance`            - Multiplier of the reflected part.
    /// * `transmittance`          - Multiplier of the refracted part.
    /// * `roughness_u`            - Roughness along the first tangent.
    /// * `roughness_v`            - Roughness along the second tangent.
    /// * `mdf`                    - Microfacet distribution.
    pub fn new(
        inner_refraction_index: ArcTexture<Spectrum>,
        outer_refraction_index: ArcTexture<Spectrum>,
        reflectance: ArcTexture<Spectrum>,
        transmittance: ArcTexture<Spectrum>,
        roughness_u: ArcTexture<Float>,
        roughness_v: ArcTexture<Float>,
        mdf: MicrofacetKind,
    ) -> Self {
        Self {
            inner_refraction_index,
            outer_refraction_index,
            reflectance,
            transmittance,
            roughness_u,
            roughness_v,
            mdf,
            number_of_samples: 1,
        }
    }

    /// Sets the number of samples for Monte Carlo estimates.
    ///
    /// * `n` - Number of samples.
    pub fn set_number_of_samples(&mut self, n: usize) {
        self.number_of_samples = n;
    }
}

impl Shader for WalterShader {
    fn name(&self) -> &'static str {
        "Walter"
    }

    fn caps(&self) -> BsdfCaps {
        Walter::CAPS
    }

    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        let (ior_top, ior_bottom) = oriented_indices(
            refractive_index(&self.outer_refraction_index, sample, ctx),
            refractive_index(&self.inner_refraction_index, sample, ctx),
            ctx.solid_event,
        );
        let model = Walter::new(
            ior_top,
            ior_bottom,
            self.reflectance.evaluate(sample, ctx),
            self.transmittance.evaluate(sample, ctx),
            self.mdf.distribution(),
            roughness_to_alpha(self.roughness_u.evaluate(sample, ctx)),
            roughness_to_alpha(self.roughness_v.evaluate(sample, ctx)),
        );
        Bsdf::alloc(arena, ctx, Walter::CAPS, Walter::alloc(arena, model))
    }

    fn num_reflection_samples(&self) -> usize {
        self.number_of_samples
    }

    fn num_transmission_samples(&self) -> usize {
        self.number_of_samples
    }
}

impl Persistent for WalterShader {
    type State = WalterState;

    fn state(&self) -> Self::State {
        WalterState {
            version: STATE_VERSION,
            inner_refraction_index: Arc::clone(&self.inner_refraction_index),
            outer_refraction_index: Arc::clone(&self.outer_refraction_index),
            reflectance: Arc::clone(&self.reflectance),
            transmittance: Arc::clone(&self.transmittance),
            roughness_u: Arc::clone(&self.roughness_u),
            roughness_v: Arc::clone(&self.roughness_v),
            mdf: self.mdf,
            number_of_samples: self.number_of_samples,
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        self.inner_refraction_index = state.inner_refraction_index;
        self.outer_refraction_index = state.outer_refraction_index;
        self.reflectance = state.reflectance;
        self.transmittance = state.transmittance;
        self.roughness_u = state.roughness_u;
        self.roughness_v = state.roughness_v;
        self.mdf = state.mdf;
        self.number_of_samples = state.number_of_samples;
        Ok(())
    }
}

impl TryFrom<&TextureParams> for WalterShader {
    type Error = String;

    /// Create a Walter shader from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let mut shader = Self::new(
            tp.get_spectrum_texture_or_else("innerRefractionIndex", Spectrum::new(1.5), ConstantTexture::arc),
            tp.get_spectrum_texture_or_else("outerRefractionIndex", Spectrum::ONE, ConstantTexture::arc),
            tp.get_spectrum_texture_or_else("reflectance", Spectrum::ONE, ConstantTexture::arc),
            tp.get_spectrum_texture_or_else("transmittance", Spectrum::ONE, ConstantTexture::arc),
            find_roughness(tp, "roughnessU"),
            find_roughness(tp, "roughnessV"),
            find_mdf(tp)?,
        );
        shader.set_number_of_samples(number_of_samples(tp)?);
        Ok(shader)
    }
}
