//! Cook-Torrance Shader

use super::*;

/// Implements rough metals with a microfacet BRDF weighted by the Fresnel
/// reflectance of a conductor.
pub struct CookTorranceShader {
    /// Extra reflectance multiplier.
    reflectance: ArcTexture<Spectrum>,

    /// Real part of the refractive index.
    eta: ArcTexture<Spectrum>,

    /// Absorption coefficient.
    kappa: ArcTexture<Spectrum>,

    /// Roughness along the first tangent.
    roughness_u: ArcTexture<Float>,

    /// Roughness along the second tangent.
    roughness_v: ArcTexture<Float>,

    /// Microfacet distribution.
    mdf: MicrofacetKind,

    /// Number of samples for Monte Carlo estimates.
    number_of_samples: usize,
}

/// Parameters of a `CookTorranceShader`.
#[derive(Clone)]
pub struct CookTorranceState {
    pub version: u32,
    pub reflectance: ArcTexture<Spectrum>,
    pub eta: ArcTexture<Spectrum>,
    pub kappa: ArcTexture<Spectrum>,
    pub roughness_u: ArcTexture<Float>,
    pub roughness_v: ArcTexture<Float>,
    pub mdf: MicrofacetKind,
    pub number_of_samples: usize,
}

impl CookTorranceShader {
    /// Create a new `CookTorranceShader`.
    ///
    /// * `reflectance` - Extra reflectance multiplier.
    /// * `eta`         - Real part of the refractive index.
    /// * `kappa`       - Absorption coefficient.
    /// * `roughness_u` - Roughness along the first tangent.
    /// * `roughness_v` - Roughness along the second tangent.
    /// * `mdf`         - Microfacet distribution.
    pub fn new(
        reflectance: ArcTexture<Spectrum>,
        eta: ArcTexture<Spectrum>,
        kappa: ArcTexture<Spectrum>,
        roughness_u: ArcTexture<Float>,
        roughness_v: ArcTexture<Float>,
        mdf: MicrofacetKind,
    ) -> Self {
        Self {
            reflectance,
            eta,
            kappa,
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

impl Shader for CookTorranceShader {
    fn name(&self) -> &'static str {
        "CookTorrance"
    }

    fn caps(&self) -> BsdfCaps {
        CookTorrance::CAPS
    }

    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        let model = CookTorrance::new(
            self.reflectance.evaluate(sample, ctx),
            self.eta.evaluate(sample, ctx),
            self.kappa.evaluate(sample, ctx),
            self.mdf.distribution(),
            roughness_to_alpha(self.roughness_u.evaluate(sample, ctx)),
            roughness_to_alpha(self.roughness_v.evaluate(sample, ctx)),
        );
        Bsdf::alloc(arena, ctx, CookTorrance::CAPS, CookTorrance::alloc(arena, model))
    }

    fn num_reflection_samples(&self) -> usize {
        self.number_of_samples
    }
}

impl Persistent for CookTorranceShader {
    type State = CookTorranceState;

    fn state(&self) -> Self::State {
        CookTorranceState {
            version: STATE_VERSION,
            reflectance: Arc::clone(&self.reflectance),
            eta: Arc::clone(&self.eta),
            kappa: Arc::clone(&self.kappa),
            roughness_u: Arc::clone(&self.roughness_u),
            roughness_v: Arc::clone(&self.roughness_v),
            mdf: self.mdf,
            number_of_samples: self.number_of_samples,
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        self.reflectance = state.reflectance;
        self.eta = state.eta;
        self.kappa = state.kappa;
        self.roughness_u = state.roughness_u;
        self.roughness_v = state.roughness_v;
        self.mdf = state.mdf;
        self.number_of_samples = state.number_of_samples;
        Ok(())
    }
}

/// Returns the roughness texture along one tangent, falling back to the
/// isotropic `roughness` parameter.
///
/// * `tp`   - Texture parameters.
/// * `name` - Name of the anisotropic parameter.
pub(crate) fn find_roughness(tp: &TextureParams, name: &str) -> ArcTexture<Float> {
    let name = if tp.has(name) { name } else { "roughness" };
    tp.get_float_texture_or_else(name, DEFAULT_ROUGHNESS, ConstantTexture::arc)
}

impl TryFrom<&TextureParams> for CookTorranceShader {
    type Error = String;

    /// Create a Cook-Torrance shader from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let mut shader = Self::new(
            tp.get_spectrum_texture_or_else("reflectance", Spectrum::ONE, ConstantTexture::arc),
            tp.get_spectrum_texture_or_else("eta", Spectrum::ONE, ConstantTexture::arc),
            tp.get_spectrum_texture_or_else("kappa", Spectrum::ZERO, ConstantTexture::arc),
            find_roughness(tp, "roughnessU"),
            find_roughness(tp, "roughnessV"),
            find_mdf(tp)?,
        );
        shader.set_number_of_samples(number_of_samples(tp)?);
        Ok(shader)
    }
}
