//! Ashikhmin-Shirley Shader

use super::*;

/// Implements the anisotropic Phong model of Ashikhmin and Shirley: a glossy
/// coating over a diffuse substrate.
pub struct AshikhminShirleyShader {
    /// Diffuse reflectance of the substrate.
    diffuse: ArcTexture<Spectrum>,

    /// Specular reflectance at normal incidence.
    specular: ArcTexture<Spectrum>,

    /// Lobe width along the first tangent.
    roughness_u: RoughnessOrPower,

    /// Lobe width along the second tangent.
    roughness_v: RoughnessOrPower,

    /// Microfacet distribution of the coating.
    mdf: MicrofacetKind,

    /// Number of samples for Monte Carlo estimates.
    number_of_samples: usize,
}

/// Parameters of an `AshikhminShirleyShader`.
#[derive(Clone)]
pub struct AshikhminShirleyState {
    pub version: u32,
    pub diffuse: ArcTexture<Spectrum>,
    pub specular: ArcTexture<Spectrum>,
    pub roughness_u: RoughnessOrPower,
    pub roughness_v: RoughnessOrPower,
    pub mdf: MicrofacetKind,
    pub number_of_samples: usize,
}

impl AshikhminShirleyShader {
    /// Create a new `AshikhminShirleyShader`.
    ///
    /// * `diffuse`     - Diffuse reflectance of the substrate.
    /// * `specular`    - Specular reflectance at normal incidence.
    /// * `roughness_u` - Lobe width along the first tangent.
    /// * `roughness_v` - Lobe width along the second tangent.
    /// * `mdf`         - Microfacet distribution of the coating.
    pub fn new(
        diffuse: ArcTexture<Spectrum>,
        specular: ArcTexture<Spectrum>,
        roughness_u: RoughnessOrPower,
        roughness_v: RoughnessOrPower,
        mdf: MicrofacetKind,
    ) -> Self {
        Self {
            diffuse,
            specular,
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

impl Shader for AshikhminShirleyShader {
    fn name(&self) -> &'static str {
        "AshikhminShirley"
    }

    fn caps(&self) -> BsdfCaps {
        AshikhminShirley::CAPS
    }

    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        let model = AshikhminShirley::new(
            self.diffuse.evaluate(sample, ctx),
            self.specular.evaluate(sample, ctx),
            self.mdf.distribution(),
            self.roughness_u.alpha(sample, ctx),
            self.roughness_v.alpha(sample, ctx),
        );
        Bsdf::alloc(arena, ctx, AshikhminShirley::CAPS, AshikhminShirley::alloc(arena, model))
    }

    fn num_reflection_samples(&self) -> usize {
        self.number_of_samples
    }
}

impl Persistent for AshikhminShirleyShader {
    type State = AshikhminShirleyState;

    fn state(&self) -> Self::State {
        AshikhminShirleyState {
            version: STATE_VERSION,
            diffuse: Arc::clone(&self.diffuse),
            specular: Arc::clone(&self.specular),
            roughness_u: self.roughness_u.clone(),
            roughness_v: self.roughness_v.clone(),
            mdf: self.mdf,
            number_of_samples: self.number_of_samples,
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        self.diffuse = state.diffuse;
        self.specular = state.specular;
        self.roughness_u = state.roughness_u;
        self.roughness_v = state.roughness_v;
        self.mdf = state.mdf;
        self.number_of_samples = state.number_of_samples;
        Ok(())
    }
}

impl TryFrom<&TextureParams> for AshikhminShirleyShader {
    type Error = String;

    /// Create an Ashikhmin-Shirley shader from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let mut shader = Self::new(
            tp.get_spectrum_texture_or_else("diffuse", Spectrum::ONE, ConstantTexture::arc),
            tp.get_spectrum_texture_or_else("specular", Spectrum::ONE, ConstantTexture::arc),
            RoughnessOrPower::from_params(tp, "roughnessU", "specularPowerU"),
            RoughnessOrPower::from_params(tp, "roughnessV", "specularPowerV"),
            find_mdf(tp)?,
        );
        shader.set_number_of_samples(number_of_samples(tp)?);
        Ok(shader)
    }
}
