//! Conductor Shader

use super::*;

/// Implements smooth metals with the exact Fresnel reflectance of a complex
/// refractive index.
pub struct ConductorShader {
    /// Extra reflectance multiplier.
    reflectance: ArcTexture<Spectrum>,

    /// Real part of the refractive index.
    eta: ArcTexture<Spectrum>,

    /// Absorption coefficient.
    kappa: ArcTexture<Spectrum>,
}

/// Parameters of a `ConductorShader`.
#[derive(Clone)]
pub struct ConductorState {
    pub version: u32,
    pub reflectance: ArcTexture<Spectrum>,
    pub eta: ArcTexture<Spectrum>,
    pub kappa: ArcTexture<Spectrum>,
}

impl ConductorShader {
    /// Create a new `ConductorShader`.
    ///
    /// * `reflectance` - Extra reflectance multiplier.
    /// * `eta`         - Real part of the refractive index.
    /// * `kappa`       - Absorption coefficient.
    pub fn new(
        reflectance: ArcTexture<Spectrum>,
        eta: ArcTexture<Spectrum>,
        kappa: ArcTexture<Spectrum>,
    ) -> Self {
        Self {
            reflectance,
            eta,
            kappa,
        }
    }
}

impl Shader for ConductorShader {
    fn name(&self) -> &'static str {
        "Conductor"
    }

    fn caps(&self) -> BsdfCaps {
        Conductor::CAPS
    }

    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        let bxdf = Conductor::alloc(
            arena,
            self.reflectance.evaluate(sample, ctx),
            self.eta.evaluate(sample, ctx),
            self.kappa.evaluate(sample, ctx),
        );
        Bsdf::alloc(arena, ctx, Conductor::CAPS, bxdf)
    }
}

impl Persistent for ConductorShader {
    type State = ConductorState;

    fn state(&self) -> Self::State {
        ConductorState {
            version: STATE_VERSION,
            reflectance: Arc::clone(&self.reflectance),
            eta: Arc::clone(&self.eta),
            kappa: Arc::clone(&self.kappa),
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        self.reflectance = state.reflectance;
        self.eta = state.eta;
        self.kappa = state.kappa;
        Ok(())
    }
}

impl From<&TextureParams> for ConductorShader {
    /// Create a conductor shader from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn from(tp: &TextureParams) -> Self {
        Self::new(
            tp.get_spectrum_texture_or_else("reflectance", Spectrum::ONE, ConstantTexture::arc),
            tp.get_spectrum_texture_or_else("eta", Spectrum::ONE, ConstantTexture::arc),
            tp.get_spectrum_texture_or_else("kappa", Spectrum::ZERO, ConstantTexture::arc),
        )
    }
}
