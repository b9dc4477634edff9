//! Oren-Nayar Shader

use super::*;

/// Implements rough diffuse surfaces.
pub struct OrenNayarShader {
    /// Spectral diffuse reflection.
    diffuse: ArcTexture<Spectrum>,

    /// Standard deviation of the facet slope angle in radians.
    sigma: ArcTexture<Float>,
}

/// Parameters of an `OrenNayarShader`.
#[derive(Clone)]
pub struct OrenNayarState {
    pub version: u32,
    pub diffuse: ArcTexture<Spectrum>,
    pub sigma: ArcTexture<Float>,
}

impl OrenNayarShader {
    /// Create a new `OrenNayarShader`.
    ///
    /// * `diffuse` - Spectral diffuse reflection.
    /// * `sigma`   - Standard deviation of the facet slope angle in radians.
    pub fn new(diffuse: ArcTexture<Spectrum>, sigma: ArcTexture<Float>) -> Self {
        Self { diffuse, sigma }
    }
}

impl Shader for OrenNayarShader {
    fn name(&self) -> &'static str {
        "OrenNayar"
    }

    fn caps(&self) -> BsdfCaps {
        OrenNayar::CAPS
    }

    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        let diffuse = self.diffuse.evaluate(sample, ctx);
        let sigma = self.sigma.evaluate(sample, ctx);
        Bsdf::alloc(arena, ctx, OrenNayar::CAPS, OrenNayar::alloc(arena, diffuse, sigma))
    }
}

impl Persistent for OrenNayarShader {
    type State = OrenNayarState;

    fn state(&self) -> Self::State {
        OrenNayarState {
            version: STATE_VERSION,
            diffuse: Arc::clone(&self.diffuse),
            sigma: Arc::clone(&self.sigma),
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        self.diffuse = state.diffuse;
        self.sigma = state.sigma;
        Ok(())
    }
}

impl From<&TextureParams> for OrenNayarShader {
    /// Create an Oren-Nayar shader from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn from(tp: &TextureParams) -> Self {
        let diffuse = tp.get_spectrum_texture_or_else("diffuse", Spectrum::new(0.5), ConstantTexture::arc);
        let sigma = tp.get_float_texture_or_else("sigma", 0.1, ConstantTexture::arc);
        Self::new(diffuse, sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn albedo_below_reflectance() {
        let shader = OrenNayarShader::new(constant_spectrum(0.8), constant_float(0.6));
        let arena = Bump::new();
        let bsdf = shade(&shader, &arena);
        for theta in [0.1, 0.7, 1.3] {
            let i = direction(theta, 0.4);
            let a = albedo(bsdf, &i, 10_000, 5);
            assert!(a[0] < 0.8 && a[0] > 0.5, "{} {}", theta, a);
            check_samples(bsdf, &i, 1_000);
        }
    }

    #[test]
    fn smooth_is_lambertian() {
        let shader = OrenNayarShader::new(constant_spectrum(0.8), constant_float(0.0));
        let arena = Bump::new();
        let bsdf = shade(&shader, &arena);
        let out = bsdf.evaluate(&direction(0.5, 0.0), &direction(1.0, 2.0), BsdfCaps::ALL);
        assert!((out.value[2] - 0.8 * INV_PI).abs() < 1e-6);
    }
}
