//! Lambert Shader

use super::*;

/// Implements purely diffuse surfaces.
pub struct LambertShader {
    /// Spectral diffuse reflection.
    diffuse: ArcTexture<Spectrum>,
}

/// Parameters of a `LambertShader`.
#[derive(Clone)]
pub struct LambertState {
    pub version: u32,
    pub diffuse: ArcTexture<Spectrum>,
}

impl LambertShader {
    /// Create a new `LambertShader`.
    ///
    /// * `diffuse` - Spectral diffuse reflection.
    pub fn new(diffuse: ArcTexture<Spectrum>) -> Self {
        Self { diffuse }
    }
}

impl Shader for LambertShader {
    fn name(&self) -> &'static str {
        "Lambert"
    }

    fn caps(&self) -> BsdfCaps {
        Lambert::CAPS
    }

    /// Evaluates the diffuse texture and allocates the Bsdf.
    ///
    /// * `arena`  - The arena for memory allocations.
    /// * `sample` - The camera sample.
    /// * `ctx`    - The shading context.
    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        let diffuse = self.diffuse.evaluate(sample, ctx);
        Bsdf::alloc(arena, ctx, Lambert::CAPS, Lambert::alloc(arena, diffuse))
    }
}

impl Persistent for LambertShader {
    type State = LambertState;

    fn state(&self) -> Self::State {
        LambertState {
            version: STATE_VERSION,
            diffuse: Arc::clone(&self.diffuse),
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        self.diffuse = state.diffuse;
        Ok(())
    }
}

impl From<&TextureParams> for LambertShader {
    /// Create a Lambert shader from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn from(tp: &TextureParams) -> Self {
        Self::new(tp.get_spectrum_texture_or_else("diffuse", Spectrum::new(0.5), ConstantTexture::arc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use float_cmp::approx_eq;

    #[test]
    fn half_grey_at_normal_incidence() {
        let shader = LambertShader::from(&TextureParams::default());
        let arena = Bump::new();
        let bsdf = shade(&shader, &arena);
        let z = Vector3f::new(0.0, 0.0, 1.0);
        let out = bsdf.evaluate(&z, &z, BsdfCaps::ALL);
        assert!(approx_eq!(f32, out.value[0], 0.5 * INV_PI, epsilon = 1e-6));
        assert!(approx_eq!(f32, out.pdf, INV_PI, epsilon = 1e-6));
    }

    #[test]
    fn albedo_equals_reflectance() {
        let shader = LambertShader::new(constant_spectrum(0.7));
        let arena = Bump::new();
        let bsdf = shade(&shader, &arena);
        let i = direction(0.8, 0.2);
        let a = albedo(bsdf, &i, 10_000, 1);
        assert!(approx_eq!(f32, a[1], 0.7, epsilon = 1e-3));
        check_samples(bsdf, &i, 1_000);
        assert!(max_sample_evaluate_error(bsdf, &i, 1_000, 2) < 1e-4);
    }

    #[test]
    fn state_round_trip() {
        let mut shader = LambertShader::new(constant_spectrum(0.7));
        let mut state = shader.state();
        assert_eq!(state.version, STATE_VERSION);
        state.diffuse = constant_spectrum(0.2);
        shader.set_state(state.clone()).unwrap();
        let arena = Bump::new();
        let z = Vector3f::new(0.0, 0.0, 1.0);
        let v = shade(&shader, &arena).evaluate(&z, &z, BsdfCaps::ALL).value;
        assert!(approx_eq!(f32, v[0], 0.2 * INV_PI, epsilon = 1e-6));

        state.version = 0;
        assert!(shader.set_state(state).is_err());
    }
}
