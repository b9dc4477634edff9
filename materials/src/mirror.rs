//! Mirror Shader

use super::*;

/// Implements perfect and fuzzy mirrors.
pub struct MirrorShader {
    /// Reflectance.
    reflectance: ArcTexture<Spectrum>,

    /// Radius of the jitter sphere.
    fuzz: ArcTexture<Float>,

    /// Capabilities.
    caps: BsdfCaps,
}

/// Parameters of a `MirrorShader`.
#[derive(Clone)]
pub struct MirrorState {
    pub version: u32,
    pub reflectance: ArcTexture<Spectrum>,
    pub fuzz: ArcTexture<Float>,
    pub caps: BsdfCaps,
}

impl MirrorShader {
    /// Create a new `MirrorShader`.
    ///
    /// * `reflectance` - Reflectance.
    /// * `fuzz`        - Radius of the jitter sphere.
    /// * `caps`        - Capabilities; glossy when the fuzz can be non-zero.
    pub fn new(reflectance: ArcTexture<Spectrum>, fuzz: ArcTexture<Float>, caps: BsdfCaps) -> Self {
        Self {
            reflectance,
            fuzz,
            caps,
        }
    }

    /// Create a perfect mirror.
    ///
    /// * `reflectance` - Reflectance.
    pub fn perfect(reflectance: ArcTexture<Spectrum>) -> Self {
        Self::new(reflectance, constant_float(0.0), Mirror::caps_for(0.0))
    }
}

impl Shader for MirrorShader {
    fn name(&self) -> &'static str {
        "Mirror"
    }

    fn caps(&self) -> BsdfCaps {
        self.caps
    }

    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        let reflectance = self.reflectance.evaluate(sample, ctx);
        let fuzz = self.fuzz.evaluate(sample, ctx);
        Bsdf::alloc(arena, ctx, Mirror::caps_for(fuzz), Mirror::alloc(arena, reflectance, fuzz))
    }
}

impl Persistent for MirrorShader {
    type State = MirrorState;

    fn state(&self) -> Self::State {
        MirrorState {
            version: STATE_VERSION,
            reflectance: Arc::clone(&self.reflectance),
            fuzz: Arc::clone(&self.fuzz),
            caps: self.caps,
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        self.reflectance = state.reflectance;
        self.fuzz = state.fuzz;
        self.caps = state.caps;
        Ok(())
    }
}

impl From<&TextureParams> for MirrorShader {
    /// Create a mirror shader from given parameter set. A fuzz texture may
    /// be zero at some points, so the shader then has both kinds of lobes.
    ///
    /// * `tp` - Texture parameter set.
    fn from(tp: &TextureParams) -> Self {
        let reflectance = tp.get_spectrum_texture_or_else("reflectance", Spectrum::ONE, ConstantTexture::arc);
        let caps = if tp.params.textures.contains_key("fuzz") {
            BsdfCaps::REFLECTION | BsdfCaps::SPECULAR | BsdfCaps::GLOSSY
        } else {
            Mirror::caps_for(tp.find_float("fuzz", 0.0))
        };
        let fuzz = tp.get_float_texture_or_else("fuzz", 0.0, ConstantTexture::arc);
        Self::new(reflectance, fuzz, caps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use float_cmp::approx_eq;

    #[test]
    fn normal_incidence() {
        let shader = MirrorShader::perfect(constant_spectrum(0.9));
        let arena = Bump::new();
        let bsdf = shade(&shader, &arena);
        let z = Vector3f::new(0.0, 0.0, 1.0);
        let s = bsdf.sample(&z, &Point2f::new(0.5, 0.5), 0.5, BsdfCaps::ALL);
        assert!(s.is_valid());
        assert!(approx_eq!(f32, s.omega_out.z, 1.0, epsilon = 1e-6));
        assert_eq!(s.pdf, 1.0);
        assert!(approx_eq!(f32, s.value[0], 0.9, epsilon = 1e-6));
        assert_eq!(s.used_caps, BsdfCaps::REFLECTION | BsdfCaps::SPECULAR);
        assert!(bsdf.evaluate(&z, &z, BsdfCaps::ALL).is_black());
    }

    #[test]
    fn fuzzy_mirror_is_glossy() {
        let shader = MirrorShader::new(constant_spectrum(1.0), constant_float(0.3), Mirror::caps_for(0.3));
        let arena = Bump::new();
        let bsdf = shade(&shader, &arena);
        let i = direction(0.5, 1.0);
        assert!(bsdf.has_caps(BsdfCaps::GLOSSY));
        check_samples(bsdf, &i, 2_000);
        assert!(max_sample_evaluate_error(bsdf, &i, 2_000, 9) < 1e-2);
        let a = albedo(bsdf, &i, 10_000, 4);
        assert!(a[0] <= 1.0 + 1e-3, "{}", a);
    }

    #[test]
    fn fuzz_texture_keeps_both_kinds() {
        let mut params = ParamSet::new();
        params.add_texture("fuzz", &[String::from("noise")]);
        let mut float_textures = FloatTextureMap::new();
        float_textures.insert(String::from("noise"), constant_float(0.0));
        let tp = TextureParams::new(params, float_textures, SpectrumTextureMap::new());
        let shader = MirrorShader::from(&tp);
        assert!(shader.caps().contains(BsdfCaps::SPECULAR | BsdfCaps::GLOSSY));
    }
}
