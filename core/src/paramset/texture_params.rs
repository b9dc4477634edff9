//! Texture Parameters

use super::*;
use crate::texture::*;
use std::sync::Arc;

/// Shader parameters together with the named textures they may refer to.
#[derive(Clone, Default)]
pub struct TextureParams {
    float_textures: FloatTextureMap,
    spectrum_textures: SpectrumTextureMap,

    /// Shader parameters.
    pub params: ParamSet,
}

/// Resolves a parameter to a texture. A bound texture name wins over inline
/// values; an unknown texture name or a missing parameter yields `default`.
fn resolve<T: Copy>(
    params: &ParamSet,
    textures: &HashMap<String, ArcTexture<T>>,
    inline: Vec<T>,
    name: &str,
    default: T,
    constant: impl Fn(T) -> ArcTexture<T>,
) -> ArcTexture<T> {
    let texture = params.find_one_texture(name, String::new());
    if !texture.is_empty() {
        if let Some(tex) = textures.get(&texture) {
            return Arc::clone(tex);
        }
        warn!("Texture '{}' for parameter '{}' not found, using default", texture, name);
        return constant(default);
    }

    if inline.len() > 1 {
        warn!("Ignoring excess values provided with parameter '{}'", name);
    }
    constant(inline.first().copied().unwrap_or(default))
}

impl TextureParams {
    /// Create a new `TextureParams`.
    ///
    /// * `params`            - Shader parameters.
    /// * `float_textures`    - Named float textures.
    /// * `spectrum_textures` - Named spectrum textures.
    pub fn new(
        params: ParamSet,
        float_textures: FloatTextureMap,
        spectrum_textures: SpectrumTextureMap,
    ) -> Self {
        Self {
            float_textures,
            spectrum_textures,
            params,
        }
    }

    /// Returns the float texture for a parameter.
    ///
    /// * `name`     - Parameter name.
    /// * `default`  - Value used when the parameter is absent.
    /// * `constant` - Wraps an inline value into a texture.
    pub fn get_float_texture_or_else<F>(&self, name: &str, default: Float, constant: F) -> ArcTexture<Float>
    where
        F: Fn(Float) -> ArcTexture<Float>,
    {
        let inline = self.params.find_float(name);
        resolve(&self.params, &self.float_textures, inline, name, default, constant)
    }

    /// Returns the spectrum texture for a parameter.
    ///
    /// * `name`     - Parameter name.
    /// * `default`  - Value used when the parameter is absent.
    /// * `constant` - Wraps an inline value into a texture.
    pub fn get_spectrum_texture_or_else<F>(
        &self,
        name: &str,
        default: Spectrum,
        constant: F,
    ) -> ArcTexture<Spectrum>
    where
        F: Fn(Spectrum) -> ArcTexture<Spectrum>,
    {
        let inline = self.params.find_spectrum(name);
        resolve(&self.params, &self.spectrum_textures, inline, name, default, constant)
    }

    /// Returns true if the parameter was given either as a value or as a
    /// texture name.
    ///
    /// * `name` - Parameter name.
    pub fn has(&self, name: &str) -> bool {
        self.params.has_param(name)
    }

    pub fn find_float(&self, name: &str, default: Float) -> Float {
        self.params.find_one_float(name, default)
    }

    pub fn find_int(&self, name: &str, default: Int) -> Int {
        self.params.find_one_int(name, default)
    }

    pub fn find_string(&self, name: &str, default: String) -> String {
        self.params.find_one_string(name, default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::*;
    use crate::sampler::*;

    struct Fixed(Float);

    impl Texture<Float> for Fixed {
        fn evaluate(&self, _sample: &Sample, _ctx: &ShadingContext) -> Float {
            self.0
        }
    }

    fn constant(v: Float) -> ArcTexture<Float> {
        Arc::new(Fixed(v))
    }

    fn eval(tex: &ArcTexture<Float>) -> Float {
        tex.evaluate(&Sample::default(), &ShadingContext::default())
    }

    #[test]
    fn texture_wins_over_default() {
        let mut params = ParamSet::new();
        params.add_texture("roughness", &[String::from("bumps")]);
        let mut float_textures = FloatTextureMap::new();
        float_textures.insert(String::from("bumps"), constant(0.7));
        let tp = TextureParams::new(params, float_textures, SpectrumTextureMap::new());

        assert_eq!(eval(&tp.get_float_texture_or_else("roughness", 0.1, constant)), 0.7);
    }

    #[test]
    fn inline_value_and_default() {
        let mut params = ParamSet::new();
        params.add_float("eta", &[1.33]);
        let tp = TextureParams::new(params, FloatTextureMap::new(), SpectrumTextureMap::new());

        assert_eq!(eval(&tp.get_float_texture_or_else("eta", 1.5, constant)), 1.33);
        assert_eq!(eval(&tp.get_float_texture_or_else("kappa", 0.0, constant)), 0.0);
        assert!(tp.has("eta"));
        assert!(!tp.has("kappa"));
    }

    #[test]
    fn missing_texture_falls_back_to_default() {
        let mut params = ParamSet::new();
        params.add_texture("roughness", &[String::from("nothing")]);
        let tp = TextureParams::new(params, FloatTextureMap::new(), SpectrumTextureMap::new());
        assert_eq!(eval(&tp.get_float_texture_or_else("roughness", 0.1, constant)), 0.1);
    }
}
