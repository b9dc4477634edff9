//! Constant Texture

use super::*;

/// A texture with the same value at every shading point. Every shader
/// parameter given inline ends up wrapped in one of these.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstantTexture<T> {
    value: T,
}

impl<T: Copy + Send + Sync + 'static> ConstantTexture<T> {
    /// Create a new `ConstantTexture<T>`.
    ///
    /// * `value` - The texture value.
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// Returns the value as a shared texture, the shape expected by texture
    /// parameter lookups.
    ///
    /// * `value` - The texture value.
    pub fn arc(value: T) -> ArcTexture<T> {
        Arc::new(Self::new(value))
    }
}

impl<T: Copy> Texture<T> for ConstantTexture<T> {
    fn evaluate(&self, _sample: &Sample, _ctx: &ShadingContext) -> T {
        self.value
    }
}

impl From<&TextureParams> for ConstantTexture<Float> {
    /// Reads `value`, 1 when absent.
    ///
    /// * `tp` - Texture parameters.
    fn from(tp: &TextureParams) -> Self {
        Self::new(tp.find_float("value", 1.0))
    }
}

impl From<&TextureParams> for ConstantTexture<Spectrum> {
    /// Reads the color `value`, white when absent.
    ///
    /// * `tp` - Texture parameters.
    fn from(tp: &TextureParams) -> Self {
        Self::new(tp.params.find_one_spectrum("value", Spectrum::ONE))
    }
}
