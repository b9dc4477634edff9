//! Scale Texture

use super::*;
use std::ops::Mul;

/// Product of two textures, typically a color modulated by a mask.
#[derive(Clone)]
pub struct ScaleTexture<T> {
    factors: [ArcTexture<T>; 2],
}

impl<T> ScaleTexture<T> {
    /// Create a new `ScaleTexture`.
    ///
    /// * `a` - First factor.
    /// * `b` - Second factor.
    pub fn new(a: ArcTexture<T>, b: ArcTexture<T>) -> Self {
        Self { factors: [a, b] }
    }
}

impl<T: Copy + Mul<Output = T>> Texture<T> for ScaleTexture<T> {
    fn evaluate(&self, sample: &Sample, ctx: &ShadingContext) -> T {
        let [a, b] = &self.factors;
        a.evaluate(sample, ctx) * b.evaluate(sample, ctx)
    }
}

impl From<&TextureParams> for ScaleTexture<Float> {
    /// Reads the factors `tex1` and `tex2`, both 1 when absent.
    ///
    /// * `tp` - Texture parameters.
    fn from(tp: &TextureParams) -> Self {
        let factor = |name| tp.get_float_texture_or_else(name, 1.0, ConstantTexture::arc);
        Self::new(factor("tex1"), factor("tex2"))
    }
}

impl From<&TextureParams> for ScaleTexture<Spectrum> {
    /// Reads the factors `tex1` and `tex2`, both white when absent.
    ///
    /// * `tp` - Texture parameters.
    fn from(tp: &TextureParams) -> Self {
        let factor = |name| tp.get_spectrum_texture_or_else(name, Spectrum::ONE, ConstantTexture::arc);
        Self::new(factor("tex1"), factor("tex2"))
    }
}
