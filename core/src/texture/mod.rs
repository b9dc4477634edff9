//! Textures

use crate::interaction::*;
use crate::pbrt::Float;
use crate::sampler::*;
use crate::spectrum::Spectrum;
use std::collections::HashMap;
use std::sync::Arc;

/// Texture interface. Textures are pure functions of the shading point and
/// are evaluated once per Bsdf construction.
pub trait Texture<T: Copy> {
    /// Evaluate the texture at a shading point.
    ///
    /// * `sample` - The camera sample.
    /// * `ctx`    - The shading context.
    fn evaluate(&self, sample: &Sample, ctx: &ShadingContext) -> T;
}

/// Atomic reference counted `Texture`.
pub type ArcTexture<T> = Arc<dyn Texture<T> + Send + Sync>;

/// Map of floating point textures.
pub type FloatTextureMap = HashMap<String, ArcTexture<Float>>;

/// Map of spectrum textures.
pub type SpectrumTextureMap = HashMap<String, ArcTexture<Spectrum>>;
