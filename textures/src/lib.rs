//! Textures

use bsdf_core::geometry::*;
use bsdf_core::interaction::*;
use bsdf_core::paramset::*;
use bsdf_core::pbrt::*;
use bsdf_core::sampler::*;
use bsdf_core::spectrum::*;
use bsdf_core::texture::*;
use std::sync::Arc;

#[macro_use]
extern crate log;

mod constant;
mod scale;
mod uv_checkerboard;

// Re-export
pub use constant::*;
pub use scale::*;
pub use uv_checkerboard::*;

/// Creates a float texture.
///
/// * `name` - Name.
/// * `tp`   - Parameter set.
pub fn make_float_texture(name: &str, tp: &TextureParams) -> Result<ArcTexture<Float>, String> {
    match name {
        "checkerboard" => Ok(Arc::new(UvCheckerboard::<Float>::from(tp))),
        "constant" => Ok(Arc::new(ConstantTexture::<Float>::from(tp))),
        "scale" => Ok(Arc::new(ScaleTexture::<Float>::from(tp))),
        _ => Err(format!("Float texture '{}' unknown.", name)),
    }
}

/// Creates a spectrum texture.
///
/// * `name` - Name.
/// * `tp`   - Parameter set.
pub fn make_spectrum_texture(name: &str, tp: &TextureParams) -> Result<ArcTexture<Spectrum>, String> {
    match name {
        "checkerboard" => Ok(Arc::new(UvCheckerboard::<Spectrum>::from(tp))),
        "constant" => Ok(Arc::new(ConstantTexture::<Spectrum>::from(tp))),
        "scale" => Ok(Arc::new(ScaleTexture::<Spectrum>::from(tp))),
        _ => Err(format!("Spectrum texture '{}' unknown.", name)),
    }
}
