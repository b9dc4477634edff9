//! Materials

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

use bumpalo::Bump;
use bsdf_core::geometry::*;
use bsdf_core::interaction::*;
use bsdf_core::microfacet::*;
use bsdf_core::paramset::*;
use bsdf_core::pbrt::*;
use bsdf_core::reflection::*;
use bsdf_core::sampler::*;
use bsdf_core::shader::*;
use bsdf_core::spectrum::*;
use bsdf_core::texture::*;
use std::sync::Arc;
use textures::*;

mod ashikhmin_shirley;
mod bump_mapping;
mod common;
mod conductor;
mod cook_torrance;
mod dielectric;
mod flip;
mod jakob;
mod lafortune;
mod lambert;
mod linear_interpolator;
mod mirror;
mod oren_nayar;
mod roughness;
mod state;
mod sum;
mod thin_dielectric;
mod walter;

#[cfg(test)]
mod testing;

// Re-export
pub use ashikhmin_shirley::*;
pub use bump_mapping::*;
pub use common::*;
pub use conductor::*;
pub use cook_torrance::*;
pub use dielectric::*;
pub use flip::*;
pub use jakob::*;
pub use lafortune::*;
pub use lambert::*;
pub use linear_interpolator::*;
pub use mirror::*;
pub use oren_nayar::*;
pub use roughness::*;
pub use state::*;
pub use sum::*;
pub use thin_dielectric::*;
pub use walter::*;

/// Creates the given type of shader from parameter set.
///
/// * `name`     - Name.
/// * `tp`       - Parameter set.
/// * `children` - Child shaders of the composite shaders, in order.
pub fn make_shader(name: &str, tp: &TextureParams, children: &[ArcShader]) -> Result<ArcShader, String> {
    let shader: ArcShader = match name {
        "ashikhmin_shirley" => Arc::new(AshikhminShirleyShader::try_from(tp)?),
        "bump_mapping" => Arc::new(BumpMappingShader::try_from((tp, children))?),
        "conductor" => Arc::new(ConductorShader::from(tp)),
        "cook_torrance" => Arc::new(CookTorranceShader::try_from(tp)?),
        "dielectric" => Arc::new(DielectricShader::from(tp)),
        "flip" => Arc::new(FlipShader::try_from(children)?),
        "jakob" => Arc::new(JakobShader::try_from(tp)?),
        "lafortune" => Arc::new(LafortuneShader::try_from(tp)?),
        "lambert" => Arc::new(LambertShader::from(tp)),
        "linear_interpolator" => Arc::new(LinearInterpolatorShader::try_from((tp, children))?),
        "mirror" => Arc::new(MirrorShader::from(tp)),
        "oren_nayar" => Arc::new(OrenNayarShader::from(tp)),
        "sum" => Arc::new(SumShader::from(children)),
        "thin_dielectric" => Arc::new(ThinDielectricShader::from(tp)),
        "walter" => Arc::new(WalterShader::try_from(tp)?),
        "" => return Err(String::from("Unable to create shader with no name")),
        _ => return Err(format!("Shader '{}' unknown.", name)),
    };
    tp.params.report_unused();
    Ok(shader)
}

/// Names accepted by `make_shader()`.
pub const SHADER_NAMES: [&str; 15] = [
    "ashikhmin_shirley",
    "bump_mapping",
    "conductor",
    "cook_torrance",
    "dielectric",
    "flip",
    "jakob",
    "lafortune",
    "lambert",
    "linear_interpolator",
    "mirror",
    "oren_nayar",
    "sum",
    "thin_dielectric",
    "walter",
];
