//! Roughness or Phong Power

use super::*;

/// Default roughness of the microfacet shaders.
pub const DEFAULT_ROUGHNESS: Float = 0.1;

/// A microfacet lobe width given either as a roughness or as the exponent of
/// an equivalent Phong lobe. Both views are available from either variant.
#[derive(Clone)]
pub enum RoughnessOrPower {
    /// Roughness texture.
    Roughness(ArcTexture<Float>),

    /// Phong exponent texture.
    Power(ArcTexture<Float>),
}

impl RoughnessOrPower {
    /// Returns a constant roughness.
    ///
    /// * `roughness` - The roughness.
    pub fn roughness_value(roughness: Float) -> Self {
        Self::Roughness(ConstantTexture::arc(roughness))
    }

    /// Returns a constant Phong exponent.
    ///
    /// * `power` - The exponent.
    pub fn power_value(power: Float) -> Self {
        Self::Power(ConstantTexture::arc(power))
    }

    /// Returns the roughness at the shading point.
    ///
    /// * `sample` - The camera sample.
    /// * `ctx`    - The shading context.
    pub fn roughness(&self, sample: &Sample, ctx: &ShadingContext) -> Float {
        match self {
            Self::Roughness(tex) => tex.evaluate(sample, ctx),
            Self::Power(tex) => power_to_roughness(tex.evaluate(sample, ctx)),
        }
    }

    /// Returns the Phong exponent at the shading point.
    ///
    /// * `sample` - The camera sample.
    /// * `ctx`    - The shading context.
    pub fn power(&self, sample: &Sample, ctx: &ShadingContext) -> Float {
        match self {
            Self::Roughness(tex) => roughness_to_power(tex.evaluate(sample, ctx)),
            Self::Power(tex) => tex.evaluate(sample, ctx),
        }
    }

    /// Returns the alpha parameter of the microfacet distributions.
    ///
    /// * `sample` - The camera sample.
    /// * `ctx`    - The shading context.
    pub fn alpha(&self, sample: &Sample, ctx: &ShadingContext) -> Float {
        roughness_to_alpha(self.roughness(sample, ctx))
    }

    /// Reads the lobe width along one tangent. A Phong exponent parameter
    /// takes precedence over the roughness parameter, which falls back to
    /// the isotropic `roughness`.
    ///
    /// * `tp`        - Texture parameters.
    /// * `roughness` - Name of the roughness parameter.
    /// * `power`     - Name of the Phong exponent parameter.
    pub fn from_params(tp: &TextureParams, roughness: &str, power: &str) -> Self {
        if tp.has(power) {
            if tp.has(roughness) {
                warn!("Both '{}' and '{}' given, ignoring '{}'", power, roughness, roughness);
            }
            return Self::Power(tp.get_float_texture_or_else(power, 1.0, ConstantTexture::arc));
        }
        let name = if tp.has(roughness) { roughness } else { "roughness" };
        Self::Roughness(tp.get_float_texture_or_else(name, DEFAULT_ROUGHNESS, ConstantTexture::arc))
    }
}

/// Converts a roughness to the exponent of the equivalent Phong lobe.
///
/// * `roughness` - The roughness.
pub fn roughness_to_power(roughness: Float) -> Float {
    let a = roughness_to_alpha(roughness);
    max(2.0 / (a * a) - 2.0, 0.0)
}

/// Converts a Phong exponent to a roughness.
///
/// * `power` - The exponent.
pub fn power_to_roughness(power: Float) -> Float {
    (2.0 / (max(power, 0.0) + 2.0)).powf(0.25)
}
