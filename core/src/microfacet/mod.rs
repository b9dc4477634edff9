//! Microfacet Distribution Models

use crate::geometry::*;
use crate::pbrt::*;
use std::fmt;
use std::str::FromStr;

mod beckmann;
mod blinn;
mod trowbridge_reitz;

// Re-exports
pub use beckmann::*;
pub use blinn::*;
pub use trowbridge_reitz::*;

/// Smallest roughness used by microfacet models. Roughness textures are
/// clamped to it before squaring into an alpha value; below it the densities
/// overflow single precision.
pub const MIN_ROUGHNESS: Float = 1e-3;

/// Maps a roughness value to the alpha parameter of a distribution.
///
/// * `roughness` - Roughness, clamped to `MIN_ROUGHNESS`.
#[inline]
pub fn roughness_to_alpha(roughness: Float) -> Float {
    sqr(max(roughness, MIN_ROUGHNESS))
}

/// Interface for microfacet distribution models. Implementations are
/// stateless; the (possibly anisotropic) roughness is passed with every call.
/// All directions are in the local shading frame.
pub trait MicrofacetDistribution: Send + Sync {
    /// Returns the name of the distribution.
    fn name(&self) -> &'static str;

    /// Returns the density of microfacets with normal `h` and the density of
    /// sampling `h` with `sample_h()`, which is `D(h) * cos(θh)`. Both are 0
    /// for half vectors below the surface.
    ///
    /// * `h`       - Unit half vector.
    /// * `alpha_u` - Roughness along the first tangent.
    /// * `alpha_v` - Roughness along the second tangent.
    fn d(&self, h: &Vector3f, alpha_u: Float, alpha_v: Float) -> (Float, Float);

    /// Samples a half vector proportional to `D(h) * cos(θh)`. `u[0]` drives
    /// the polar angle, `u[1]` the azimuth.
    ///
    /// * `u`       - The 2D uniform random values.
    /// * `alpha_u` - Roughness along the first tangent.
    /// * `alpha_v` - Roughness along the second tangent.
    fn sample_h(&self, u: &Point2f, alpha_u: Float, alpha_v: Float) -> Vector3f;

    /// Returns the invisible masked microfacet area per visible microfacet
    /// area.
    ///
    /// * `omega`   - The direction.
    /// * `alpha_u` - Roughness along the first tangent.
    /// * `alpha_v` - Roughness along the second tangent.
    fn lambda(&self, omega: &Vector3f, alpha_u: Float, alpha_v: Float) -> Float;

    /// Smith masking term for a direction and a microfacet normal. Back-facing
    /// microfacets are masked completely.
    ///
    /// * `omega`   - The direction.
    /// * `h`       - Microfacet normal.
    /// * `alpha_u` - Roughness along the first tangent.
    /// * `alpha_v` - Roughness along the second tangent.
    fn g1(&self, omega: &Vector3f, h: &Vector3f, alpha_u: Float, alpha_v: Float) -> Float {
        if omega.dot(h) * omega.z <= 0.0 {
            0.0
        } else {
            1.0 / (1.0 + self.lambda(omega, alpha_u, alpha_v))
        }
    }
}

/// Reference to one of the distribution singletons.
pub type MicrofacetRef = &'static dyn MicrofacetDistribution;

/// Samples the azimuth of a half vector. For anisotropic roughness the
/// uniform angle is warped so that iso-density contours become ellipses.
///
/// * `s`       - Uniform sample in [0, 1).
/// * `alpha_u` - Roughness along the first tangent.
/// * `alpha_v` - Roughness along the second tangent.
pub fn sample_phi(s: Float, alpha_u: Float, alpha_v: Float) -> Float {
    if alpha_u == alpha_v {
        return TWO_PI * s;
    }
    let phi = (alpha_v / alpha_u * (TWO_PI * s).tan()).atan();
    if s <= 0.25 {
        phi
    } else if s < 0.75 {
        phi + PI
    } else {
        phi + TWO_PI
    }
}

/// Returns `cos^2(φ) / alpha_u^2 + sin^2(φ) / alpha_v^2`, the inverse squared
/// roughness in the direction of the azimuth.
///
/// * `cos_phi` - Cosine of the azimuth.
/// * `sin_phi` - Sine of the azimuth.
/// * `alpha_u` - Roughness along the first tangent.
/// * `alpha_v` - Roughness along the second tangent.
#[inline]
pub(crate) fn inv_alpha2(cos_phi: Float, sin_phi: Float, alpha_u: Float, alpha_v: Float) -> Float {
    sqr(cos_phi / alpha_u) + sqr(sin_phi / alpha_v)
}

/// Builds a unit vector from its polar cosine and azimuth.
///
/// * `cos_theta` - Cosine of the polar angle.
/// * `phi`       - Azimuth.
#[inline]
pub(crate) fn spherical_direction(cos_theta: Float, phi: Float) -> Vector3f {
    let sin_theta = safe_sqrt(1.0 - cos_theta * cos_theta);
    Vector3f::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta)
}

/// Rational fit of the Beckmann masking term in `a = 1 / (alpha tan(θ))`,
/// shared by Beckmann and Blinn.
///
/// * `omega`   - The direction.
/// * `alpha_u` - Roughness along the first tangent.
/// * `alpha_v` - Roughness along the second tangent.
pub(crate) fn beckmann_lambda(omega: &Vector3f, alpha_u: Float, alpha_v: Float) -> Float {
    let denom = sqr(omega.x * alpha_u) + sqr(omega.y * alpha_v);
    if denom <= 0.0 {
        return 0.0;
    }
    let a = abs(omega.z) / denom.sqrt();
    if a >= 1.6 {
        0.0
    } else {
        (1.0 - 1.259 * a + 0.396 * a * a) / (3.535 * a + 2.181 * a * a)
    }
}

/// Selects one of the microfacet distributions by name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MicrofacetKind {
    Beckmann,
    Blinn,
    TrowbridgeReitz,
}

impl MicrofacetKind {
    /// Returns the distribution singleton.
    pub fn distribution(&self) -> MicrofacetRef {
        match self {
            Self::Beckmann => &BECKMANN,
            Self::Blinn => &BLINN,
            Self::TrowbridgeReitz => &TROWBRIDGE_REITZ,
        }
    }
}

impl Default for MicrofacetKind {
    fn default() -> Self {
        Self::TrowbridgeReitz
    }
}

impl FromStr for MicrofacetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beckmann" => Ok(Self::Beckmann),
            "blinn" => Ok(Self::Blinn),
            "ggx" | "trowbridge-reitz" | "trowbridgereitz" => Ok(Self::TrowbridgeReitz),
            _ => Err(format!("Unknown microfacet distribution '{}'", s)),
        }
    }
}

impl fmt::Display for MicrofacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.distribution().name())
    }
}
