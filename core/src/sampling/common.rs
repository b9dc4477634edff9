//! Warping of uniform samples onto directions.

use crate::geometry::*;
use crate::pbrt::*;

/// Maps a uniform sample to a direction uniformly distributed over the unit
/// sphere.
///
/// * `u` - Uniform sample in `[0, 1)^2`.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let cos_theta = 1.0 - 2.0 * u.x;
    let sin_theta = safe_sqrt(1.0 - sqr(cos_theta));
    let (sin_phi, cos_phi) = (TWO_PI * u.y).sin_cos();
    Vector3f::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
}

/// Solid angle density of `uniform_sample_sphere`.
#[inline]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Maps a uniform sample onto the unit disk with Shirley's concentric
/// mapping, which keeps neighbouring samples close.
///
/// * `u` - Uniform sample in `[0, 1)^2`.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    let offset = *u * 2.0 - Point2f::new(1.0, 1.0);
    let (a, b) = (offset[0], offset[1]);
    if a == 0.0 && b == 0.0 {
        return Point2f::zero();
    }

    let (radius, phi) = if abs(a) > abs(b) {
        (a, PI_OVER_FOUR * (b / a))
    } else {
        (b, PI_OVER_TWO - PI_OVER_FOUR * (a / b))
    };
    let (sin_phi, cos_phi) = phi.sin_cos();
    Point2f::new(radius * cos_phi, radius * sin_phi)
}

/// Maps a uniform sample to a cosine distributed direction around `+z` by
/// lifting a disk sample onto the hemisphere.
///
/// * `u` - Uniform sample in `[0, 1)^2`.
#[inline]
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    Vector3f::new(d.x, d.y, safe_sqrt(1.0 - sqr(d.x) - sqr(d.y)))
}

/// Solid angle density of `cosine_sample_hemisphere`.
///
/// * `cos_theta` - Cosine of the angle with `+z`.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}
