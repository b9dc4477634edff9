//! Common

use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;

/// Lower bound of refractive indices and absorption coefficients.
pub const MIN_INDEX: Float = 1e-9;

/// Returns the cosine of the angle θ measured from the normal in the local
/// shading frame.
///
/// * `w` - The direction vector.
#[inline(always)]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

/// Returns the absolute value of cos(θ).
///
/// * `w` - The direction vector.
#[inline(always)]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    abs(w.z)
}

/// Returns sin^2(θ).
///
/// * `w` - The direction vector.
#[inline(always)]
pub fn sin_2_theta(w: &Vector3f) -> Float {
    max(0.0, 1.0 - w.z * w.z)
}

/// Returns sin(θ).
///
/// * `w` - The direction vector.
#[inline(always)]
pub fn sin_theta(w: &Vector3f) -> Float {
    sin_2_theta(w).sqrt()
}

/// Returns cos(φ) and sin(φ) of the azimuth of a direction. A direction on
/// the normal yields φ = 0.
///
/// * `w` - The direction vector.
#[inline]
pub fn cos_sin_phi(w: &Vector3f) -> (Float, Float) {
    let r = (w.x * w.x + w.y * w.y).sqrt();
    if r == 0.0 {
        (1.0, 0.0)
    } else {
        (clamp(w.x / r, -1.0, 1.0), clamp(w.y / r, -1.0, 1.0))
    }
}

/// Returns true if both directions are on the same side of the local
/// surface.
///
/// * `a` - First direction.
/// * `b` - Second direction.
#[inline(always)]
pub fn same_hemisphere(a: &Vector3f, b: &Vector3f) -> bool {
    a.z * b.z > 0.0
}

/// Returns the mirror reflection of a direction about the local normal.
///
/// * `w` - The direction vector.
#[inline(always)]
pub fn reflect(w: &Vector3f) -> Vector3f {
    Vector3f::new(-w.x, -w.y, w.z)
}

/// Mirrors a direction through the local surface plane.
///
/// * `w` - The direction vector.
#[inline(always)]
pub fn flip_z(w: &Vector3f) -> Vector3f {
    Vector3f::new(w.x, w.y, -w.z)
}

/// Returns the mirror reflection of a direction about a half vector.
///
/// * `w` - The direction vector.
/// * `h` - Unit half vector.
#[inline(always)]
pub fn reflect_about(w: &Vector3f, h: &Vector3f) -> Vector3f {
    2.0 * w.dot(h) * *h - *w
}

/// Unpolarised Fresnel reflectance of a dielectric interface.
///
/// * `cos_i` - Cosine on the incident side (non-negative).
/// * `cos_t` - Cosine on the transmitted side (non-negative).
/// * `ior_i` - Refractive index on the incident side.
/// * `ior_t` - Refractive index on the transmitted side.
pub fn fresnel_dielectric(cos_i: Float, cos_t: Float, ior_i: Float, ior_t: Float) -> Float {
    let r_orth = (ior_i * cos_i - ior_t * cos_t) / (ior_i * cos_i + ior_t * cos_t);
    let r_par = (ior_t * cos_i - ior_i * cos_t) / (ior_t * cos_i + ior_i * cos_t);
    let r = 0.5 * (r_orth * r_orth + r_par * r_par);
    if r.is_finite() {
        r
    } else {
        1.0
    }
}

/// Unpolarised Fresnel reflectance of a conductor with complex refractive
/// index η + iκ, evaluated per channel.
///
/// * `cos_i` - Cosine of the incident angle.
/// * `eta`   - Real part of the refractive index.
/// * `kappa` - Absorption coefficient.
pub fn fresnel_conductor(cos_i: Float, eta: &Spectrum, kappa: &Spectrum) -> Spectrum {
    let cos_i2 = cos_i * cos_i;
    let a = *eta * *eta + *kappa * *kappa;
    let b = *eta * (2.0 * cos_i);

    let a_orth = a + Spectrum::new(cos_i2);
    let a_par = a * cos_i2 + Spectrum::ONE;

    let r_orth2 = (a_orth - b) / (a_orth + b);
    let r_par2 = (a_par - b) / (a_par + b);
    (r_orth2 + r_par2) * 0.5
}

/// Refracts a direction through the local interface. Returns the
/// transmitted direction and its absolute cosine, or `None` on total internal
/// reflection.
///
/// * `w`   - The incident direction (pointing away from the surface).
/// * `ior` - Ratio of the incident over the transmitted refractive index.
pub fn refract(w: &Vector3f, ior: Float) -> Option<(Vector3f, Float)> {
    let cos_i = abs_cos_theta(w);
    let sin_t2 = ior * ior * (1.0 - cos_i * cos_i);
    if sin_t2 >= 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin_t2).sqrt();
    let z = if w.z > 0.0 { -cos_t } else { cos_t };
    Some((Vector3f::new(-ior * w.x, -ior * w.y, z), cos_t))
}
