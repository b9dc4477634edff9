//! Trowbridge-Reitz Distribution

use super::*;

/// Anisotropic Trowbridge-Reitz (GGX) distribution.
#[derive(Copy, Clone, Debug, Default)]
pub struct TrowbridgeReitz;

/// The Trowbridge-Reitz singleton.
pub static TROWBRIDGE_REITZ: TrowbridgeReitz = TrowbridgeReitz;

impl MicrofacetDistribution for TrowbridgeReitz {
    fn name(&self) -> &'static str {
        "trowbridge-reitz"
    }

    fn d(&self, h: &Vector3f, alpha_u: Float, alpha_v: Float) -> (Float, Float) {
        if h.z <= 0.0 {
            return (0.0, 0.0);
        }
        let k = sqr(h.x / alpha_u) + sqr(h.y / alpha_v) + h.z * h.z;
        let d = 1.0 / (PI * alpha_u * alpha_v * k * k);
        (d, d * h.z)
    }

    fn sample_h(&self, u: &Point2f, alpha_u: Float, alpha_v: Float) -> Vector3f {
        let phi = sample_phi(u[1], alpha_u, alpha_v);
        let a = inv_alpha2(phi.cos(), phi.sin(), alpha_u, alpha_v);
        let tan_theta2 = u[0] / ((1.0 - u[0]) * a);
        spherical_direction(1.0 / (1.0 + tan_theta2).sqrt(), phi)
    }

    fn lambda(&self, omega: &Vector3f, alpha_u: Float, alpha_v: Float) -> Float {
        let z2 = omega.z * omega.z;
        if z2 == 0.0 {
            return INFINITY;
        }
        let alpha2_tan2 = (sqr(omega.x * alpha_u) + sqr(omega.y * alpha_v)) / z2;
        0.5 * ((1.0 + alpha2_tan2).sqrt() - 1.0)
    }
}
