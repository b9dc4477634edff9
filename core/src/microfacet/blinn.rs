//! Blinn Distribution

use super::*;

/// Anisotropic Blinn-Phong distribution. The Phong exponent `2 / alpha^2 - 2`
/// follows the azimuth of the half vector.
#[derive(Copy, Clone, Debug, Default)]
pub struct Blinn;

/// The Blinn singleton.
pub static BLINN: Blinn = Blinn;

impl MicrofacetDistribution for Blinn {
    fn name(&self) -> &'static str {
        "blinn"
    }

    fn d(&self, h: &Vector3f, alpha_u: Float, alpha_v: Float) -> (Float, Float) {
        if h.z <= 0.0 {
            return (0.0, 0.0);
        }
        let sin_theta2 = max(1.0 - h.z * h.z, 0.0);
        let a = if sin_theta2 > 0.0 {
            (sqr(h.x / alpha_u) + sqr(h.y / alpha_v)) / sin_theta2
        } else {
            0.5 / sqr(alpha_u) + 0.5 / sqr(alpha_v)
        };
        let d = h.z.powf(2.0 * a - 2.0) / (PI * alpha_u * alpha_v);
        (d, d * h.z)
    }

    fn sample_h(&self, u: &Point2f, alpha_u: Float, alpha_v: Float) -> Vector3f {
        let phi = sample_phi(u[1], alpha_u, alpha_v);
        let a = inv_alpha2(phi.cos(), phi.sin(), alpha_u, alpha_v);
        spherical_direction((1.0 - u[0]).powf(1.0 / (2.0 * a)), phi)
    }

    fn lambda(&self, omega: &Vector3f, alpha_u: Float, alpha_v: Float) -> Float {
        beckmann_lambda(omega, alpha_u, alpha_v)
    }
}
