//! Beckmann Distribution

use super::*;

/// Anisotropic Beckmann distribution of microfacet slopes.
#[derive(Copy, Clone, Debug, Default)]
pub struct Beckmann;

/// The Beckmann singleton.
pub static BECKMANN: Beckmann = Beckmann;

impl MicrofacetDistribution for Beckmann {
    fn name(&self) -> &'static str {
        "beckmann"
    }

    fn d(&self, h: &Vector3f, alpha_u: Float, alpha_v: Float) -> (Float, Float) {
        let cos_theta2 = h.z * h.z;
        if h.z <= 0.0 || cos_theta2 == 0.0 {
            return (0.0, 0.0);
        }
        let d = (-(sqr(h.x / alpha_u) + sqr(h.y / alpha_v)) / cos_theta2).exp()
            / (PI * alpha_u * alpha_v * cos_theta2 * cos_theta2);
        (d, d * h.z)
    }

    fn sample_h(&self, u: &Point2f, alpha_u: Float, alpha_v: Float) -> Vector3f {
        let s = -(1.0 - u[0]).ln();
        let phi = sample_phi(u[1], alpha_u, alpha_v);
        let tan_theta2 = s / inv_alpha2(phi.cos(), phi.sin(), alpha_u, alpha_v);
        spherical_direction(1.0 / (1.0 + tan_theta2).sqrt(), phi)
    }

    fn lambda(&self, omega: &Vector3f, alpha_u: Float, alpha_v: Float) -> Float {
        beckmann_lambda(omega, alpha_u, alpha_v)
    }
}
