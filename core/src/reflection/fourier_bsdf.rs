//! Fourier Basis BSDF Model

use super::*;
use crate::interpolation::*;
use bumpalo::Bump;
use std::cell::RefCell;

/// Weights of the luminance, blue and red series in the green channel.
const GREEN_FROM_Y: Float = 1.39829;
const GREEN_FROM_B: Float = -0.100913;
const GREEN_FROM_R: Float = -0.297375;

/// BSDF for measured or layered materials tabulated in a `FourierTable`.
#[derive(Debug)]
pub struct FourierBsdf<'arena> {
    /// The BSDF data, shared by all shading points.
    table: &'arena FourierTable,

    /// Blended coefficients of all channels, allocated once in the arena.
    scratch: RefCell<&'arena mut [Float]>,
}

assert_bsdf_size!(FourierBsdf<'static>);

/// Returns the cosine of the azimuth difference of two directions, or 0
/// when one of them is along the normal.
fn cos_d_phi(a: &Vector3f, b: &Vector3f) -> f64 {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let norm2 = (ax * ax + ay * ay) * (bx * bx + by * by);
    if norm2 > 0.0 {
        ((ax * bx + ay * by) / norm2.sqrt()).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

impl<'arena> FourierBsdf<'arena> {
    /// Create a new `FourierBsdf`.
    ///
    /// * `arena` - The arena holding the coefficient buffer.
    /// * `table` - The BSDF data.
    pub fn new(arena: &'arena Bump, table: &'arena FourierTable) -> Self {
        let size = table.channels() * table.max_length();
        Self {
            table,
            scratch: RefCell::new(arena.alloc_slice_fill_copy(size, 0.0)),
        }
    }

    /// Allocate a new `FourierBsdf` in the arena.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `table` - The BSDF data.
    pub fn alloc(arena: &'arena Bump, table: &'arena FourierTable) -> BxDF<'arena> {
        BxDF::Fourier(arena.alloc(Self::new(arena, table)))
    }

    /// Returns the capabilities supported by the table.
    pub fn caps(&self) -> BsdfCaps {
        self.table.caps()
    }

    /// Converts the evaluated luminance series to a spectrum.
    fn spectrum(&self, ak: &[Float], length: usize, y: Float, cos_phi: f64, mu_out: Float) -> Spectrum {
        let scale = 1.0 / abs(mu_out);
        if self.table.channels() == 1 {
            return Spectrum::new(y * scale);
        }
        let m = self.table.max_length();
        let r = fourier(&ak[m..m + length], cos_phi);
        let b = fourier(&ak[2 * m..2 * m + length], cos_phi);
        let g = GREEN_FROM_Y * y + GREEN_FROM_B * b + GREEN_FROM_R * r;
        (Spectrum::from_rgb([r, g, b]) * scale).max_value(0.0)
    }

    /// Returns the value and density for a pair of directions.
    ///
    /// * `omega_in`  - Direction towards the viewer.
    /// * `omega_out` - Direction towards the light.
    /// * `allowed`   - Capabilities the caller accepts.
    pub fn evaluate(&self, omega_in: &Vector3f, omega_out: &Vector3f, allowed: BsdfCaps) -> BsdfOut {
        if omega_out.z == 0.0 {
            return BsdfOut::default();
        }

        let mu_in = omega_in.z;
        let mu_out = -omega_out.z;
        if !FourierTable::is_allowed(mu_in, mu_out, allowed) {
            return BsdfOut::default();
        }
        let (Some((index_in, weights_in)), Some((index_out, weights_out))) =
            (self.table.find_weights(mu_in), self.table.find_weights(mu_out))
        else {
            return BsdfOut::default();
        };
        let Some((_, norm)) = self.table.cdf_range(index_in, &weights_in, mu_in, allowed) else {
            return BsdfOut::default();
        };
        let pdf_mu_out = self
            .table
            .pdf_mu_out(index_in, &weights_in, index_out, &weights_out, norm);

        let mut ak = self.scratch.borrow_mut();
        let length = self
            .table
            .blend_coefficients(index_in, &weights_in, index_out, &weights_out, &mut ak[..]);
        if length == 0 || ak[0] <= 0.0 {
            return BsdfOut::default();
        }

        let cos_phi = cos_d_phi(omega_in, &-*omega_out);
        let y = max(fourier(&ak[..length], cos_phi), 0.0);
        let pdf_phi = y / (ak[0] * TWO_PI);

        let value = self.spectrum(&ak[..], length, y, cos_phi, mu_out);
        BsdfOut::new(value, max(pdf_mu_out * pdf_phi, 0.0))
    }

    /// Samples the zenith angle from the CDF and the azimuth from the
    /// blended series.
    ///
    /// * `omega_in`          - Direction towards the viewer.
    /// * `u`                 - The 2D uniform random values.
    /// * `_component_sample` - Unused.
    /// * `allowed`           - Capabilities the caller accepts.
    pub fn sample(
        &self,
        omega_in: &Vector3f,
        u: &Point2f,
        _component_sample: Float,
        allowed: BsdfCaps,
    ) -> SampleBsdfOut {
        let mu_in = omega_in.z;
        let Some((index_in, weights_in)) = self.table.find_weights(mu_in) else {
            return SampleBsdfOut::default();
        };
        let Some((mu_out, pdf_mu_out)) = self
            .table
            .sample_mu_out(index_in, &weights_in, mu_in, u[0], allowed)
        else {
            return SampleBsdfOut::default();
        };
        let Some((index_out, weights_out)) = self.table.find_weights(mu_out) else {
            return SampleBsdfOut::default();
        };

        let mut ak = self.scratch.borrow_mut();
        let length = self
            .table
            .blend_coefficients(index_in, &weights_in, index_out, &weights_out, &mut ak[..]);
        if length == 0 || ak[0] <= 0.0 {
            return SampleBsdfOut::default();
        }

        let (phi, y, pdf_phi) = sample_fourier(&ak[..length], u[1] as f64);
        if pdf_phi <= 0.0 {
            return SampleBsdfOut::default();
        }

        // Rotate the incident azimuth by φ; the table stores -ω_out.
        let sin_theta_in = sin_theta(omega_in);
        let (cos_phi_in, sin_phi_in) = if sin_theta_in > 0.0 {
            (omega_in.x / sin_theta_in, omega_in.y / sin_theta_in)
        } else {
            (1.0, 0.0)
        };
        let (cos_phi, sin_phi) = (phi.cos() as Float, phi.sin() as Float);
        let cos_phi_out = cos_phi_in * cos_phi - sin_phi_in * sin_phi;
        let sin_phi_out = cos_phi_in * sin_phi + sin_phi_in * cos_phi;
        let sin_theta_out = max(1.0 - mu_out * mu_out, 0.0).sqrt();
        let omega_out =
            Vector3f::new(-cos_phi_out * sin_theta_out, -sin_phi_out * sin_theta_out, -mu_out).normalize();

        let value = self.spectrum(&ak[..], length, max(y, 0.0), phi.cos(), mu_out);
        let mode = if same_hemisphere(omega_in, &omega_out) {
            BsdfCaps::REFLECTION
        } else {
            BsdfCaps::TRANSMISSION
        };
        SampleBsdfOut::new(omega_out, value, pdf_mu_out * pdf_phi, mode | BsdfCaps::GLOSSY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::testing::*;
    use float_cmp::approx_eq;

    fn direction(theta: Float, phi: Float) -> Vector3f {
        Vector3f::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos())
    }

    #[test]
    fn lambertian_value_and_density() {
        let table = lambertian_table(0.6, 21);
        let arena = Bump::new();
        let bsdf = FourierBsdf::new(&arena, &table);
        let i = direction(0.9, 0.3);
        let o = direction(0.7, 2.0);
        let out = bsdf.evaluate(&i, &o, BsdfCaps::ALL);
        assert!(approx_eq!(f32, out.value[0], 0.6 * INV_PI, epsilon = 1e-4));
        assert!(approx_eq!(f32, out.pdf, o.z * INV_PI, epsilon = 2e-3));
        assert!(bsdf.evaluate(&i, &-o, BsdfCaps::ALL).is_black());
    }

    #[test]
    fn coefficient_buffer_reused() {
        let table = rgb_lambertian_table(0.5, 11);
        let arena = Bump::new();
        let bsdf = FourierBsdf::new(&arena, &table);
        let buffer = bsdf.scratch.borrow().as_ptr();
        assert_eq!(bsdf.scratch.borrow().len(), 3 * table.max_length());
        let (i, o) = (direction(0.9, 0.3), direction(0.7, 2.0));
        let first = bsdf.evaluate(&i, &o, BsdfCaps::ALL);
        for k in 0..100 {
            bsdf.sample(&i, &Point2f::new(0.01 * k as Float, 0.3), 0.5, BsdfCaps::ALL);
        }
        assert_eq!(bsdf.evaluate(&i, &o, BsdfCaps::ALL).value, first.value);
        assert_eq!(bsdf.scratch.borrow().as_ptr(), buffer);
    }

    #[test]
    fn lambertian_albedo() {
        let table = lambertian_table(0.6, 21);
        let arena = Bump::new();
        let bsdf = FourierBsdf::new(&arena, &table);
        let i = direction(0.6, 1.0);
        let a = albedo(10_000, 7, |u, cs| bsdf.sample(&i, u, cs, BsdfCaps::ALL));
        assert!(approx_eq!(f32, a[0], 0.6, epsilon = 1e-2));
    }

    #[test]
    fn sample_matches_evaluate() {
        let table = lambertian_table(0.6, 21);
        let arena = Bump::new();
        let bsdf = FourierBsdf::new(&arena, &table);
        let i = direction(1.1, -0.4);
        let err = max_sample_evaluate_error(
            2_000,
            11,
            |u, cs| bsdf.sample(&i, u, cs, BsdfCaps::ALL),
            |o| bsdf.evaluate(&i, o, BsdfCaps::ALL),
        );
        assert!(err < 1e-2, "{}", err);
    }

    #[test]
    fn sampled_directions_reflect() {
        let table = lambertian_table(0.6, 21);
        let arena = Bump::new();
        let bsdf = FourierBsdf::new(&arena, &table);
        let i = direction(0.4, 0.0);
        let s = bsdf.sample(&i, &Point2f::new(0.3, 0.8), 0.5, BsdfCaps::ALL);
        assert!(s.is_valid());
        assert!(s.omega_out.z > 0.0);
        assert_eq!(s.used_caps, BsdfCaps::REFLECTION | BsdfCaps::GLOSSY);
        assert!(approx_eq!(f32, s.omega_out.length(), 1.0, epsilon = 1e-5));
        let fail = bsdf.sample(&i, &Point2f::new(0.3, 0.8), 0.5, BsdfCaps::ALL_TRANSMISSION);
        assert!(!fail.is_valid());
    }

    #[test]
    fn grey_rgb_table() {
        let table = rgb_lambertian_table(0.5, 11);
        let arena = Bump::new();
        let bsdf = FourierBsdf::new(&arena, &table);
        let i = direction(0.5, 0.0);
        let o = direction(0.5, 3.0);
        let v = bsdf.evaluate(&i, &o, BsdfCaps::ALL).value;
        assert!(approx_eq!(f32, v[0], 0.5 * INV_PI, epsilon = 1e-4));
        assert!(approx_eq!(f32, v[1], 0.5 * INV_PI, epsilon = 1e-4));
        assert!(approx_eq!(f32, v[2], 0.5 * INV_PI, epsilon = 1e-4));
    }

    #[test]
    fn azimuth_difference() {
        let a = Vector3f::new(1.0, 0.0, 0.5);
        let b = Vector3f::new(0.0, 2.0, 0.1);
        assert!(approx_eq!(f64, cos_d_phi(&a, &b), 0.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, cos_d_phi(&a, &a), 1.0, epsilon = 1e-12));
        assert_eq!(cos_d_phi(&a, &Vector3f::new(0.0, 0.0, 1.0)), 0.0);
    }
}
