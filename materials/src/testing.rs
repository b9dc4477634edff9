//! Monte Carlo helpers shared by the shader tests.

use super::*;
use bsdf_core::rng::RNG;

/// Returns a unit direction from spherical coordinates.
pub fn direction(theta: Float, phi: Float) -> Vector3f {
    Vector3f::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos())
}

/// Builds the Bsdf of a shader on the default shading context, as a
/// renderer would: the context is shaded first.
pub fn shade<'a>(shader: &'a dyn Shader, arena: &'a Bump) -> &'a Bsdf<'a> {
    let sample = Sample::default();
    let mut ctx = ShadingContext::default();
    shader.shade_context(&sample, &mut ctx);
    shader.bsdf(arena, &sample, &ctx)
}

/// Estimates the directional albedo of a Bsdf by importance sampling.
///
/// * `bsdf`     - The Bsdf.
/// * `omega_in` - Local direction towards the viewer.
/// * `n`        - Number of samples.
/// * `seed`     - Random stream.
pub fn albedo(bsdf: &Bsdf<'_>, omega_in: &Vector3f, n: usize, seed: u64) -> Spectrum {
    let mut rng = RNG::new(seed);
    let mut sum = Spectrum::ZERO;
    for _ in 0..n {
        let u = rng.uniform_point2();
        let cs = rng.uniform_float();
        let s = bsdf.sample(omega_in, &u, cs, BsdfCaps::ALL);
        if s.is_valid() {
            sum += s.value * abs_cos_theta(&s.omega_out) / s.pdf;
        }
    }
    sum / n as Float
}

/// Samples `n` directions and compares each non-specular sample with the
/// evaluation of the same direction. Returns the largest relative error of
/// the density and the value.
///
/// * `bsdf`     - The Bsdf.
/// * `omega_in` - Local direction towards the viewer.
/// * `n`        - Number of samples.
/// * `seed`     - Random stream.
pub fn max_sample_evaluate_error(bsdf: &Bsdf<'_>, omega_in: &Vector3f, n: usize, seed: u64) -> Float {
    let mut rng = RNG::new(seed);
    let mut worst: Float = 0.0;
    for _ in 0..n {
        let u = rng.uniform_point2();
        let cs = rng.uniform_float();
        let s = bsdf.sample(omega_in, &u, cs, BsdfCaps::ALL);
        if !s.is_valid() || s.used_caps.contains(BsdfCaps::SPECULAR) {
            continue;
        }
        let e = bsdf.evaluate(omega_in, &s.omega_out, BsdfCaps::ALL);
        let rel = |a: Float, b: Float| abs(a - b) / max(max(abs(a), abs(b)), 1e-3);
        worst = max(worst, rel(e.pdf, s.pdf));
        worst = max(worst, rel(e.value.average(), s.value.average()));
    }
    worst
}

/// Asserts that sampled values are non-negative and that reflective shaders
/// never sample below the surface.
///
/// * `bsdf`     - The Bsdf.
/// * `omega_in` - Local direction towards the viewer.
/// * `n`        - Number of samples.
pub fn check_samples(bsdf: &Bsdf<'_>, omega_in: &Vector3f, n: usize) {
    let mut rng = RNG::new(3);
    let reflective_only = !bsdf.caps().contains(BsdfCaps::TRANSMISSION);
    for _ in 0..n {
        let u = rng.uniform_point2();
        let cs = rng.uniform_float();
        let s = bsdf.sample(omega_in, &u, cs, BsdfCaps::ALL);
        if !s.is_valid() {
            continue;
        }
        assert!(s.value.min_component_value() >= 0.0, "{}", s.value);
        assert!(s.pdf > 0.0 && s.pdf.is_finite());
        assert!(compatible_caps(bsdf.caps(), s.used_caps), "{:?}", s.used_caps);
        if reflective_only {
            assert!(s.omega_out.z * omega_in.z >= 0.0, "{:?}", s.omega_out);
        }
    }
}
