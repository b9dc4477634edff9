//! Monte Carlo helpers shared by the lobe model tests.

use super::*;
use crate::rng::RNG;

/// Estimates the directional albedo `∫ f |cos| dω` by importance sampling.
///
/// * `n`      - Number of samples.
/// * `seed`   - Random stream.
/// * `sample` - Samples one direction from a 2D sample and a component sample.
pub fn albedo<F>(n: usize, seed: u64, sample: F) -> Spectrum
where
    F: Fn(&Point2f, Float) -> SampleBsdfOut,
{
    let mut rng = RNG::new(seed);
    let mut sum = Spectrum::ZERO;
    for _ in 0..n {
        let u = rng.uniform_point2();
        let cs = rng.uniform_float();
        let s = sample(&u, cs);
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
/// * `n`        - Number of samples.
/// * `seed`     - Random stream.
/// * `sample`   - Samples one direction.
/// * `evaluate` - Evaluates a direction.
pub fn max_sample_evaluate_error<F, G>(n: usize, seed: u64, sample: F, evaluate: G) -> Float
where
    F: Fn(&Point2f, Float) -> SampleBsdfOut,
    G: Fn(&Vector3f) -> BsdfOut,
{
    let mut rng = RNG::new(seed);
    let mut worst: Float = 0.0;
    for _ in 0..n {
        let u = rng.uniform_point2();
        let cs = rng.uniform_float();
        let s = sample(&u, cs);
        if !s.is_valid() || s.used_caps.contains(BsdfCaps::SPECULAR) {
            continue;
        }
        let e = evaluate(&s.omega_out);
        let rel = |a: Float, b: Float| abs(a - b) / max(max(abs(a), abs(b)), 1e-3);
        worst = max(worst, rel(e.pdf, s.pdf));
        worst = max(worst, rel(e.value.average(), s.value.average()));
    }
    worst
}

/// Builds a table of a Lambertian reflector with an isotropic series on
/// `n` uniformly spaced nodes. The CDF is the exact integral of the spline.
///
/// * `reflectance` - Reflectance of the surface.
/// * `n`           - Number of nodes, odd so that 0 is a node.
/// * `channels`    - Number of channels, each with the same series.
fn lambertian_series(reflectance: Float, n: usize, channels: usize) -> FourierTable {
    let nodes: Vec<Float> = (0..n).map(|i| -1.0 + 2.0 * i as Float / (n - 1) as Float).collect();
    let mut cdf = Vec::with_capacity(n * n);
    let mut offsets = Vec::with_capacity(n * n);
    let mut lengths = Vec::with_capacity(n * n);
    let mut coefficients = Vec::new();
    for mu_in in &nodes {
        let a0: Vec<Float> = nodes
            .iter()
            .map(|mu_out| {
                if mu_in * mu_out < 0.0 {
                    reflectance * abs(*mu_out) * INV_PI
                } else {
                    0.0
                }
            })
            .collect();
        let (row, _) = crate::interpolation::integrate_catmull_rom(&nodes, &a0);
        cdf.extend(row);
        for a in a0 {
            offsets.push(coefficients.len());
            if a > 0.0 {
                lengths.push(1);
                coefficients.extend(std::iter::repeat(a).take(channels));
            } else {
                lengths.push(0);
            }
        }
    }
    FourierTable::new(nodes, cdf, offsets, lengths, coefficients, channels).unwrap()
}

/// Monochromatic Lambertian table.
pub fn lambertian_table(reflectance: Float, n: usize) -> FourierTable {
    lambertian_series(reflectance, n, 1)
}

/// Grey Lambertian table with luminance, red and blue series.
pub fn rgb_lambertian_table(reflectance: Float, n: usize) -> FourierTable {
    lambertian_series(reflectance, n, 3)
}
