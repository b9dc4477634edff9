//! Interpolation Functions

use crate::pbrt::*;

/// Tangents of the Catmull-Rom segment `[i, i + 1]` scaled to the segment
/// width. The ends of the spline use the one-sided secant.
///
/// * `x`      - Interpolation nodes.
/// * `values` - Value of the function at each node.
/// * `i`      - Index of the segment.
#[inline]
fn segment_tangents<F>(x: &[Float], values: F, i: usize) -> (Float, Float)
where
    F: Fn(usize) -> Float,
{
    let n = x.len();
    let (f0, f1) = (values(i), values(i + 1));
    let width = x[i + 1] - x[i];
    let d0 = if i > 0 {
        width * (f1 - values(i - 1)) / (x[i + 1] - x[i - 1])
    } else {
        f1 - f0
    };
    let d1 = if i + 2 < n {
        width * (values(i + 2) - f0) / (x[i + 2] - x[i])
    } else {
        f1 - f0
    };
    (d0, d1)
}

/// Interpolate the Catmull-Rom spline. Returns 0 outside the nodes.
///
/// * `nodes`  - Interpolation nodes.
/// * `values` - Value of the function.
/// * `x`      - Variable to interpolate.
pub fn catmull_rom(nodes: &[Float], values: &[Float], x: Float) -> Float {
    match catmull_rom_weights(nodes, x) {
        Some((index, weights)) => weights
            .iter()
            .enumerate()
            .filter_map(|(k, w)| node_index(index, k, nodes.len()).map(|j| w * values[j]))
            .sum(),
        None => 0.0,
    }
}

/// Maps weight `k` of the segment starting at `index` to a node index.
/// Weight `k` belongs to node `index + k - 1`; the ones off the ends of the
/// spline have no node.
///
/// * `index` - Index of the segment.
/// * `k`     - Weight index in [0, 3].
/// * `size`  - Number of nodes.
#[inline]
pub fn node_index(index: usize, k: usize, size: usize) -> Option<usize> {
    (index + k).checked_sub(1).filter(|j| *j < size)
}

/// Returns the index of the segment containing `x` and the four Catmull-Rom
/// weights of nodes `index - 1 ..= index + 2`. Values equal to the last node
/// use the last segment. Returns `None` outside the nodes.
///
/// * `nodes` - Interpolation nodes in increasing order.
/// * `x`     - Variable to interpolate.
pub fn catmull_rom_weights(nodes: &[Float], x: Float) -> Option<(usize, [Float; 4])> {
    let size = nodes.len();
    if size < 2 || !(x >= nodes[0] && x <= nodes[size - 1]) {
        return None;
    }

    let idx = find_interval(size, |i| nodes[i] <= x);
    let (x0, x1) = (nodes[idx], nodes[idx + 1]);
    let t = (x - x0) / (x1 - x0);
    let (t2, t3) = (t * t, t * t * t);

    // Cubic Hermite basis. The tangent terms are spread onto the neighbouring
    // nodes, or onto the segment ends at the borders of the spline.
    let mut weights = [0.0, 2.0 * t3 - 3.0 * t2 + 1.0, 3.0 * t2 - 2.0 * t3, 0.0];

    let h0 = t3 - 2.0 * t2 + t;
    if idx > 0 {
        let w = h0 * (x1 - x0) / (x1 - nodes[idx - 1]);
        weights[0] -= w;
        weights[2] += w;
    } else {
        weights[1] -= h0;
        weights[2] += h0;
    }

    let h1 = t3 - t2;
    if idx + 2 < size {
        let w = h1 * (x1 - x0) / (nodes[idx + 2] - x0);
        weights[1] -= w;
        weights[3] += w;
    } else {
        weights[1] -= h1;
        weights[2] += h1;
    }

    Some((idx, weights))
}

/// Integrates the Catmull-Rom spline through `values`. Returns the running
/// integral at each node and the total.
///
/// * `x`      - Interpolation nodes.
/// * `values` - Value of the function.
pub fn integrate_catmull_rom(x: &[Float], values: &[Float]) -> (Vec<Float>, Float) {
    let n = x.len();
    let mut sum = 0.0;
    let mut cdf = vec![0.0; n];

    for i in 0..n.saturating_sub(1) {
        let (d0, d1) = segment_tangents(x, |j| values[j], i);
        sum += ((d0 - d1) * (1.0 / 12.0) + (values[i] + values[i + 1]) * 0.5) * (x[i + 1] - x[i]);
        cdf[i + 1] = sum;
    }

    (cdf, sum)
}

/// Estimates the slope of tabulated values at node `j` from the parabola
/// through three neighbouring nodes. Two nodes give the secant.
///
/// * `x`      - Interpolation nodes, at least 2.
/// * `values` - Value of the function at each node.
/// * `j`      - Index of the node.
pub fn node_slope(x: &[Float], values: &[Float], j: usize) -> Float {
    let n = x.len();
    if n < 3 {
        return (values[1] - values[0]) / (x[1] - x[0]);
    }
    let k = min(j.saturating_sub(1), n - 3);
    let (x0, x1, x2) = (x[k], x[k + 1], x[k + 2]);
    let t = x[j];
    values[k] * (2.0 * t - x1 - x2) / ((x0 - x1) * (x0 - x2))
        + values[k + 1] * (2.0 * t - x0 - x2) / ((x1 - x0) * (x1 - x2))
        + values[k + 2] * (2.0 * t - x0 - x1) / ((x2 - x0) * (x2 - x1))
}

/// Inverts the integral of one Catmull-Rom segment. Returns the parameter
/// `t` in [0, 1] where the integral reaches `target` and the spline value at
/// `t`.
///
/// * `x`      - Interpolation nodes.
/// * `values` - Value of the function at each node.
/// * `i`      - Index of the segment.
/// * `target` - Integral over the segment in units of `t`.
#[allow(non_snake_case)]
pub fn invert_catmull_rom_segment<F>(x: &[Float], values: F, i: usize, target: Float) -> (Float, Float)
where
    F: Fn(usize) -> Float,
{
    const TOLERANCE: Float = 1e-6;

    let (f0, f1) = (values(i), values(i + 1));
    let (d0, d1) = segment_tangents(x, &values, i);
    let df = f1 - f0;

    // fhat(t) = ((A t + B) t + C) t + D and its integral Fhat(t).
    let a = 2.0 * (f0 - f1) + d0 + d1;
    let b = 3.0 * df - 2.0 * d0 - d1;
    let c = d0;
    let d = f0;
    let a_4 = (f0 - f1) * 0.5 + (d0 + d1) * 0.25;
    let b_3 = df + (-2.0 * d0 - d1) / 3.0;
    let c_2 = d0 * 0.5;

    // First guess assumes a linear spline.
    let mut t = if df != 0.0 {
        ((max(f0 * f0 + 2.0 * df * target, 0.0)).sqrt() - f0) / df
    } else if f0 != 0.0 {
        target / f0
    } else {
        0.5
    };

    let mut begin: Float = 0.0;
    let mut end: Float = 1.0;
    loop {
        if !(t >= begin && t <= end) {
            t = 0.5 * (begin + end);
        }
        let fhat = ((a * t + b) * t + c) * t + d;
        let F = (((a_4 * t + b_3) * t + c_2) * t + d) * t - target;
        if abs(F) < TOLERANCE || end - begin < TOLERANCE {
            return (t, fhat);
        }
        if F < 0.0 {
            begin = t;
        } else {
            end = t;
        }
        t -= F / fhat;
    }
}

/// Yields `(cos kφ, sin kφ)` for `k = 0, 1, 2, ...` using the Chebyshev
/// recurrence, so no trigonometric function is evaluated per term.
struct Harmonics {
    cos_phi: f64,
    cos: [f64; 2],
    sin: [f64; 2],
}

impl Harmonics {
    fn new(cos_phi: f64, sin_phi: f64) -> Self {
        Self {
            cos_phi,
            cos: [cos_phi, 1.0],
            sin: [-sin_phi, 0.0],
        }
    }
}

impl Iterator for Harmonics {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let [c0, c1] = self.cos;
        let [s0, s1] = self.sin;
        self.cos = [c1, 2.0 * self.cos_phi * c1 - c0];
        self.sin = [s1, 2.0 * self.cos_phi * s1 - s0];
        Some((c1, s1))
    }
}

/// Evaluates the cosine series `Σ a_k cos(k φ)`.
///
/// * `a`       - The Fourier coefficients.
/// * `cos_phi` - Cosine of the azimuth difference.
pub fn fourier(a: &[Float], cos_phi: f64) -> Float {
    a.iter()
        .zip(Harmonics::new(cos_phi, 0.0))
        .map(|(ak, (cos_k, _))| *ak as f64 * cos_k)
        .sum::<f64>() as Float
}

/// Samples the azimuth from a cosine series by inverting its integral over
/// [0, π], mirroring samples >= 0.5 into [π, 2π]. Returns φ, the series value
/// at φ and the density of φ.
///
/// * `ak` - The Fourier coefficients. `ak[0]` must be positive.
/// * `u`  - Uniform random variate ξ.
pub fn sample_fourier(ak: &[Float], u: f64) -> (f64, Float, Float) {
    const TOLERANCE: f64 = 1e-6;
    let pi = std::f64::consts::PI;

    let mirrored = u >= 0.5;
    let u = if mirrored { 2.0 * (1.0 - u) } else { 2.0 * u };

    // Integral of the series over [0, 2π].
    let total = 2.0 * pi * ak[0] as f64;
    let target = 0.5 * u * total;

    let (mut low, mut high) = (0.0, pi);
    let mut phi = 0.5 * pi;
    loop {
        let cos_phi = phi.cos();
        let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();

        // Running integral and value of the series at phi.
        let (mut integral, mut value) = (-target, 0.0);
        for (k, (a, (cos_k, sin_k))) in ak.iter().zip(Harmonics::new(cos_phi, sin_phi)).enumerate() {
            let a = *a as f64;
            integral += if k == 0 { a * phi } else { a * sin_k / k as f64 };
            value += a * cos_k;
        }

        if integral <= 0.0 {
            low = phi;
        } else {
            high = phi;
        }
        if integral.abs() < TOLERANCE || high - low < TOLERANCE {
            let phi = if mirrored { 2.0 * pi - phi } else { phi };
            return (phi, value as Float, (value / total) as Float);
        }

        // Newton step, bisecting when it leaves the bracket.
        phi -= integral / value;
        if !(phi > low && phi < high) {
            phi = 0.5 * (low + high);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    const NODES: [Float; 5] = [-1.0, -0.4, 0.0, 0.3, 1.0];

    #[test]
    fn weights_reproduce_linear_functions() {
        let values: Vec<Float> = NODES.iter().map(|x| 2.0 * x + 1.0).collect();
        for x in [-0.9, -0.2, 0.1, 0.65] {
            assert!(approx_eq!(f32, catmull_rom(&NODES, &values, x), 2.0 * x + 1.0, epsilon = 1e-5));
        }
    }

    #[test]
    fn last_node_uses_last_segment() {
        let (index, weights) = catmull_rom_weights(&NODES, 1.0).unwrap();
        assert_eq!(index, 3);
        assert!(approx_eq!(f32, weights[2], 1.0, epsilon = 1e-6));
        assert!(catmull_rom_weights(&NODES, 1.01).is_none());
        assert!(catmull_rom_weights(&NODES, -1.01).is_none());
    }

    #[test]
    fn node_index_skips_ends() {
        assert_eq!(node_index(0, 0, 5), None);
        assert_eq!(node_index(0, 1, 5), Some(0));
        assert_eq!(node_index(3, 3, 5), None);
    }

    #[test]
    fn integral_of_linear_function() {
        let values: Vec<Float> = NODES.iter().map(|x| x + 1.0).collect();
        let (cdf, total) = integrate_catmull_rom(&NODES, &values);
        assert!(approx_eq!(f32, total, 2.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, cdf[2], 0.5, epsilon = 1e-5));
    }

    #[test]
    fn slope_of_quadratic_is_exact() {
        let x = [-1.0, -0.25, 0.5, 1.0];
        let values: Vec<Float> = x.iter().map(|t| 3.0 * t * t - t).collect();
        for (j, t) in x.iter().enumerate() {
            assert!(approx_eq!(f32, node_slope(&x, &values, j), 6.0 * t - 1.0, epsilon = 1e-4));
        }
        assert_eq!(node_slope(&[0.0, 2.0], &[1.0, 2.0], 1), 0.5);
    }

    #[test]
    fn fourier_series() {
        let a = [1.0, 0.5, 0.25];
        let phi: f64 = 0.7;
        let expected = 1.0 + 0.5 * phi.cos() + 0.25 * (2.0 * phi).cos();
        assert!(approx_eq!(f32, fourier(&a, phi.cos()), expected as f32, epsilon = 1e-6));
    }

    #[test]
    fn uniform_azimuth() {
        let (phi, f, pdf) = sample_fourier(&[0.3], 0.25);
        assert!(approx_eq!(f64, phi, std::f64::consts::FRAC_PI_2, epsilon = 1e-5));
        assert!(approx_eq!(f32, f, 0.3, epsilon = 1e-6));
        assert!(approx_eq!(f32, pdf, INV_TWO_PI, epsilon = 1e-6));
    }

    proptest! {
        #[test]
        fn inverted_segment_hits_target(u in 0.0..1.0f32) {
            let values = [0.2, 0.5, 0.9, 0.4, 0.1];
            let (cdf, _) = integrate_catmull_rom(&NODES, &values);
            let i = 1;
            let width = NODES[i + 1] - NODES[i];
            let target = u * (cdf[i + 1] - cdf[i]) / width;
            let (t, fhat) = invert_catmull_rom_segment(&NODES, |j| values[j], i, target);
            prop_assert!((0.0..=1.0).contains(&t));
            let x = NODES[i] + t * width;
            prop_assert!((fhat - catmull_rom(&NODES, &values, x)).abs() < 1e-4);
        }

        #[test]
        fn sampled_azimuth_density(u in 0.0..1.0f64) {
            let a = [1.0, 0.6, 0.2];
            let (phi, f, pdf) = sample_fourier(&a, u);
            prop_assert!((0.0..=2.0 * std::f64::consts::PI).contains(&phi));
            prop_assert!((f - fourier(&a, phi.cos())).abs() < 1e-4);
            prop_assert!((pdf - f / (2.0 * PI)).abs() < 1e-4);
        }
    }
}
