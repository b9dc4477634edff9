//! Fourier BSDF Table

use super::*;
use crate::interpolation::*;

/// Tabulated scattering data in the Fourier basis of Jakob et al.: for every
/// pair of zenith cosines `(μin, μout)` on a shared node grid it stores a
/// cosine series over the azimuth difference. Multi-channel tables store the
/// luminance series followed by the red and blue series.
///
/// The top side of the interface is `μin > 0`. Directions are stored with
/// `μout = -ω_out.z`, so reflection on the top side maps to `μout < 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct FourierTable {
    /// Zenith angle cosines in increasing order.
    nodes: Vec<Float>,

    /// For every `μin` node, the running integral of `a0` over `μout`.
    cdf: Vec<Float>,

    /// Offsets of the series of each pair into `coefficients`.
    offsets: Vec<usize>,

    /// Order of the series of each pair.
    lengths: Vec<usize>,

    /// Series coefficients of all pairs.
    coefficients: Vec<Float>,

    /// Number of channels. 1 is monochromatic, 3 is luminance, red and blue.
    channels: usize,

    /// Relative index of refraction of the interface.
    eta: Float,

    /// Roughness the table was generated with.
    alpha: [Float; 2],

    /// Index of the node interval containing `μ = 0`.
    node_zero: usize,

    /// Largest series order.
    max_length: usize,

    /// Capabilities supported by the data.
    caps: BsdfCaps,
}

impl FourierTable {
    /// Create a new `FourierTable` after validating the data.
    ///
    /// * `nodes`        - Zenith angle cosines in increasing order.
    /// * `cdf`          - Running integral of `a0` for each pair, `nodes²` values.
    /// * `offsets`      - Offset of each pair's series, `nodes²` values.
    /// * `lengths`      - Order of each pair's series, `nodes²` values.
    /// * `coefficients` - All series coefficients.
    /// * `channels`     - Number of channels, 1 or 3.
    pub fn new(
        nodes: Vec<Float>,
        cdf: Vec<Float>,
        offsets: Vec<usize>,
        lengths: Vec<usize>,
        coefficients: Vec<Float>,
        channels: usize,
    ) -> Result<Self, String> {
        if channels != 1 && channels != 3 {
            return Err(format!("Number of channels must be 1 or 3, got {}", channels));
        }

        let n = nodes.len();
        if n < 2 {
            return Err(format!("Number of nodes must be at least 2, got {}", n));
        }
        if nodes.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(String::from("Nodes must be increasing"));
        }
        if cdf.len() != n * n {
            return Err(format!("Size of CDF must be square of number of nodes, got {}", cdf.len()));
        }
        if offsets.len() != n * n {
            return Err(format!(
                "Number of offsets must be square of number of nodes, got {}",
                offsets.len()
            ));
        }
        if lengths.len() != n * n {
            return Err(format!(
                "Number of lengths must be square of number of nodes, got {}",
                lengths.len()
            ));
        }

        let mut max_length = 0;
        for i in 0..n * n {
            let end = offsets[i] + channels * lengths[i];
            if end > coefficients.len() {
                return Err(format!(
                    "Series {} ends at {} beyond {} coefficients",
                    i,
                    end,
                    coefficients.len()
                ));
            }
            if i + 1 < n * n && offsets[i + 1] < end {
                return Err(format!("Series {} overlaps with the next one", i));
            }
            max_length = max(max_length, lengths[i]);
        }

        let node_zero = find_interval(n, |i| nodes[i] <= 0.0);

        let mut table = Self {
            nodes,
            cdf,
            offsets,
            lengths,
            coefficients,
            channels,
            eta: 1.0,
            alpha: [0.0; 2],
            node_zero,
            max_length,
            caps: BsdfCaps::GLOSSY,
        };
        table.caps = table.derive_caps();
        Ok(table)
    }

    /// Sets the header metadata.
    ///
    /// * `eta`   - Relative index of refraction.
    /// * `alpha` - Roughness the table was generated with.
    pub fn with_metadata(mut self, eta: Float, alpha: [Float; 2]) -> Self {
        self.eta = eta;
        self.alpha = alpha;
        self
    }

    /// Reflection and transmission are supported when the CDF grows on the
    /// corresponding side of the zero node.
    fn derive_caps(&self) -> BsdfCaps {
        let n = self.nodes.len();
        let mut caps = BsdfCaps::GLOSSY;
        for index_in in 0..n {
            let row = &self.cdf[index_in * n..(index_in + 1) * n];
            let cdf_zero = row[self.node_zero];
            let lower = row[0] < cdf_zero;
            let upper = row[n - 1] > cdf_zero;
            let (lower_caps, upper_caps) = if index_in < self.node_zero {
                (BsdfCaps::TRANSMISSION, BsdfCaps::REFLECTION)
            } else {
                (BsdfCaps::REFLECTION, BsdfCaps::TRANSMISSION)
            };
            if lower {
                caps |= lower_caps;
            }
            if upper {
                caps |= upper_caps;
            }
        }
        caps
    }

    /// Returns the zenith angle cosines.
    pub fn nodes(&self) -> &[Float] {
        &self.nodes
    }

    /// Returns the CDF values.
    pub fn cdf(&self) -> &[Float] {
        &self.cdf
    }

    /// Returns the series offsets.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Returns the series orders.
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Returns all coefficients.
    pub fn all_coefficients(&self) -> &[Float] {
        &self.coefficients
    }

    /// Returns the number of channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the relative index of refraction.
    pub fn eta(&self) -> Float {
        self.eta
    }

    /// Returns the roughness the table was generated with.
    pub fn alpha(&self) -> [Float; 2] {
        self.alpha
    }

    /// Returns the largest series order.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Returns the capabilities supported by the data.
    pub fn caps(&self) -> BsdfCaps {
        self.caps
    }

    /// Returns the series of one channel for a pair of nodes.
    ///
    /// * `index_in`  - Node index of `μin`.
    /// * `index_out` - Node index of `μout`.
    /// * `channel`   - The channel.
    pub fn coefficients(&self, index_in: usize, index_out: usize, channel: usize) -> &[Float] {
        let n = self.nodes.len();
        if index_in >= n || index_out >= n || channel >= self.channels {
            return &[];
        }
        let index = index_in * n + index_out;
        let length = self.lengths[index];
        let offset = self.offsets[index] + channel * length;
        &self.coefficients[offset..offset + length]
    }

    /// Returns the segment index and Catmull-Rom weights for a zenith cosine.
    ///
    /// * `mu` - The zenith cosine.
    pub fn find_weights(&self, mu: Float) -> Option<(usize, [Float; 4])> {
        catmull_rom_weights(&self.nodes, mu)
    }

    /// Blends the series of the 4x4 node pairs around `(μin, μout)` into
    /// `out`, which holds `channels * max_length` values with one
    /// `max_length` block per channel. Returns the order of the blend.
    ///
    /// * `index_in`   - Segment index of `μin`.
    /// * `weights_in` - Weights of `μin`.
    /// * `index_out`  - Segment index of `μout`.
    /// * `weights_out`- Weights of `μout`.
    /// * `out`        - Receives the blended coefficients.
    pub fn blend_coefficients(
        &self,
        index_in: usize,
        weights_in: &[Float; 4],
        index_out: usize,
        weights_out: &[Float; 4],
        out: &mut [Float],
    ) -> usize {
        let n = self.nodes.len();
        out.iter_mut().for_each(|c| *c = 0.0);

        let mut length = 0;
        for (i, w_in) in weights_in.iter().enumerate() {
            let Some(ii) = node_index(index_in, i, n) else {
                continue;
            };
            for (j, w_out) in weights_out.iter().enumerate() {
                let Some(jj) = node_index(index_out, j, n) else {
                    continue;
                };
                let weight = w_in * w_out;
                let index = ii * n + jj;
                let (offset, len) = (self.offsets[index], self.lengths[index]);
                length = max(length, len);
                for c in 0..self.channels {
                    let src = &self.coefficients[offset + c * len..offset + (c + 1) * len];
                    let dst = &mut out[c * self.max_length..c * self.max_length + len];
                    for (d, s) in dst.iter_mut().zip(src) {
                        *d += weight * s;
                    }
                }
            }
        }
        length
    }

    /// Returns `a0` of a pair or 0 when its series is empty.
    fn a0(&self, ii: usize, jj: usize) -> Float {
        let index = ii * self.nodes.len() + jj;
        if self.lengths[index] > 0 {
            self.coefficients[self.offsets[index]]
        } else {
            0.0
        }
    }

    /// Returns the largest difference between the slope of a CDF row and
    /// `a0` at the same node, relative to the largest `a0`. Tables whose CDF
    /// is the integral of their `a0` give a small value.
    pub fn cdf_slope_error(&self) -> Float {
        let n = self.nodes.len();
        let mut worst: Float = 0.0;
        let mut peak: Float = 0.0;
        for ii in 0..n {
            let row = &self.cdf[ii * n..(ii + 1) * n];
            for jj in 0..n {
                let a0 = self.a0(ii, jj);
                peak = max(peak, abs(a0));
                worst = max(worst, abs(node_slope(&self.nodes, row, jj) - a0));
            }
        }
        if peak > 0.0 {
            worst / peak
        } else {
            worst
        }
    }

    /// Returns `a0` at a `μout` node, interpolated over `μin`.
    fn a0_mu_out(&self, index_in: usize, weights_in: &[Float; 4], index_out: usize) -> Float {
        let n = self.nodes.len();
        weights_in
            .iter()
            .enumerate()
            .filter_map(|(i, w)| node_index(index_in, i, n).map(|ii| w * self.a0(ii, index_out)))
            .sum()
    }

    /// Returns the CDF at a `μout` node, interpolated over `μin`.
    ///
    /// * `index_in`   - Segment index of `μin`.
    /// * `weights_in` - Weights of `μin`.
    /// * `index_out`  - Node index of `μout`.
    pub fn cdf_mu_out(&self, index_in: usize, weights_in: &[Float; 4], index_out: usize) -> Float {
        let n = self.nodes.len();
        weights_in
            .iter()
            .enumerate()
            .filter_map(|(i, w)| node_index(index_in, i, n).map(|ii| w * self.cdf[ii * n + index_out]))
            .sum()
    }

    /// Returns which halves of the `μout` range are allowed: `(μout < 0,
    /// μout > 0)`.
    fn allowed_halves(mu_in: Float, allowed: BsdfCaps) -> (bool, bool) {
        let reflection = allowed.contains(BsdfCaps::REFLECTION);
        let transmission = allowed.contains(BsdfCaps::TRANSMISSION);
        if mu_in >= 0.0 {
            (reflection, transmission)
        } else {
            (transmission, reflection)
        }
    }

    /// Returns the CDF value where the allowed part of the `μout` range
    /// starts and the mass of that part, or `None` when it has none.
    ///
    /// * `index_in`   - Segment index of `μin`.
    /// * `weights_in` - Weights of `μin`.
    /// * `mu_in`      - The zenith cosine of the incident direction.
    /// * `allowed`    - Capabilities the caller accepts.
    pub fn cdf_range(
        &self,
        index_in: usize,
        weights_in: &[Float; 4],
        mu_in: Float,
        allowed: BsdfCaps,
    ) -> Option<(Float, Float)> {
        let cdf_max = self.cdf_mu_out(index_in, weights_in, self.nodes.len() - 1);
        let (start, norm) = match Self::allowed_halves(mu_in, allowed) {
            (true, true) => (0.0, cdf_max),
            (true, false) => (0.0, self.cdf_mu_out(index_in, weights_in, self.node_zero)),
            (false, true) => {
                let cdf_zero = self.cdf_mu_out(index_in, weights_in, self.node_zero);
                (cdf_zero, cdf_max - cdf_zero)
            }
            (false, false) => return None,
        };
        if norm > 0.0 {
            Some((start, norm))
        } else {
            None
        }
    }

    /// Returns true if `μout` lies in an allowed half of the range.
    ///
    /// * `mu_in`   - The zenith cosine of the incident direction.
    /// * `mu_out`  - The stored zenith cosine of the outgoing direction.
    /// * `allowed` - Capabilities the caller accepts.
    pub fn is_allowed(mu_in: Float, mu_out: Float, allowed: BsdfCaps) -> bool {
        let (lower, upper) = Self::allowed_halves(mu_in, allowed);
        if mu_out < 0.0 {
            lower
        } else {
            upper
        }
    }

    /// Returns the density of `μout`.
    ///
    /// * `index_in`    - Segment index of `μin`.
    /// * `weights_in`  - Weights of `μin`.
    /// * `index_out`   - Segment index of `μout`.
    /// * `weights_out` - Weights of `μout`.
    /// * `norm`        - Mass of the allowed range from `cdf_range()`.
    pub fn pdf_mu_out(
        &self,
        index_in: usize,
        weights_in: &[Float; 4],
        index_out: usize,
        weights_out: &[Float; 4],
        norm: Float,
    ) -> Float {
        let n = self.nodes.len();
        let a0: Float = weights_out
            .iter()
            .enumerate()
            .filter_map(|(j, w)| {
                node_index(index_out, j, n).map(|jj| w * self.a0_mu_out(index_in, weights_in, jj))
            })
            .sum();
        a0 / norm
    }

    /// Samples `μout` proportional to the interpolated `a0` by inverting the
    /// CDF. Returns `μout` and its density.
    ///
    /// * `index_in`   - Segment index of `μin`.
    /// * `weights_in` - Weights of `μin`.
    /// * `mu_in`      - The zenith cosine of the incident direction.
    /// * `u`          - Uniform sample in [0, 1).
    /// * `allowed`    - Capabilities the caller accepts.
    pub fn sample_mu_out(
        &self,
        index_in: usize,
        weights_in: &[Float; 4],
        mu_in: Float,
        u: Float,
        allowed: BsdfCaps,
    ) -> Option<(Float, Float)> {
        let (start, norm) = self.cdf_range(index_in, weights_in, mu_in, allowed)?;
        let target = start + u * norm;

        let n = self.nodes.len();
        let cdf = |o: usize| self.cdf_mu_out(index_in, weights_in, o);
        let index_out = find_interval(n, |o| cdf(o) <= target);

        let mu0 = self.nodes[index_out];
        let d_mu = self.nodes[index_out + 1] - mu0;
        let segment_target = (target - cdf(index_out)) / d_mu;
        let (t, fhat) = invert_catmull_rom_segment(
            &self.nodes,
            |o| self.a0_mu_out(index_in, weights_in, o),
            index_out,
            segment_target,
        );

        let pdf = fhat / norm;
        if pdf > 0.0 {
            Some((mu0 + t * d_mu, pdf))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::testing::lambertian_table;
    use float_cmp::approx_eq;

    fn two_nodes(channels: usize, lengths: Vec<usize>, coefficients: Vec<Float>) -> Result<FourierTable, String> {
        let offsets = (0..4).map(|i| i * lengths[0] * channels).collect();
        FourierTable::new(vec![-1.0, 1.0], vec![0.0; 4], offsets, lengths, coefficients, channels)
    }

    #[test]
    fn rejects_invalid_data() {
        assert!(FourierTable::new(vec![0.0], vec![0.0], vec![0], vec![0], vec![], 1).is_err());
        assert!(FourierTable::new(vec![1.0, -1.0], vec![0.0; 4], vec![0; 4], vec![0; 4], vec![], 1).is_err());
        assert!(FourierTable::new(vec![-1.0, 1.0], vec![0.0; 4], vec![0; 3], vec![0; 4], vec![], 1).is_err());
        assert!(FourierTable::new(vec![-1.0, 1.0], vec![0.0; 3], vec![0; 4], vec![0; 4], vec![], 1).is_err());
        assert!(two_nodes(2, vec![1; 4], vec![0.0; 8]).is_err());
        assert!(two_nodes(1, vec![1; 4], vec![0.0; 3]).is_err());
        assert!(two_nodes(1, vec![1; 4], vec![0.0; 4]).is_ok());
    }

    /// Table with `a0 = 0.2 + 0.5 μout²` for every `μin` on `n` uniform
    /// nodes, with the CDF integrated from `a0` and then scaled.
    fn quadratic_table(n: usize, cdf_scale: Float) -> FourierTable {
        let nodes: Vec<Float> = (0..n).map(|i| -1.0 + 2.0 * i as Float / (n - 1) as Float).collect();
        let a0: Vec<Float> = nodes.iter().map(|mu| 0.2 + 0.5 * mu * mu).collect();
        let (row, _) = integrate_catmull_rom(&nodes, &a0);
        let cdf = (0..n).flat_map(|_| row.iter().map(|c| c * cdf_scale)).collect();
        let coefficients: Vec<Float> = (0..n).flat_map(|_| a0.iter().copied()).collect();
        FourierTable::new(nodes, cdf, (0..n * n).collect(), vec![1; n * n], coefficients, 1).unwrap()
    }

    #[test]
    fn cdf_slope_matches_a0() {
        let table = quadratic_table(21, 1.0);
        assert!(table.cdf_slope_error() < 1e-2, "{}", table.cdf_slope_error());
    }

    #[test]
    fn mismatched_cdf_slope_detected() {
        let table = quadratic_table(21, 2.0);
        assert!(table.cdf_slope_error() > 0.5, "{}", table.cdf_slope_error());
    }

    #[test]
    fn rejects_overlapping_series() {
        let r = FourierTable::new(
            vec![-1.0, 1.0],
            vec![0.0; 4],
            vec![0, 1, 2, 3],
            vec![2, 1, 1, 1],
            vec![0.0; 4],
            1,
        );
        assert!(r.is_err());
    }

    #[test]
    fn coefficient_accessor() {
        let coefficients: Vec<Float> = (0..12).map(|i| i as Float).collect();
        let table = two_nodes(3, vec![1; 4], coefficients).unwrap();
        assert_eq!(table.coefficients(0, 1, 2), &[5.0]);
        assert_eq!(table.coefficients(1, 0, 0), &[6.0]);
        assert!(table.coefficients(2, 0, 0).is_empty());
    }

    #[test]
    fn lambertian_caps() {
        let table = lambertian_table(0.5, 21);
        assert_eq!(table.caps(), BsdfCaps::REFLECTION | BsdfCaps::GLOSSY);
        assert_eq!(table.nodes()[table.node_zero], 0.0);
    }

    #[test]
    fn pdf_mu_out_integrates_to_one() {
        let table = lambertian_table(0.5, 21);
        let mu_in = 0.6;
        let (index_in, weights_in) = table.find_weights(mu_in).unwrap();
        let (_, norm) = table.cdf_range(index_in, &weights_in, mu_in, BsdfCaps::ALL).unwrap();
        let n = 4000;
        let mut sum = 0.0;
        for k in 0..n {
            let mu_out = -1.0 + 2.0 * (k as Float + 0.5) / n as Float;
            let (index_out, weights_out) = table.find_weights(mu_out).unwrap();
            sum += table.pdf_mu_out(index_in, &weights_in, index_out, &weights_out, norm) * 2.0 / n as Float;
        }
        assert!(approx_eq!(f32, sum, 1.0, epsilon = 2e-3));
    }

    #[test]
    fn sampled_mu_out_density_matches_pdf() {
        let table = lambertian_table(0.5, 21);
        let mu_in = 0.35;
        let (index_in, weights_in) = table.find_weights(mu_in).unwrap();
        let (_, norm) = table.cdf_range(index_in, &weights_in, mu_in, BsdfCaps::ALL).unwrap();
        for u in [0.05, 0.3, 0.5, 0.77, 0.95] {
            let (mu_out, pdf) = table.sample_mu_out(index_in, &weights_in, mu_in, u, BsdfCaps::ALL).unwrap();
            assert!(mu_out < 0.0);
            let (index_out, weights_out) = table.find_weights(mu_out).unwrap();
            let expected = table.pdf_mu_out(index_in, &weights_in, index_out, &weights_out, norm);
            assert!(approx_eq!(f32, pdf, expected, epsilon = 1e-4));
        }
    }

    #[test]
    fn restricted_to_missing_half() {
        let table = lambertian_table(0.5, 21);
        let (index_in, weights_in) = table.find_weights(0.8).unwrap();
        assert!(table
            .sample_mu_out(index_in, &weights_in, 0.8, 0.5, BsdfCaps::ALL_TRANSMISSION)
            .is_none());
        assert!(FourierTable::is_allowed(0.8, -0.3, BsdfCaps::ALL_REFLECTION));
        assert!(!FourierTable::is_allowed(-0.8, -0.3, BsdfCaps::ALL_REFLECTION));
    }

    #[test]
    fn blends_to_node_values() {
        let table = lambertian_table(0.5, 21);
        let (index_in, weights_in) = table.find_weights(0.5).unwrap();
        let (index_out, weights_out) = table.find_weights(-0.5).unwrap();
        let mut out = vec![0.0; table.max_length()];
        let length = table.blend_coefficients(index_in, &weights_in, index_out, &weights_out, &mut out);
        assert_eq!(length, 1);
        assert!(approx_eq!(f32, out[0], 0.5 * 0.5 * INV_PI, epsilon = 1e-5));
    }
}
