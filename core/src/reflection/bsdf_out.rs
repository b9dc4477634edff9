//! Bsdf Results

use super::*;
use std::ops::AddAssign;

/// Result of evaluating a Bsdf for a pair of directions.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BsdfOut {
    /// Scattered value.
    pub value: Spectrum,

    /// Solid-angle density of sampling `omega_out` given `omega_in`.
    pub pdf: Float,
}

impl BsdfOut {
    /// Create a new `BsdfOut`.
    ///
    /// * `value` - Scattered value.
    /// * `pdf`   - Solid-angle density.
    pub fn new(value: Spectrum, pdf: Float) -> Self {
        Self { value, pdf }
    }

    /// Returns true if the value is zero everywhere.
    pub fn is_black(&self) -> bool {
        self.value.is_black()
    }

    /// Returns the result with the value and density scaled separately.
    ///
    /// * `value_weight` - Factor for the value.
    /// * `pdf_weight`   - Factor for the density.
    pub fn scaled(&self, value_weight: Float, pdf_weight: Float) -> Self {
        Self::new(self.value * value_weight, self.pdf * pdf_weight)
    }
}

impl AddAssign for BsdfOut {
    fn add_assign(&mut self, other: Self) {
        self.value += other.value;
        self.pdf += other.pdf;
    }
}

/// Result of sampling a Bsdf. A zero `pdf` means that sampling failed and the
/// other fields carry no meaning.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SampleBsdfOut {
    /// The sampled direction.
    pub omega_out: Vector3f,

    /// Scattered value for the sampled direction.
    pub value: Spectrum,

    /// Density of the sampled direction. Specular lobes report the discrete
    /// probability of their choice.
    pub pdf: Float,

    /// Capabilities of the lobe that produced the sample.
    pub used_caps: BsdfCaps,
}

impl SampleBsdfOut {
    /// Create a new `SampleBsdfOut`.
    ///
    /// * `omega_out` - The sampled direction.
    /// * `value`     - Scattered value.
    /// * `pdf`       - Density of the sampled direction.
    /// * `used_caps` - Capabilities of the sampled lobe.
    pub fn new(omega_out: Vector3f, value: Spectrum, pdf: Float, used_caps: BsdfCaps) -> Self {
        Self {
            omega_out,
            value,
            pdf,
            used_caps,
        }
    }

    /// Create a sample from an evaluation result.
    ///
    /// * `omega_out` - The sampled direction.
    /// * `out`       - Evaluation for the sampled direction.
    /// * `used_caps` - Capabilities of the sampled lobe.
    pub fn from_bsdf_out(omega_out: Vector3f, out: BsdfOut, used_caps: BsdfCaps) -> Self {
        Self::new(omega_out, out.value, out.pdf, used_caps)
    }

    /// Returns true if sampling produced a usable direction.
    pub fn is_valid(&self) -> bool {
        self.pdf > 0.0
    }
}
