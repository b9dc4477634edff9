//! RGB Spectrum.

use crate::pbrt::*;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Sub, SubAssign};

/// Reflectances, refractive indices and other spectral quantities as linear
/// RGB triplets. All operations act on each channel independently.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RGBSpectrum {
    c: [Float; 3],
}

impl RGBSpectrum {
    /// Black.
    pub const ZERO: Self = Self { c: [0.0; 3] };

    /// White.
    pub const ONE: Self = Self { c: [1.0; 3] };

    /// Returns a grey spectrum.
    ///
    /// * `v` - Value of every channel.
    pub fn new(v: Float) -> Self {
        debug_assert!(!v.is_nan());
        Self { c: [v; 3] }
    }

    /// Returns a spectrum from linear RGB values.
    ///
    /// * `rgb` - Red, green and blue.
    pub fn from_rgb(rgb: [Float; 3]) -> Self {
        Self { c: rgb }
    }

    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    pub fn is_finite(&self) -> bool {
        self.c.iter().all(|v| v.is_finite())
    }

    pub fn is_black(&self) -> bool {
        self.c == [0.0; 3]
    }

    /// Mean of the channels.
    pub fn average(&self) -> Float {
        self.c.iter().sum::<Float>() / 3.0
    }

    /// Mean of the channel magnitudes. This is the weight used when one of
    /// several lobes is picked by energy.
    pub fn abs_average(&self) -> Float {
        self.c.iter().copied().map(abs).sum::<Float>() / 3.0
    }

    pub fn max_component_value(&self) -> Float {
        self.c.iter().copied().fold(Float::NEG_INFINITY, max)
    }

    pub fn min_component_value(&self) -> Float {
        self.c.iter().copied().fold(Float::INFINITY, min)
    }

    pub fn sqrt(&self) -> Self {
        self.map(Float::sqrt)
    }

    /// Raises every channel to the same power.
    ///
    /// * `p` - The exponent.
    pub fn pow(&self, p: Float) -> Self {
        self.map(|v| v.powf(p))
    }

    /// Raises every channel to the power held in the same channel of `p`.
    ///
    /// * `p` - The exponents.
    pub fn pow_spectrum(&self, p: &Self) -> Self {
        self.zip(p, Float::powf)
    }

    /// Channel-wise maximum with a constant.
    ///
    /// * `v` - Lower bound.
    pub fn max_value(&self, v: Float) -> Self {
        self.map(|c| max(c, v))
    }

    /// Restricts every channel to `[low, high]`.
    ///
    /// * `low`  - Lower bound.
    /// * `high` - Upper bound.
    pub fn clamp(&self, low: Float, high: Float) -> Self {
        self.map(|c| clamp(c, low, high))
    }

    /// Applies a function to every channel.
    ///
    /// * `f` - The function.
    pub fn map<F: Fn(Float) -> Float>(&self, f: F) -> Self {
        Self { c: self.c.map(f) }
    }

    fn zip<F: Fn(Float, Float) -> Float>(&self, other: &Self, f: F) -> Self {
        let [a, b, c] = self.c;
        let [x, y, z] = other.c;
        Self { c: [f(a, x), f(b, y), f(c, z)] }
    }
}

macro_rules! channelwise {
    ($tr: ident, $f: ident, $tra: ident, $fa: ident, $op: tt) => {
        impl $tr for RGBSpectrum {
            type Output = Self;

            fn $f(self, o: Self) -> Self {
                self.zip(&o, |a, b| a $op b)
            }
        }

        impl $tra for RGBSpectrum {
            fn $fa(&mut self, o: Self) {
                *self = *self $op o;
            }
        }
    };
}

channelwise!(Add, add, AddAssign, add_assign, +);
channelwise!(Sub, sub, SubAssign, sub_assign, -);
channelwise!(Mul, mul, MulAssign, mul_assign, *);

impl Div for RGBSpectrum {
    type Output = Self;

    fn div(self, o: Self) -> Self {
        self.zip(&o, |a, b| a / b)
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = Self;

    fn mul(self, f: Float) -> Self {
        self.map(|v| v * f)
    }
}

impl Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    fn mul(self, s: RGBSpectrum) -> RGBSpectrum {
        s * self
    }
}

impl MulAssign<Float> for RGBSpectrum {
    fn mul_assign(&mut self, f: Float) {
        *self = *self * f;
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = Self;

    fn div(self, f: Float) -> Self {
        self * (1.0 / f)
    }
}

impl DivAssign<Float> for RGBSpectrum {
    fn div_assign(&mut self, f: Float) {
        *self = *self / f;
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    fn index(&self, channel: usize) -> &Float {
        &self.c[channel]
    }
}

impl IndexMut<usize> for RGBSpectrum {
    fn index_mut(&mut self, channel: usize) -> &mut Float {
        &mut self.c[channel]
    }
}

impl From<Float> for RGBSpectrum {
    fn from(v: Float) -> Self {
        Self::new(v)
    }
}

impl fmt::Display for RGBSpectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.c;
        write!(f, "RGB({}, {}, {})", r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn averages() {
        let s = RGBSpectrum::from_rgb([0.3, -0.6, 0.9]);
        assert!((s.average() - 0.2).abs() < 1e-6);
        assert!((s.abs_average() - 0.6).abs() < 1e-6);
        assert_eq!(s.max_component_value(), 0.9);
        assert_eq!(s.min_component_value(), -0.6);
        assert_eq!(s.clamp(0.0, INFINITY), RGBSpectrum::from_rgb([0.3, 0.0, 0.9]));
    }

    #[test]
    fn channelwise_arithmetic() {
        let a = RGBSpectrum::from_rgb([1.0, 2.0, 4.0]);
        let b = RGBSpectrum::from_rgb([2.0, 2.0, 2.0]);
        assert_eq!(a * b, RGBSpectrum::from_rgb([2.0, 4.0, 8.0]));
        assert_eq!(a - b, RGBSpectrum::from_rgb([-1.0, 0.0, 2.0]));
        assert_eq!(a / b, RGBSpectrum::from_rgb([0.5, 1.0, 2.0]));
        assert_eq!(a.pow_spectrum(&b), RGBSpectrum::from_rgb([1.0, 4.0, 16.0]));
        assert!((a - a).is_black());
    }

    proptest! {
        #[test]
        fn scale_then_average(v in 0.0..10.0f32, f in 0.0..10.0f32) {
            let s = RGBSpectrum::new(v) * f;
            prop_assert!((s.average() - v * f).abs() <= 1e-4 * (1.0 + v * f));
        }
    }
}
