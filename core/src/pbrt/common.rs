//! Scalar types, constants and small numeric helpers

use num_traits::Signed;
use std::ops::Mul;

/// Precision of every shading computation.
pub type Float = f32;

/// Integer parameters.
pub type Int = i32;

pub const INFINITY: Float = Float::INFINITY;

pub const PI: Float = std::f32::consts::PI;
pub const INV_PI: Float = std::f32::consts::FRAC_1_PI;
pub const PI_OVER_TWO: Float = std::f32::consts::FRAC_PI_2;
pub const PI_OVER_FOUR: Float = std::f32::consts::FRAC_PI_4;
pub const TWO_PI: Float = 2.0 * PI;
pub const INV_TWO_PI: Float = 0.5 * INV_PI;
pub const FOUR_PI: Float = 4.0 * PI;
pub const INV_FOUR_PI: Float = 0.25 * INV_PI;

/// Absolute value of a signed number.
///
/// * `n` - The number.
#[inline(always)]
pub fn abs<T: Signed>(n: T) -> T {
    n.abs()
}

/// The smaller of two values; `b` when they are unordered.
#[inline(always)]
pub fn min<T: PartialOrd>(a: T, b: T) -> T {
    if a < b {
        a
    } else {
        b
    }
}

/// The larger of two values; `b` when they are unordered.
#[inline(always)]
pub fn max<T: PartialOrd>(a: T, b: T) -> T {
    if a > b {
        a
    } else {
        b
    }
}

/// Restricts `x` to `[low, high]`. Unlike `f32::clamp` this never panics on
/// NaN bounds.
///
/// * `x`    - The value.
/// * `low`  - Lower bound.
/// * `high` - Upper bound.
#[inline(always)]
pub fn clamp<T: PartialOrd>(x: T, low: T, high: T) -> T {
    max(low, min(x, high))
}

#[inline(always)]
pub fn sqr<T: Mul<Output = T> + Copy>(v: T) -> T {
    v * v
}

/// `v^5`, the Schlick Fresnel falloff.
#[inline(always)]
pub fn pow5<T: Mul<Output = T> + Copy>(v: T) -> T {
    let v2 = v * v;
    v2 * v2 * v
}

/// Square root that maps small negative arguments caused by rounding to 0.
///
/// * `x` - The value.
#[inline(always)]
pub fn safe_sqrt(x: Float) -> Float {
    max(x, 0.0).sqrt()
}

/// Bisects a monotone predicate over `0..size` without materializing the
/// values it inspects. Returns the largest `i` in `[0, size - 2]` for which
/// `pred(i)` holds, or 0 when it holds nowhere.
///
/// * `size` - Number of nodes (at least 2).
/// * `pred` - True for a prefix of the indices.
pub fn find_interval<P: Fn(usize) -> bool>(size: usize, pred: P) -> usize {
    debug_assert!(size >= 2);
    let (mut lo, mut hi) = (0, size);
    // pred is true below lo and false from hi on.
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    min(lo.saturating_sub(1), size - 2)
}
