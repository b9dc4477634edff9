//! Random Number Generator.

use crate::geometry::Point2f;
use crate::pbrt::*;

/// Largest `Float` below 1, so uniform samples stay in [0, 1).
pub const ONE_MINUS_EPSILON: Float = hexf32!("0x1.fffffep-1");

const PCG32_DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
const PCG32_DEFAULT_STREAM: u64 = 0xda3e39cb94b95bdb;
const PCG32_MULT: u64 = 0x5851f42d4c957f2d;

/// PCG32 pseudo-random number generator. Each worker thread owns one,
/// seeded with its own stream so sequences never overlap.
#[derive(Clone, Debug)]
pub struct RNG {
    state: u64,
    inc: u64,
}

impl Default for RNG {
    fn default() -> Self {
        Self {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}

impl RNG {
    /// Create a new `RNG` on the given stream.
    ///
    /// * `stream` - Stream selector.
    pub fn new(stream: u64) -> Self {
        let mut rng = Self { state: 0, inc: 0 };
        rng.seed(stream);
        rng
    }

    /// Restart the generator on the given stream.
    ///
    /// * `stream` - Stream selector.
    pub fn seed(&mut self, stream: u64) {
        self.state = 0;
        self.inc = stream.wrapping_shl(1) | 1;
        self.next_u32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.next_u32();
    }

    /// Returns the next uniformly distributed 32-bit value.
    #[inline(always)]
    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = old.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);

        let xor_shifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        xor_shifted.rotate_right(rot)
    }

    /// Returns a uniformly distributed value in [0, bound).
    ///
    /// * `bound` - Exclusive upper bound, must be positive.
    pub fn next_bounded(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0);
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let r = self.next_u32();
            if r >= threshold {
                return r % bound;
            }
        }
    }

    /// Returns a uniformly distributed value in [0, 1).
    pub fn uniform_float(&mut self) -> Float {
        min(
            self.next_u32() as Float * hexf32!("0x1.0p-32"),
            ONE_MINUS_EPSILON,
        )
    }

    /// Returns a pair of independent uniform values in [0, 1).
    pub fn uniform_point2(&mut self) -> Point2f {
        let x = self.uniform_float();
        let y = self.uniform_float();
        Point2f::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streams_differ() {
        let mut a = RNG::new(1);
        let mut b = RNG::new(2);
        let same = (0..16).filter(|_| a.next_u32() == b.next_u32()).count();
        assert!(same < 16);
    }

    #[test]
    fn uniform_float_in_unit_interval() {
        let mut rng = RNG::new(7);
        for _ in 0..10_000 {
            let u = rng.uniform_float();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn bounded_stays_below_bound() {
        let mut rng = RNG::default();
        assert!((0..1000).all(|_| rng.next_bounded(5) < 5));
    }

    #[test]
    fn mean_is_one_half() {
        let mut rng = RNG::new(42);
        let n = 100_000;
        let mean = (0..n).map(|_| rng.uniform_float() as f64).sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.01);
    }
}
