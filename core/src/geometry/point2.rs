//! 2-D Points

use super::Float;
use std::fmt;
use std::ops::{Index, Mul, Sub};

/// A pair of `Float` values. Holds texture coordinates, their screen space
/// derivatives and pairs of uniform random numbers.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point2f {
    pub x: Float,
    pub y: Float,
}

impl Point2f {
    /// Creates a new point.
    ///
    /// * `x` - First coordinate.
    /// * `y` - Second coordinate.
    pub const fn new(x: Float, y: Float) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Sub for Point2f {
    type Output = Self;

    fn sub(self, o: Self) -> Self {
        Self::new(self.x - o.x, self.y - o.y)
    }
}

impl Mul<Float> for Point2f {
    type Output = Self;

    fn mul(self, f: Float) -> Self {
        Self::new(self.x * f, self.y * f)
    }
}

impl Index<usize> for Point2f {
    type Output = Float;

    fn index(&self, axis: usize) -> &Float {
        if axis == 0 {
            &self.x
        } else {
            &self.y
        }
    }
}

impl fmt::Display for Point2f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_and_display() {
        let p = Point2f::new(0.25, 0.75) * 2.0 - Point2f::new(1.0, 1.0);
        assert_eq!((p[0], p[1]), (-0.5, 0.5));
        assert_eq!(p.to_string(), "(-0.5, 0.5)");
    }
}
