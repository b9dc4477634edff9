//! Orthonormal Frame

use super::*;

/// An orthonormal coordinate system `(s, t, n)` used to express directions
/// in the local shading space where `n` maps to `+z`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    /// First tangent, `+x` in local space.
    pub s: Vector3f,

    /// Second tangent, `+y` in local space.
    pub t: Vector3f,

    /// Normal, `+z` in local space.
    pub n: Vector3f,
}

impl Default for Frame {
    /// Returns the identity frame.
    fn default() -> Self {
        Self {
            s: Vector3f::new(1.0, 0.0, 0.0),
            t: Vector3f::new(0.0, 1.0, 0.0),
            n: Vector3f::new(0.0, 0.0, 1.0),
        }
    }
}

impl Frame {
    /// Creates a frame from a normal and a tangent hint. The tangent is made
    /// orthogonal to the normal; when it is degenerate an arbitrary
    /// perpendicular is picked.
    ///
    /// * `n`       - The normal.
    /// * `tangent` - Tangent hint, usually `dp/du`.
    pub fn new(n: &Vector3f, tangent: &Vector3f) -> Self {
        let n = n.normalize();
        let s = *tangent - n * n.dot(tangent);
        let s = if s.length_squared() > 1e-12 {
            s.normalize()
        } else {
            Self::perpendicular(&n)
        };
        Self { s, t: n.cross(&s), n }
    }

    /// Returns a unit vector perpendicular to `n`.
    ///
    /// * `n` - A unit vector.
    fn perpendicular(n: &Vector3f) -> Vector3f {
        if abs(n.x) > abs(n.y) {
            Vector3f::new(-n.z, 0.0, n.x) / (n.x * n.x + n.z * n.z).sqrt()
        } else {
            Vector3f::new(0.0, n.z, -n.y) / (n.y * n.y + n.z * n.z).sqrt()
        }
    }

    /// Transforms a vector from world space to local space.
    ///
    /// * `v` - The vector to transform.
    pub fn world_to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.s), v.dot(&self.t), v.dot(&self.n))
    }

    /// Transforms a vector from local space to world space.
    ///
    /// * `v` - The vector to transform.
    pub fn local_to_world(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(
            self.s.x * v.x + self.t.x * v.y + self.n.x * v.z,
            self.s.y * v.x + self.t.y * v.y + self.n.y * v.z,
            self.s.z * v.x + self.t.z * v.y + self.n.z * v.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    prop_vector3!(vector3_f32, -10.0..10.0f32, -10.0..10.0f32, -10.0..10.0f32);

    #[test]
    fn degenerate_tangent_is_replaced() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let frame = Frame::new(&n, &n);
        assert!(frame.s.dot(&n).abs() < 1e-6);
        assert!((frame.s.length() - 1.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn round_trip(n in vector3_f32(), tangent in vector3_f32(), v in vector3_f32()) {
            prop_assume!(n.length() > 1e-2);
            let frame = Frame::new(&n, &tangent);
            let w = frame.local_to_world(&frame.world_to_local(&v));
            prop_assert!((w - v).length() < 1e-3 * (1.0 + v.length()));
        }

        #[test]
        fn normal_maps_to_z(n in vector3_f32(), tangent in vector3_f32()) {
            prop_assume!(n.length() > 1e-2);
            let frame = Frame::new(&n, &tangent);
            let local = frame.world_to_local(&n.normalize());
            prop_assert!((local.z - 1.0).abs() < 1e-4);
        }
    }
}
