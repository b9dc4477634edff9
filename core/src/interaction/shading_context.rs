//! Shading Context

use crate::geometry::*;
use crate::pbrt::*;

/// Indicates whether a ray crosses into or out of a solid at the shading
/// point. Dielectric shaders use it to decide which side's refractive index
/// is the inner one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SolidEvent {
    /// The ray enters the solid.
    Entering,

    /// The ray leaves the solid.
    Leaving,

    /// The surface does not bound a solid.
    NoEvent,
}

impl Default for SolidEvent {
    fn default() -> Self {
        Self::NoEvent
    }
}

/// Differential geometry of a surface point as seen by shaders and textures.
/// All vectors are in world space.
#[derive(Copy, Clone, Debug)]
pub struct ShadingContext {
    /// Surface parametrization coordinates.
    pub uv: Point2f,

    /// Parametric partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,

    /// Parametric partial derivative of the point ∂p/∂v.
    pub dpdv: Vector3f,

    /// Shading normal.
    pub normal: Vector3f,

    /// Geometric normal.
    pub geometric_normal: Vector3f,

    /// Differential change ∂n/∂u in surface normal.
    pub dndu: Vector3f,

    /// Differential change ∂n/∂v in surface normal.
    pub dndv: Vector3f,

    /// Screen-space derivatives of the uv coordinates along x: (∂u/∂x, ∂v/∂x).
    pub duv_dx: Point2f,

    /// Screen-space derivatives of the uv coordinates along y: (∂u/∂y, ∂v/∂y).
    pub duv_dy: Point2f,

    /// Solid event of the ray at this point.
    pub solid_event: SolidEvent,
}

impl Default for ShadingContext {
    /// Returns a context on the z = 0 plane facing +z, parametrized by x and y.
    fn default() -> Self {
        Self::new(
            Point2f::zero(),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Vector3f::zero(),
            Vector3f::zero(),
        )
    }
}

impl ShadingContext {
    /// Create a new shading context. Both normals are derived from the
    /// partial derivatives.
    ///
    /// * `uv`   - Surface parametrization coordinates.
    /// * `dpdu` - Parametric partial derivative of the point ∂p/∂u.
    /// * `dpdv` - Parametric partial derivative of the point ∂p/∂v.
    /// * `dndu` - Differential change ∂n/∂u in surface normal.
    /// * `dndv` - Differential change ∂n/∂v in surface normal.
    pub fn new(
        uv: Point2f,
        dpdu: Vector3f,
        dpdv: Vector3f,
        dndu: Vector3f,
        dndv: Vector3f,
    ) -> Self {
        let n = dpdu.cross(&dpdv).normalize();
        Self {
            uv,
            dpdu,
            dpdv,
            normal: n,
            geometric_normal: n,
            dndu,
            dndv,
            duv_dx: Point2f::zero(),
            duv_dy: Point2f::zero(),
            solid_event: SolidEvent::NoEvent,
        }
    }

    /// Replaces the shading geometry. The new shading normal is flipped to
    /// the side of the geometric normal.
    ///
    /// * `dpdu` - Shading ∂p/∂u.
    /// * `dpdv` - Shading ∂p/∂v.
    /// * `dndu` - Shading ∂n/∂u.
    /// * `dndv` - Shading ∂n/∂v.
    pub fn set_shading_geometry(
        &mut self,
        dpdu: Vector3f,
        dpdv: Vector3f,
        dndu: Vector3f,
        dndv: Vector3f,
    ) {
        let n = dpdu.cross(&dpdv).normalize();
        self.normal = if n.dot(&self.geometric_normal) < 0.0 { -n } else { n };
        self.dpdu = dpdu;
        self.dpdv = dpdv;
        self.dndu = dndu;
        self.dndv = dndv;
    }

    /// Returns the local shading frame: `dp/du` gives the first tangent and
    /// the shading normal maps to `+z`.
    pub fn frame(&self) -> Frame {
        Frame::new(&self.normal, &self.dpdu)
    }

    /// Returns the extent of the pixel footprint in uv space along u and v.
    pub fn uv_footprint(&self) -> (Float, Float) {
        (
            max(abs(self.duv_dx.x), abs(self.duv_dy.x)),
            max(abs(self.duv_dx.y), abs(self.duv_dy.y)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_faces_z() {
        let ctx = ShadingContext::default();
        assert_eq!(ctx.normal, Vector3f::new(0.0, 0.0, 1.0));
        let frame = ctx.frame();
        assert_eq!(frame.world_to_local(&ctx.dpdu), Vector3f::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn shading_normal_follows_geometric_side() {
        let mut ctx = ShadingContext::default();
        // Swapping the tangents flips the cross product.
        ctx.set_shading_geometry(
            Vector3f::new(0.0, 1.0, 0.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::zero(),
            Vector3f::zero(),
        );
        assert_eq!(ctx.normal, Vector3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn footprint_takes_largest_derivative() {
        let mut ctx = ShadingContext::default();
        ctx.duv_dx = Point2f::new(0.1, -0.3);
        ctx.duv_dy = Point2f::new(-0.2, 0.05);
        assert_eq!(ctx.uv_footprint(), (0.2, 0.3));
    }
}
