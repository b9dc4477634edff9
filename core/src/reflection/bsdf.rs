//! Bsdf

use super::*;
use crate::interaction::*;
use bumpalo::Bump;

/// Upper bound on the size of every lobe model allocated for a shading
/// point. Keeps per-point allocations within one small arena slot.
pub const MAX_BSDF_SIZE: usize = 256;

/// Fails compilation when a lobe model outgrows `MAX_BSDF_SIZE`.
#[macro_export]
macro_rules! assert_bsdf_size {
    ($t: ty) => {
        const _: () = assert!(
            std::mem::size_of::<$t>() <= $crate::reflection::MAX_BSDF_SIZE,
            concat!(stringify!($t), " exceeds MAX_BSDF_SIZE")
        );
    };
}

/// The lobe models a `Bsdf` dispatches to. Models are allocated in the same
/// arena as the `Bsdf`.
#[derive(Copy, Clone)]
pub enum BxDF<'arena> {
    AshikhminShirley(&'arena AshikhminShirley),
    Conductor(&'arena Conductor),
    CookTorrance(&'arena CookTorrance),
    Dielectric(&'arena Dielectric),
    Flip(&'arena FlipBsdf<'arena>),
    Fourier(&'arena FourierBsdf<'arena>),
    Lafortune(&'arena Lafortune<'arena>),
    Lambert(&'arena Lambert),
    LinearInterpolator(&'arena LinearInterpolatorBsdf<'arena>),
    Mirror(&'arena Mirror),
    OrenNayar(&'arena OrenNayar),
    Sum(&'arena SumBsdf<'arena>),
    ThinDielectric(&'arena ThinDielectric),
    Walter(&'arena Walter),
}

impl<'arena> BxDF<'arena> {
    /// Evaluates the model for a pair of local directions.
    ///
    /// * `omega_in`  - Direction towards the viewer.
    /// * `omega_out` - Direction towards the light.
    /// * `allowed`   - Capabilities the caller accepts.
    pub fn evaluate(&self, omega_in: &Vector3f, omega_out: &Vector3f, allowed: BsdfCaps) -> BsdfOut {
        match self {
            Self::AshikhminShirley(m) => m.evaluate(omega_in, omega_out, allowed),
            Self::Conductor(m) => m.evaluate(omega_in, omega_out, allowed),
            Self::CookTorrance(m) => m.evaluate(omega_in, omega_out, allowed),
            Self::Dielectric(m) => m.evaluate(omega_in, omega_out, allowed),
            Self::Flip(m) => m.evaluate(omega_in, omega_out, allowed),
            Self::Fourier(m) => m.evaluate(omega_in, omega_out, allowed),
            Self::Lafortune(m) => m.evaluate(omega_in, omega_out, allowed),
            Self::Lambert(m) => m.evaluate(omega_in, omega_out, allowed),
            Self::LinearInterpolator(m) => m.evaluate(omega_in, omega_out, allowed),
            Self::Mirror(m) => m.evaluate(omega_in, omega_out, allowed),
            Self::OrenNayar(m) => m.evaluate(omega_in, omega_out, allowed),
            Self::Sum(m) => m.evaluate(omega_in, omega_out, allowed),
            Self::ThinDielectric(m) => m.evaluate(omega_in, omega_out, allowed),
            Self::Walter(m) => m.evaluate(omega_in, omega_out, allowed),
        }
    }

    /// Samples an outgoing direction from the model.
    ///
    /// * `omega_in`         - Direction towards the viewer.
    /// * `u`                - The 2D uniform random values.
    /// * `component_sample` - Uniform value used to choose a lobe.
    /// * `allowed`          - Capabilities the caller accepts.
    pub fn sample(
        &self,
        omega_in: &Vector3f,
        u: &Point2f,
        component_sample: Float,
        allowed: BsdfCaps,
    ) -> SampleBsdfOut {
        match self {
            Self::AshikhminShirley(m) => m.sample(omega_in, u, component_sample, allowed),
            Self::Conductor(m) => m.sample(omega_in, u, component_sample, allowed),
            Self::CookTorrance(m) => m.sample(omega_in, u, component_sample, allowed),
            Self::Dielectric(m) => m.sample(omega_in, u, component_sample, allowed),
            Self::Flip(m) => m.sample(omega_in, u, component_sample, allowed),
            Self::Fourier(m) => m.sample(omega_in, u, component_sample, allowed),
            Self::Lafortune(m) => m.sample(omega_in, u, component_sample, allowed),
            Self::Lambert(m) => m.sample(omega_in, u, component_sample, allowed),
            Self::LinearInterpolator(m) => m.sample(omega_in, u, component_sample, allowed),
            Self::Mirror(m) => m.sample(omega_in, u, component_sample, allowed),
            Self::OrenNayar(m) => m.sample(omega_in, u, component_sample, allowed),
            Self::Sum(m) => m.sample(omega_in, u, component_sample, allowed),
            Self::ThinDielectric(m) => m.sample(omega_in, u, component_sample, allowed),
            Self::Walter(m) => m.sample(omega_in, u, component_sample, allowed),
        }
    }
}

/// Scattering function at one shading point. Directions passed to
/// `evaluate()` and `sample()` are in the local shading frame where the
/// shading normal is `+z`. A `Bsdf` lives in a per-thread arena that is
/// reset when the shading point is abandoned.
#[derive(Copy, Clone)]
pub struct Bsdf<'arena> {
    /// The local shading frame.
    frame: Frame,

    /// Geometric normal in the local shading frame.
    geometric_normal: Vector3f,

    /// Capabilities, fixed at construction.
    caps: BsdfCaps,

    /// The lobe model.
    bxdf: BxDF<'arena>,
}

impl<'arena> Bsdf<'arena> {
    /// Create a new `Bsdf` for the shading frame of the context.
    ///
    /// * `ctx`  - The shading context.
    /// * `caps` - Capabilities of the model.
    /// * `bxdf` - The lobe model.
    pub fn new(ctx: &ShadingContext, caps: BsdfCaps, bxdf: BxDF<'arena>) -> Self {
        let frame = ctx.frame();
        let geometric_normal = frame.world_to_local(&ctx.geometric_normal).normalize();
        Self {
            frame,
            geometric_normal,
            caps,
            bxdf,
        }
    }

    /// Allocate a new `Bsdf` in the arena.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `ctx`   - The shading context.
    /// * `caps`  - Capabilities of the model.
    /// * `bxdf`  - The lobe model.
    pub fn alloc(
        arena: &'arena Bump,
        ctx: &ShadingContext,
        caps: BsdfCaps,
        bxdf: BxDF<'arena>,
    ) -> &'arena Bsdf<'arena> {
        arena.alloc(Self::new(ctx, caps, bxdf))
    }

    /// Returns the capabilities.
    pub fn caps(&self) -> BsdfCaps {
        self.caps
    }

    /// Returns true if all `wanted` capabilities are present.
    ///
    /// * `wanted` - The required capabilities.
    pub fn has_caps(&self, wanted: BsdfCaps) -> bool {
        has_caps(self.caps, wanted)
    }

    /// Returns true if the capabilities are compatible with `allowed`.
    ///
    /// * `allowed` - The capabilities the caller accepts.
    pub fn compatible_caps(&self, allowed: BsdfCaps) -> bool {
        compatible_caps(self.caps, allowed)
    }

    /// Returns the local shading frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Transforms a local direction to world space.
    ///
    /// * `v` - The direction.
    pub fn bsdf_to_world(&self, v: &Vector3f) -> Vector3f {
        self.frame.local_to_world(v)
    }

    /// Transforms a world direction to the local shading frame.
    ///
    /// * `v` - The direction.
    pub fn world_to_bsdf(&self, v: &Vector3f) -> Vector3f {
        self.frame.world_to_local(v)
    }

    /// Evaluates the Bsdf for a pair of local directions. The pair counts as
    /// reflective when both lie on the same side of the geometric normal; the
    /// other mode is then removed from the capabilities used to reject the
    /// evaluation. The model itself receives `allowed` unchanged so that its
    /// density matches the one reported by `sample()`.
    ///
    /// * `omega_in`  - Direction towards the viewer.
    /// * `omega_out` - Direction towards the light.
    /// * `allowed`   - Capabilities the caller accepts.
    pub fn evaluate(&self, omega_in: &Vector3f, omega_out: &Vector3f, allowed: BsdfCaps) -> BsdfOut {
        let reflective =
            omega_in.dot(&self.geometric_normal) * omega_out.dot(&self.geometric_normal) > 0.0;
        let filtered = if reflective {
            allowed - BsdfCaps::TRANSMISSION
        } else {
            allowed - BsdfCaps::REFLECTION
        };
        if !compatible_caps(self.caps, filtered) {
            return BsdfOut::default();
        }
        self.bxdf.evaluate(omega_in, omega_out, allowed)
    }

    /// Samples an outgoing local direction. Fails softly with a zero `pdf`
    /// when no lobe is compatible with `allowed`.
    ///
    /// * `omega_in`         - Direction towards the viewer.
    /// * `u`                - The 2D uniform random values.
    /// * `component_sample` - Uniform value used to choose a lobe.
    /// * `allowed`          - Capabilities the caller accepts.
    pub fn sample(
        &self,
        omega_in: &Vector3f,
        u: &Point2f,
        component_sample: Float,
        allowed: BsdfCaps,
    ) -> SampleBsdfOut {
        if !compatible_caps(self.caps, allowed) {
            return SampleBsdfOut::default();
        }
        self.bxdf.sample(omega_in, u, component_sample, allowed)
    }
}

assert_bsdf_size!(Bsdf<'static>);

#[cfg(test)]
mod tests {
    use super::*;

    fn lambert<'a>(arena: &'a Bump, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        let bxdf = Lambert::alloc(arena, Spectrum::new(0.5));
        Bsdf::alloc(arena, ctx, Lambert::CAPS, bxdf)
    }

    #[test]
    fn rejects_transmission_for_reflective_model() {
        let arena = Bump::new();
        let bsdf = lambert(&arena, &ShadingContext::default());
        let i = Vector3f::new(0.0, 0.0, 1.0);
        let o = Vector3f::new(0.0, 0.6, -0.8);
        assert!(bsdf.evaluate(&i, &o, BsdfCaps::ALL).is_black());
        assert!(!bsdf.evaluate(&i, &-o, BsdfCaps::ALL).is_black());
        assert!(bsdf.evaluate(&i, &-o, BsdfCaps::ALL_TRANSMISSION).is_black());
    }

    #[test]
    fn sampling_incompatible_caps_fails_softly() {
        let arena = Bump::new();
        let bsdf = lambert(&arena, &ShadingContext::default());
        let i = Vector3f::new(0.0, 0.0, 1.0);
        let s = bsdf.sample(&i, &Point2f::new(0.3, 0.3), 0.5, BsdfCaps::ALL_SPECULAR);
        assert_eq!(s.pdf, 0.0);
        assert!(!s.is_valid());
    }

    #[test]
    fn frame_round_trip() {
        let arena = Bump::new();
        let ctx = ShadingContext::new(
            Point2f::zero(),
            Vector3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::zero(),
            Vector3f::zero(),
        );
        let bsdf = lambert(&arena, &ctx);
        assert_eq!(bsdf.world_to_bsdf(&Vector3f::new(1.0, 0.0, 0.0)).z, 1.0);
        let v = Vector3f::new(0.2, -0.3, 0.9);
        assert!((bsdf.bsdf_to_world(&bsdf.world_to_bsdf(&v)) - v).length() < 1e-6);
    }
}
