//! UV Checkerboard

use super::*;
use std::ops::{Add, Mul};

/// Antialiasing method of the checkerboard.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AAMethod {
    None,
    ClosedForm,
}

/// Implements a checkerboard texture over the surface (u, v) coordinates.
#[derive(Clone)]
pub struct UvCheckerboard<T> {
    /// Texture of the checks with an even index sum.
    tex1: ArcTexture<T>,

    /// Texture of the other checks.
    tex2: ArcTexture<T>,

    /// Scale of the uv coordinates.
    scale: Point2f,

    /// Offset of the uv coordinates.
    delta: Point2f,

    /// Antialiasing method.
    aa_method: AAMethod,
}

impl<T> UvCheckerboard<T> {
    /// Create a new `UvCheckerboard<T>`.
    ///
    /// * `tex1`      - Texture of the checks with an even index sum.
    /// * `tex2`      - Texture of the other checks.
    /// * `scale`     - Scale of the uv coordinates.
    /// * `delta`     - Offset of the uv coordinates.
    /// * `aa_method` - The antialiasing method.
    pub fn new(
        tex1: ArcTexture<T>,
        tex2: ArcTexture<T>,
        scale: Point2f,
        delta: Point2f,
        aa_method: AAMethod,
    ) -> Self {
        Self {
            tex1,
            tex2,
            scale,
            delta,
            aa_method,
        }
    }
}

impl<T> UvCheckerboard<T>
where
    T: Copy + Send + Sync + Add<Output = T> + Mul<Float, Output = T> + 'static,
{
    /// Returns a shared point sampled checkerboard of two constant values.
    ///
    /// * `v1`     - Value of the checks with an even index sum.
    /// * `v2`     - Value of the other checks.
    /// * `uscale` - Scale of the u coordinate.
    /// * `vscale` - Scale of the v coordinate.
    pub fn arc(v1: T, v2: T, uscale: Float, vscale: Float) -> ArcTexture<T> {
        Arc::new(Self::new(
            ConstantTexture::arc(v1),
            ConstantTexture::arc(v2),
            Point2f::new(uscale, vscale),
            Point2f::zero(),
            AAMethod::None,
        ))
    }

    /// Returns the point sampled value.
    fn point_sample(&self, st: &Point2f, sample: &Sample, ctx: &ShadingContext) -> T {
        if (st.x.floor() as i64 + st.y.floor() as i64) % 2 == 0 {
            self.tex1.evaluate(sample, ctx)
        } else {
            self.tex2.evaluate(sample, ctx)
        }
    }
}

impl<T> Texture<T> for UvCheckerboard<T>
where
    T: Copy + Send + Sync + Add<Output = T> + Mul<Float, Output = T> + 'static,
{
    /// Evaluate the texture at a shading point.
    ///
    /// * `sample` - The camera sample.
    /// * `ctx`    - The shading context.
    fn evaluate(&self, sample: &Sample, ctx: &ShadingContext) -> T {
        let st = Point2f::new(
            ctx.uv.x * self.scale.x + self.delta.x,
            ctx.uv.y * self.scale.y + self.delta.y,
        );
        if self.aa_method == AAMethod::None {
            return self.point_sample(&st, sample, ctx);
        }

        // Evaluate single check if filter is entirely inside one of them.
        let (du, dv) = ctx.uv_footprint();
        let ds = abs(du * self.scale.x);
        let dt = abs(dv * self.scale.y);
        let (s0, s1) = (st.x - ds, st.x + ds);
        let (t0, t1) = (st.y - dt, st.y + dt);
        if s0.floor() == s1.floor() && t0.floor() == t1.floor() {
            return self.point_sample(&st, sample, ctx);
        }

        // Apply box filter to checkerboard region.
        let sint = if ds > 0.0 {
            (bump_int(s1) - bump_int(s0)) / (2.0 * ds)
        } else {
            sqr(st.x.floor() % 2.0)
        };
        let tint = if dt > 0.0 {
            (bump_int(t1) - bump_int(t0)) / (2.0 * dt)
        } else {
            sqr(st.y.floor() % 2.0)
        };
        let area2 = if ds > 1.0 || dt > 1.0 {
            0.5
        } else {
            sint + tint - 2.0 * sint * tint
        };
        self.tex1.evaluate(sample, ctx) * (1.0 - area2) + self.tex2.evaluate(sample, ctx) * area2
    }
}

/// Integral of the 1D square wave that is 1 on odd checks.
fn bump_int(x: Float) -> Float {
    (x / 2.0).floor() + 2.0 * max((x / 2.0) - (x / 2.0).floor() - 0.5, 0.0)
}

macro_rules! from_params {
    ($t: ty, $get_texture_or_else_func: ident) => {
        impl From<&TextureParams> for UvCheckerboard<$t> {
            /// Create a `UvCheckerboard<$t>` from given parameter set.
            ///
            /// * `tp` - Texture parameters.
            fn from(tp: &TextureParams) -> Self {
                let tex1 = tp.$get_texture_or_else_func("tex1", 1.0.into(), ConstantTexture::arc);
                let tex2 = tp.$get_texture_or_else_func("tex2", 0.0.into(), ConstantTexture::arc);
                let scale = Point2f::new(tp.find_float("uscale", 1.0), tp.find_float("vscale", 1.0));
                let delta = Point2f::new(tp.find_float("udelta", 0.0), tp.find_float("vdelta", 0.0));

                let aa = tp.find_string("aamode", String::from("closedform"));
                let aa_method = match &aa[..] {
                    "none" => AAMethod::None,
                    "closedform" => AAMethod::ClosedForm,
                    aam => {
                        warn!("Antialiasing mode '{}' not understood by UvCheckerboard; using 'closedform'", aam);
                        AAMethod::ClosedForm
                    }
                };
                Self::new(tex1, tex2, scale, delta, aa_method)
            }
        }
    };
}
from_params!(Float, get_float_texture_or_else);
from_params!(Spectrum, get_spectrum_texture_or_else);

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn at(u: Float, v: Float) -> ShadingContext {
        let mut ctx = ShadingContext::default();
        ctx.uv = Point2f::new(u, v);
        ctx
    }

    #[test]
    fn alternating_checks() {
        let tex = UvCheckerboard::arc(1.0, 0.0, 4.0, 4.0);
        let s = Sample::default();
        assert_eq!(tex.evaluate(&s, &at(0.1, 0.1)), 1.0);
        assert_eq!(tex.evaluate(&s, &at(0.3, 0.1)), 0.0);
        assert_eq!(tex.evaluate(&s, &at(0.3, 0.3)), 1.0);
        assert_eq!(tex.evaluate(&s, &at(-0.1, 0.1)), 0.0);
    }

    #[test]
    fn wide_footprint_averages() {
        let tex = UvCheckerboard::new(
            ConstantTexture::arc(1.0),
            ConstantTexture::arc(0.0),
            Point2f::new(1.0, 1.0),
            Point2f::zero(),
            AAMethod::ClosedForm,
        );
        let mut ctx = at(0.5, 0.5);
        ctx.duv_dx = Point2f::new(2.0, 0.0);
        ctx.duv_dy = Point2f::new(0.0, 2.0);
        let v = tex.evaluate(&Sample::default(), &ctx);
        assert!(approx_eq!(f32, v, 0.5, epsilon = 1e-6));

        // A footprint inside one check gives the point sample.
        ctx.duv_dx = Point2f::new(0.01, 0.0);
        ctx.duv_dy = Point2f::new(0.0, 0.01);
        assert_eq!(tex.evaluate(&Sample::default(), &ctx), 1.0);
    }

    #[test]
    fn unknown_aa_mode_uses_closed_form() {
        let mut params = ParamSet::new();
        params.add_string("aamode", &[String::from("supersample")]);
        let tp = TextureParams::new(params, FloatTextureMap::new(), SpectrumTextureMap::new());
        let tex = UvCheckerboard::<Float>::from(&tp);
        assert_eq!(tex.aa_method, AAMethod::ClosedForm);
        assert_eq!(tex.evaluate(&Sample::default(), &at(0.5, 0.5)), 1.0);
    }
}
