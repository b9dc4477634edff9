//! Bump Mapping Shader

use super::*;

/// Smallest uv step of the displacement differences.
const MIN_UV_STEP: Float = 1e-2;

/// Perturbs the shading frame of its child by the gradient of a displacement
/// texture. Everything else is left to the child.
pub struct BumpMappingShader {
    /// The bumped shader.
    child: ArcShader,

    /// Displacement along the normal.
    displacement: ArcTexture<Float>,
}

/// Parameters of a `BumpMappingShader`.
#[derive(Clone)]
pub struct BumpMappingState {
    pub version: u32,
    pub child: ArcShader,
    pub displacement: ArcTexture<Float>,
}

impl BumpMappingShader {
    /// Create a new `BumpMappingShader`.
    ///
    /// * `child`        - The bumped shader.
    /// * `displacement` - Displacement along the normal.
    pub fn new(child: ArcShader, displacement: ArcTexture<Float>) -> Self {
        Self { child, displacement }
    }

    /// Returns the displacement gradient (∂d/∂u, ∂d/∂v) by central
    /// differences over the uv footprint.
    ///
    /// * `sample` - The camera sample.
    /// * `ctx`    - The shading context.
    fn displacement_gradient(&self, sample: &Sample, ctx: &ShadingContext) -> (Float, Float) {
        let (fu, fv) = ctx.uv_footprint();
        let du = max(fu, MIN_UV_STEP);
        let dv = max(fv, MIN_UV_STEP);

        let mut eval = *ctx;
        let mut displace_at = |uv: Point2f, n: Vector3f| {
            eval.uv = uv;
            eval.normal = n;
            self.displacement.evaluate(sample, &eval)
        };

        let (u, v) = (ctx.uv.x, ctx.uv.y);
        let n = ctx.normal;
        let u_plus = displace_at(Point2f::new(u + 0.5 * du, v), n + ctx.dndu * (0.5 * du));
        let u_minus = displace_at(Point2f::new(u - 0.5 * du, v), n + ctx.dndu * (-0.5 * du));
        let v_plus = displace_at(Point2f::new(u, v + 0.5 * dv), n + ctx.dndv * (0.5 * dv));
        let v_minus = displace_at(Point2f::new(u, v - 0.5 * dv), n + ctx.dndv * (-0.5 * dv));

        ((u_plus - u_minus) / du, (v_plus - v_minus) / dv)
    }
}

impl TryFrom<(&TextureParams, &[ArcShader])> for BumpMappingShader {
    type Error = String;

    /// Create a bump mapping shader of the only child from given parameter
    /// set.
    ///
    /// * `p` - Tuple containing the texture parameter set and the children.
    fn try_from(p: (&TextureParams, &[ArcShader])) -> Result<Self, Self::Error> {
        let (tp, children) = p;
        match children {
            [child] => Ok(Self::new(
                Arc::clone(child),
                tp.get_float_texture_or_else("displacement", 0.0, ConstantTexture::arc),
            )),
            _ => Err(format!(
                "Bump mapping shader needs one child, got {}",
                children.len()
            )),
        }
    }
}

impl Shader for BumpMappingShader {
    fn name(&self) -> &'static str {
        "BumpMapping"
    }

    fn caps(&self) -> BsdfCaps {
        self.child.caps()
    }

    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        self.child.bsdf(arena, sample, ctx)
    }

    fn shade_context(&self, sample: &Sample, ctx: &mut ShadingContext) {
        let d = self.displacement.evaluate(sample, ctx);
        let (dd_du, dd_dv) = self.displacement_gradient(sample, ctx);

        let dpdu = ctx.dpdu + ctx.normal * dd_du + ctx.dndu * d;
        let dpdv = ctx.dpdv + ctx.normal * dd_dv + ctx.dndv * d;
        ctx.set_shading_geometry(dpdu, dpdv, ctx.dndu, ctx.dndv);

        self.child.shade_context(sample, ctx);
    }

    fn num_reflection_samples(&self) -> usize {
        self.child.num_reflection_samples()
    }

    fn num_transmission_samples(&self) -> usize {
        self.child.num_transmission_samples()
    }

    fn children(&self) -> Vec<&ArcShader> {
        vec![&self.child]
    }
}

impl Persistent for BumpMappingShader {
    type State = BumpMappingState;

    fn state(&self) -> Self::State {
        BumpMappingState {
            version: STATE_VERSION,
            child: Arc::clone(&self.child),
            displacement: Arc::clone(&self.displacement),
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        self.child = state.child;
        self.displacement = state.displacement;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    /// Displacement growing linearly along u.
    struct Ramp(Float);

    impl Texture<Float> for Ramp {
        fn evaluate(&self, _sample: &Sample, ctx: &ShadingContext) -> Float {
            self.0 * ctx.uv.x
        }
    }

    fn lambert() -> ArcShader {
        Arc::new(LambertShader::new(constant_spectrum(0.5)))
    }

    #[test]
    fn ramp_tilts_the_normal() {
        let shader = BumpMappingShader::new(lambert(), Arc::new(Ramp(0.5)));
        let mut ctx = ShadingContext::default();
        shader.shade_context(&Sample::default(), &mut ctx);
        let expected = Vector3f::new(-0.5, 0.0, 1.0).normalize();
        assert!(approx_eq!(f32, ctx.normal.x, expected.x, epsilon = 1e-5), "{:?}", ctx.normal);
        assert!(approx_eq!(f32, ctx.normal.y, expected.y, epsilon = 1e-5));
        assert!(approx_eq!(f32, ctx.normal.z, expected.z, epsilon = 1e-5));
        assert!(approx_eq!(f32, ctx.dpdu.z, 0.5, epsilon = 1e-5));
    }

    #[test]
    fn flat_displacement_keeps_the_frame() {
        let children = [lambert()];
        let shader = BumpMappingShader::try_from((&TextureParams::default(), &children[..])).unwrap();
        assert_eq!(shader.caps(), Lambert::CAPS);
        let mut ctx = ShadingContext::default();
        shader.shade_context(&Sample::default(), &mut ctx);
        assert_eq!(ctx.normal, ShadingContext::default().normal);
    }

    #[test]
    fn displacement_texture_by_name() {
        let mut params = ParamSet::new();
        params.add_texture("displacement", &[String::from("ramp")]);
        let mut float_textures = FloatTextureMap::new();
        float_textures.insert(String::from("ramp"), Arc::new(Ramp(-1.0)));
        let tp = TextureParams::new(params, float_textures, SpectrumTextureMap::new());
        let children = [lambert()];
        let shader = BumpMappingShader::try_from((&tp, &children[..])).unwrap();

        let mut ctx = ShadingContext::default();
        shader.shade_context(&Sample::default(), &mut ctx);
        assert!(ctx.normal.x > 0.5, "{:?}", ctx.normal);

        // The child sees the bumped frame: light along the bumped normal is
        // at normal incidence.
        let arena = Bump::new();
        let bsdf = shader.bsdf(&arena, &Sample::default(), &ctx);
        assert!(approx_eq!(f32, bsdf.frame().world_to_local(&ctx.normal).z, 1.0, epsilon = 1e-5));

        let none: &[ArcShader] = &[];
        assert!(BumpMappingShader::try_from((&tp, none)).is_err());
    }
}
