//! Flip Shader

use super::*;

/// Swaps reflection and transmission of its child, so that reflective
/// shaders become transparent and the other way around.
pub struct FlipShader {
    /// The child shader.
    child: ArcShader,
}

/// Parameters of a `FlipShader`.
#[derive(Clone)]
pub struct FlipState {
    pub version: u32,
    pub child: ArcShader,
}

impl FlipShader {
    /// Create a new `FlipShader`.
    ///
    /// * `child` - The child shader.
    pub fn new(child: ArcShader) -> Self {
        Self { child }
    }
}

impl TryFrom<&[ArcShader]> for FlipShader {
    type Error = String;

    /// Create a flip shader of the only child.
    ///
    /// * `children` - The child shaders.
    fn try_from(children: &[ArcShader]) -> Result<Self, Self::Error> {
        match children {
            [child] => Ok(Self::new(Arc::clone(child))),
            _ => Err(format!("Flip shader needs one child, got {}", children.len())),
        }
    }
}

impl Shader for FlipShader {
    fn name(&self) -> &'static str {
        "Flip"
    }

    fn caps(&self) -> BsdfCaps {
        self.child.caps().flipped()
    }

    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        let child = child_bsdf(&self.child, arena, sample, ctx);
        let bxdf = FlipBsdf::alloc(arena, ctx.frame(), child);
        Bsdf::alloc(arena, ctx, child.caps().flipped(), bxdf)
    }

    fn num_reflection_samples(&self) -> usize {
        self.child.num_transmission_samples()
    }

    fn num_transmission_samples(&self) -> usize {
        self.child.num_reflection_samples()
    }

    fn children(&self) -> Vec<&ArcShader> {
        vec![&self.child]
    }
}

impl Persistent for FlipShader {
    type State = FlipState;

    fn state(&self) -> Self::State {
        FlipState {
            version: STATE_VERSION,
            child: Arc::clone(&self.child),
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        self.child = state.child;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use float_cmp::approx_eq;

    #[test]
    fn lambert_becomes_translucent() {
        let lambert: ArcShader = Arc::new(LambertShader::new(constant_spectrum(0.6)));
        let shader = FlipShader::try_from(&[lambert][..]).unwrap();
        assert_eq!(shader.caps(), BsdfCaps::TRANSMISSION | BsdfCaps::DIFFUSE);

        let arena = Bump::new();
        let bsdf = shade(&shader, &arena);
        let i = direction(0.4, 0.3);
        let s = bsdf.sample(&i, &Point2f::new(0.3, 0.6), 0.5, BsdfCaps::ALL);
        assert!(s.is_valid());
        assert!(s.omega_out.z < 0.0);
        assert_eq!(s.used_caps, BsdfCaps::TRANSMISSION | BsdfCaps::DIFFUSE);
        let a = albedo(bsdf, &i, 10_000, 61);
        assert!(approx_eq!(f32, a[0], 0.6, epsilon = 1e-3), "{}", a);
        assert!(bsdf.evaluate(&i, &direction(0.4, 2.0), BsdfCaps::ALL).is_black());
    }

    #[test]
    fn needs_exactly_one_child() {
        let none: &[ArcShader] = &[];
        assert!(FlipShader::try_from(none).is_err());
        let lambert: ArcShader = Arc::new(LambertShader::new(constant_spectrum(0.6)));
        assert!(FlipShader::try_from(&[Arc::clone(&lambert), lambert][..]).is_err());
    }
}
