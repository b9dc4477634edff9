//! Sum Shader

use super::*;

/// Adds the Bsdfs of its children.
pub struct SumShader {
    /// The child shaders.
    children: Vec<ArcShader>,

    /// Union of the capabilities of the children.
    caps: BsdfCaps,
}

/// Parameters of a `SumShader`.
#[derive(Clone)]
pub struct SumState {
    pub version: u32,
    pub children: Vec<ArcShader>,
}

impl SumShader {
    /// Create a new `SumShader`.
    ///
    /// * `children` - The child shaders.
    pub fn new(children: Vec<ArcShader>) -> Self {
        let caps = caps_union(&children);
        Self { children, caps }
    }

    /// Appends a child shader.
    ///
    /// * `child` - The shader.
    pub fn add(&mut self, child: ArcShader) {
        self.caps |= child.caps();
        self.children.push(child);
    }
}

impl From<&[ArcShader]> for SumShader {
    /// Create a sum shader of the given children.
    ///
    /// * `children` - The child shaders.
    fn from(children: &[ArcShader]) -> Self {
        Self::new(children.to_vec())
    }
}

impl Shader for SumShader {
    fn name(&self) -> &'static str {
        "Sum"
    }

    fn caps(&self) -> BsdfCaps {
        self.caps
    }

    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        let bsdfs: Vec<&'a Bsdf<'a>> = self
            .children
            .iter()
            .map(|child| child_bsdf(child, arena, sample, ctx))
            .collect();
        let bxdf = SumBsdf::alloc(arena, ctx.frame(), &bsdfs);
        Bsdf::alloc(arena, ctx, self.caps, bxdf)
    }

    fn num_reflection_samples(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.num_reflection_samples())
            .max()
            .unwrap_or(1)
    }

    fn num_transmission_samples(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.num_transmission_samples())
            .max()
            .unwrap_or(1)
    }

    fn children(&self) -> Vec<&ArcShader> {
        self.children.iter().collect()
    }
}

impl Persistent for SumShader {
    type State = SumState;

    fn state(&self) -> Self::State {
        SumState {
            version: STATE_VERSION,
            children: self.children.clone(),
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        *self = Self::new(state.children);
        Ok(())
    }
}
