//! Shader

use crate::interaction::*;
use crate::reflection::*;
use crate::sampler::*;
use bumpalo::Bump;
use std::sync::Arc;

/// Sub-sequences a shader reserved for sampling its Bsdfs, including those
/// of its children.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleRequests {
    /// 2D samples for reflection.
    pub reflection_2d: SubSequenceId,

    /// Component samples for reflection.
    pub reflection_1d: SubSequenceId,

    /// 2D samples for transmission.
    pub transmission_2d: SubSequenceId,

    /// Component samples for transmission.
    pub transmission_1d: SubSequenceId,

    /// Reservations of the child shaders, in the order of `Shader::children()`.
    pub children: Vec<SampleRequests>,
}

/// Shader trait provides common behavior. Shaders are immutable while
/// rendering and shared between threads.
pub trait Shader: Send + Sync {
    /// Returns the name of the shader.
    fn name(&self) -> &'static str;

    /// Returns the capabilities of the Bsdfs the shader produces.
    fn caps(&self) -> BsdfCaps;

    /// Evaluates the textures at the shading point and allocates the Bsdf.
    ///
    /// * `arena`  - The arena for memory allocations.
    /// * `sample` - The camera sample.
    /// * `ctx`    - The shading context.
    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a>;

    /// Modifies the shading context before the Bsdf is built.
    ///
    /// * `sample` - The camera sample.
    /// * `ctx`    - The shading context.
    fn shade_context(&self, _sample: &Sample, _ctx: &mut ShadingContext) {}

    /// Returns the number of samples to take for reflection.
    fn num_reflection_samples(&self) -> usize {
        1
    }

    /// Returns the number of samples to take for transmission.
    fn num_transmission_samples(&self) -> usize {
        1
    }

    /// Returns the child shaders.
    fn children(&self) -> Vec<&ArcShader> {
        vec![]
    }

    /// Reserves the sub-sequences used to sample the Bsdfs of this shader
    /// and of its children.
    ///
    /// * `sampler` - The sampler.
    fn request_samples(&self, sampler: &mut dyn Sampler) -> SampleRequests {
        let caps = self.caps();
        let reflection = if caps.contains(BsdfCaps::REFLECTION) {
            self.num_reflection_samples()
        } else {
            0
        };
        let transmission = if caps.contains(BsdfCaps::TRANSMISSION) {
            self.num_transmission_samples()
        } else {
            0
        };
        SampleRequests {
            reflection_2d: sampler.request_sub_sequence_2d(reflection),
            reflection_1d: sampler.request_sub_sequence_1d(reflection),
            transmission_2d: sampler.request_sub_sequence_2d(transmission),
            transmission_1d: sampler.request_sub_sequence_1d(transmission),
            children: self
                .children()
                .into_iter()
                .map(|child| child.request_samples(sampler))
                .collect(),
        }
    }
}

/// Atomic reference counted `Shader`.
pub type ArcShader = Arc<dyn Shader + Send + Sync>;
