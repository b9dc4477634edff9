//! Shader State

/// Version of every state struct written by this crate.
pub const STATE_VERSION: u32 = 1;

/// Shaders whose constructor parameters can be captured and restored. The
/// state holds the parameters by name; textures and child shaders are
/// shared, not copied.
pub trait Persistent {
    /// The captured parameters.
    type State: Clone;

    /// Returns the parameters of the shader.
    fn state(&self) -> Self::State;

    /// Replaces the parameters of the shader.
    ///
    /// * `state` - The parameters to restore.
    fn set_state(&mut self, state: Self::State) -> Result<(), String>;
}

/// Returns an error when a state was written by an incompatible version.
///
/// * `shader`  - Name of the shader for error messages.
/// * `version` - The version stored in the state.
pub fn check_version(shader: &str, version: u32) -> Result<(), String> {
    if version == STATE_VERSION {
        Ok(())
    } else {
        Err(format!(
            "Cannot restore {} state of version {}, expected {}",
            shader, version, STATE_VERSION
        ))
    }
}
