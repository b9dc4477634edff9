//! Interactions

mod shading_context;

// Re-export
pub use shading_context::*;
