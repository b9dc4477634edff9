//! Core
//!
//! Scattering models, the shader interface and the numeric, sampling and
//! parameter plumbing they share.

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate log;

pub mod geometry;
pub mod interaction;
pub mod interpolation;
pub mod microfacet;
pub mod paramset;
pub mod pbrt;
pub mod reflection;
pub mod rng;
pub mod sampler;
pub mod sampling;
pub mod shader;
pub mod spectrum;
pub mod texture;
