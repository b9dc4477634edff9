//! Sampling

mod common;

pub use common::*;
