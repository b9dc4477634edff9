//! Numeric helpers shared by every shading module

mod common;

pub use common::*;
