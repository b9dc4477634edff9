//! Bsdf contract and the surface scattering models

use crate::assert_bsdf_size;
use crate::geometry::*;
use crate::microfacet::*;
use crate::pbrt::*;
use crate::rng::ONE_MINUS_EPSILON;
use crate::sampling::*;
use crate::spectrum::*;

mod ashikhmin_shirley;
mod bsdf;
mod bsdf_caps;
mod bsdf_out;
mod common;
mod composite;
mod conductor;
mod cook_torrance;
mod dielectric;
mod flip;
mod fourier_bsdf;
mod fourier_reader;
mod fourier_table;
mod lafortune;
mod lambert;
mod linear_interpolator;
mod lobes;
mod mirror;
mod oren_nayar;
mod sum;
mod thin_dielectric;
mod walter;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export
pub use ashikhmin_shirley::*;
pub use bsdf::*;
pub use bsdf_caps::*;
pub use bsdf_out::*;
pub use common::*;
pub use composite::*;
pub use conductor::*;
pub use cook_torrance::*;
pub use dielectric::*;
pub use flip::*;
pub use fourier_bsdf::*;
pub use fourier_reader::*;
pub use fourier_table::*;
pub use lafortune::*;
pub use lambert::*;
pub use linear_interpolator::*;
pub use lobes::*;
pub use mirror::*;
pub use oren_nayar::*;
pub use sum::*;
pub use thin_dielectric::*;
pub use walter::*;
