//! Geometry

use crate::pbrt::*;

/// Strategy for vectors with each component drawn from its own range.
#[cfg(test)]
#[macro_export]
macro_rules! prop_vector3 {
    ($name: ident, $xr: expr, $yr: expr, $zr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr, z in $zr) -> Vector3f {
                Vector3f::new(x, y, z)
            }
        }
    };
}

/// Generates unit directions in the upper hemisphere (`z >= z_min`) from two
/// uniform angles so tests can be written over the local shading frame.
#[cfg(test)]
#[macro_export]
macro_rules! prop_hemisphere {
    ($name: ident, $z_min: expr) => {
        prop_compose! {
            fn $name()(z in $z_min..1.0f32, phi in 0.0..6.2831f32) -> Vector3f {
                let r = (1.0 - z * z).max(0.0).sqrt();
                Vector3f::new(r * phi.cos(), r * phi.sin(), z)
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_point2 {
    ($name: ident, $xr: expr, $yr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr) -> Point2f {
                Point2f::new(x, y)
            }
        }
    };
}

mod frame;
mod point2;
mod vector3;

pub use frame::*;
pub use point2::*;
pub use vector3::*;
