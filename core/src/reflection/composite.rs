//! Composite Helpers

use super::*;

/// Converts a direction from the local frame of a composite to the local
/// frame of one of its children. The child may have a perturbed frame of its
/// own.
///
/// * `frame` - Local frame of the composite.
/// * `child` - The child Bsdf.
/// * `w`     - Direction in the composite frame.
#[inline]
pub fn to_child(frame: &Frame, child: &Bsdf<'_>, w: &Vector3f) -> Vector3f {
    child.world_to_bsdf(&frame.local_to_world(w))
}

/// Converts a direction from the local frame of a child back to the frame of
/// the composite.
///
/// * `frame` - Local frame of the composite.
/// * `child` - The child Bsdf.
/// * `w`     - Direction in the child frame.
#[inline]
pub fn from_child(frame: &Frame, child: &Bsdf<'_>, w: &Vector3f) -> Vector3f {
    frame.world_to_local(&child.bsdf_to_world(w))
}

/// Evaluates a child for directions given in the composite frame. The value
/// is rescaled by the ratio of the cosines so that it integrates against the
/// cosine of the composite frame.
///
/// * `frame`     - Local frame of the composite.
/// * `child`     - The child Bsdf.
/// * `omega_in`  - Direction towards the viewer.
/// * `omega_out` - Direction towards the light.
/// * `allowed`   - Capabilities the caller accepts.
pub fn evaluate_child(
    frame: &Frame,
    child: &Bsdf<'_>,
    omega_in: &Vector3f,
    omega_out: &Vector3f,
    allowed: BsdfCaps,
) -> BsdfOut {
    if omega_out.z == 0.0 {
        return BsdfOut::default();
    }
    let w_in = to_child(frame, child, omega_in);
    let w_out = to_child(frame, child, omega_out);
    if w_in.z == 0.0 {
        return BsdfOut::default();
    }
    let out = child.evaluate(&w_in, &w_out, allowed);
    BsdfOut::new(out.value * abs(w_out.z / omega_out.z), out.pdf)
}

/// Samples a child and returns the result in the composite frame, with the
/// value rescaled like `evaluate_child()`.
///
/// * `frame`            - Local frame of the composite.
/// * `child`            - The child Bsdf.
/// * `omega_in`         - Direction towards the viewer.
/// * `u`                - The 2D uniform random values.
/// * `component_sample` - Component sample for the child.
/// * `allowed`          - Capabilities the caller accepts.
pub fn sample_child(
    frame: &Frame,
    child: &Bsdf<'_>,
    omega_in: &Vector3f,
    u: &Point2f,
    component_sample: Float,
    allowed: BsdfCaps,
) -> SampleBsdfOut {
    let w_in = to_child(frame, child, omega_in);
    if w_in.z == 0.0 {
        return SampleBsdfOut::default();
    }
    let mut out = child.sample(&w_in, u, component_sample, allowed);
    if !out.is_valid() {
        return SampleBsdfOut::default();
    }
    let w_out = out.omega_out;
    out.omega_out = from_child(frame, child, &w_out);
    if out.omega_out.z == 0.0 {
        return SampleBsdfOut::default();
    }
    out.value *= abs(w_out.z / out.omega_out.z);
    out
}
