//! Lafortune

use super::*;
use bumpalo::Bump;

/// Maximum number of cosine lobes of a `Lafortune` model.
pub const MAX_LAFORTUNE_LOBES: usize = 8;

/// One generalised cosine lobe `max(0, x ix ox + y iy oy + z iz oz)^power`,
/// evaluated per channel.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LafortuneLobe {
    pub x: Spectrum,
    pub y: Spectrum,
    pub z: Spectrum,
    pub power: Spectrum,
}

impl LafortuneLobe {
    /// Create a new `LafortuneLobe`.
    ///
    /// * `x`     - Weight of the first tangent component.
    /// * `y`     - Weight of the second tangent component.
    /// * `z`     - Weight of the normal component.
    /// * `power` - Exponent.
    pub fn new(x: Spectrum, y: Spectrum, z: Spectrum, power: Spectrum) -> Self {
        Self { x, y, z, power }
    }

    fn value(&self, omega: &Vector3f) -> Spectrum {
        let c = self.x * omega.x + self.y * omega.y + self.z * omega.z;
        c.max_value(0.0).pow_spectrum(&self.power)
    }
}

/// Lafortune's generalised cosine lobes over a Lambertian base. Sampling is
/// cosine weighted.
#[derive(Copy, Clone, Debug)]
pub struct Lafortune<'arena> {
    diffuse_over_pi: Spectrum,
    lobes: &'arena [LafortuneLobe],
}

assert_bsdf_size!(Lafortune<'static>);

impl<'arena> Lafortune<'arena> {
    /// Capabilities of the model.
    pub const CAPS: BsdfCaps = BsdfCaps::REFLECTION.union(BsdfCaps::DIFFUSE);

    /// Allocate a new `Lafortune` and its lobes in the arena.
    ///
    /// * `arena`   - The arena for memory allocations.
    /// * `diffuse` - Reflectance of the Lambertian base.
    /// * `lobes`   - The cosine lobes, at most `MAX_LAFORTUNE_LOBES`.
    pub fn alloc(arena: &'arena Bump, diffuse: Spectrum, lobes: &[LafortuneLobe]) -> BxDF<'arena> {
        if lobes.len() > MAX_LAFORTUNE_LOBES {
            warn!(
                "Lafortune model with {} lobes, using the first {}",
                lobes.len(),
                MAX_LAFORTUNE_LOBES
            );
        }
        let n = min(lobes.len(), MAX_LAFORTUNE_LOBES);
        let model = Lafortune {
            diffuse_over_pi: diffuse * INV_PI,
            lobes: arena.alloc_slice_copy(&lobes[..n]),
        };
        BxDF::Lafortune(arena.alloc(model))
    }

    /// Returns the value and density for a pair of directions.
    ///
    /// * `omega_in`  - Direction towards the viewer.
    /// * `omega_out` - Direction towards the light.
    /// * `allowed`   - Capabilities the caller accepts.
    pub fn evaluate(&self, omega_in: &Vector3f, omega_out: &Vector3f, allowed: BsdfCaps) -> BsdfOut {
        if !compatible_caps(Self::CAPS, allowed) || !same_hemisphere(omega_in, omega_out) {
            return BsdfOut::default();
        }
        BsdfOut::new(
            self.value(omega_in, omega_out),
            cosine_hemisphere_pdf(abs_cos_theta(omega_out)),
        )
    }

    /// Samples a cosine-weighted direction on the side of `omega_in`.
    ///
    /// * `omega_in`         - Direction towards the viewer.
    /// * `u`                - The 2D uniform random values.
    /// * `component_sample` - Unused.
    /// * `allowed`          - Capabilities the caller accepts.
    pub fn sample(
        &self,
        omega_in: &Vector3f,
        u: &Point2f,
        _component_sample: Float,
        allowed: BsdfCaps,
    ) -> SampleBsdfOut {
        if !compatible_caps(Self::CAPS, allowed) || omega_in.z == 0.0 {
            return SampleBsdfOut::default();
        }
        let mut omega_out = cosine_sample_hemisphere(u);
        if omega_in.z < 0.0 {
            omega_out.z = -omega_out.z;
        }
        SampleBsdfOut::new(
            omega_out,
            self.value(omega_in, &omega_out),
            cosine_hemisphere_pdf(abs_cos_theta(&omega_out)),
            Self::CAPS,
        )
    }

    fn value(&self, omega_in: &Vector3f, omega_out: &Vector3f) -> Spectrum {
        let omega = Vector3f::new(
            omega_in.x * omega_out.x,
            omega_in.y * omega_out.y,
            omega_in.z * omega_out.z,
        );
        self.lobes
            .iter()
            .fold(self.diffuse_over_pi, |acc, lobe| acc + lobe.value(&omega))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn without_lobes_is_lambertian() {
        let arena = Bump::new();
        let bxdf = Lafortune::alloc(&arena, Spectrum::new(0.5), &[]);
        let omega_in = Vector3f::new(0.0, 0.0, 1.0);
        let a = testing::albedo(10_000, 37, |u, cs| bxdf.sample(&omega_in, u, cs, BsdfCaps::ALL));
        assert!(approx_eq!(f32, a[0], 0.5, epsilon = 1e-4));
    }

    #[test]
    fn retro_reflective_lobe_peaks_towards_viewer() {
        let arena = Bump::new();
        let lobe = LafortuneLobe::new(
            Spectrum::new(1.0),
            Spectrum::new(1.0),
            Spectrum::new(1.0),
            Spectrum::new(10.0),
        );
        let bxdf = Lafortune::alloc(&arena, Spectrum::ZERO, &[lobe]);
        let i = Vector3f::new(0.6, 0.0, 0.8);
        let back = bxdf.evaluate(&i, &i, BsdfCaps::ALL);
        let mirror = bxdf.evaluate(&i, &reflect(&i), BsdfCaps::ALL);
        assert!(back.value[0] > mirror.value[0]);
        assert!(approx_eq!(f32, back.value[0], 1.0, epsilon = 1e-5));
    }

    #[test]
    fn extra_lobes_are_dropped() {
        let arena = Bump::new();
        let lobes = [LafortuneLobe::default(); MAX_LAFORTUNE_LOBES + 1];
        match Lafortune::alloc(&arena, Spectrum::new(0.5), &lobes) {
            BxDF::Lafortune(m) => assert_eq!(m.lobes.len(), MAX_LAFORTUNE_LOBES),
            _ => unreachable!(),
        }
    }
}
