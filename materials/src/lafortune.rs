//! Lafortune Shader

use super::*;
use itertools::izip;

/// Implements Lafortune's generalised cosine lobes over a Lambertian base,
/// typically fitted to measured data.
pub struct LafortuneShader {
    /// Reflectance of the Lambertian base.
    diffuse: ArcTexture<Spectrum>,

    /// The cosine lobes.
    lobes: Vec<LafortuneLobe>,
}

/// Parameters of a `LafortuneShader`.
#[derive(Clone)]
pub struct LafortuneState {
    pub version: u32,
    pub diffuse: ArcTexture<Spectrum>,
    pub lobes: Vec<LafortuneLobe>,
}

impl LafortuneShader {
    /// Create a new `LafortuneShader` without lobes.
    ///
    /// * `diffuse` - Reflectance of the Lambertian base.
    pub fn new(diffuse: ArcTexture<Spectrum>) -> Self {
        Self { diffuse, lobes: vec![] }
    }

    /// Appends a lobe.
    ///
    /// * `lobe` - The lobe.
    pub fn add_lobe(&mut self, lobe: LafortuneLobe) -> Result<(), String> {
        if self.lobes.len() >= MAX_LAFORTUNE_LOBES {
            return Err(format!(
                "Lafortune shader supports at most {} lobes",
                MAX_LAFORTUNE_LOBES
            ));
        }
        self.lobes.push(lobe);
        Ok(())
    }

    /// Returns the lobes.
    pub fn lobes(&self) -> &[LafortuneLobe] {
        &self.lobes
    }
}

impl Shader for LafortuneShader {
    fn name(&self) -> &'static str {
        "Lafortune"
    }

    fn caps(&self) -> BsdfCaps {
        Lafortune::CAPS
    }

    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        let bxdf = Lafortune::alloc(arena, self.diffuse.evaluate(sample, ctx), &self.lobes);
        Bsdf::alloc(arena, ctx, Lafortune::CAPS, bxdf)
    }
}

impl Persistent for LafortuneShader {
    type State = LafortuneState;

    fn state(&self) -> Self::State {
        LafortuneState {
            version: STATE_VERSION,
            diffuse: Arc::clone(&self.diffuse),
            lobes: self.lobes.clone(),
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        if state.lobes.len() > MAX_LAFORTUNE_LOBES {
            return Err(format!(
                "Lafortune shader supports at most {} lobes, got {}",
                MAX_LAFORTUNE_LOBES,
                state.lobes.len()
            ));
        }
        self.diffuse = state.diffuse;
        self.lobes = state.lobes;
        Ok(())
    }
}

impl TryFrom<&TextureParams> for LafortuneShader {
    type Error = String;

    /// Create a Lafortune shader from given parameter set. Lobe `i` is made
    /// of the `i`-th values of `lobeX`, `lobeY`, `lobeZ` and `lobePower`.
    ///
    /// * `tp` - Texture parameter set.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let mut shader = Self::new(tp.get_spectrum_texture_or_else(
            "diffuse",
            Spectrum::new(0.5),
            ConstantTexture::arc,
        ));

        let x = tp.params.find_spectrum("lobeX");
        let y = tp.params.find_spectrum("lobeY");
        let z = tp.params.find_spectrum("lobeZ");
        let power = tp.params.find_spectrum("lobePower");
        if y.len() != x.len() || z.len() != x.len() || power.len() != x.len() {
            return Err(format!(
                "Lafortune lobe parameters differ in length: {} {} {} {}",
                x.len(),
                y.len(),
                z.len(),
                power.len()
            ));
        }
        for (x, y, z, power) in izip!(&x, &y, &z, &power) {
            shader.add_lobe(LafortuneLobe::new(*x, *y, *z, *power))?;
        }
        Ok(shader)
    }
}
