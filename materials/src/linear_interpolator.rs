//! Linear Interpolator Shader

use super::*;
use ordered_float::OrderedFloat;

/// A key value with the shader used at that value.
pub type KeyShader = (Float, ArcShader);

/// Blends the two shaders whose keys bracket the value of a control texture.
/// Outside the keys the first or last shader is used as is.
pub struct LinearInterpolatorShader {
    /// Keys in increasing order.
    keys: Vec<KeyShader>,

    /// Control texture.
    control: ArcTexture<Float>,

    /// Union of the capabilities of the key shaders.
    caps: BsdfCaps,
}

/// Parameters of a `LinearInterpolatorShader`.
#[derive(Clone)]
pub struct LinearInterpolatorState {
    pub version: u32,
    pub keys: Vec<KeyShader>,
    pub control: ArcTexture<Float>,
}

impl LinearInterpolatorShader {
    /// Create a new `LinearInterpolatorShader`.
    ///
    /// * `keys`    - Key values and their shaders, in any order.
    /// * `control` - Control texture.
    pub fn new(keys: Vec<KeyShader>, control: ArcTexture<Float>) -> Self {
        let mut shader = Self {
            keys: vec![],
            control,
            caps: BsdfCaps::NONE,
        };
        shader.set_keys(keys);
        shader
    }

    /// Returns the keys in increasing order.
    pub fn keys(&self) -> &[KeyShader] {
        &self.keys
    }

    /// Replaces the keys.
    ///
    /// * `keys` - Key values and their shaders, in any order.
    pub fn set_keys(&mut self, mut keys: Vec<KeyShader>) {
        keys.sort_by_key(|(key, _)| OrderedFloat(*key));
        self.caps = caps_union(keys.iter().map(|(_, shader)| shader));
        self.keys = keys;
    }

    /// Inserts a key before the first key that is not smaller.
    ///
    /// * `key`    - Key value.
    /// * `shader` - Shader used at the key value.
    pub fn add_key(&mut self, key: Float, shader: ArcShader) {
        let i = self.keys.partition_point(|(k, _)| *k < key);
        self.caps |= shader.caps();
        self.keys.insert(i, (key, shader));
    }

    /// Replaces the control texture.
    ///
    /// * `control` - Control texture.
    pub fn set_control(&mut self, control: ArcTexture<Float>) {
        self.control = control;
    }

    /// Returns the keys to use for a control value: a single key outside the
    /// key range, otherwise the bracketing keys and the blend factor.
    fn bracket(&self, x: Float) -> Option<Bracket<'_>> {
        let i = self.keys.partition_point(|(k, _)| *k < x);
        if i == 0 {
            return self.keys.first().map(|(_, s)| Bracket::One(s));
        }
        if i == self.keys.len() {
            return self.keys.last().map(|(_, s)| Bracket::One(s));
        }
        let (ka, a) = &self.keys[i - 1];
        let (kb, b) = &self.keys[i];
        Some(Bracket::Two(a, b, (x - ka) / (kb - ka)))
    }

    fn max_over_keys<F>(&self, f: F) -> usize
    where
        F: Fn(&ArcShader) -> usize,
    {
        self.keys.iter().map(|(_, s)| f(s)).max().unwrap_or(0)
    }
}

/// Shaders selected by a control value.
enum Bracket<'a> {
    One(&'a ArcShader),
    Two(&'a ArcShader, &'a ArcShader, Float),
}

impl Shader for LinearInterpolatorShader {
    fn name(&self) -> &'static str {
        "LinearInterpolator"
    }

    fn caps(&self) -> BsdfCaps {
        self.caps
    }

    fn bsdf<'a>(&'a self, arena: &'a Bump, sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        match self.bracket(self.control.evaluate(sample, ctx)) {
            None => Bsdf::alloc(arena, ctx, BsdfCaps::NONE, SumBsdf::alloc(arena, ctx.frame(), &[])),
            Some(Bracket::One(shader)) => child_bsdf(shader, arena, sample, ctx),
            Some(Bracket::Two(a, b, t)) => {
                let caps = a.caps() | b.caps();
                let a = child_bsdf(a, arena, sample, ctx);
                let b = child_bsdf(b, arena, sample, ctx);
                let bxdf = LinearInterpolatorBsdf::alloc(arena, ctx.frame(), a, b, t);
                Bsdf::alloc(arena, ctx, caps, bxdf)
            }
        }
    }

    fn num_reflection_samples(&self) -> usize {
        self.max_over_keys(|s| s.num_reflection_samples())
    }

    fn num_transmission_samples(&self) -> usize {
        self.max_over_keys(|s| s.num_transmission_samples())
    }

    fn children(&self) -> Vec<&ArcShader> {
        self.keys.iter().map(|(_, s)| s).collect()
    }
}

impl Persistent for LinearInterpolatorShader {
    type State = LinearInterpolatorState;

    fn state(&self) -> Self::State {
        LinearInterpolatorState {
            version: STATE_VERSION,
            keys: self.keys.clone(),
            control: Arc::clone(&self.control),
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        self.set_keys(state.keys);
        self.control = state.control;
        Ok(())
    }
}

impl TryFrom<(&TextureParams, &[ArcShader])> for LinearInterpolatorShader {
    type Error = String;

    /// Create a linear interpolator from given parameter set. The `keys`
    /// float list gives the key of each child; without it the keys are
    /// spread evenly over [0, 1].
    ///
    /// * `p` - Tuple containing the texture parameter set and the children.
    fn try_from(p: (&TextureParams, &[ArcShader])) -> Result<Self, Self::Error> {
        let (tp, children) = p;
        let mut keys = tp.params.find_float("keys");
        if keys.is_empty() {
            let n = children.len();
            keys = (0..n)
                .map(|i| if n > 1 { i as Float / (n - 1) as Float } else { 0.0 })
                .collect();
        } else if keys.len() != children.len() {
            return Err(format!(
                "Linear interpolator has {} keys for {} shaders",
                keys.len(),
                children.len()
            ));
        }
        let control = tp.get_float_texture_or_else("control", 0.0, ConstantTexture::arc);
        let keys = keys.into_iter().zip(children.iter().cloned()).collect();
        Ok(Self::new(keys, control))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use float_cmp::approx_eq;

    fn lambert(r: Float) -> ArcShader {
        Arc::new(LambertShader::new(constant_spectrum(r)))
    }

    fn lambert_blend(control: Float) -> LinearInterpolatorShader {
        LinearInterpolatorShader::new(
            vec![(1.0, lambert(0.8)), (0.0, lambert(0.2))],
            constant_float(control),
        )
    }

    #[test]
    fn blends_bracketing_keys() {
        let shader = lambert_blend(0.25);
        assert_eq!(shader.keys()[0].0, 0.0);
        let arena = Bump::new();
        let bsdf = shade(&shader, &arena);
        let i = direction(0.3, 0.1);
        let a = albedo(bsdf, &i, 10_000, 71);
        // 0.75 * 0.2 + 0.25 * 0.8
        assert!(approx_eq!(f32, a[0], 0.35, epsilon = 1e-3), "{}", a);
        let err = max_sample_evaluate_error(bsdf, &i, 1_000, 72);
        assert!(err < 1e-3, "{}", err);
    }

    #[test]
    fn clamps_outside_keys() {
        for (control, expected) in [(-1.0, 0.2), (0.0, 0.2), (1.0, 0.8), (3.0, 0.8)] {
            let shader = lambert_blend(control);
            let arena = Bump::new();
            let bsdf = shade(&shader, &arena);
            let a = albedo(bsdf, &direction(0.3, 0.1), 1_000, 73);
            assert!(approx_eq!(f32, a[0], expected, epsilon = 1e-3), "{} {}", control, a);
        }
    }

    #[test]
    fn add_key_keeps_order() {
        let mut shader = LinearInterpolatorShader::new(vec![], constant_float(0.5));
        assert_eq!(shader.caps(), BsdfCaps::NONE);
        let arena = Bump::new();
        let bsdf = shade(&shader, &arena);
        assert!(!bsdf.sample(&direction(0.3, 0.0), &Point2f::new(0.5, 0.5), 0.5, BsdfCaps::ALL).is_valid());

        shader.add_key(1.0, lambert(0.8));
        shader.add_key(0.0, lambert(0.2));
        shader.add_key(0.5, Arc::new(MirrorShader::perfect(constant_spectrum(1.0))));
        let keys: Vec<Float> = shader.keys().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![0.0, 0.5, 1.0]);
        assert_eq!(shader.caps(), Lambert::CAPS | Mirror::caps_for(0.0));
        assert_eq!(shader.children().len(), 3);
    }

    #[test]
    fn bracket_caps_come_from_its_keys() {
        let mirror: ArcShader = Arc::new(MirrorShader::perfect(constant_spectrum(1.0)));
        let shader = LinearInterpolatorShader::new(
            vec![(0.0, lambert(0.2)), (1.0, lambert(0.8)), (2.0, mirror)],
            constant_float(0.5),
        );
        assert_eq!(shader.caps(), Lambert::CAPS | Mirror::caps_for(0.0));
        let arena = Bump::new();
        assert_eq!(shade(&shader, &arena).caps(), Lambert::CAPS);
    }

    #[test]
    fn keys_from_parameters() {
        let children = [lambert(0.2), lambert(0.5), lambert(0.8)];
        let tp = TextureParams::default();
        let shader = LinearInterpolatorShader::try_from((&tp, &children[..])).unwrap();
        let keys: Vec<Float> = shader.keys().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![0.0, 0.5, 1.0]);

        let mut params = ParamSet::new();
        params.add_float("keys", &[0.0, 1.0]);
        let tp = TextureParams::new(params, FloatTextureMap::new(), SpectrumTextureMap::new());
        assert!(LinearInterpolatorShader::try_from((&tp, &children[..])).is_err());
    }
}
