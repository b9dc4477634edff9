//! Common

use super::*;

/// Evaluates a refractive index texture, floored at `MIN_INDEX`.
///
/// * `tex`    - The texture.
/// * `sample` - The camera sample.
/// * `ctx`    - The shading context.
pub fn refractive_index(tex: &ArcTexture<Spectrum>, sample: &Sample, ctx: &ShadingContext) -> Float {
    max(tex.evaluate(sample, ctx).average(), MIN_INDEX)
}

/// Returns the refractive indices on the `+z` and `-z` sides of the
/// surface. The `+z` side is the inner one only when the ray leaves the
/// solid.
///
/// * `outer`       - Index of the medium outside the solid.
/// * `inner`       - Index of the solid.
/// * `solid_event` - Solid event of the ray.
pub fn oriented_indices(outer: Float, inner: Float, solid_event: SolidEvent) -> (Float, Float) {
    match solid_event {
        SolidEvent::Leaving => (inner, outer),
        SolidEvent::Entering | SolidEvent::NoEvent => (outer, inner),
    }
}

/// Reads the microfacet distribution named by the `mdf` parameter.
///
/// * `tp` - Texture parameters.
pub fn find_mdf(tp: &TextureParams) -> Result<MicrofacetKind, String> {
    let name = tp.find_string("mdf", MicrofacetKind::default().to_string());
    name.parse()
}

/// Reads the `numberOfSamples` parameter of the sampled shaders.
///
/// * `tp` - Texture parameters.
pub fn number_of_samples(tp: &TextureParams) -> Result<usize, String> {
    let n = tp.find_int("numberOfSamples", 1);
    if n < 1 {
        return Err(format!("numberOfSamples must be positive, got {}", n));
    }
    Ok(n as usize)
}

/// Builds the Bsdf of a child shader on its own copy of the shading context,
/// shaded by the child first.
///
/// * `child`  - The child shader.
/// * `arena`  - The arena for memory allocations.
/// * `sample` - The camera sample.
/// * `ctx`    - The shading context of the parent.
pub fn child_bsdf<'a>(
    child: &'a ArcShader,
    arena: &'a Bump,
    sample: &Sample,
    ctx: &ShadingContext,
) -> &'a Bsdf<'a> {
    let mut child_ctx = *ctx;
    child.shade_context(sample, &mut child_ctx);
    child.bsdf(arena, sample, &child_ctx)
}

/// Returns the union of the capabilities of the shaders.
///
/// * `shaders` - The shaders.
pub fn caps_union<'a, I>(shaders: I) -> BsdfCaps
where
    I: IntoIterator<Item = &'a ArcShader>,
{
    shaders
        .into_iter()
        .fold(BsdfCaps::NONE, |caps, shader| caps | shader.caps())
}

/// Returns a constant spectrum texture.
///
/// * `v` - The value.
pub fn constant_spectrum(v: Float) -> ArcTexture<Spectrum> {
    ConstantTexture::arc(Spectrum::new(v))
}

/// Returns a constant float texture.
///
/// * `v` - The value.
pub fn constant_float(v: Float) -> ArcTexture<Float> {
    ConstantTexture::arc(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaving_swaps_indices() {
        assert_eq!(oriented_indices(1.0, 1.5, SolidEvent::Entering), (1.0, 1.5));
        assert_eq!(oriented_indices(1.0, 1.5, SolidEvent::NoEvent), (1.0, 1.5));
        assert_eq!(oriented_indices(1.0, 1.5, SolidEvent::Leaving), (1.5, 1.0));
    }

    #[test]
    fn index_floor() {
        let tex = constant_spectrum(-2.0);
        let ior = refractive_index(&tex, &Sample::default(), &ShadingContext::default());
        assert_eq!(ior, MIN_INDEX);
    }

    #[test]
    fn sample_count_must_be_positive() {
        assert_eq!(number_of_samples(&TextureParams::default()), Ok(1));
        let mut params = ParamSet::new();
        params.add_int("numberOfSamples", &[0]);
        let tp = TextureParams::new(params, FloatTextureMap::new(), SpectrumTextureMap::new());
        assert!(number_of_samples(&tp).is_err());
    }

    #[test]
    fn mdf_names() {
        assert_eq!(find_mdf(&TextureParams::default()), Ok(MicrofacetKind::TrowbridgeReitz));
        let mut params = ParamSet::new();
        params.add_string("mdf", &[String::from("beckmann")]);
        let tp = TextureParams::new(params, FloatTextureMap::new(), SpectrumTextureMap::new());
        assert_eq!(find_mdf(&tp), Ok(MicrofacetKind::Beckmann));
        let mut params = ParamSet::new();
        params.add_string("mdf", &[String::from("phong")]);
        let tp = TextureParams::new(params, FloatTextureMap::new(), SpectrumTextureMap::new());
        assert!(find_mdf(&tp).is_err());
    }
}
