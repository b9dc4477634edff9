//! Albedo Probe

use crate::options::AlbedoArgs;
use bumpalo::Bump;
use bsdf_core::geometry::*;
use bsdf_core::interaction::*;
use bsdf_core::pbrt::*;
use bsdf_core::reflection::*;
use bsdf_core::rng::RNG;
use bsdf_core::sampler::*;
use bsdf_core::shader::*;
use bsdf_core::spectrum::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::thread;

/// Estimates at one incident direction.
#[derive(Copy, Clone, Debug, Default)]
pub struct AngleResult {
    /// Zenith angle of the incident direction.
    pub theta: Float,

    /// Directional albedo.
    pub albedo: Spectrum,

    /// Largest relative difference of `f(i, o)` and `f(o, i)` over the
    /// sampled reflected directions.
    pub reciprocity: Float,
}

/// Returns the zenith angle of the `k`-th of `n` incident directions.
///
/// * `k` - Index of the direction.
/// * `n` - Number of directions.
pub fn zenith_angle(k: usize, n: usize) -> Float {
    (k as Float + 0.5) / n as Float * PI_OVER_TWO
}

/// Creates a progress bar.
///
/// * `len` - Number of steps.
pub fn create_progress_bar(len: u64) -> ProgressBar {
    let progress = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    progress.set_style(style);
    progress
}

/// Estimates the albedo and the reciprocity error of a shader at one
/// incident zenith angle. The shader is evaluated on the default shading
/// context.
///
/// * `shader`    - The shader.
/// * `arena`     - The arena for memory allocations.
/// * `theta`     - Zenith angle of the incident direction.
/// * `n_samples` - Number of samples.
/// * `rng`       - The random number generator.
pub fn probe_angle(
    shader: &dyn Shader,
    arena: &Bump,
    theta: Float,
    n_samples: usize,
    rng: &mut RNG,
) -> AngleResult {
    let sample = Sample::default();
    let mut ctx = ShadingContext::default();
    shader.shade_context(&sample, &mut ctx);
    let bsdf = shader.bsdf(arena, &sample, &ctx);

    let omega_in = Vector3f::new(theta.sin(), 0.0, theta.cos());
    let mut albedo = Spectrum::ZERO;
    let mut reciprocity: Float = 0.0;
    for _ in 0..n_samples {
        let s = bsdf.sample(&omega_in, &rng.uniform_point2(), rng.uniform_float(), BsdfCaps::ALL);
        if !s.is_valid() {
            continue;
        }
        albedo += s.value * abs_cos_theta(&s.omega_out) / s.pdf;

        if s.used_caps.contains(BsdfCaps::SPECULAR) || s.omega_out.z <= 0.0 {
            continue;
        }
        let forward = bsdf.evaluate(&omega_in, &s.omega_out, BsdfCaps::ALL).value.average();
        let backward = bsdf.evaluate(&s.omega_out, &omega_in, BsdfCaps::ALL).value.average();
        let scale = max(max(abs(forward), abs(backward)), 1e-3);
        reciprocity = max(reciprocity, abs(forward - backward) / scale);
    }

    AngleResult {
        theta,
        albedo: albedo / max(n_samples, 1) as Float,
        reciprocity,
    }
}

/// Probes a shader at evenly spaced incident angles on worker threads.
///
/// * `shader` - The shader.
/// * `args`   - Probe options.
pub fn probe(shader: &ArcShader, args: &AlbedoArgs) -> Vec<AngleResult> {
    let n_angles = max(args.n_angles, 1);
    let n_threads = args.threads();
    let mut results = vec![AngleResult::default(); n_angles];

    let progress = create_progress_bar(n_angles as u64);
    progress.set_message(format!("Probing {}", shader.name()));

    thread::scope(|scope| {
        let (tx_collector, rx_collector) = crossbeam_channel::bounded::<(usize, AngleResult)>(n_angles);
        let (tx_worker, rx_worker) = crossbeam_channel::bounded::<usize>(n_angles);

        // Spawn worker threads, each with its own arena.
        for _ in 0..n_threads {
            let rx_worker = rx_worker.clone();
            let tx_collector = tx_collector.clone();
            let progress = &progress;
            scope.spawn(move || {
                let mut arena = Bump::new();
                for k in rx_worker.iter() {
                    let mut rng = RNG::new(args.seed + k as u64);
                    let theta = zenith_angle(k, n_angles);
                    let result = probe_angle(shader.as_ref(), &arena, theta, args.n_samples, &mut rng);
                    arena.reset();
                    progress.inc(1);
                    if tx_collector.send((k, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(rx_worker); // Drop extra since we've cloned one for each worker.
        drop(tx_collector);

        // Send work.
        for k in 0..n_angles {
            if tx_worker.send(k).is_err() {
                error!("Probe workers stopped early");
                break;
            }
        }
        drop(tx_worker);

        for (k, result) in rx_collector.iter() {
            results[k] = result;
        }
    });

    progress.finish_with_message("Probe complete");
    results
}
