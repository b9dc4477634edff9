#[macro_use]
extern crate log;

mod options;
mod probe;

use clap::Parser;
use bsdf_core::paramset::*;
use bsdf_core::reflection::FourierTable;
use bsdf_core::texture::*;
use materials::*;
use options::*;
use probe::*;

/// Relative reciprocity error above which a warning is logged.
const RECIPROCITY_TOLERANCE: f32 = 1e-3;

fn main() {
    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    let result = match &options.command {
        Command::Albedo(args) => albedo(args),
        Command::TableInfo { path } => table_info(path),
    };

    // Report errors and exit with failure.
    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

fn albedo(args: &AlbedoArgs) -> Result<(), String> {
    let defaults = TextureParams::default();
    let children = args
        .children
        .iter()
        .map(|name| make_shader(name, &defaults, &[]))
        .collect::<Result<Vec<_>, String>>()?;

    let tp = TextureParams::new(args.params()?, FloatTextureMap::new(), SpectrumTextureMap::new());
    let shader = make_shader(&args.shader, &tp, &children)?;
    info!("Shader {} with caps {}", shader.name(), shader.caps());

    let results = probe(&shader, args);
    println!("{:>8} {:>10} {:>10} {:>10} {:>12}", "theta", "red", "green", "blue", "reciprocity");
    for r in results.iter() {
        println!(
            "{:>8.4} {:>10.6} {:>10.6} {:>10.6} {:>12.3e}",
            r.theta, r.albedo[0], r.albedo[1], r.albedo[2], r.reciprocity
        );
        if r.albedo.max_component_value() > 1.0 + 1e-2 {
            warn!("Albedo {} above 1 at theta {}", r.albedo, r.theta);
        }
        if r.reciprocity > RECIPROCITY_TOLERANCE {
            warn!("Reciprocity error {} at theta {}", r.reciprocity, r.theta);
        }
    }
    Ok(())
}

fn table_info(path: &str) -> Result<(), String> {
    let table = FourierTable::from_file(path)?;
    let [alpha_u, alpha_v] = table.alpha();
    println!("file:         {}", path);
    println!("nodes:        {}", table.nodes().len());
    println!("channels:     {}", table.channels());
    println!("coefficients: {}", table.all_coefficients().len());
    println!("max order:    {}", table.max_length());
    println!("eta:          {}", table.eta());
    println!("alpha:        {} {}", alpha_u, alpha_v);
    println!("caps:         {}", table.caps());
    println!("cdf slope:    {:.3e}", table.cdf_slope_error());
    Ok(())
}
