//! Command line options

use clap::{Args, Parser, Subcommand};
use bsdf_core::paramset::*;
use bsdf_core::pbrt::*;

/// Probes shaders of the BSDF library.
#[derive(Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Options {
    /// What to probe.
    #[clap(subcommand)]
    pub command: Command,
}

/// Probe commands.
#[derive(Subcommand, Clone)]
pub enum Command {
    /// Estimate the directional albedo of a shader and check reciprocity.
    Albedo(AlbedoArgs),

    /// Print the header and layout of a Fourier BSDF file.
    TableInfo {
        /// Path to the Fourier BSDF file.
        #[clap(value_name = "FILE")]
        path: String,
    },
}

/// Options of the `albedo` command.
#[derive(Args, Clone)]
pub struct AlbedoArgs {
    /// Shader name.
    #[clap(value_name = "SHADER")]
    pub shader: String,

    /// Child shaders of composite shaders, built with default parameters.
    #[clap(long = "child", value_name = "SHADER")]
    pub children: Vec<String>,

    /// Float parameters.
    #[clap(long = "float", value_name = "NAME=V")]
    pub floats: Vec<String>,

    /// Integer parameters.
    #[clap(long = "int", value_name = "NAME=N")]
    pub ints: Vec<String>,

    /// RGB parameters.
    #[clap(long = "rgb", value_name = "NAME=R,G,B")]
    pub rgbs: Vec<String>,

    /// String parameters.
    #[clap(long = "string", value_name = "NAME=S")]
    pub strings: Vec<String>,

    /// Number of zenith angles of the incident direction.
    #[clap(long = "angles", short = 'a', value_name = "NUM", default_value_t = 16)]
    pub n_angles: usize,

    /// Number of samples per angle.
    #[clap(long = "samples", short = 's', value_name = "NUM", default_value_t = 10_000)]
    pub n_samples: usize,

    /// Number of threads.
    #[clap(long = "nthreads", short = 't', value_name = "NUM", default_value_t = 1)]
    pub n_threads: usize,

    /// Seed of the first random stream.
    #[clap(long, value_name = "NUM", default_value_t = 0)]
    pub seed: u64,
}

impl AlbedoArgs {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        match self.n_threads {
            0 => {
                warn!("Invalid nthreads");
                1
            }
            n => n,
        }
    }

    /// Collects the shader parameters.
    pub fn params(&self) -> Result<ParamSet, String> {
        let mut params = ParamSet::new();
        for arg in &self.floats {
            let (name, value) = split_param(arg)?;
            params.add_float(name, &[parse_number(name, value)?]);
        }
        for arg in &self.ints {
            let (name, value) = split_param(arg)?;
            let n = value
                .parse::<Int>()
                .map_err(|e| format!("Invalid integer for '{}': {}", name, e))?;
            params.add_int(name, &[n]);
        }
        for arg in &self.rgbs {
            let (name, value) = split_param(arg)?;
            let rgb = value
                .split(',')
                .map(|v| parse_number(name, v))
                .collect::<Result<Vec<Float>, String>>()?;
            if rgb.len() != 3 {
                return Err(format!("RGB parameter '{}' needs 3 values", name));
            }
            params.add_rgb_spectrum(name, &rgb)?;
        }
        for arg in &self.strings {
            let (name, value) = split_param(arg)?;
            params.add_string(name, &[String::from(value)]);
        }
        Ok(params)
    }
}

/// Splits `name=value`.
///
/// * `arg` - The argument.
fn split_param(arg: &str) -> Result<(&str, &str), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name, value)),
        _ => Err(format!("Expected NAME=VALUE, got '{}'", arg)),
    }
}

/// Parses a float parameter value.
///
/// * `name`  - Parameter name.
/// * `value` - The value.
fn parse_number(name: &str, value: &str) -> Result<Float, String> {
    value
        .trim()
        .parse::<Float>()
        .map_err(|e| format!("Invalid number for '{}': {}", name, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AlbedoArgs {
        let mut argv = vec!["bsdf-probe", "albedo"];
        argv.extend_from_slice(args);
        let options = Options::parse_from(argv);
        match options.command {
            Command::Albedo(args) => args,
            _ => panic!("expected albedo"),
        }
    }

    #[test]
    fn parameters_by_type() {
        let args = parse(&["mirror", "--float", "fuzz=0.2", "--rgb", "reflectance=1,0.5,0.25", "--int", "numberOfSamples=4"]);
        assert_eq!(args.shader, "mirror");
        let params = args.params().unwrap();
        assert_eq!(params.find_one_float("fuzz", 0.0), 0.2);
        assert_eq!(params.find_one_int("numberOfSamples", 1), 4);
        assert_eq!(params.find_spectrum("reflectance").len(), 1);
    }

    #[test]
    fn malformed_parameters() {
        assert!(parse(&["lambert", "--float", "diffuse"]).params().is_err());
        assert!(parse(&["lambert", "--float", "=0.5"]).params().is_err());
        assert!(parse(&["lambert", "--rgb", "diffuse=1,2"]).params().is_err());
        assert!(parse(&["lambert", "--float", "diffuse=x"]).params().is_err());
    }
}
