//! Spectrum

mod rgb_spectrum;

// Re-export
pub use rgb_spectrum::*;

/// Spectral values are carried as linear RGB triplets.
pub type Spectrum = RGBSpectrum;
