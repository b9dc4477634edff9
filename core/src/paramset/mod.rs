//! Parameter Sets
//!
//! Shaders are configured from named, typed lists of values. Every lookup
//! marks the entry as used so that misspelled parameters can be reported
//! once a shader has been built.

use crate::pbrt::*;
use crate::spectrum::*;
use std::cell::Cell;
use std::collections::HashMap;

mod texture_params;

pub use texture_params::*;

/// The values given for one parameter name.
#[derive(Clone, Debug, Default)]
pub struct ParamSetItem<T> {
    pub values: Vec<T>,

    /// Set once the parameter has been read.
    pub looked_up: Cell<bool>,
}

impl<T: Clone> ParamSetItem<T> {
    /// Wraps a list of values that has not been read yet.
    ///
    /// * `values` - The values.
    pub fn new(values: Vec<T>) -> Self {
        Self {
            values,
            looked_up: Cell::new(false),
        }
    }

    /// Returns the values and marks them as used.
    fn read(&self) -> &[T] {
        self.looked_up.set(true);
        &self.values
    }
}

type Items<T> = HashMap<String, ParamSetItem<T>>;

fn insert<T: Clone>(items: &mut Items<T>, name: &str, values: &[T]) {
    items.insert(name.to_owned(), ParamSetItem::new(values.to_vec()));
}

/// A single value wins only when exactly one was given; longer lists are
/// left unread so they are reported.
fn find_one<T: Clone>(items: &Items<T>, name: &str, default: T) -> T {
    match items.get(name) {
        Some(item) if item.values.len() == 1 => item.read()[0].clone(),
        _ => default,
    }
}

fn find_all<T: Clone>(items: &Items<T>, name: &str) -> Vec<T> {
    items.get(name).map(|item| item.read().to_vec()).unwrap_or_default()
}

fn warn_unused<T>(items: &Items<T>, kind: &str) {
    items
        .iter()
        .filter(|(_, item)| !item.looked_up.get())
        .for_each(|(name, _)| warn!("Parameter '{} {}' not used", kind, name));
}

/// Typed shader parameters stored by name.
#[derive(Clone, Debug, Default)]
pub struct ParamSet {
    pub ints: Items<Int>,
    pub floats: Items<Float>,
    pub spectra: Items<Spectrum>,
    pub strings: Items<String>,

    /// Names of textures bound to a parameter.
    pub textures: Items<String>,
}

impl ParamSet {
    /// Returns an empty `ParamSet`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_int(&mut self, name: &str, values: &[Int]) {
        insert(&mut self.ints, name, values);
    }

    pub fn add_float(&mut self, name: &str, values: &[Float]) {
        insert(&mut self.floats, name, values);
    }

    pub fn add_spectrum(&mut self, name: &str, values: &[Spectrum]) {
        insert(&mut self.spectra, name, values);
    }

    pub fn add_string(&mut self, name: &str, values: &[String]) {
        insert(&mut self.strings, name, values);
    }

    /// Binds a parameter to a named texture.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - Texture name, given as a one element list.
    pub fn add_texture(&mut self, name: &str, values: &[String]) {
        insert(&mut self.textures, name, values);
    }

    /// Adds spectra given as flat `r, g, b` triplets.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - RGB values in a linear slice.
    pub fn add_rgb_spectrum(&mut self, name: &str, values: &[Float]) -> Result<(), String> {
        if values.len() % 3 != 0 {
            return Err(format!(
                "RGB spectrum '{}' needs a multiple of 3 values, got {}",
                name,
                values.len()
            ));
        }
        let spectra: Vec<Spectrum> = values
            .chunks_exact(3)
            .map(|c| Spectrum::from_rgb([c[0], c[1], c[2]]))
            .collect();
        self.add_spectrum(name, &spectra);
        Ok(())
    }

    pub fn find_one_int(&self, name: &str, default: Int) -> Int {
        find_one(&self.ints, name, default)
    }

    pub fn find_one_float(&self, name: &str, default: Float) -> Float {
        find_one(&self.floats, name, default)
    }

    pub fn find_one_spectrum(&self, name: &str, default: Spectrum) -> Spectrum {
        find_one(&self.spectra, name, default)
    }

    pub fn find_one_string(&self, name: &str, default: String) -> String {
        find_one(&self.strings, name, default)
    }

    pub fn find_one_texture(&self, name: &str, default: String) -> String {
        find_one(&self.textures, name, default)
    }

    pub fn find_float(&self, name: &str) -> Vec<Float> {
        find_all(&self.floats, name)
    }

    pub fn find_spectrum(&self, name: &str) -> Vec<Spectrum> {
        find_all(&self.spectra, name)
    }

    /// Returns true if a float, spectrum or texture parameter with the given
    /// name exists.
    ///
    /// * `name` - Parameter name.
    pub fn has_param(&self, name: &str) -> bool {
        self.floats.contains_key(name)
            || self.spectra.contains_key(name)
            || self.textures.contains_key(name)
    }

    /// Logs a warning for every parameter that was never looked up.
    pub fn report_unused(&self) {
        warn_unused(&self.ints, "integer");
        warn_unused(&self.floats, "float");
        warn_unused(&self.spectra, "color");
        warn_unused(&self.strings, "string");
        warn_unused(&self.textures, "texture");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_one_marks_looked_up() {
        let mut ps = ParamSet::new();
        ps.add_float("roughness", &[0.2]);
        ps.add_float("list", &[0.2, 0.3]);
        assert_eq!(ps.find_one_float("roughness", 1.0), 0.2);
        assert_eq!(ps.find_one_float("list", 1.0), 1.0);
        assert_eq!(ps.find_one_float("missing", 1.0), 1.0);
        assert!(ps.floats["roughness"].looked_up.get());
        assert!(!ps.floats["list"].looked_up.get());
        assert_eq!(ps.find_float("list"), vec![0.2, 0.3]);
        assert!(ps.floats["list"].looked_up.get());
    }

    #[test]
    fn rgb_spectrum_needs_triplets() {
        let mut ps = ParamSet::new();
        assert!(ps.add_rgb_spectrum("diffuse", &[0.1, 0.2]).is_err());
        assert!(ps.add_rgb_spectrum("diffuse", &[0.1, 0.2, 0.3]).is_ok());
        assert_eq!(
            ps.find_one_spectrum("diffuse", Spectrum::ZERO),
            Spectrum::from_rgb([0.1, 0.2, 0.3])
        );
        assert!(ps.has_param("diffuse"));
        assert!(!ps.has_param("specular"));
    }
}
