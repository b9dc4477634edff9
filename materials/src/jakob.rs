//! Jakob Shader

use super::*;
use std::collections::HashMap;
use std::sync::Mutex;

lazy_static! {
    /// Caches Fourier BSDF tables by file path.
    static ref FOURIER_TABLES: Mutex<HashMap<String, Arc<FourierTable>>> = Mutex::new(HashMap::new());
}

/// Returns the table stored in a file, loading it on first use.
///
/// * `path` - Path to the Fourier BSDF file.
pub fn load_fourier_table(path: &str) -> Result<Arc<FourierTable>, String> {
    let mut tables = FOURIER_TABLES
        .lock()
        .map_err(|_| String::from("Fourier BSDF cache is poisoned"))?;
    if let Some(table) = tables.get(path) {
        return Ok(Arc::clone(table));
    }
    let table = Arc::new(FourierTable::from_file(path)?);
    tables.insert(String::from(path), Arc::clone(&table));
    Ok(table)
}

/// Implements measured or layered materials tabulated in the Fourier basis
/// of Jakob et al.
pub struct JakobShader {
    /// The BSDF data.
    table: Arc<FourierTable>,

    /// Number of samples for Monte Carlo estimates.
    number_of_samples: usize,
}

/// Parameters of a `JakobShader`. Holds the table data itself so that a
/// shader can be restored without its file.
#[derive(Clone, Debug, PartialEq)]
pub struct JakobState {
    pub version: u32,
    pub nodes: Vec<Float>,
    pub cdf: Vec<Float>,
    pub offsets: Vec<usize>,
    pub lengths: Vec<usize>,
    pub coefficients: Vec<Float>,
    pub channels: usize,
    pub eta: Float,
    pub alpha: [Float; 2],
    pub number_of_samples: usize,
}

impl JakobShader {
    /// Create a new `JakobShader`.
    ///
    /// * `table` - The BSDF data.
    pub fn new(table: Arc<FourierTable>) -> Self {
        Self {
            table,
            number_of_samples: 1,
        }
    }

    /// Sets the number of samples for Monte Carlo estimates.
    ///
    /// * `n` - Number of samples.
    pub fn set_number_of_samples(&mut self, n: usize) {
        self.number_of_samples = n;
    }

    /// Returns the BSDF data.
    pub fn table(&self) -> &Arc<FourierTable> {
        &self.table
    }
}

impl Shader for JakobShader {
    fn name(&self) -> &'static str {
        "Jakob"
    }

    fn caps(&self) -> BsdfCaps {
        self.table.caps()
    }

    fn bsdf<'a>(&'a self, arena: &'a Bump, _sample: &Sample, ctx: &ShadingContext) -> &'a Bsdf<'a> {
        Bsdf::alloc(arena, ctx, self.table.caps(), FourierBsdf::alloc(arena, &self.table))
    }

    fn num_reflection_samples(&self) -> usize {
        self.number_of_samples
    }

    fn num_transmission_samples(&self) -> usize {
        self.number_of_samples
    }
}

impl Persistent for JakobShader {
    type State = JakobState;

    fn state(&self) -> Self::State {
        let table = &self.table;
        JakobState {
            version: STATE_VERSION,
            nodes: table.nodes().to_vec(),
            cdf: table.cdf().to_vec(),
            offsets: table.offsets().to_vec(),
            lengths: table.lengths().to_vec(),
            coefficients: table.all_coefficients().to_vec(),
            channels: table.channels(),
            eta: table.eta(),
            alpha: table.alpha(),
            number_of_samples: self.number_of_samples,
        }
    }

    fn set_state(&mut self, state: Self::State) -> Result<(), String> {
        check_version(self.name(), state.version)?;
        let table = FourierTable::new(
            state.nodes,
            state.cdf,
            state.offsets,
            state.lengths,
            state.coefficients,
            state.channels,
        )?
        .with_metadata(state.eta, state.alpha);
        self.table = Arc::new(table);
        self.number_of_samples = state.number_of_samples;
        Ok(())
    }
}

impl TryFrom<&TextureParams> for JakobShader {
    type Error = String;

    /// Create a Jakob shader from given parameter set.
    ///
    /// * `tp` - Texture parameter set.
    fn try_from(tp: &TextureParams) -> Result<Self, Self::Error> {
        let path = tp.find_string("bsdffile", String::new());
        if path.is_empty() {
            return Err(String::from("Jakob shader needs a 'bsdffile'"));
        }
        let mut shader = Self::new(load_fourier_table(&path)?);
        shader.set_number_of_samples(number_of_samples(tp)?);
        Ok(shader)
    }
}
