//! Fourier BSDF Reader

use super::*;
use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, Read, Write};

/// The identifier at the start of every table file.
const IDENTIFIER: [u8; 7] = *b"SCATFUN";

/// The only supported file version.
const VERSION: u8 = 1;

/// The flags value of a plain BSDF.
const FLAGS_BSDF: u32 = 1;

/// Opens a file for reading or returns an error if unable to do so.
///
/// * `path` - The file path.
pub fn open_file(path: &str) -> Result<File, String> {
    File::open(path).map_err(|err| format!("Could not open {}. {}", path, err))
}

/// Helpers for reading the sections of a table file. Values are in host
/// byte order.
pub trait FourierReader: Read {
    /// Reads the identifier and the version byte.
    fn check_identifier(&mut self) -> Result<(), String> {
        let mut identifier = [0_u8; 7];
        self.read_exact(&mut identifier)
            .map_err(|err| format!("Error reading header. {}.", err))?;
        if identifier != IDENTIFIER {
            return Err(format!(
                "Not a Fourier BSDF file, identifier '{}'.",
                String::from_utf8_lossy(&identifier)
            ));
        }
        let version = ReadBytesExt::read_u8(self).map_err(|err| format!("Error reading version. {}.", err))?;
        if version != VERSION {
            return Err(format!("Unsupported file version {}.", version));
        }
        Ok(())
    }

    /// Reads one 32-bit unsigned value.
    ///
    /// * `what` - Name of the value for error messages.
    fn read_u32_value(&mut self, what: &str) -> Result<u32, String> {
        ReadBytesExt::read_u32::<NativeEndian>(self).map_err(|err| format!("Error reading {}. {}.", what, err))
    }

    /// Reads one 32-bit floating point value.
    ///
    /// * `what` - Name of the value for error messages.
    fn read_f32_value(&mut self, what: &str) -> Result<f32, String> {
        ReadBytesExt::read_f32::<NativeEndian>(self).map_err(|err| format!("Error reading {}. {}.", what, err))
    }

    /// Reads given number of 32-bit unsigned values.
    ///
    /// * `count` - Number of values to read.
    /// * `what`  - Name of the section for error messages.
    fn read_u32_vec(&mut self, count: usize, what: &str) -> Result<Vec<u32>, String> {
        let mut buffer = vec![0_u32; count];
        ReadBytesExt::read_u32_into::<NativeEndian>(self, &mut buffer)
            .map_err(|err| format!("Failed to read {}. {}.", what, err))?;
        Ok(buffer)
    }

    /// Reads given number of 32-bit floating point values.
    ///
    /// * `count` - Number of values to read.
    /// * `what`  - Name of the section for error messages.
    fn read_f32_vec(&mut self, count: usize, what: &str) -> Result<Vec<f32>, String> {
        let mut buffer = vec![0.0_f32; count];
        ReadBytesExt::read_f32_into::<NativeEndian>(self, &mut buffer)
            .map_err(|err| format!("Failed to read {}. {}.", what, err))?;
        Ok(buffer)
    }
}

impl<R: Read + ?Sized> FourierReader for R {}

/// Header fields following the identifier and version.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct Header {
    flags: u32,
    nodes: usize,
    coefficients: usize,
    max_order: usize,
    channels: usize,
    bases: usize,
    metadata_bytes: usize,
    parameters: usize,
    parameter_values: usize,
    eta: f32,
    alpha: [f32; 2],
}

impl Header {
    fn read<R: Read>(reader: &mut R) -> Result<Self, String> {
        reader.check_identifier()?;
        let mut header = Self {
            flags: reader.read_u32_value("flags")?,
            nodes: reader.read_u32_value("number of nodes")? as usize,
            coefficients: reader.read_u32_value("number of coefficients")? as usize,
            max_order: reader.read_u32_value("maximum order")? as usize,
            channels: reader.read_u32_value("number of channels")? as usize,
            bases: reader.read_u32_value("number of bases")? as usize,
            metadata_bytes: reader.read_u32_value("number of metadata bytes")? as usize,
            parameters: reader.read_u32_value("number of parameters")? as usize,
            parameter_values: reader.read_u32_value("number of parameter values")? as usize,
            ..Default::default()
        };
        header.eta = reader.read_f32_value("eta")?;
        header.alpha = [reader.read_f32_value("alpha")?, reader.read_f32_value("alpha")?];
        let _unused = reader.read_f32_vec(2, "header")?;

        if header.flags != FLAGS_BSDF {
            return Err(format!("Unsupported BSDF flags {}.", header.flags));
        }
        if header.channels != 1 && header.channels != 3 {
            return Err(format!("Only 1 and 3 channels are supported, got {}.", header.channels));
        }
        if header.bases != 1 {
            return Err(format!("Only 1 base is supported, got {}.", header.bases));
        }
        if header.parameters != 0 || header.parameter_values != 0 {
            return Err(String::from("Parameters are not supported."));
        }
        Ok(header)
    }
}

impl FourierTable {
    /// Loads a table from a binary file.
    ///
    /// * `path` - The path to the table file.
    pub fn from_file(path: &str) -> Result<Self, String> {
        let mut reader = BufReader::new(open_file(path)?);
        let table = Self::read(&mut reader).map_err(|err| format!("{}: {}", path, err))?;
        info!(
            "Loaded Fourier BSDF '{}': {} nodes, {} coefficients, {} channels, eta {}",
            path,
            table.nodes().len(),
            table.all_coefficients().len(),
            table.channels(),
            table.eta()
        );
        Ok(table)
    }

    /// Reads a table from a stream.
    ///
    /// * `reader` - The stream.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, String> {
        let header = Header::read(reader)?;
        let n = header.nodes;

        let nodes = reader.read_f32_vec(n, "nodes")?;
        let cdf = reader.read_f32_vec(n * n, "cdf")?;
        let offset_and_length = reader.read_u32_vec(2 * n * n, "offsets and lengths")?;
        let coefficients = reader.read_f32_vec(header.coefficients, "coefficients")?;

        if header.metadata_bytes > 0 {
            let mut metadata = vec![0_u8; header.metadata_bytes];
            match reader.read_exact(&mut metadata) {
                Ok(_) => debug!("Fourier BSDF metadata: {}", String::from_utf8_lossy(&metadata)),
                Err(err) => warn!("Ignoring truncated Fourier BSDF metadata. {}", err),
            }
        }

        let offsets = offset_and_length.iter().step_by(2).map(|v| *v as usize).collect();
        let lengths = offset_and_length.iter().skip(1).step_by(2).map(|v| *v as usize).collect();

        let table = Self::new(nodes, cdf, offsets, lengths, coefficients, header.channels)?;
        if table.max_length() > header.max_order {
            warn!(
                "Fourier BSDF series of order {} exceed the declared maximum {}",
                table.max_length(),
                header.max_order
            );
        }
        Ok(table.with_metadata(header.eta, header.alpha))
    }

    /// Writes the table in the binary file format.
    ///
    /// * `writer` - The stream.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), String> {
        let n = self.nodes().len();
        let io = |err: std::io::Error| format!("Error writing Fourier BSDF. {}.", err);

        writer.write_all(&IDENTIFIER).map_err(io)?;
        writer.write_u8(VERSION).map_err(io)?;
        let counts = [
            FLAGS_BSDF,
            n as u32,
            self.all_coefficients().len() as u32,
            self.max_length() as u32,
            self.channels() as u32,
            1,
            0,
            0,
            0,
        ];
        for v in counts {
            writer.write_u32::<NativeEndian>(v).map_err(io)?;
        }
        let [alpha_u, alpha_v] = self.alpha();
        for v in [self.eta(), alpha_u, alpha_v, 0.0, 0.0] {
            writer.write_f32::<NativeEndian>(v).map_err(io)?;
        }

        for v in self.nodes().iter().chain(self.cdf()) {
            writer.write_f32::<NativeEndian>(*v).map_err(io)?;
        }
        for (offset, length) in self.offsets().iter().zip(self.lengths()) {
            writer.write_u32::<NativeEndian>(*offset as u32).map_err(io)?;
            writer.write_u32::<NativeEndian>(*length as u32).map_err(io)?;
        }
        for v in self.all_coefficients() {
            writer.write_f32::<NativeEndian>(*v).map_err(io)?;
        }
        Ok(())
    }
}
