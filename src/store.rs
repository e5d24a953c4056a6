//! Binary persistence of fitted models.
//!
//! An artifact is a fixed header followed by the bincode-encoded [`Model`]:
//!
//! ```text
//! +----------+-------------+------------------+
//! | SPAMSIFT | version u32 | bincode(Model)   |
//! | 8 bytes  | LE          |                  |
//! +----------+-------------+------------------+
//! ```
//!
//! Artifacts written by other format versions are rejected rather than
//! migrated.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use bincode::Options;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::error::{Result, SpamsiftError};
use crate::model::Model;

/// Leading bytes of every model artifact.
pub const MAGIC: &[u8; 8] = b"SPAMSIFT";

/// Current artifact format version.
pub const FORMAT_VERSION: u32 = 1;

/// Reads and writes model artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelStore;

impl ModelStore {
    /// Write `model` to `path`, creating parent directories and replacing
    /// any existing file.
    pub fn save<P: AsRef<Path>>(model: &Model, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(path)?);
        Self::write(model, &mut writer)?;
        writer.flush()?;

        debug!("Saved model to {}", path.display());
        Ok(())
    }

    /// Read a model artifact from `path`.
    ///
    /// A missing file is an `Io` error; anything unreadable past that point
    /// is a `CorruptModel` error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Model> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let model = Self::read(&mut reader)?;

        debug!("Loaded model from {}", path.display());
        Ok(model)
    }

    /// Encode a model into any writer.
    pub fn write<W: Write>(model: &Model, writer: &mut W) -> Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_u32::<LittleEndian>(FORMAT_VERSION)?;
        bincode::serialize_into(writer, model)?;
        Ok(())
    }

    /// Decode a model from any reader.
    ///
    /// The payload is read to the end first and decoded from memory, so no
    /// length field can claim more bytes than the artifact holds.
    pub fn read<R: Read>(reader: &mut R) -> Result<Model> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic).map_err(truncated)?;
        if &magic != MAGIC {
            return Err(SpamsiftError::corrupt_model("not a spamsift model file"));
        }

        let version = reader.read_u32::<LittleEndian>().map_err(truncated)?;
        if version != FORMAT_VERSION {
            return Err(SpamsiftError::corrupt_model(format!(
                "unsupported format version {version} (expected {FORMAT_VERSION})"
            )));
        }

        let mut payload = Vec::new();
        reader.read_to_end(&mut payload)?;
        let model: Model = bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .with_limit(payload.len() as u64)
            .deserialize(&payload)
            .map_err(|e| SpamsiftError::corrupt_model(format!("cannot decode model: {e}")))?;
        model.validate()?;
        Ok(model)
    }
}

fn truncated(err: io::Error) -> SpamsiftError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        SpamsiftError::corrupt_model("truncated header")
    } else {
        SpamsiftError::Io(err)
    }
}
