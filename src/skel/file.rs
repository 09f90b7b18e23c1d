//! Reading and writing skeleton files.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use super::reader::SkelChunk;
use super::skeleton::Skeleton;
use crate::binary::{BinaryReader, Chunk};
use crate::util::{Error, Result};

/// Buffered little-endian reader over a file, positioned at its start.
///
/// A missing file is reported as [`Error::FileNotFound`].
pub fn open_reader<P: AsRef<Path>>(path: P) -> Result<BinaryReader<BufReader<File>>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;
    Ok(BinaryReader::new(BufReader::new(file)))
}

/// Open a skeleton file and decode its chunk.
pub fn open<P: AsRef<Path>>(path: P) -> Result<SkelChunk> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;
    let chunk = SkelChunk::read(&mut reader)?;
    debug!(
        path = %path.display(),
        bones = chunk.skeleton.num_bones(),
        uv_channels = chunk.skeleton.num_uv_channels(),
        "opened skeleton"
    );
    Ok(chunk)
}

/// Encode `skeleton` and write it to `path`.
///
/// Nothing is created when the skeleton fails validation.
pub fn save<P: AsRef<Path>>(path: P, skeleton: &Skeleton) -> Result<()> {
    let path = path.as_ref();
    let bytes = skeleton.to_bytes()?;

    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(&bytes)?;
    file.flush()?;

    info!(path = %path.display(), bytes = bytes.len(), "wrote skeleton");
    Ok(())
}

impl Skeleton {
    /// Read a skeleton from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        open(path).map(|chunk| chunk.skeleton)
    }

    /// Write this skeleton to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save(path, self)
    }
}
