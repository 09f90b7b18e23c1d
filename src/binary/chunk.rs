//! The read/write contract implemented by concrete chunk codecs.

use std::io::{Read, Seek, Write};

use super::{BinaryReader, BinaryWriter};
use crate::util::{Error, Result};

/// A self-contained binary section that can be parsed from and emitted to a
/// stream.
///
/// Both operations default to [`Error::NotImplemented`], so a chunk type
/// that only overrides one of them fails loudly when the other is used.
pub trait Chunk: Sized {
    /// Name used in error messages.
    const NAME: &'static str;

    /// Consume this chunk from the reader.
    fn read<R: Read + Seek>(_reader: &mut BinaryReader<R>) -> Result<Self> {
        Err(Error::NotImplemented { chunk: Self::NAME, operation: "read" })
    }

    /// Emit this chunk to the writer.
    fn write<W: Write>(&self, _writer: &mut BinaryWriter<W>) -> Result<()> {
        Err(Error::NotImplemented { chunk: Self::NAME, operation: "write" })
    }
}
