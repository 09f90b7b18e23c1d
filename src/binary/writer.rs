//! Typed binary writer.

use std::io::Write;

use crate::util::{padding_to, Endianness, Error, Primitive, PrimitiveType, Result, Value};

/// Writer for fixed-width primitives.
///
/// Tracks the number of bytes written so alignment can be computed without
/// seeking the sink.
pub struct BinaryWriter<W> {
    inner: W,
    pos: u64,
    endianness: Endianness,
    pad_byte: u8,
}

impl<W: Write> BinaryWriter<W> {
    /// Create a little-endian writer with a zero pad byte.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pos: 0,
            endianness: Endianness::Little,
            pad_byte: 0x00,
        }
    }

    /// Set the default byte order.
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Set the byte used for padding runs.
    pub fn with_pad_byte(mut self, pad_byte: u8) -> Self {
        self.pad_byte = pad_byte;
        self
    }

    /// Get the current write position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    #[inline]
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Give back the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Write bytes and advance position.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.inner.write_all(data)?;
        self.pos += data.len() as u64;
        Ok(())
    }

    /// Write a single typed value.
    pub fn write<T: Primitive>(&mut self, value: T) -> Result<()> {
        let mut buf = Vec::with_capacity(T::SIZE);
        value.encode(&mut buf, self.endianness);
        self.write_bytes(&buf)
    }

    /// Write a run of typed values.
    pub fn write_array<T: Primitive>(&mut self, values: &[T]) -> Result<()> {
        let mut buf = Vec::with_capacity(T::SIZE * values.len());
        for value in values {
            value.encode(&mut buf, self.endianness);
        }
        self.write_bytes(&buf)
    }

    /// Write `values` laid out as `tags`.
    ///
    /// Pad tags emit the pad byte and take no value; every other tag must
    /// match the type of the next value. Nothing is written on mismatch.
    pub fn write_primitives(
        &mut self,
        tags: &[PrimitiveType],
        values: &[Value],
        endianness: Option<Endianness>,
    ) -> Result<()> {
        let endianness = endianness.unwrap_or(self.endianness);
        let mut buf = Vec::with_capacity(PrimitiveType::spec_size(tags));
        let mut values_iter = values.iter();

        for tag in tags {
            if *tag == PrimitiveType::Pad {
                buf.push(self.pad_byte);
                continue;
            }
            let value = values_iter.next().ok_or_else(|| {
                Error::violation(format!("{} values for tags {:?}, got {}", tags.len(), tags, values.len()))
            })?;
            if value.primitive_type() != *tag {
                return Err(Error::violation(format!(
                    "value type == {}, value is {:?}",
                    tag, value
                )));
            }
            value.encode(&mut buf, endianness);
        }

        if values_iter.next().is_some() {
            return Err(Error::violation(format!(
                "no values left after tags {:?}, {} given",
                tags,
                values.len()
            )));
        }

        self.write_bytes(&buf)
    }

    /// Emit pad bytes up to the next `alignment` boundary.
    pub fn write_padding(&mut self, alignment: u64) -> Result<()> {
        if alignment == 0 {
            return Err(Error::violation("alignment > 0, value is 0"));
        }
        let count = padding_to(self.pos, alignment) as usize;
        let buf = vec![self.pad_byte; count];
        self.write_bytes(&buf)
    }

    /// Flush the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}
