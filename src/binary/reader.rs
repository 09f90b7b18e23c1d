//! Typed binary reader.

use std::fmt;
use std::io::{self, Read, Seek};

use smallvec::SmallVec;

use super::decode;
use crate::util::{padding_to, Endianness, Error, Primitive, PrimitiveType, Result, Value};

/// Result of one [`BinaryReader::read_primitives`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum Unpacked {
    /// Exactly one value was requested
    One(Value),
    /// Zero or several values, in tag order
    Many(SmallVec<[Value; 4]>),
}

impl Unpacked {
    /// All values as a slice.
    pub fn values(&self) -> &[Value] {
        match self {
            Self::One(v) => std::slice::from_ref(v),
            Self::Many(vs) => vs.as_slice(),
        }
    }

    /// The value if exactly one was read.
    pub fn single(&self) -> Option<Value> {
        match self {
            Self::One(v) => Some(*v),
            Self::Many(_) => None,
        }
    }
}

impl fmt::Display for Unpacked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(v) => write!(f, "{}", v),
            Self::Many(vs) => {
                write!(f, "(")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, ")")
            }
        }
    }
}

const PADDING_BLOCK: u64 = 4096;

/// Reader for fixed-width primitives over a seekable byte stream.
///
/// Every primitive read is recorded in [`header`](Self::header), which makes
/// it easy to dump everything a chunk codec consumed. Raw byte blocks are
/// recorded as runs of `uint8`. Skipped padding is not recorded.
pub struct BinaryReader<R> {
    inner: R,
    endianness: Endianness,
    pad_byte: u8,
    header: Vec<Unpacked>,
}

impl<R: Read + Seek> BinaryReader<R> {
    /// Create a little-endian reader with a zero pad byte.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            endianness: Endianness::Little,
            pad_byte: 0x00,
            header: Vec::new(),
        }
    }

    /// Set the default byte order.
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Set the byte expected in padding runs.
    pub fn with_pad_byte(mut self, pad_byte: u8) -> Self {
        self.pad_byte = pad_byte;
        self
    }

    #[inline]
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    #[inline]
    pub fn pad_byte(&self) -> u8 {
        self.pad_byte
    }

    /// Current stream position.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Trace of every primitive read so far.
    pub fn header(&self) -> &[Unpacked] {
        &self.header
    }

    /// Take the trace, leaving it empty.
    pub fn take_header(&mut self) -> Vec<Unpacked> {
        std::mem::take(&mut self.header)
    }

    /// Give back the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self, len: usize) -> Result<Vec<u8>> {
        let position = self.position()?;
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                Error::UnexpectedEof { position, requested: len }
            } else {
                Error::Io(e)
            }
        })?;
        Ok(buf)
    }

    /// Read one value per tag.
    ///
    /// Returns [`Unpacked::One`] when the tags produce a single value, else
    /// [`Unpacked::Many`] in tag order.
    pub fn read_primitives(
        &mut self,
        tags: &[PrimitiveType],
        endianness: Option<Endianness>,
    ) -> Result<Unpacked> {
        let endianness = endianness.unwrap_or(self.endianness);
        let buf = self.fill(PrimitiveType::spec_size(tags))?;

        let mut values = SmallVec::<[Value; 4]>::new();
        let mut offset = 0;
        for tag in tags {
            let width = tag.num_bytes();
            if let Some(value) = tag.decode(&buf[offset..offset + width], endianness) {
                values.push(value);
            }
            offset += width;
        }

        let unpacked = if values.len() == 1 {
            Unpacked::One(values[0])
        } else {
            Unpacked::Many(values)
        };
        self.header.push(unpacked.clone());
        Ok(unpacked)
    }

    /// [`read_primitives`](Self::read_primitives) with a format string such as `"hhI"`.
    pub fn read_spec(&mut self, spec: &str) -> Result<Unpacked> {
        let tags = PrimitiveType::parse_spec(spec)?;
        self.read_primitives(&tags, None)
    }

    /// Read a single typed value.
    pub fn read<T: Primitive>(&mut self) -> Result<T> {
        let buf = self.fill(T::SIZE)?;
        let value = T::decode(&buf, self.endianness);
        self.header.push(Unpacked::One(value.into_value()));
        Ok(value)
    }

    /// Read `count` typed values. Always traced as [`Unpacked::Many`].
    pub fn read_array<T: Primitive>(&mut self, count: usize) -> Result<Vec<T>> {
        let buf = self.fill(T::SIZE * count)?;
        let values = decode::decode_slice::<T>(&buf, self.endianness)?;
        self.header
            .push(Unpacked::Many(values.iter().map(|v| v.into_value()).collect()));
        Ok(values)
    }

    /// Read a raw block.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let bytes = self.fill(len)?;
        self.header
            .push(Unpacked::Many(bytes.iter().map(|&b| Value::Uint8(b)).collect()));
        Ok(bytes)
    }

    /// Read a fixed-size raw block.
    pub fn read_array_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.read_bytes(N)?);
        Ok(out)
    }

    /// See [`decode::decode_as`]; `None` uses the reader's byte order.
    pub fn decode_as(
        &self,
        tag: PrimitiveType,
        raw: &[u8],
        endianness: Option<Endianness>,
    ) -> Result<Vec<Value>> {
        decode::decode_as(tag, raw, endianness.unwrap_or(self.endianness))
    }

    /// See [`decode::decode_as_chunks`]; `None` uses the reader's byte order.
    pub fn decode_as_chunks(
        &self,
        tag: PrimitiveType,
        raw: &[u8],
        chunk_size: usize,
        endianness: Option<Endianness>,
    ) -> Result<Vec<Vec<Value>>> {
        decode::decode_as_chunks(tag, raw, chunk_size, endianness.unwrap_or(self.endianness))
    }

    /// Consume the bytes up to the next `alignment` boundary and check that
    /// every one of them is the pad byte.
    ///
    /// A non-pad byte here almost always means a preceding field was parsed
    /// with the wrong size.
    pub fn skip_padding_or_fail(&mut self, alignment: u64) -> Result<()> {
        if alignment == 0 {
            return Err(Error::violation("alignment > 0, value is 0"));
        }
        let position = self.position()?;
        self.consume_padding(
            position,
            padding_to(position, alignment),
            format_args!("a {}-byte boundary", alignment),
        )
    }

    /// Consume pad bytes up to the absolute offset `end`.
    pub fn skip_padding_to(&mut self, end: u64) -> Result<()> {
        let position = self.position()?;
        if end < position {
            return Err(Error::violation(format!(
                "padding end >= {}, value is {}",
                position, end
            )));
        }
        self.consume_padding(position, end - position, format_args!("offset {}", end))
    }

    fn consume_padding(&mut self, position: u64, count: u64, boundary: fmt::Arguments<'_>) -> Result<()> {
        let end = position + count;
        let mut offset = position;
        // block-wise, since `count` may come straight from a header field
        while offset < end {
            let len = (end - offset).min(PADDING_BLOCK) as usize;
            let bytes = self.fill(len)?;
            if let Some(i) = bytes.iter().position(|&b| b != self.pad_byte) {
                return Err(Error::violation(format!(
                    "padding at {} up to {} is {:#04x}, found {:#04x} at offset {}",
                    position,
                    boundary,
                    self.pad_byte,
                    bytes[i],
                    offset + i as u64
                )));
            }
            offset += len as u64;
        }
        Ok(())
    }

    /// Fail unless the stream is at `expected`.
    pub fn assert_stream_position(&mut self, expected: u64) -> Result<()> {
        let position = self.position()?;
        if position != expected {
            return Err(Error::violation(format!(
                "File pointer at {}, not at {}",
                position, expected
            )));
        }
        Ok(())
    }

    /// [`assert_stream_position`](Self::assert_stream_position) naming the
    /// section that should have ended at `expected`.
    pub fn assert_section_end(&mut self, section: &str, expected: u64) -> Result<()> {
        let position = self.position()?;
        if position != expected {
            return Err(Error::violation(format!(
                "end of {} at {}, file pointer is at {}",
                section, expected, position
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(bytes: Vec<u8>) -> BinaryReader<Cursor<Vec<u8>>> {
        BinaryReader::new(Cursor::new(bytes))
    }

    #[test]
    fn test_read_primitives_single_and_tuple() {
        let mut r = reader(vec![0x05, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x80, 0x3F]);
        let one = r.read_spec("H").unwrap();
        assert_eq!(one, Unpacked::One(Value::Uint16(5)));

        let many = r.read_spec("hf").unwrap();
        assert_eq!(many.values(), &[Value::Int16(-1), Value::Float32(1.0)]);
        assert_eq!(many.single(), None);

        assert_eq!(r.header().len(), 2);
        assert_eq!(r.header()[1].to_string(), "(-1, 1)");
    }

    #[test]
    fn test_read_primitives_pad_yields_nothing() {
        let mut r = reader(vec![0x00, 0x07]);
        let unpacked = r.read_spec("xB").unwrap();
        assert_eq!(unpacked, Unpacked::One(Value::Uint8(7)));
    }

    #[test]
    fn test_read_primitives_big_endian_override() {
        let mut r = reader(vec![0x01, 0x02]);
        let v = r.read_primitives(&[PrimitiveType::Uint16], Some(Endianness::Big)).unwrap();
        assert_eq!(v.single(), Some(Value::Uint16(0x0102)));
    }

    #[test]
    fn test_read_past_end() {
        let mut r = reader(vec![0x01, 0x02, 0x03]);
        let err = r.read::<u32>().unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof { position: 0, requested: 4 }));
    }

    #[test]
    fn test_read_array() {
        let mut r = reader(vec![0x01, 0x00, 0x02, 0x00, 0x03, 0x00]);
        assert_eq!(r.read_array::<i16>(3).unwrap(), vec![1, 2, 3]);
        assert_eq!(r.read_array::<i16>(0).unwrap(), Vec::<i16>::new());
        assert_eq!(r.position().unwrap(), 6);
    }

    #[test]
    fn test_skip_padding() {
        let mut r = reader(vec![0xAA, 0x00, 0x00, 0x00, 0xBB]);
        r.read::<u8>().unwrap();
        r.skip_padding_or_fail(4).unwrap();
        assert_eq!(r.position().unwrap(), 4);

        // already aligned: nothing consumed
        r.skip_padding_or_fail(4).unwrap();
        assert_eq!(r.position().unwrap(), 4);
    }

    #[test]
    fn test_skip_padding_rejects_data() {
        let mut r = reader(vec![0xAA, 0x00, 0x01, 0x00]);
        r.read::<u8>().unwrap();
        let err = r.skip_padding_or_fail(4).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
        assert!(err.to_string().contains("offset 2"));
    }

    #[test]
    fn test_skip_padding_to() {
        let mut r = reader(vec![0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x09]);
        r.read::<u8>().unwrap();
        r.skip_padding_to(6).unwrap();
        assert_eq!(r.position().unwrap(), 6);
        r.skip_padding_to(6).unwrap();

        let err = r.skip_padding_to(7).unwrap_err();
        assert!(err.to_string().contains("found 0x09 at offset 6"), "{}", err);

        let mut r = reader(vec![0u8; 4]);
        r.read::<u16>().unwrap();
        assert!(matches!(r.skip_padding_to(1), Err(Error::InvariantViolation(_))));
        assert!(matches!(r.skip_padding_to(8), Err(Error::UnexpectedEof { .. })));
        assert!(matches!(r.skip_padding_to(u64::MAX / 2), Err(Error::UnexpectedEof { .. })));
    }

    #[test]
    fn test_raw_blocks_are_traced() {
        let mut r = reader(b"20SE\x01\x02\x03".to_vec());
        assert_eq!(&r.read_array_bytes::<4>().unwrap(), b"20SE");
        assert_eq!(r.read_bytes(2).unwrap(), vec![1, 2]);
        r.read::<u8>().unwrap();

        let trace = r.header();
        assert_eq!(trace.len(), 3);
        assert_eq!(
            trace[0].values(),
            &[Value::Uint8(b'2'), Value::Uint8(b'0'), Value::Uint8(b'S'), Value::Uint8(b'E')]
        );
        assert_eq!(trace[1].values(), &[Value::Uint8(1), Value::Uint8(2)]);
        assert_eq!(trace[2].single(), Some(Value::Uint8(3)));
    }

    #[test]
    fn test_custom_pad_byte() {
        let mut r = reader(vec![0x01, 0xCD, 0xCD, 0xCD]).with_pad_byte(0xCD);
        r.read::<u8>().unwrap();
        r.skip_padding_or_fail(4).unwrap();
    }

    #[test]
    fn test_assert_stream_position() {
        let mut r = reader(vec![0u8; 8]);
        r.read::<u32>().unwrap();
        assert!(r.assert_stream_position(4).is_ok());
        let err = r.assert_stream_position(6).unwrap_err();
        assert!(err.to_string().contains("File pointer at 4, not at 6"));
        let err = r.assert_section_end("bone hashes", 8).unwrap_err();
        assert!(err.to_string().contains("bone hashes"));
    }
}
