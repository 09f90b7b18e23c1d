//! Bulk decoding of raw byte blocks.
//!
//! Sections are usually read in one piece and subdivided afterwards; these
//! helpers turn such a block into a flat or chunked list of values.

use crate::util::{Endianness, Error, Primitive, PrimitiveType, Result, Value};

fn check_multiple(len: usize, width: usize, name: &str) -> Result<()> {
    if width == 0 || len % width != 0 {
        return Err(Error::violation(format!(
            "buffer of {} bytes is a multiple of the {} width {}",
            len, name, width
        )));
    }
    Ok(())
}

/// Interpret `raw` as a repeated sequence of `tag`.
///
/// The buffer length must be an exact multiple of the tag's width. Pad tags
/// consume the buffer and yield no values.
pub fn decode_as(tag: PrimitiveType, raw: &[u8], endianness: Endianness) -> Result<Vec<Value>> {
    let width = tag.num_bytes();
    check_multiple(raw.len(), width, tag.name())?;
    Ok(raw
        .chunks_exact(width)
        .filter_map(|bytes| tag.decode(bytes, endianness))
        .collect())
}

/// Like [`decode_as`], then split into groups of `chunk_size` values.
/// The final group holds the residual values and is not padded.
pub fn decode_as_chunks(
    tag: PrimitiveType,
    raw: &[u8],
    chunk_size: usize,
    endianness: Endianness,
) -> Result<Vec<Vec<Value>>> {
    let flat = decode_as(tag, raw, endianness)?;
    chunk_list(&flat, chunk_size)
}

/// Typed counterpart of [`decode_as`].
pub fn decode_slice<T: Primitive>(raw: &[u8], endianness: Endianness) -> Result<Vec<T>> {
    check_multiple(raw.len(), T::SIZE, T::TYPE.name())?;
    Ok(raw
        .chunks_exact(T::SIZE)
        .map(|bytes| T::decode(bytes, endianness))
        .collect())
}

/// Typed counterpart of [`decode_as_chunks`].
pub fn decode_slice_chunks<T: Primitive>(
    raw: &[u8],
    chunk_size: usize,
    endianness: Endianness,
) -> Result<Vec<Vec<T>>> {
    let flat = decode_slice::<T>(raw, endianness)?;
    chunk_list(&flat, chunk_size)
}

/// Split a flat list into sub-lists of `chunk_size` elements.
pub fn chunk_list<T: Clone>(values: &[T], chunk_size: usize) -> Result<Vec<Vec<T>>> {
    if chunk_size == 0 {
        return Err(Error::violation("chunk size > 0, value is 0"));
    }
    Ok(values.chunks(chunk_size).map(<[T]>::to_vec).collect())
}
