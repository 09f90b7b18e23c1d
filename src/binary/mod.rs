//! Byte-level primitives for chunk codecs.
//!
//! - [`BinaryReader`] / [`BinaryWriter`] - typed reads and writes with an
//!   explicit byte order and a configurable pad byte
//! - [`decode`] - bulk decoding of blocks read in one piece
//! - [`assert`] - immediate structural checks
//! - [`Chunk`] - the read/write contract concrete codecs implement

pub mod assert;
mod chunk;
pub mod decode;
mod reader;
mod writer;

pub use assert::{assert_equal, assert_one_of, assert_zero};
pub use chunk::Chunk;
pub use decode::{chunk_list, decode_as, decode_as_chunks, decode_slice, decode_slice_chunks};
pub use reader::{BinaryReader, Unpacked};
pub use writer::BinaryWriter;
