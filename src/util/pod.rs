//! Primitive types - the fixed-width values every chunk is built from.

use bytemuck::{Pod, Zeroable};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use half::f16;
use std::fmt;

use super::{Error, Result};

/// Byte order of multi-byte primitives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

/// Primitive type tag.
///
/// Each tag has a fixed width in bytes and a single-character code, so a
/// run of primitives can be described as a short format string such as
/// `"hhI"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PrimitiveType {
    /// Pad byte, consumed without producing a value
    Pad = 0,
    /// Single byte character
    Char = 1,
    /// Signed 8-bit integer
    Int8 = 2,
    /// Unsigned 8-bit integer
    Uint8 = 3,
    /// Boolean stored as one byte
    Bool = 4,
    /// Signed 16-bit integer
    Int16 = 5,
    /// Unsigned 16-bit integer
    Uint16 = 6,
    /// 16-bit floating point (IEEE 754 half precision)
    Float16 = 7,
    /// Signed 32-bit integer
    Int32 = 8,
    /// Unsigned 32-bit integer
    Uint32 = 9,
    /// 32-bit floating point
    Float32 = 10,
    /// Signed 64-bit integer
    Int64 = 11,
    /// Unsigned 64-bit integer
    Uint64 = 12,
    /// 64-bit floating point
    Float64 = 13,
}

impl PrimitiveType {
    /// Returns the size in bytes of a single element of this type.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Pad | Self::Char | Self::Int8 | Self::Uint8 | Self::Bool => 1,
            Self::Int16 | Self::Uint16 | Self::Float16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Int64 | Self::Uint64 | Self::Float64 => 8,
        }
    }

    /// Returns the name of this type as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pad => "pad",
            Self::Char => "char",
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Bool => "bool",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Float16 => "float16",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Float32 => "float32",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Float64 => "float64",
        }
    }

    /// Format-string code of this type.
    #[inline]
    pub const fn code(self) -> char {
        match self {
            Self::Pad => 'x',
            Self::Char => 'c',
            Self::Int8 => 'b',
            Self::Uint8 => 'B',
            Self::Bool => '?',
            Self::Int16 => 'h',
            Self::Uint16 => 'H',
            Self::Float16 => 'e',
            Self::Int32 => 'i',
            Self::Uint32 => 'I',
            Self::Float32 => 'f',
            Self::Int64 => 'q',
            Self::Uint64 => 'Q',
            Self::Float64 => 'd',
        }
    }

    /// Parse a single format-string code. `l` and `L` are accepted as
    /// aliases of `i` and `I`.
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'x' => Some(Self::Pad),
            'c' => Some(Self::Char),
            'b' => Some(Self::Int8),
            'B' => Some(Self::Uint8),
            '?' => Some(Self::Bool),
            'h' => Some(Self::Int16),
            'H' => Some(Self::Uint16),
            'e' => Some(Self::Float16),
            'i' | 'l' => Some(Self::Int32),
            'I' | 'L' => Some(Self::Uint32),
            'f' => Some(Self::Float32),
            'q' => Some(Self::Int64),
            'Q' => Some(Self::Uint64),
            'd' => Some(Self::Float64),
            _ => None,
        }
    }

    /// Parse a format string into a list of type tags.
    pub fn parse_spec(spec: &str) -> Result<Vec<Self>> {
        spec.chars()
            .map(|c| {
                Self::from_code(c)
                    .ok_or_else(|| Error::format(format!("unknown primitive code '{}' in \"{}\"", c, spec)))
            })
            .collect()
    }

    /// Total width in bytes of a run of tags.
    #[inline]
    pub fn spec_size(tags: &[Self]) -> usize {
        tags.iter().map(|t| t.num_bytes()).sum()
    }

    /// Decode one element from exactly `num_bytes()` bytes.
    /// Pad tags decode to `None`.
    pub fn decode(self, bytes: &[u8], endianness: Endianness) -> Option<Value> {
        let value = match self {
            Self::Pad => return None,
            Self::Char => Value::Char(bytes[0]),
            Self::Int8 => i8::decode(bytes, endianness).into_value(),
            Self::Uint8 => u8::decode(bytes, endianness).into_value(),
            Self::Bool => Value::Bool(bytes[0] != 0),
            Self::Int16 => i16::decode(bytes, endianness).into_value(),
            Self::Uint16 => u16::decode(bytes, endianness).into_value(),
            Self::Float16 => f16::decode(bytes, endianness).into_value(),
            Self::Int32 => i32::decode(bytes, endianness).into_value(),
            Self::Uint32 => u32::decode(bytes, endianness).into_value(),
            Self::Float32 => f32::decode(bytes, endianness).into_value(),
            Self::Int64 => i64::decode(bytes, endianness).into_value(),
            Self::Uint64 => u64::decode(bytes, endianness).into_value(),
            Self::Float64 => f64::decode(bytes, endianness).into_value(),
        };
        Some(value)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single decoded primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Char(u8),
    Int8(i8),
    Uint8(u8),
    Bool(bool),
    Int16(i16),
    Uint16(u16),
    Float16(f16),
    Int32(i32),
    Uint32(u32),
    Float32(f32),
    Int64(i64),
    Uint64(u64),
    Float64(f64),
}

impl Value {
    /// Type tag this value was decoded as.
    pub const fn primitive_type(&self) -> PrimitiveType {
        match self {
            Self::Char(_) => PrimitiveType::Char,
            Self::Int8(_) => PrimitiveType::Int8,
            Self::Uint8(_) => PrimitiveType::Uint8,
            Self::Bool(_) => PrimitiveType::Bool,
            Self::Int16(_) => PrimitiveType::Int16,
            Self::Uint16(_) => PrimitiveType::Uint16,
            Self::Float16(_) => PrimitiveType::Float16,
            Self::Int32(_) => PrimitiveType::Int32,
            Self::Uint32(_) => PrimitiveType::Uint32,
            Self::Float32(_) => PrimitiveType::Float32,
            Self::Int64(_) => PrimitiveType::Int64,
            Self::Uint64(_) => PrimitiveType::Uint64,
            Self::Float64(_) => PrimitiveType::Float64,
        }
    }

    /// Append the encoded bytes of this value.
    pub fn encode(&self, out: &mut Vec<u8>, endianness: Endianness) {
        match *self {
            Self::Char(v) | Self::Uint8(v) => out.push(v),
            Self::Int8(v) => v.encode(out, endianness),
            Self::Bool(v) => out.push(v as u8),
            Self::Int16(v) => v.encode(out, endianness),
            Self::Uint16(v) => v.encode(out, endianness),
            Self::Float16(v) => v.encode(out, endianness),
            Self::Int32(v) => v.encode(out, endianness),
            Self::Uint32(v) => v.encode(out, endianness),
            Self::Float32(v) => v.encode(out, endianness),
            Self::Int64(v) => v.encode(out, endianness),
            Self::Uint64(v) => v.encode(out, endianness),
            Self::Float64(v) => v.encode(out, endianness),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(v) => write!(f, "{:?}", *v as char),
            Self::Int8(v) => write!(f, "{}", v),
            Self::Uint8(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int16(v) => write!(f, "{}", v),
            Self::Uint16(v) => write!(f, "{}", v),
            Self::Float16(v) => write!(f, "{}", v),
            Self::Int32(v) => write!(f, "{}", v),
            Self::Uint32(v) => write!(f, "{}", v),
            Self::Float32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::Uint64(v) => write!(f, "{}", v),
            Self::Float64(v) => write!(f, "{}", v),
        }
    }
}

// === Primitive trait for typed reads and writes ===

/// Trait for Rust types with a fixed-width binary representation.
pub trait Primitive: Pod + Zeroable + Copy + Default + fmt::Debug + PartialEq {
    /// The corresponding type tag.
    const TYPE: PrimitiveType;

    /// Size of this type in bytes.
    const SIZE: usize = std::mem::size_of::<Self>();

    /// Decode from exactly `SIZE` bytes.
    fn decode(bytes: &[u8], endianness: Endianness) -> Self;

    /// Append the encoded bytes.
    fn encode(self, out: &mut Vec<u8>, endianness: Endianness);

    /// Wrap as a dynamically typed [`Value`].
    fn into_value(self) -> Value;
}

macro_rules! impl_primitive {
    ($ty:ty, $variant:ident, $read:ident, $write:ident) => {
        impl Primitive for $ty {
            const TYPE: PrimitiveType = PrimitiveType::$variant;

            #[inline]
            fn decode(bytes: &[u8], endianness: Endianness) -> Self {
                match endianness {
                    Endianness::Little => LittleEndian::$read(bytes),
                    Endianness::Big => BigEndian::$read(bytes),
                }
            }

            #[inline]
            fn encode(self, out: &mut Vec<u8>, endianness: Endianness) {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                match endianness {
                    Endianness::Little => LittleEndian::$write(&mut buf, self),
                    Endianness::Big => BigEndian::$write(&mut buf, self),
                }
                out.extend_from_slice(&buf);
            }

            #[inline]
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }
    };
}

impl_primitive!(i16, Int16, read_i16, write_i16);
impl_primitive!(u16, Uint16, read_u16, write_u16);
impl_primitive!(i32, Int32, read_i32, write_i32);
impl_primitive!(u32, Uint32, read_u32, write_u32);
impl_primitive!(f32, Float32, read_f32, write_f32);
impl_primitive!(i64, Int64, read_i64, write_i64);
impl_primitive!(u64, Uint64, read_u64, write_u64);
impl_primitive!(f64, Float64, read_f64, write_f64);

impl Primitive for u8 {
    const TYPE: PrimitiveType = PrimitiveType::Uint8;

    #[inline]
    fn decode(bytes: &[u8], _endianness: Endianness) -> Self {
        bytes[0]
    }

    #[inline]
    fn encode(self, out: &mut Vec<u8>, _endianness: Endianness) {
        out.push(self);
    }

    #[inline]
    fn into_value(self) -> Value {
        Value::Uint8(self)
    }
}

impl Primitive for i8 {
    const TYPE: PrimitiveType = PrimitiveType::Int8;

    #[inline]
    fn decode(bytes: &[u8], _endianness: Endianness) -> Self {
        bytes[0] as i8
    }

    #[inline]
    fn encode(self, out: &mut Vec<u8>, _endianness: Endianness) {
        out.push(self as u8);
    }

    #[inline]
    fn into_value(self) -> Value {
        Value::Int8(self)
    }
}

impl Primitive for f16 {
    const TYPE: PrimitiveType = PrimitiveType::Float16;

    #[inline]
    fn decode(bytes: &[u8], endianness: Endianness) -> Self {
        f16::from_bits(u16::decode(bytes, endianness))
    }

    #[inline]
    fn encode(self, out: &mut Vec<u8>, endianness: Endianness) {
        self.to_bits().encode(out, endianness);
    }

    #[inline]
    fn into_value(self) -> Value {
        Value::Float16(self)
    }
}
