//! Skeleton chunk header.

use std::io::{Read, Seek, Write};

use tracing::debug;

use super::format::*;
use super::layout::ChunkLayout;
use crate::binary::{assert_zero, BinaryReader, BinaryWriter, Chunk};
use crate::util::{Error, Result};

/// Fixed 64-byte header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkelHeader {
    pub magic: [u8; 4],
    pub layout: ChunkLayout,
    pub reserved: [u16; RESERVED_COUNT],
}

impl SkelHeader {
    pub fn new(layout: ChunkLayout) -> Self {
        Self {
            magic: *SKEL_MAGIC,
            layout,
            reserved: [0; RESERVED_COUNT],
        }
    }
}

impl Chunk for SkelHeader {
    const NAME: &'static str = "skeleton header";

    fn read<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<Self> {
        reader.assert_stream_position(0)?;

        let magic = reader.read_array_bytes::<4>()?;
        if &magic != SKEL_MAGIC {
            return Err(Error::format(format!(
                "not a skeleton chunk: magic is {:?}, expected {:?}",
                String::from_utf8_lossy(&magic),
                String::from_utf8_lossy(SKEL_MAGIC)
            )));
        }

        let total_bytes = reader.read::<u64>()?;
        let remaining_bytes_after_parent_bones_chunk = reader.read::<u64>()?;
        let num_bones = reader.read::<u16>()?;
        let num_uv_channels = reader.read::<u16>()?;
        let rel_ptr_to_end_of_bone_hierarchy_data = reader.read::<u32>()?;
        let rel_ptr_to_end_of_bone_defs = reader.read::<u32>()?;
        let rel_ptr_to_end_of_parent_bones_chunk = reader.read::<u32>()?;
        let rel_ptr_bone_name_hashes = reader.read::<u32>()?;
        let unknown_rel_ptr_3 = reader.read::<u32>()?;
        let rel_ptr_to_end_of_parent_bones = reader.read::<u32>()?;
        let num_bone_hierarchy_data_lines = reader.read::<u16>()?;

        let mut reserved = [0u16; RESERVED_COUNT];
        for (i, slot) in reserved.iter_mut().enumerate() {
            *slot = reader.read::<u16>()?;
            assert_zero(&format!("header field at {:#x}", RESERVED_OFFSET + 2 * i as u64), *slot)?;
        }
        reader.skip_padding_or_fail(SECTION_ALIGNMENT)?;
        reader.assert_section_end("header", HEADER_SIZE)?;

        let layout = ChunkLayout {
            num_bones,
            num_uv_channels,
            num_bone_hierarchy_data_lines,
            rel_ptr_to_end_of_bone_hierarchy_data,
            rel_ptr_to_end_of_bone_defs,
            rel_ptr_to_end_of_parent_bones_chunk,
            rel_ptr_bone_name_hashes,
            unknown_rel_ptr_3,
            rel_ptr_to_end_of_parent_bones,
            total_bytes,
            remaining_bytes_after_parent_bones_chunk,
        };
        debug!(?layout, "read skeleton header");

        Ok(Self { magic, layout, reserved })
    }

    fn write<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        let l = &self.layout;
        writer.write_bytes(&self.magic)?;
        writer.write(l.total_bytes)?;
        writer.write(l.remaining_bytes_after_parent_bones_chunk)?;
        writer.write(l.num_bones)?;
        writer.write(l.num_uv_channels)?;
        writer.write(l.rel_ptr_to_end_of_bone_hierarchy_data)?;
        writer.write(l.rel_ptr_to_end_of_bone_defs)?;
        writer.write(l.rel_ptr_to_end_of_parent_bones_chunk)?;
        writer.write(l.rel_ptr_bone_name_hashes)?;
        writer.write(l.unknown_rel_ptr_3)?;
        writer.write(l.rel_ptr_to_end_of_parent_bones)?;
        writer.write(l.num_bone_hierarchy_data_lines)?;
        writer.write_array(&self.reserved)?;
        writer.write_padding(SECTION_ALIGNMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(header: &SkelHeader) -> Vec<u8> {
        let mut w = BinaryWriter::new(Vec::new());
        header.write(&mut w).unwrap();
        w.into_inner()
    }

    #[test]
    fn test_field_offsets() {
        let layout = ChunkLayout::compute(3, 2, 1).unwrap();
        let bytes = encode(&SkelHeader::new(layout));
        assert_eq!(bytes.len() as u64, HEADER_SIZE);
        assert_eq!(&bytes[0..4], b"20SE");

        let u16_at = |o: u64| u16::from_le_bytes([bytes[o as usize], bytes[o as usize + 1]]);
        let u32_at = |o: u64| {
            let o = o as usize;
            u32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]])
        };
        assert_eq!(u32_at(TOTAL_BYTES_OFFSET), 272);
        assert_eq!(u32_at(REMAINING_BYTES_OFFSET), 32);
        assert_eq!(u16_at(NUM_BONES_OFFSET), 3);
        assert_eq!(u16_at(NUM_UV_CHANNELS_OFFSET), 2);
        assert_eq!(u32_at(BONE_HIERARCHY_PTR_OFFSET), 56);
        assert_eq!(u32_at(BONE_DEFS_PTR_OFFSET), 196);
        assert_eq!(u32_at(PARENT_BONES_CHUNK_PTR_OFFSET), 208);
        assert_eq!(u32_at(BONE_NAME_HASHES_PTR_OFFSET), 216);
        assert_eq!(u32_at(UNKNOWN_3_PTR_OFFSET), 220);
        assert_eq!(u32_at(PARENT_BONES_PTR_OFFSET), 186);
        assert_eq!(u16_at(NUM_HIERARCHY_LINES_OFFSET), 1);
        assert!(bytes[RESERVED_OFFSET as usize..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_read_back() {
        let header = SkelHeader::new(ChunkLayout::compute(5, 1, 2).unwrap());
        let mut r = BinaryReader::new(Cursor::new(encode(&header)));
        assert_eq!(SkelHeader::read(&mut r).unwrap(), header);
        assert_eq!(r.position().unwrap(), HEADER_SIZE);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = encode(&SkelHeader::new(ChunkLayout::default()));
        bytes[0..4].copy_from_slice(b"MDL ");
        let err = SkelHeader::read(&mut BinaryReader::new(Cursor::new(bytes))).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_nonzero_reserved() {
        let mut bytes = encode(&SkelHeader::new(ChunkLayout::default()));
        bytes[RESERVED_OFFSET as usize + 2] = 1;
        let err = SkelHeader::read(&mut BinaryReader::new(Cursor::new(bytes))).unwrap_err();
        assert!(err.to_string().contains("0x34"));
    }

    #[test]
    fn test_nonzero_header_padding() {
        let mut bytes = encode(&SkelHeader::new(ChunkLayout::default()));
        bytes[HEADER_SIZE as usize - 1] = 0xCD;
        let err = SkelHeader::read(&mut BinaryReader::new(Cursor::new(bytes))).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }

    #[test]
    fn test_truncated() {
        let bytes = encode(&SkelHeader::new(ChunkLayout::default()));
        let err = SkelHeader::read(&mut BinaryReader::new(Cursor::new(bytes[..20].to_vec()))).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof { .. }));
    }
}
