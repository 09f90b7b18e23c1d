//! Skeleton chunk read path.

use std::io::{Cursor, Read, Seek, Write};

use tracing::{debug, warn};

use super::format::*;
use super::header::SkelHeader;
use super::hierarchy::HierarchyLine;
use super::layout::ChunkLayout;
use super::rest_pose::RestPose;
use super::skeleton::Skeleton;
use crate::binary::{assert_equal, decode_slice_chunks, BinaryReader, BinaryWriter, Chunk};
use crate::util::{Error, Result};

/// A decoded skeleton chunk with the parts that are not part of the
/// skeleton itself.
#[derive(Clone, Debug, PartialEq)]
pub struct SkelChunk {
    pub header: SkelHeader,
    /// Hierarchy lines as stored; informational only
    pub hierarchy_lines: Vec<HierarchyLine>,
    pub skeleton: Skeleton,
}

impl SkelChunk {
    /// Decode a chunk held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read(&mut BinaryReader::new(Cursor::new(bytes)))
    }

    /// Whether the stored hierarchy lines match the ones derived from the
    /// parent indices.
    pub fn hierarchy_matches_parents(&self) -> Result<bool> {
        Ok(self.skeleton.hierarchy_lines()? == self.hierarchy_lines)
    }
}

impl Chunk for SkelChunk {
    const NAME: &'static str = "skeleton chunk";

    fn read<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<Self> {
        let header = SkelHeader::read(reader)?;
        let layout = header.layout;

        let num_bones = layout.num_bones as usize;
        let num_uv = layout.num_uv_channels as usize;
        let num_lines = layout.num_bone_hierarchy_data_lines as usize;

        let expected = ChunkLayout::compute(num_bones, num_uv, num_lines)?;
        if expected != layout {
            warn!(
                stored = ?layout,
                derived = ?expected,
                "header pointers differ from the layout derived from its counts"
            );
        }

        let raw = reader.read_bytes(num_lines * HIERARCHY_LINE_SIZE as usize)?;
        let hierarchy_lines = decode_slice_chunks::<i16>(&raw, PAIRS_PER_LINE * 2, reader.endianness())?
            .iter()
            .map(|values| HierarchyLine::from_values(values))
            .collect::<Result<Vec<_>>>()?;
        reader.assert_section_end("bone hierarchy data", layout.end_of_bone_hierarchy_data())?;
        debug!(lines = hierarchy_lines.len(), "read bone hierarchy data");

        let floats = reader.read_array::<f32>(num_bones * BONE_DEF_FLOATS)?;
        let rest_pose = floats
            .chunks_exact(BONE_DEF_FLOATS)
            .map(|def| {
                let mut v = [0f32; BONE_DEF_FLOATS];
                v.copy_from_slice(def);
                RestPose::from(v)
            })
            .collect::<Vec<_>>();
        reader.assert_section_end("bone definitions", layout.end_of_bone_defs())?;
        debug!(bones = rest_pose.len(), "read bone definitions");

        let parent_bones = reader.read_array::<i16>(num_bones)?;
        reader.assert_section_end("parent bones", layout.end_of_parent_bones())?;
        debug!(bones = parent_bones.len(), "read parent bones");

        let unknown_data_1 = reader.read_bytes(num_uv)?;
        reader.skip_padding_or_fail(SECTION_ALIGNMENT)?;
        reader.assert_section_end("parent bones chunk", layout.end_of_parent_bones_chunk())?;
        debug!(uv_channels = unknown_data_1.len(), "read parent bones chunk");

        let bone_name_hashes = reader.read_array::<u32>(num_bones)?;
        reader.assert_section_end("bone name hashes", layout.end_of_bone_name_hashes())?;

        let unknown_data_3 = reader
            .read_bytes(num_uv * 4)?
            .chunks_exact(4)
            .map(|b| [b[0], b[1], b[2], b[3]])
            .collect::<Vec<_>>();
        reader.assert_section_end("unknown data 3", layout.end_of_unknown_data_3())?;

        let uv_channel_material_name_hashes = reader.read_array::<u32>(num_uv)?;
        let content_end = layout.end_of_material_name_hashes();
        reader.assert_section_end("uv channel material name hashes", content_end)?;

        if layout.total_bytes < content_end {
            return Err(Error::violation(format!(
                "total_bytes >= {}, value is {}",
                content_end, layout.total_bytes
            )));
        }
        if layout.total_bytes != expected.total_bytes {
            warn!(
                stored = layout.total_bytes,
                derived = expected.total_bytes,
                "total_bytes differs from the derived size, reading the rest as padding"
            );
        }
        reader.skip_padding_to(layout.total_bytes)?;
        assert_equal(
            "remaining_bytes_after_parent_bones_chunk",
            layout.remaining_bytes_after_parent_bones_chunk,
            layout.total_bytes.saturating_sub(layout.end_of_parent_bones_chunk()),
        )?;
        debug!(total_bytes = layout.total_bytes, "read skeleton chunk");

        Ok(Self {
            header,
            hierarchy_lines,
            skeleton: Skeleton {
                rest_pose,
                parent_bones,
                bone_name_hashes,
                unknown_data_1,
                unknown_data_3,
                uv_channel_material_name_hashes,
            },
        })
    }

    /// Re-encode from the skeleton; header and lines are derived again.
    fn write<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        self.skeleton.write(writer)
    }
}
