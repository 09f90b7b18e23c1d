//! Skeleton chunk write path.

use std::io::{Read, Seek, Write};

use tracing::debug;

use super::format::SECTION_ALIGNMENT;
use super::header::SkelHeader;
use super::layout::ChunkLayout;
use super::reader::SkelChunk;
use super::skeleton::Skeleton;
use crate::binary::{assert_equal, BinaryReader, BinaryWriter, Chunk};
use crate::util::Result;

impl Skeleton {
    /// Encode the whole chunk into memory.
    ///
    /// The skeleton is validated and the layout derived before any byte is
    /// produced, so a failure leaves no partial output behind.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.validate()?;
        let lines = self.hierarchy_lines()?;
        let layout = ChunkLayout::compute(self.num_bones(), self.num_uv_channels(), lines.len())?;

        let mut w = BinaryWriter::new(Vec::with_capacity(layout.total_bytes as usize));
        SkelHeader::new(layout).write(&mut w)?;

        for line in &lines {
            w.write_array(&line.to_values())?;
        }
        assert_equal("end of bone hierarchy data", w.position(), layout.end_of_bone_hierarchy_data())?;

        for pose in &self.rest_pose {
            w.write_array(&pose.to_floats())?;
        }
        assert_equal("end of bone definitions", w.position(), layout.end_of_bone_defs())?;

        w.write_array(&self.parent_bones)?;
        assert_equal("end of parent bones", w.position(), layout.end_of_parent_bones())?;

        w.write_bytes(&self.unknown_data_1)?;
        w.write_padding(SECTION_ALIGNMENT)?;
        assert_equal("end of parent bones chunk", w.position(), layout.end_of_parent_bones_chunk())?;

        w.write_array(&self.bone_name_hashes)?;
        assert_equal("end of bone name hashes", w.position(), layout.end_of_bone_name_hashes())?;

        for block in &self.unknown_data_3 {
            w.write_bytes(block)?;
        }
        assert_equal("end of unknown data 3", w.position(), layout.end_of_unknown_data_3())?;

        w.write_array(&self.uv_channel_material_name_hashes)?;
        w.write_padding(SECTION_ALIGNMENT)?;
        assert_equal("total_bytes", w.position(), layout.total_bytes)?;

        debug!(
            bones = self.num_bones(),
            uv_channels = self.num_uv_channels(),
            lines = lines.len(),
            total_bytes = layout.total_bytes,
            "encoded skeleton chunk"
        );
        Ok(w.into_inner())
    }

    /// Decode a chunk held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        SkelChunk::from_bytes(bytes).map(|chunk| chunk.skeleton)
    }

    /// Encode and write the chunk to `sink` in one piece.
    pub fn write_to<W: Write>(&self, mut sink: W) -> Result<()> {
        let bytes = self.to_bytes()?;
        sink.write_all(&bytes)?;
        sink.flush()?;
        Ok(())
    }
}

impl Chunk for Skeleton {
    const NAME: &'static str = "skeleton";

    fn read<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<Self> {
        SkelChunk::read(reader).map(|chunk| chunk.skeleton)
    }

    fn write<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        let bytes = self.to_bytes()?;
        writer.write_bytes(&bytes)
    }
}
