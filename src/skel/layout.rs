//! Section layout of a skeleton chunk.
//!
//! All relative pointers in the header follow from three counts. The only
//! rounding happens at two points: the end of the parent-bones chunk is
//! pushed to an absolute 16-byte boundary, and then the byte count after it
//! is rounded up to a multiple of 16. The second depends on the first, so
//! they are applied in that order.
//!
//! Older writers sized the tail differently and may declare a larger
//! `total_bytes`. The reader accepts any declared size that covers the data
//! as long as the extra bytes are padding.

use super::format::*;
use crate::util::{align_up, Error, Result};

/// Counts, relative pointers and sizes stored in the chunk header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkLayout {
    pub num_bones: u16,
    pub num_uv_channels: u16,
    pub num_bone_hierarchy_data_lines: u16,
    pub rel_ptr_to_end_of_bone_hierarchy_data: u32,
    pub rel_ptr_to_end_of_bone_defs: u32,
    pub rel_ptr_to_end_of_parent_bones_chunk: u32,
    pub rel_ptr_bone_name_hashes: u32,
    pub unknown_rel_ptr_3: u32,
    pub rel_ptr_to_end_of_parent_bones: u32,
    pub total_bytes: u64,
    pub remaining_bytes_after_parent_bones_chunk: u64,
}

fn to_count(name: &str, value: usize, max: usize) -> Result<u16> {
    if value > max {
        return Err(Error::violation(format!("{} <= {}, value is {}", name, max, value)));
    }
    u16::try_from(value).map_err(|_| Error::violation(format!("{} fits in u16, value is {}", name, value)))
}

fn to_rel_ptr(name: &str, absolute_end: u64, field_offset: u64) -> Result<u32> {
    absolute_end
        .checked_sub(field_offset)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| {
            Error::violation(format!(
                "{} fits in u32 relative to {:#x}, absolute end is {}",
                name, field_offset, absolute_end
            ))
        })
}

impl ChunkLayout {
    /// Derive every header pointer from the counts.
    pub fn compute(num_bones: usize, num_uv_channels: usize, num_lines: usize) -> Result<Self> {
        let bones = to_count("num_bones", num_bones, MAX_BONES)? as u64;
        let uv = to_count("num_uv_channels", num_uv_channels, u16::MAX as usize)? as u64;
        let lines = to_count("num_bone_hierarchy_data_lines", num_lines, u16::MAX as usize)? as u64;

        let end_of_hierarchy = HEADER_SIZE + lines * HIERARCHY_LINE_SIZE;
        let end_of_bone_defs = end_of_hierarchy + bones * BONE_DEF_SIZE;
        let end_of_parent_bones = end_of_bone_defs + bones * 2;
        // one opaque byte per uv channel, then pad to an absolute boundary
        let end_of_parent_bones_chunk = align_up(end_of_parent_bones + uv, SECTION_ALIGNMENT);
        let end_of_bone_name_hashes = end_of_parent_bones_chunk + bones * 4;
        let end_of_unknown_3 = end_of_bone_name_hashes + uv * 4;

        let bytes_after_parent_bones_chunk = align_up(
            (end_of_unknown_3 - end_of_parent_bones_chunk) + uv * 4,
            SECTION_ALIGNMENT,
        );

        Ok(Self {
            num_bones: bones as u16,
            num_uv_channels: uv as u16,
            num_bone_hierarchy_data_lines: lines as u16,
            rel_ptr_to_end_of_bone_hierarchy_data: to_rel_ptr(
                "rel_ptr_to_end_of_bone_hierarchy_data",
                end_of_hierarchy,
                BONE_HIERARCHY_PTR_OFFSET,
            )?,
            rel_ptr_to_end_of_bone_defs: to_rel_ptr(
                "rel_ptr_to_end_of_bone_defs",
                end_of_bone_defs,
                BONE_DEFS_PTR_OFFSET,
            )?,
            rel_ptr_to_end_of_parent_bones_chunk: to_rel_ptr(
                "rel_ptr_to_end_of_parent_bones_chunk",
                end_of_parent_bones_chunk,
                PARENT_BONES_CHUNK_PTR_OFFSET,
            )?,
            rel_ptr_bone_name_hashes: to_rel_ptr(
                "rel_ptr_bone_name_hashes",
                end_of_bone_name_hashes,
                BONE_NAME_HASHES_PTR_OFFSET,
            )?,
            unknown_rel_ptr_3: to_rel_ptr("unknown_rel_ptr_3", end_of_unknown_3, UNKNOWN_3_PTR_OFFSET)?,
            rel_ptr_to_end_of_parent_bones: to_rel_ptr(
                "rel_ptr_to_end_of_parent_bones",
                end_of_parent_bones,
                PARENT_BONES_PTR_OFFSET,
            )?,
            total_bytes: end_of_parent_bones_chunk + bytes_after_parent_bones_chunk,
            remaining_bytes_after_parent_bones_chunk: bytes_after_parent_bones_chunk,
        })
    }

    /// Absolute end of the hierarchy-line section.
    #[inline]
    pub fn end_of_bone_hierarchy_data(&self) -> u64 {
        BONE_HIERARCHY_PTR_OFFSET + self.rel_ptr_to_end_of_bone_hierarchy_data as u64
    }

    /// Absolute end of the bone-definition section.
    #[inline]
    pub fn end_of_bone_defs(&self) -> u64 {
        BONE_DEFS_PTR_OFFSET + self.rel_ptr_to_end_of_bone_defs as u64
    }

    /// Absolute end of the parent-index section.
    #[inline]
    pub fn end_of_parent_bones(&self) -> u64 {
        PARENT_BONES_PTR_OFFSET + self.rel_ptr_to_end_of_parent_bones as u64
    }

    /// Absolute end of the parent-bones chunk, padding included.
    #[inline]
    pub fn end_of_parent_bones_chunk(&self) -> u64 {
        PARENT_BONES_CHUNK_PTR_OFFSET + self.rel_ptr_to_end_of_parent_bones_chunk as u64
    }

    /// Absolute end of the bone-name-hash section.
    #[inline]
    pub fn end_of_bone_name_hashes(&self) -> u64 {
        BONE_NAME_HASHES_PTR_OFFSET + self.rel_ptr_bone_name_hashes as u64
    }

    /// Absolute end of the `unknown_data_3` section.
    #[inline]
    pub fn end_of_unknown_data_3(&self) -> u64 {
        UNKNOWN_3_PTR_OFFSET + self.unknown_rel_ptr_3 as u64
    }

    /// Absolute end of the material-name hashes, the last data section.
    #[inline]
    pub fn end_of_material_name_hashes(&self) -> u64 {
        self.end_of_unknown_data_3() + self.num_uv_channels as u64 * 4
    }

    /// Pad bytes inserted after `unknown_data_1`.
    #[inline]
    pub fn parent_bones_chunk_padding(&self) -> u64 {
        self.end_of_parent_bones_chunk() - self.end_of_parent_bones() - self.num_uv_channels as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_skeleton_by_hand() {
        // 40 + 0*16 = 40
        // 40 + 0*48 - 4 = 36
        // 36 + 0*2 - 16 = 20
        // 20 + 0 + 12 (absolute end 20 + 0 + 44 = 64, already aligned) = 32
        // 32 + 0*4 - 4 = 28
        // 28 + 0*4 - 4 = 24
        // bytes after: (24 + 40) - (32 + 32) + 0 = 0
        let layout = ChunkLayout::compute(0, 0, 0).unwrap();
        assert_eq!(layout.rel_ptr_to_end_of_bone_hierarchy_data, 40);
        assert_eq!(layout.rel_ptr_to_end_of_bone_defs, 36);
        assert_eq!(layout.rel_ptr_to_end_of_parent_bones, 20);
        assert_eq!(layout.rel_ptr_to_end_of_parent_bones_chunk, 32);
        assert_eq!(layout.rel_ptr_bone_name_hashes, 28);
        assert_eq!(layout.unknown_rel_ptr_3, 24);
        assert_eq!(layout.remaining_bytes_after_parent_bones_chunk, 0);
        assert_eq!(layout.total_bytes, 64);
        assert_eq!(layout.parent_bones_chunk_padding(), 0);
    }

    #[test]
    fn test_three_bones_two_channels_by_hand() {
        // hierarchy: 40 + 16 = 56
        // bone defs: 56 + 144 - 4 = 196
        // parents: 196 + 6 - 16 = 186
        // absolute end before padding: 186 + 2 + 44 = 232 -> 8 pad bytes
        // parent bones chunk: 186 + 2 + 12 + 8 = 208 (absolute 240)
        // bone name hashes: 208 + 12 - 4 = 216
        // unknown 3: 216 + 8 - 4 = 220
        // bytes after: (220 + 40) - (208 + 32) + 8 = 28 -> 32
        let layout = ChunkLayout::compute(3, 2, 1).unwrap();
        assert_eq!(layout.rel_ptr_to_end_of_bone_hierarchy_data, 56);
        assert_eq!(layout.rel_ptr_to_end_of_bone_defs, 196);
        assert_eq!(layout.rel_ptr_to_end_of_parent_bones, 186);
        assert_eq!(layout.rel_ptr_to_end_of_parent_bones_chunk, 208);
        assert_eq!(layout.rel_ptr_bone_name_hashes, 216);
        assert_eq!(layout.unknown_rel_ptr_3, 220);
        assert_eq!(layout.remaining_bytes_after_parent_bones_chunk, 32);
        assert_eq!(layout.total_bytes, 272);
        assert_eq!(layout.end_of_parent_bones_chunk(), 240);
        assert_eq!(layout.parent_bones_chunk_padding(), 8);
        assert_eq!(layout.end_of_material_name_hashes(), 268);
    }

    #[test]
    fn test_parent_bones_chunk_is_aligned() {
        let mut already_aligned = 0;
        for num_bones in [0usize, 1, 2, 3, 5, 7, 8, 13, 64, 100] {
            for num_uv in [0usize, 1, 2, 3, 6, 14, 16, 31] {
                let lines = num_bones.div_ceil(4);
                let layout = ChunkLayout::compute(num_bones, num_uv, lines).unwrap();
                let end = layout.end_of_parent_bones_chunk();
                assert_eq!(end % 16, 0, "bones={} uv={}", num_bones, num_uv);

                let unpadded = layout.end_of_parent_bones() + num_uv as u64;
                let padding = layout.parent_bones_chunk_padding();
                assert!(padding < 16);
                if unpadded % 16 == 0 {
                    assert_eq!(padding, 0, "bones={} uv={}", num_bones, num_uv);
                    already_aligned += 1;
                }
                assert_eq!(layout.total_bytes % 16, 0);
            }
        }
        assert!(already_aligned > 0);
    }

    #[test]
    fn test_already_aligned_adds_no_padding() {
        // 0x40 + 16 + 48 + 2 = 130, + 14 uv bytes = 144 = 9 * 16
        let layout = ChunkLayout::compute(1, 14, 1).unwrap();
        assert_eq!(layout.end_of_parent_bones(), 130);
        assert_eq!(layout.end_of_parent_bones_chunk(), 144);
        assert_eq!(layout.parent_bones_chunk_padding(), 0);
    }

    #[test]
    fn test_counts_out_of_range() {
        assert!(ChunkLayout::compute(MAX_BONES + 1, 0, 0).is_err());
        assert!(ChunkLayout::compute(0, 70_000, 0).is_err());
        assert!(ChunkLayout::compute(MAX_BONES, u16::MAX as usize, MAX_BONES / 4).is_ok());
    }
}
