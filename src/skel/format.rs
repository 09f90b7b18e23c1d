//! Skeleton chunk format constants.
//!
//! ```text
//! 0x00  [u8; 4]  magic "20SE"
//! 0x04  u64      total_bytes
//! 0x0C  u64      remaining_bytes_after_parent_bones_chunk
//! 0x14  u16      num_bones
//! 0x16  u16      num_uv_channels
//! 0x18  u32      rel_ptr_to_end_of_bone_hierarchy_data
//! 0x1C  u32      rel_ptr_to_end_of_bone_defs
//! 0x20  u32      rel_ptr_to_end_of_parent_bones_chunk
//! 0x24  u32      rel_ptr_bone_name_hashes
//! 0x28  u32      unknown_rel_ptr_3
//! 0x2C  u32      rel_ptr_to_end_of_parent_bones
//! 0x30  u16      num_bone_hierarchy_data_lines
//! 0x32  4 x u16  reserved (zero)
//! 0x3A           pad to 0x40
//! ```
//!
//! A relative pointer is stored relative to the offset of its own field.

/// Magic bytes at the start of a skeleton chunk.
pub const SKEL_MAGIC: &[u8; 4] = b"20SE";

/// Size of the header in bytes; the first section starts here.
pub const HEADER_SIZE: u64 = 0x40;

pub const TOTAL_BYTES_OFFSET: u64 = 0x04;
pub const REMAINING_BYTES_OFFSET: u64 = 0x0C;
pub const NUM_BONES_OFFSET: u64 = 0x14;
pub const NUM_UV_CHANNELS_OFFSET: u64 = 0x16;

/// Offset of `rel_ptr_to_end_of_bone_hierarchy_data`.
pub const BONE_HIERARCHY_PTR_OFFSET: u64 = 0x18;
/// Offset of `rel_ptr_to_end_of_bone_defs`.
pub const BONE_DEFS_PTR_OFFSET: u64 = 0x1C;
/// Offset of `rel_ptr_to_end_of_parent_bones_chunk`.
pub const PARENT_BONES_CHUNK_PTR_OFFSET: u64 = 0x20;
/// Offset of `rel_ptr_bone_name_hashes`.
pub const BONE_NAME_HASHES_PTR_OFFSET: u64 = 0x24;
/// Offset of `unknown_rel_ptr_3`.
pub const UNKNOWN_3_PTR_OFFSET: u64 = 0x28;
/// Offset of `rel_ptr_to_end_of_parent_bones`.
pub const PARENT_BONES_PTR_OFFSET: u64 = 0x2C;

pub const NUM_HIERARCHY_LINES_OFFSET: u64 = 0x30;

/// Offset of the first reserved 16-bit field.
pub const RESERVED_OFFSET: u64 = 0x32;
/// Number of reserved 16-bit fields.
pub const RESERVED_COUNT: usize = 4;

/// Alignment of the parent-bones chunk end and of the chunk end.
pub const SECTION_ALIGNMENT: u64 = 16;

/// Parent index of a root bone.
pub const ROOT_PARENT: i16 = -1;

/// (bone, parent) pairs per hierarchy line.
pub const PAIRS_PER_LINE: usize = 4;
/// Size of one hierarchy line in bytes.
pub const HIERARCHY_LINE_SIZE: u64 = (PAIRS_PER_LINE * 2 * 2) as u64;

/// Floats per bone definition: quaternion, translation, scale.
pub const BONE_DEF_FLOATS: usize = 12;
/// Size of one bone definition in bytes.
pub const BONE_DEF_SIZE: u64 = (BONE_DEF_FLOATS * 4) as u64;

/// Bone indices are stored as `i16` in hierarchy lines.
pub const MAX_BONES: usize = i16::MAX as usize + 1;
