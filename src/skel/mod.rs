//! Skeleton chunk codec.
//!
//! A skeleton chunk holds a bone hierarchy with per-bone rest poses and name
//! hashes, followed by a per-uv-channel trailer. The layout is:
//!
//! ```text
//! header                64 bytes, see [`format`]
//! hierarchy lines       lines * 4 * (i16 bone, i16 parent)
//! bone definitions      bones * 12 * f32
//! parent bones          bones * i16
//! unknown_data_1        uv * u8, zero padded to a 16-byte boundary
//! bone name hashes      bones * u32
//! unknown_data_3        uv * [u8; 4]
//! material name hashes  uv * u32, zero padded to a 16-byte boundary
//! ```
//!
//! # Example
//!
//! ```
//! use skel_codec::skel::{RestPose, Skeleton};
//!
//! let skeleton = Skeleton {
//!     rest_pose: vec![RestPose::IDENTITY; 2],
//!     parent_bones: vec![-1, 0],
//!     bone_name_hashes: vec![0x1234_5678, 0x9ABC_DEF0],
//!     ..Default::default()
//! };
//! let bytes = skeleton.to_bytes().unwrap();
//! assert_eq!(Skeleton::from_bytes(&bytes).unwrap(), skeleton);
//! ```

pub mod file;
pub mod format;
mod header;
mod hierarchy;
mod layout;
mod reader;
mod rest_pose;
mod skeleton;
mod writer;


pub use file::{open, open_reader, save};
pub use header::SkelHeader;
pub use hierarchy::{linearize, HierarchyLine};
pub use layout::ChunkLayout;
pub use reader::SkelChunk;
pub use rest_pose::{rest_pose_from_world, RestPose};
pub use skeleton::{Bone, Skeleton};
