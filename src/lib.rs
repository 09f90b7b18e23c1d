//! # skel-codec
//!
//! Reader and writer for the `20SE` binary skeleton chunk found in 3D model
//! files, built on a small typed binary-primitive layer.
//!
//! ## Modules
//!
//! - [`util`] - Primitive types, errors, math helpers
//! - [`binary`] - Typed reader/writer, padding and position checks, the [`binary::Chunk`] contract
//! - [`skel`] - Skeleton data model, chunk layout, hierarchy lines, rest poses
//!
//! ## Example
//!
//! ```no_run
//! use skel_codec::skel::Skeleton;
//!
//! let skeleton = Skeleton::from_file("character.skel")?;
//! for bone in skeleton.bones() {
//!     println!("{} -> {:?} ({:#010x})", bone.index, bone.parent, bone.name_hash);
//! }
//! skeleton.to_file("character_copy.skel")?;
//! # Ok::<(), skel_codec::Error>(())
//! ```

pub mod util;
pub mod binary;
pub mod skel;

// Re-export commonly used types
pub use util::{Error, Result, Endianness, PrimitiveType, Value};
pub use skel::{Skeleton, SkelChunk};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, Endianness, PrimitiveType, Value};
    pub use crate::binary::{BinaryReader, BinaryWriter, Chunk};
    pub use crate::skel::{
        Bone, ChunkLayout, HierarchyLine, RestPose, SkelChunk, SkelHeader, Skeleton,
        linearize, rest_pose_from_world,
    };
}
