//! In-memory skeleton.

use super::format::{MAX_BONES, ROOT_PARENT};
use super::hierarchy::{linearize, HierarchyLine};
use super::rest_pose::{rest_pose_from_world, RestPose};
use crate::binary::assert_equal;
use crate::util::{Error, Mat4, Result};

/// Skeleton stored as parallel per-bone and per-uv-channel arrays.
///
/// Bone and channel counts are not stored; they are the lengths of
/// `parent_bones` and `uv_channel_material_name_hashes`. The fields are
/// public so a producer can fill them directly, and every encode checks
/// them with [`validate`](Self::validate) first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Skeleton {
    /// Parent-relative rest transform per bone
    pub rest_pose: Vec<RestPose>,
    /// Parent index per bone, `-1` for a root
    pub parent_bones: Vec<i16>,
    pub bone_name_hashes: Vec<u32>,
    /// One opaque byte per uv channel
    pub unknown_data_1: Vec<u8>,
    /// One opaque 4-byte block per uv channel
    pub unknown_data_3: Vec<[u8; 4]>,
    pub uv_channel_material_name_hashes: Vec<u32>,
}

/// Read-only view of one bone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bone {
    pub index: usize,
    pub parent: Option<usize>,
    pub rest_pose: RestPose,
    pub name_hash: u32,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn num_bones(&self) -> usize {
        self.parent_bones.len()
    }

    #[inline]
    pub fn num_uv_channels(&self) -> usize {
        self.uv_channel_material_name_hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent_bones.is_empty()
    }

    /// View of bone `index`, or `None` when out of range or the arrays
    /// disagree in length.
    pub fn bone(&self, index: usize) -> Option<Bone> {
        let parent = *self.parent_bones.get(index)?;
        Some(Bone {
            index,
            parent: usize::try_from(parent).ok(),
            rest_pose: *self.rest_pose.get(index)?,
            name_hash: *self.bone_name_hashes.get(index)?,
        })
    }

    pub fn bones(&self) -> impl Iterator<Item = Bone> + '_ {
        (0..self.num_bones()).filter_map(move |i| self.bone(i))
    }

    /// Indices of bones without a parent.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.parent_bones
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p == ROOT_PARENT)
            .map(|(i, _)| i)
    }

    /// Indices of the direct children of `index`.
    pub fn children(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.parent_bones
            .iter()
            .enumerate()
            .filter(move |&(_, &p)| usize::try_from(p).ok() == Some(index))
            .map(|(i, _)| i)
    }

    /// Find a bone by name hash.
    pub fn find_bone(&self, name_hash: u32) -> Option<usize> {
        self.bone_name_hashes.iter().position(|&h| h == name_hash)
    }

    /// Check that the arrays form an encodable skeleton.
    pub fn validate(&self) -> Result<()> {
        let num_bones = self.num_bones();
        let num_uv = self.num_uv_channels();

        assert_equal("len(rest_pose)", self.rest_pose.len(), num_bones)?;
        assert_equal("len(bone_name_hashes)", self.bone_name_hashes.len(), num_bones)?;
        assert_equal("len(unknown_data_1)", self.unknown_data_1.len(), num_uv)?;
        assert_equal("len(unknown_data_3)", self.unknown_data_3.len(), num_uv)?;

        if num_bones > MAX_BONES {
            return Err(Error::violation(format!(
                "num_bones <= {}, value is {}",
                MAX_BONES, num_bones
            )));
        }
        if num_uv > u16::MAX as usize {
            return Err(Error::violation(format!(
                "num_uv_channels <= {}, value is {}",
                u16::MAX,
                num_uv
            )));
        }

        for (i, &parent) in self.parent_bones.iter().enumerate() {
            if parent == ROOT_PARENT {
                continue;
            }
            let valid = usize::try_from(parent)
                .map(|p| p < num_bones && p != i)
                .unwrap_or(false);
            if !valid {
                return Err(Error::violation(format!(
                    "parent_bones[{}] is {} or another bone's index, value is {}",
                    i, ROOT_PARENT, parent
                )));
            }
        }

        self.check_acyclic()
    }

    fn check_acyclic(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnPath,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.num_bones()];
        let mut path = Vec::new();

        for start in 0..self.num_bones() {
            let mut current = start;
            loop {
                match marks[current] {
                    Mark::Done => break,
                    Mark::OnPath => {
                        return Err(Error::violation(format!(
                            "parent_bones is acyclic, bone {} is its own ancestor",
                            current
                        )));
                    }
                    Mark::Unvisited => {
                        marks[current] = Mark::OnPath;
                        path.push(current);
                        match usize::try_from(self.parent_bones[current]) {
                            Ok(parent) => current = parent,
                            Err(_) => break,
                        }
                    }
                }
            }
            for bone in path.drain(..) {
                marks[bone] = Mark::Done;
            }
        }
        Ok(())
    }

    /// Hierarchy lines derived from `parent_bones`.
    pub fn hierarchy_lines(&self) -> Result<Vec<HierarchyLine>> {
        linearize(&self.parent_bones)
    }

    /// Fill `rest_pose` from world matrices indexed like `parent_bones`.
    pub fn set_rest_pose_from_world(&mut self, world: &[Mat4]) -> Result<()> {
        self.rest_pose = rest_pose_from_world(world, &self.parent_bones)?;
        Ok(())
    }
}
