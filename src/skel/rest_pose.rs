//! Parent-relative rest poses.

use super::format::{BONE_DEF_FLOATS, ROOT_PARENT};
use crate::binary::assert_equal;
use crate::util::{Error, Mat3, Mat4, Quat, Result, Vec3, Vec4};

/// Rest transform of one bone relative to its parent.
///
/// Stored as twelve floats: quaternion `x, y, z, w`, translation `x, y, z, w`,
/// scale `x, y, z, w`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RestPose {
    pub rotation: Quat,
    /// Homogeneous translation, `w` is 1 for poses built here
    pub translation: Vec4,
    pub scale: Vec4,
}

impl RestPose {
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
        translation: Vec4::W,
        scale: Vec4::ONE,
    };

    /// Rotation and translation with unit scale.
    pub fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation,
            translation: translation.extend(1.0),
            scale: Vec4::ONE,
        }
    }

    /// Floats in on-disk order.
    pub fn to_floats(&self) -> [f32; BONE_DEF_FLOATS] {
        let q = self.rotation;
        let t = self.translation;
        let s = self.scale;
        [q.x, q.y, q.z, q.w, t.x, t.y, t.z, t.w, s.x, s.y, s.z, s.w]
    }

    /// Pose relative to `parent`, both given as world matrices.
    ///
    /// Rotation is `R_parent^T * R_child` and translation is the world offset
    /// expressed in the parent's frame. Scale is not carried over.
    pub fn relative(parent: &Mat4, child: &Mat4) -> Self {
        let parent_rot_t = Mat3::from_mat4(*parent).transpose();
        let rotation = Quat::from_mat3(&(parent_rot_t * Mat3::from_mat4(*child)));
        let offset = child.w_axis.truncate() - parent.w_axis.truncate();
        Self::new(rotation, parent_rot_t * offset)
    }
}

impl Default for RestPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f32; BONE_DEF_FLOATS]> for RestPose {
    fn from(v: [f32; BONE_DEF_FLOATS]) -> Self {
        Self {
            rotation: Quat::from_xyzw(v[0], v[1], v[2], v[3]),
            translation: Vec4::new(v[4], v[5], v[6], v[7]),
            scale: Vec4::new(v[8], v[9], v[10], v[11]),
        }
    }
}

/// Rest poses for every bone from world matrices.
///
/// `world[i]` is bone `i`'s world transform with its translation in
/// `w_axis`. Root bones are taken relative to the identity. Row-major
/// arrays with the translation in the last row go through
/// [`world_matrix_from_rows`](crate::util::world_matrix_from_rows) first.
pub fn rest_pose_from_world(world: &[Mat4], parents: &[i16]) -> Result<Vec<RestPose>> {
    assert_equal("len(world matrices)", world.len(), parents.len())?;

    world
        .iter()
        .zip(parents)
        .enumerate()
        .map(|(i, (child, &parent))| {
            if parent == ROOT_PARENT {
                return Ok(RestPose::relative(&Mat4::IDENTITY, child));
            }
            let parent_world = usize::try_from(parent)
                .ok()
                .and_then(|p| world.get(p))
                .ok_or_else(|| {
                    Error::violation(format!(
                        "parent of bone {} is a bone index or {}, value is {}",
                        i, ROOT_PARENT, parent
                    ))
                })?;
            Ok(RestPose::relative(parent_world, child))
        })
        .collect()
}
