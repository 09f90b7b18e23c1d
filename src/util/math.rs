//! Math type re-exports and small helpers shared by the codecs.

// Re-export glam types
pub use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

/// Number of bytes needed to advance `position` to the next multiple of
/// `alignment`. Zero when already aligned.
#[inline]
pub const fn padding_to(position: u64, alignment: u64) -> u64 {
    (alignment - position % alignment) % alignment
}

/// Round `value` up to a multiple of `alignment`.
#[inline]
pub const fn align_up(value: u64, alignment: u64) -> u64 {
    value + padding_to(value, alignment)
}

/// Build a world matrix from a row-major array whose upper-left 3x3 is the
/// rotation as written and whose last row holds the translation.
///
/// `Mat3::from_mat4` of the result reads back `rows[i][j]` at row `i`,
/// column `j`, and the translation lands in `w_axis`.
pub fn world_matrix_from_rows(rows: [[f32; 4]; 4]) -> Mat4 {
    let column = |j: usize| Vec4::new(rows[0][j], rows[1][j], rows[2][j], 0.0);
    Mat4::from_cols(column(0), column(1), column(2), Vec4::from(rows[3]))
}
