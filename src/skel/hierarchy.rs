//! Bone hierarchy lines.
//!
//! The chunk stores the parent map a second time as a list of fixed-width
//! lines of `(bone, parent)` pairs, ordered so every parent is listed before
//! its children. Readers keep the lines for diagnostics only; the parent
//! index array is authoritative.

use std::fmt;

use tracing::trace;

use super::format::{MAX_BONES, PAIRS_PER_LINE, ROOT_PARENT};
use crate::binary::assert_equal;
use crate::util::{Error, Result};

/// One hierarchy line: four `(bone, parent)` pairs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HierarchyLine(pub [(i16, i16); PAIRS_PER_LINE]);

impl HierarchyLine {
    /// Build a line from eight interleaved values.
    pub fn from_values(values: &[i16]) -> Result<Self> {
        assert_equal("values per hierarchy line", values.len(), PAIRS_PER_LINE * 2)?;
        let mut pairs = [(0, 0); PAIRS_PER_LINE];
        for (pair, v) in pairs.iter_mut().zip(values.chunks_exact(2)) {
            *pair = (v[0], v[1]);
        }
        Ok(Self(pairs))
    }

    /// The eight interleaved values as stored.
    pub fn to_values(&self) -> [i16; PAIRS_PER_LINE * 2] {
        let mut out = [0; PAIRS_PER_LINE * 2];
        for (i, (bone, parent)) in self.0.iter().enumerate() {
            out[2 * i] = *bone;
            out[2 * i + 1] = *parent;
        }
        out
    }

    #[inline]
    pub fn pairs(&self) -> &[(i16, i16); PAIRS_PER_LINE] {
        &self.0
    }
}

impl fmt::Display for HierarchyLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (bone, parent)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "({:>3},{:>3})", bone, parent)?;
        }
        Ok(())
    }
}

fn is_placeable(parent: i16, placed: &[bool]) -> bool {
    if parent == ROOT_PARENT {
        return true;
    }
    usize::try_from(parent)
        .ok()
        .and_then(|p| placed.get(p).copied())
        .unwrap_or(false)
}

/// Order `parents` into hierarchy lines.
///
/// Each slot takes the lowest-index unplaced bone whose parent is a root
/// marker or already placed, including a parent placed earlier in the same
/// line. When no bone qualifies the line is filled by repeating its last
/// pair. A line whose first slot cannot be filled means the parent map has
/// a cycle or points at a missing bone.
///
/// # Example
///
/// ```
/// use skel_codec::skel::{linearize, HierarchyLine};
///
/// let lines = linearize(&[-1, 0, 0]).unwrap();
/// assert_eq!(lines, vec![HierarchyLine([(0, -1), (1, 0), (2, 0), (2, 0)])]);
/// ```
pub fn linearize(parents: &[i16]) -> Result<Vec<HierarchyLine>> {
    if parents.len() > MAX_BONES {
        return Err(Error::violation(format!(
            "num_bones <= {}, value is {}",
            MAX_BONES,
            parents.len()
        )));
    }

    let mut unplaced: Vec<usize> = (0..parents.len()).collect();
    let mut placed = vec![false; parents.len()];
    let mut lines = Vec::with_capacity(parents.len().div_ceil(PAIRS_PER_LINE));

    while !unplaced.is_empty() {
        let mut pairs = [(0, 0); PAIRS_PER_LINE];
        let mut filled = 0;

        while filled < PAIRS_PER_LINE {
            let Some(slot) = unplaced
                .iter()
                .position(|&bone| is_placeable(parents[bone], &placed))
            else {
                break;
            };
            let bone = unplaced.remove(slot);
            placed[bone] = true;
            pairs[filled] = (bone as i16, parents[bone]);
            filled += 1;
        }

        if filled == 0 {
            return Err(Error::violation(format!(
                "every remaining bone has a placed parent, bones {:?} have none",
                unplaced
            )));
        }

        let last = pairs[filled - 1];
        for pair in pairs.iter_mut().skip(filled) {
            *pair = last;
        }

        trace!(index = lines.len(), line = %HierarchyLine(pairs), "hierarchy line");
        lines.push(HierarchyLine(pairs));
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_single_root_two_children() {
        let lines = linearize(&[-1, 0, 0]).unwrap();
        assert_eq!(lines, vec![HierarchyLine([(0, -1), (1, 0), (2, 0), (2, 0)])]);
    }

    #[test]
    fn test_empty() {
        assert!(linearize(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_exact_multiple_has_no_repeat() {
        let lines = linearize(&[-1, 0, 1, 2]).unwrap();
        assert_eq!(lines, vec![HierarchyLine([(0, -1), (1, 0), (2, 1), (3, 2)])]);
    }

    #[test]
    fn test_child_listed_before_parent_in_input() {
        // bone 0's parent is bone 2
        let lines = linearize(&[2, -1, 1]).unwrap();
        assert_eq!(lines, vec![HierarchyLine([(1, -1), (2, 1), (0, 2), (0, 2)])]);
    }

    #[test]
    fn test_every_bone_once_and_parent_first() {
        let parents: Vec<i16> = vec![-1, 0, 1, 1, 0, 4, -1, 6, 7, 2, 9, 5, 3];
        let lines = linearize(&parents).unwrap();
        assert_eq!(lines.len(), parents.len().div_ceil(PAIRS_PER_LINE));

        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for line in &lines {
            for &(bone, parent) in line.pairs() {
                assert_eq!(parent, parents[bone as usize]);
                if seen.insert(bone) {
                    order.push(bone);
                }
            }
        }
        assert_eq!(seen.len(), parents.len());

        for (pos, &bone) in order.iter().enumerate() {
            let parent = parents[bone as usize];
            if parent != ROOT_PARENT {
                let parent_pos = order.iter().position(|&b| b == parent).unwrap();
                assert!(parent_pos < pos, "bone {} listed before its parent {}", bone, parent);
            }
        }
    }

    #[test]
    fn test_padding_repeats_last_pair() {
        let lines = linearize(&[-1, 0, 1, 2, 3]).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], HierarchyLine([(4, 3); 4]));
    }

    #[test]
    fn test_cycle_fails() {
        let err = linearize(&[1, 0]).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
        // root placed first, then the rest is a cycle
        assert!(linearize(&[-1, 2, 1]).is_err());
    }

    #[test]
    fn test_missing_parent_fails() {
        assert!(linearize(&[-1, 7]).is_err());
        assert!(linearize(&[-2]).is_err());
    }

    #[test]
    fn test_line_values() {
        let line = HierarchyLine([(0, -1), (1, 0), (2, 0), (2, 0)]);
        let values = line.to_values();
        assert_eq!(values, [0, -1, 1, 0, 2, 0, 2, 0]);
        assert_eq!(HierarchyLine::from_values(&values).unwrap(), line);
        assert!(HierarchyLine::from_values(&values[..6]).is_err());
        assert_eq!(line.to_string(), "(  0, -1) (  1,  0) (  2,  0) (  2,  0)");
    }
}
