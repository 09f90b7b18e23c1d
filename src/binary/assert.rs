//! Immediate structural assertions.
//!
//! Each check runs when called and turns a failed assumption into
//! [`Error::InvariantViolation`] naming the field, the expected value and the
//! value actually found.

use std::fmt::Debug;

use crate::util::{Error, Result};

/// Fail unless `actual == expected`.
pub fn assert_equal<T: PartialEq + Debug>(field: &str, actual: T, expected: T) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::violation(format!(
            "{} == {:?}, value is {:?}",
            field, expected, actual
        )))
    }
}

/// Fail unless `actual` is the zero value of its type.
pub fn assert_zero<T: PartialEq + Default + Debug>(field: &str, actual: T) -> Result<()> {
    assert_equal(field, actual, T::default())
}

/// Fail unless `actual` equals one of `candidates`.
pub fn assert_one_of<T: PartialEq + Debug>(field: &str, actual: T, candidates: &[T]) -> Result<()> {
    if candidates.contains(&actual) {
        Ok(())
    } else {
        Err(Error::violation(format!(
            "{} in {:?}, value is {:?}",
            field, candidates, actual
        )))
    }
}
