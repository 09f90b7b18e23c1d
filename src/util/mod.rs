//! Utility types and functions.
//!
//! This module contains fundamental types used throughout the library:
//! - [`PrimitiveType`] / [`Value`] / [`Primitive`] - Fixed-width binary values
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam

mod pod;
mod error;
mod math;

pub use pod::*;
pub use error::*;
pub use math::*;
