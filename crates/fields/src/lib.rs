#![deny(unsafe_code)]
//! Collaborators around the LIC engine: named example vector fields, and
//! conversion of the resulting scalar field into colored pixels and PNG files.
//!
//! Both the CLI and library callers go through [`FieldKind::from_name`] so the
//! list of fields lives in one place.

pub mod colormap;
pub mod generators;
pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use colormap::Colormap;
pub use generators::{FieldKind, GeneratedField};
pub use pixel::field_to_rgba;
