//! PNG output of a LIC image.
//!
//! Feature-gated behind `png` (default on). The pixel conversion itself lives
//! in [`crate::pixel`].

use std::path::Path;

use lic_core::{LicError, ScalarField};

use crate::colormap::Colormap;
use crate::pixel::field_to_rgba;

/// Writes `field` as a PNG, min-max normalized and mapped through `colormap`.
///
/// Returns `LicError::InvalidDimensions` if the field dimensions overflow
/// `u32`, or `LicError::Io` on write failure.
pub fn write_png(field: &ScalarField, colormap: Colormap, path: &Path) -> Result<(), LicError> {
    let rgba = field_to_rgba(field, colormap);
    let w = u32::try_from(field.cols()).map_err(|_| LicError::InvalidDimensions)?;
    let h = u32::try_from(field.rows()).map_err(|_| LicError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| LicError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| LicError::Io(e.to_string()))
}
