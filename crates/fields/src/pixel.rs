//! Pixel buffer conversion from [`ScalarField`] + [`Colormap`].
//!
//! Always available (no feature gate) so callers without the `png` feature
//! can still build RGBA buffers.

use lic_core::ScalarField;

use crate::colormap::Colormap;

/// Min-max normalizes `field` to [0, 1] and maps it through `colormap` into an
/// RGBA8 buffer of length `rows * cols * 4`.
///
/// A constant field maps to mid-gray (`t = 0.5`).
pub fn field_to_rgba(field: &ScalarField, colormap: Colormap) -> Vec<u8> {
    let (lo, hi) = field.min_max();
    let span = hi - lo;
    field
        .data()
        .iter()
        .flat_map(|&v| {
            let t = if span > 0.0 { (v - lo) / span } else { 0.5 };
            let [r, g, b] = colormap.sample(t);
            [r, g, b, 255u8]
        })
        .collect()
}
