//! Contrast postprocessing: Gaussian high-pass filter, then histogram
//! equalization.
//!
//! The blur is separable and truncated at `ceil(3 * sigma)` cells, with
//! mirrored (half-sample symmetric) edges. Both blur passes compute each
//! output row independently on the rayon pool, so the result does not depend
//! on the thread count.

use lic_core::{LicConfig, LicError, ScalarField};
use rayon::prelude::*;
use tracing::debug;

/// Applies the enabled steps of `config` in order: filter, then equalize.
pub fn postprocess(field: ScalarField, config: &LicConfig) -> Result<ScalarField, LicError> {
    let mut field = field;
    if config.use_filter() {
        debug!(sigma = config.filter_sigma(), "high-pass filter");
        field = high_pass(&field, config.filter_sigma())?;
    }
    if config.use_equalize() {
        debug!("histogram equalization");
        field = equalize(&field)?;
    }
    Ok(field)
}

/// Normalized Gaussian weights for offsets `-radius..=radius`.
pub fn gaussian_kernel(sigma: f64) -> Result<Vec<f64>, LicError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(LicError::InvalidFilterSigma(sigma));
    }
    let radius = (3.0 * sigma).ceil().max(1.0) as isize;
    let denom = 2.0 * sigma * sigma;
    let raw: Vec<f64> = (-radius..=radius)
        .map(|i| (-((i * i) as f64) / denom).exp())
        .collect();
    let total: f64 = raw.iter().sum();
    Ok(raw.into_iter().map(|w| w / total).collect())
}

/// Separable Gaussian blur with mirrored edges.
pub fn gaussian_blur(field: &ScalarField, sigma: f64) -> Result<ScalarField, LicError> {
    let kernel = gaussian_kernel(sigma)?;
    let radius = (kernel.len() / 2) as isize;
    let (rows, cols) = field.shape();
    let src = field.data();

    let mut horizontal = vec![0.0; rows * cols];
    horizontal
        .par_chunks_mut(cols)
        .enumerate()
        .for_each(|(r, out_row)| {
            let in_row = &src[r * cols..(r + 1) * cols];
            for (c, cell) in out_row.iter_mut().enumerate() {
                *cell = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, w)| w * in_row[mirror(c as isize + k as isize - radius, cols)])
                    .sum();
            }
        });

    let mut blurred = vec![0.0; rows * cols];
    blurred
        .par_chunks_mut(cols)
        .enumerate()
        .for_each(|(r, out_row)| {
            for (c, cell) in out_row.iter_mut().enumerate() {
                *cell = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, w)| {
                        w * horizontal[mirror(r as isize + k as isize - radius, rows) * cols + c]
                    })
                    .sum();
            }
        });

    ScalarField::from_data(rows, cols, blurred)
}

/// `field - blur(field) + mean(field)`: removes slow brightness gradients
/// while keeping values near their original level.
pub fn high_pass(field: &ScalarField, sigma: f64) -> Result<ScalarField, LicError> {
    let blurred = gaussian_blur(field, sigma)?;
    let mean = field.mean();
    let data = field
        .data()
        .iter()
        .zip(blurred.data())
        .map(|(v, b)| v - b + mean)
        .collect();
    ScalarField::from_data(field.rows(), field.cols(), data)
}

/// Rank transform onto a uniform distribution over [0, 1].
///
/// Each value maps to `rank / (n - 1)`; equal values share the mean of their
/// ranks. A single-cell or constant field maps to 0.5.
pub fn equalize(field: &ScalarField) -> Result<ScalarField, LicError> {
    if let Some((row, col)) = field.first_non_finite() {
        return Err(LicError::NonFiniteTexture { row, col });
    }
    let data = field.data();
    let n = data.len();
    if n == 1 {
        return ScalarField::filled(field.rows(), field.cols(), 0.5);
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));

    let denom = (n - 1) as f64;
    let mut out = vec![0.0; n];
    let mut start = 0;
    while start < n {
        let value = data[order[start]];
        let end = start + order[start..].iter().take_while(|&&i| data[i] == value).count();
        let mean_rank = (start + end - 1) as f64 / 2.0;
        for &i in &order[start..end] {
            out[i] = mean_rank / denom;
        }
        start = end;
    }
    ScalarField::from_data(field.rows(), field.cols(), out)
}

/// Reflects an out-of-range index back into `0..n` (`d c b a | a b c d | d c b a`).
fn mirror(i: isize, n: usize) -> usize {
    let n = n as isize;
    let period = 2 * n;
    let m = i.rem_euclid(period);
    (if m < n { m } else { period - 1 - m }) as usize
}
