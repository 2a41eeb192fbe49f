//! Noise textures: the input signal that LIC smears along the flow.

use crate::error::LicError;
use crate::field::ScalarField;
use crate::prng::{derive_seed, Xorshift64};

/// Fills a `rows x cols` field with independent uniform values in [0, 1).
pub fn uniform_noise(rows: usize, cols: usize, seed: u64) -> Result<ScalarField, LicError> {
    let mut rng = Xorshift64::new(seed);
    ScalarField::from_fn(rows, cols, |_, _| rng.next_f64())
}

/// Where each repetition's starting texture comes from.
#[derive(Debug, Clone)]
pub enum NoiseSource {
    /// Fresh uniform noise per repetition, derived from `seed` and the
    /// repetition index.
    Uniform { seed: u64 },
    /// A caller-supplied texture reused by every repetition.
    Supplied(ScalarField),
}

impl NoiseSource {
    /// Checks that the source can produce `rows x cols` finite textures.
    pub fn validate(&self, rows: usize, cols: usize) -> Result<(), LicError> {
        match self {
            NoiseSource::Uniform { .. } => Ok(()),
            NoiseSource::Supplied(texture) => {
                texture.ensure_same_shape(rows, cols)?;
                match texture.first_non_finite() {
                    Some((row, col)) => Err(LicError::NonFiniteTexture { row, col }),
                    None => Ok(()),
                }
            }
        }
    }

    /// The starting texture for repetition `index`.
    pub fn texture(
        &self,
        rows: usize,
        cols: usize,
        index: usize,
    ) -> Result<ScalarField, LicError> {
        match self {
            NoiseSource::Uniform { seed } => {
                uniform_noise(rows, cols, derive_seed(*seed, index as u64))
            }
            NoiseSource::Supplied(texture) => {
                texture.ensure_same_shape(rows, cols)?;
                Ok(texture.clone())
            }
        }
    }
}
