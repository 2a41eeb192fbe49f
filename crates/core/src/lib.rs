#![deny(unsafe_code)]
//! Core types for line integral convolution (LIC).
//!
//! Provides the `ScalarField` and `VectorField` grids, the bilinear `Sampler`
//! with its `Boundary` policy, the `Xorshift64` PRNG and noise textures, the
//! validated `LicConfig`, the `Executor` trait, and `LicError`.

pub mod config;
pub mod error;
pub mod executor;
pub mod field;
pub mod params;
pub mod prng;
pub mod sampler;
pub mod texture;
pub mod vector_field;

pub use config::{Backend, KernelShape, LicConfig, LicParams};
pub use error::LicError;
pub use executor::Executor;
pub use field::ScalarField;
pub use glam::DVec2;
pub use prng::Xorshift64;
pub use sampler::{Boundary, Sampler};
pub use texture::NoiseSource;
pub use vector_field::VectorField;
