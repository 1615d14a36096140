//! Volumetric image handling
//!
//! This module provides the `Volume` type and its NIfTI-1 reading and
//! writing.

pub mod errors;
mod image;
mod reader;
mod writer;

pub use errors::{VolumeError, VolumeResult};
pub use image::Volume;
