//! Custom error types for volume processing

use std::fmt;
use std::io;

/// Errors raised while loading, locating or cropping volumes
#[derive(Debug)]
pub enum VolumeError {
    /// I/O error
    IoError(io::Error),
    /// Error reported by the NIfTI reader or writer
    Nifti(nifti::NiftiError),
    /// Array could not be reshaped to the expected dimensionality
    Shape(ndarray::ShapeError),
    /// The mask has no nonzero voxel, so no bounding box exists
    EmptyMask,
    /// Coordinates are malformed or inconsistent
    InvalidCoords(String),
    /// Volume is not three dimensional (number of dimensions found)
    NotThreeDimensional(usize),
    /// Invalid configuration value
    Config(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for VolumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeError::IoError(e) => write!(f, "I/O error: {}", e),
            VolumeError::Nifti(e) => write!(f, "NIfTI error: {}", e),
            VolumeError::Shape(e) => write!(f, "Shape error: {}", e),
            VolumeError::EmptyMask => write!(f, "Mask contains no nonzero voxel"),
            VolumeError::InvalidCoords(msg) => write!(f, "Invalid coordinates: {}", msg),
            VolumeError::NotThreeDimensional(n) => write!(f, "Expected a 3D volume, got {}D", n),
            VolumeError::Config(msg) => write!(f, "Configuration error: {}", msg),
            VolumeError::GenericError(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for VolumeError {}

impl From<io::Error> for VolumeError {
    fn from(error: io::Error) -> Self {
        VolumeError::IoError(error)
    }
}

impl From<nifti::NiftiError> for VolumeError {
    fn from(error: nifti::NiftiError) -> Self {
        VolumeError::Nifti(error)
    }
}

impl From<ndarray::ShapeError> for VolumeError {
    fn from(error: ndarray::ShapeError) -> Self {
        VolumeError::Shape(error)
    }
}

impl From<String> for VolumeError {
    fn from(msg: String) -> Self {
        VolumeError::GenericError(msg)
    }
}

/// Result type for volume operations
pub type VolumeResult<T> = Result<T, VolumeError>;
