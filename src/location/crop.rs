//! Index-based volume cropping
//!
//! Two conventions exist for the upper coordinates. Cropping an in-memory
//! volume (`crop`) treats them as exclusive; cropping straight from a file
//! (`crop_file`) treats them as inclusive and slices one voxel further. Both
//! read the same `Coords`, so the convention is always passed explicitly.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};
use ndarray::s;

use super::coords::Coords;
use super::sidecar::{coords_path, write_coords};
use crate::volume::{Volume, VolumeError, VolumeResult};

/// How the max coordinates of a `Coords` are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpperBound {
    /// Slice `min..max`
    #[default]
    Exclusive,
    /// Slice `min..max + 1`
    Inclusive,
}

impl UpperBound {
    /// Parse a convention name ("exclusive" or "inclusive")
    pub fn from_name(name: &str) -> VolumeResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "exclusive" => Ok(UpperBound::Exclusive),
            "inclusive" => Ok(UpperBound::Inclusive),
            other => Err(VolumeError::Config(format!("Unknown upper bound convention: '{}'", other))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UpperBound::Exclusive => "exclusive",
            UpperBound::Inclusive => "inclusive",
        }
    }

    /// Exclusive slice end for a max coordinate, before clamping
    fn end(self, max: usize) -> usize {
        match self {
            UpperBound::Exclusive => max,
            UpperBound::Inclusive => max.saturating_add(1),
        }
    }
}

impl fmt::Display for UpperBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Result of a crop request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CropOutcome {
    /// The cropped image was written
    Written {
        /// Path of the cropped image
        image: PathBuf,
        /// Path of the coordinate sidecar, when requested
        coords: Option<PathBuf>,
        /// Shape of the cropped volume
        shape: [usize; 3],
    },
    /// The crop was all zero and nothing was written
    Skipped,
}

impl CropOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, CropOutcome::Written { .. })
    }
}

/// Slice a volume to the given coordinates
///
/// Slice ends are clamped to the volume's extent. The result keeps the
/// source header.
///
/// # Errors
/// `VolumeError::InvalidCoords` when a min coordinate exceeds its max.
pub fn crop_volume(volume: &Volume, coords: &Coords, bound: UpperBound) -> VolumeResult<Volume> {
    for axis in 0..3 {
        if coords.min[axis] > coords.max[axis] {
            return Err(VolumeError::InvalidCoords(format!(
                "min {} exceeds max {} on axis {}",
                coords.min[axis], coords.max[axis], axis
            )));
        }
    }

    let shape = volume.shape();
    let ranges: [(usize, usize); 3] = std::array::from_fn(|axis| {
        let end = bound.end(coords.max[axis]).min(shape[axis]);
        (coords.min[axis].min(end), end)
    });
    debug!("Cropping {:?} to ranges {:?} ({})", shape, ranges, bound);

    let [(x0, x1), (y0, y1), (z0, z1)] = ranges;
    let cropped = volume.data().slice(s![x0..x1, y0..y1, z0..z1]).to_owned();

    Ok(volume.with_data(cropped))
}

/// Crop an in-memory volume, reading the max coordinates as exclusive
pub fn crop(volume: &Volume, coords: &Coords, output_path: &Path, log_coords: bool) -> VolumeResult<CropOutcome> {
    crop_with(volume, coords, UpperBound::Exclusive, output_path, log_coords)
}

/// Load a volume from disk and crop it, reading the max coordinates as inclusive
pub fn crop_file(image_path: &Path, coords: &Coords, output_path: &Path, log_coords: bool) -> VolumeResult<CropOutcome> {
    let volume = Volume::load(image_path)?;
    crop_with(&volume, coords, UpperBound::Inclusive, output_path, log_coords)
}

/// Crop a volume and write the result
///
/// The cropped image goes to `output_path` with the source header; when
/// `log_coords` is set the coordinates are written to `<stem>.txt` next to
/// it. If the crop holds no nonzero voxel nothing is written.
pub fn crop_with(
    volume: &Volume,
    coords: &Coords,
    bound: UpperBound,
    output_path: &Path,
    log_coords: bool,
) -> VolumeResult<CropOutcome> {
    let cropped = crop_volume(volume, coords, bound)?;

    if !cropped.has_nonzero() {
        info!("Empty cropped array, skipping {} for coordinates {}...", output_path.display(), coords);
        return Ok(CropOutcome::Skipped);
    }

    cropped.save(output_path)?;

    let sidecar = if log_coords {
        let path = coords_path(output_path);
        write_coords(&path, coords)?;
        Some(path)
    } else {
        None
    };

    Ok(CropOutcome::Written {
        image: output_path.to_path_buf(),
        coords: sidecar,
        shape: cropped.shape(),
    })
}
