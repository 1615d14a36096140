//! ROI localisation and cropping
//!
//! `get_coords` turns a mask into a padded index range; the crop functions
//! cut any volume on the same grid down to that range.

mod coords;
mod crop;
pub mod sidecar;

pub use coords::{get_coords, Coords, Margin};
pub use crop::{crop, crop_file, crop_volume, crop_with, CropOutcome, UpperBound};
