pub mod volume;
pub mod location;
pub mod config;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::RoiLoc;

pub use config::CropConfig;
pub use location::{get_coords, crop, crop_file, crop_with, Coords, CropOutcome, Margin, UpperBound};
pub use volume::{Volume, VolumeError, VolumeResult};
