//! Image cropping command
//!
//! Crops one or more co-registered images to the ROI of a mask, or to
//! coordinates given directly, writing each crop into an output directory.

use std::path::{Path, PathBuf};

use clap::ArgMatches;
use log::info;

use crate::api::RoiLoc;
use crate::commands::command_traits::Command;
use crate::config::CropConfig;
use crate::location::sidecar::read_coords;
use crate::location::{Coords, CropOutcome, Margin, UpperBound};
use crate::utils::progress::ProgressTracker;
use crate::volume::{VolumeError, VolumeResult};

/// Where the crop coordinates come from
#[derive(Debug, Clone, PartialEq)]
enum CoordsSource {
    /// Compute them from a mask volume
    Mask(PathBuf),
    /// Use the given coordinates
    Fixed(Coords),
}

/// Command for cropping images to an ROI
pub struct CropCommand {
    /// Images to crop
    images: Vec<PathBuf>,
    /// Directory receiving the crops
    output_dir: PathBuf,
    /// Coordinate source
    source: CoordsSource,
    /// Effective configuration
    config: CropConfig,
}

impl CropCommand {
    /// Create a new crop command
    ///
    /// # Arguments
    /// * `args` - Matches of the `crop` subcommand
    /// * `config` - Base configuration
    pub fn new(args: &ArgMatches, config: &CropConfig) -> VolumeResult<Self> {
        let images: Vec<PathBuf> = args.get_many::<String>("images")
            .map(|values| values.map(PathBuf::from).collect())
            .unwrap_or_default();
        if images.is_empty() {
            return Err(VolumeError::GenericError("No image to crop".to_string()));
        }
        info!("Images to crop: {}", images.len());

        let output_dir = args.get_one::<String>("output-dir")
            .map(PathBuf::from)
            .ok_or_else(|| VolumeError::GenericError("Missing output directory".to_string()))?;
        info!("Output directory: {}", output_dir.display());

        let source = if let Some(mask) = args.get_one::<String>("mask") {
            CoordsSource::Mask(PathBuf::from(mask))
        } else if let Some(coords) = args.get_one::<String>("coords") {
            CoordsSource::Fixed(parse_coords_arg(coords)?)
        } else {
            return Err(VolumeError::GenericError("Either --mask or --coords is required".to_string()));
        };
        info!("Coordinate source: {:?}", source);

        let mut config = *config;
        if let Some(margin_str) = args.get_one::<String>("margin") {
            config.margin = Margin::from_string(margin_str)?;
        }
        if args.get_flag("inclusive") {
            config.upper_bound = UpperBound::Inclusive;
        }
        if args.get_flag("no-log-coords") {
            config.log_coords = false;
        }
        info!("Upper bound: {}, log coordinates: {}", config.upper_bound, config.log_coords);

        Ok(CropCommand {
            images,
            output_dir,
            source,
            config,
        })
    }
}

/// Read `--coords` as a sidecar path if it exists, otherwise as "x,y,z,x,y,z"
fn parse_coords_arg(value: &str) -> VolumeResult<Coords> {
    let path = Path::new(value);
    if path.is_file() {
        read_coords(path)
    } else {
        Coords::from_string(value)
    }
}

impl Command for CropCommand {
    fn execute(&self) -> VolumeResult<()> {
        let roiloc = RoiLoc::new(self.config);

        let coords = match &self.source {
            CoordsSource::Mask(mask) => roiloc.locate(mask)?,
            CoordsSource::Fixed(coords) => *coords,
        };

        let progress = ProgressTracker::new(self.images.len(), "Cropping");
        let outcomes = roiloc.crop_all(&coords, &self.images, &self.output_dir, |image_path, _| {
            progress.image_done(image_path);
        })?;
        progress.finish();

        let written = outcomes.iter().filter(|o| o.is_written()).count();
        let skipped = outcomes.iter().filter(|o| **o == CropOutcome::Skipped).count();
        info!("Cropping finished: {} written, {} skipped", written, skipped);
        println!("Cropped {} image(s) to {} ({} skipped)", written, coords, skipped);

        Ok(())
    }
}
