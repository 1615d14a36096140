//! Coordinate extraction command
//!
//! Computes the padded ROI box of a mask and prints it, optionally saving it
//! as a sidecar file.

use std::path::PathBuf;

use clap::ArgMatches;
use log::info;

use crate::api::RoiLoc;
use crate::commands::command_traits::Command;
use crate::config::CropConfig;
use crate::location::sidecar::write_coords;
use crate::location::Margin;
use crate::volume::{VolumeError, VolumeResult};

/// Command for computing ROI coordinates from a mask
pub struct CoordsCommand {
    /// Path to the mask volume
    mask_file: PathBuf,
    /// Where to save the coordinates (optional)
    output_file: Option<PathBuf>,
    /// Effective configuration
    config: CropConfig,
}

impl CoordsCommand {
    /// Create a new coords command
    ///
    /// # Arguments
    /// * `args` - Matches of the `coords` subcommand
    /// * `config` - Base configuration
    pub fn new(args: &ArgMatches, config: &CropConfig) -> VolumeResult<Self> {
        let mask_file = args.get_one::<String>("mask")
            .map(PathBuf::from)
            .ok_or_else(|| VolumeError::GenericError("Missing mask file".to_string()))?;
        info!("Mask file: {}", mask_file.display());

        let output_file = args.get_one::<String>("output").map(PathBuf::from);

        let mut config = *config;
        if let Some(margin_str) = args.get_one::<String>("margin") {
            config.margin = Margin::from_string(margin_str)?;
        }
        info!("Margin: {:?}", config.margin.0);

        Ok(CoordsCommand {
            mask_file,
            output_file,
            config,
        })
    }
}

impl Command for CoordsCommand {
    fn execute(&self) -> VolumeResult<()> {
        let coords = RoiLoc::new(self.config).locate(&self.mask_file)?;
        println!("{}", coords);

        if let Some(output) = &self.output_file {
            write_coords(output, &coords)?;
            info!("Coordinates saved to {}", output.display());
        }

        Ok(())
    }
}
